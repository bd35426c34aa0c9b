mod reveal;
mod session;

pub use reveal::reveal_chunks;
pub use session::{ChatSession, SendOutcome, APOLOGY_MESSAGE, SERVICE_ERROR_MESSAGE};
