pub mod error;
pub mod gemini;
pub mod grounding;

use crate::domain::chat::{ChatMessage, GroundedReply};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    Gemini,
}

#[async_trait::async_trait]
pub trait ChatClient: Send + Sync {
    fn provider(&self) -> Provider;

    /// Answers the last user turn in `history`. Error turns in `history` are skipped.
    async fn generate_reply(&self, history: &[ChatMessage]) -> anyhow::Result<GroundedReply>;
}
