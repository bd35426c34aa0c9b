/// Splits a reply into word-sized chunks (each keeps its trailing whitespace) so a
/// front end can print it progressively. Concatenating the chunks yields `text`.
pub fn reveal_chunks(text: &str) -> impl Iterator<Item = &str> {
    text.split_inclusive(char::is_whitespace)
}
