use crate::domain::chat::ChatMessage;
use crate::llm::error::LlmDiagnosticsError;
use crate::llm::ChatClient;
use std::sync::Arc;

pub const APOLOGY_MESSAGE: &str = "Sorry, I couldn't generate a response. Please try again.";
pub const SERVICE_ERROR_MESSAGE: &str =
    "Sorry, something went wrong while contacting the AI service. Please try again later.";

/// What happened to one user turn. The reply itself is always `ChatSession::last()`.
#[derive(Debug)]
pub enum SendOutcome {
    Answered,
    /// The model responded with something unusable.
    Apologized(anyhow::Error),
    /// The request never produced a response (transport, retries exhausted, rejected).
    Failed(anyhow::Error),
    /// Blank input; nothing was sent or recorded.
    Ignored,
}

impl SendOutcome {
    pub fn error(&self) -> Option<&anyhow::Error> {
        match self {
            SendOutcome::Apologized(err) | SendOutcome::Failed(err) => Some(err),
            SendOutcome::Answered | SendOutcome::Ignored => None,
        }
    }
}

/// A chat transcript bound to one client. Lives as long as the chat view.
pub struct ChatSession {
    client: Arc<dyn ChatClient>,
    transcript: Vec<ChatMessage>,
}

impl ChatSession {
    pub fn new(client: Arc<dyn ChatClient>) -> Self {
        Self {
            client,
            transcript: Vec::new(),
        }
    }

    pub fn transcript(&self) -> &[ChatMessage] {
        &self.transcript
    }

    pub fn last(&self) -> Option<&ChatMessage> {
        self.transcript.last()
    }

    /// Appends the user turn, asks the model, and appends its reply or a fixed
    /// user-facing notice. Never fails: errors are logged and returned in the outcome.
    pub async fn send(&mut self, text: &str) -> SendOutcome {
        let text = text.trim();
        if text.is_empty() {
            return SendOutcome::Ignored;
        }

        self.transcript.push(ChatMessage::user(text));

        match self.client.generate_reply(&self.transcript).await {
            Ok(reply) => {
                self.transcript.push(ChatMessage::model(reply));
                SendOutcome::Answered
            }
            Err(err) if err.downcast_ref::<LlmDiagnosticsError>().is_some() => {
                tracing::warn!(provider = ?self.client.provider(), error = %err, "unusable chat reply");
                self.transcript.push(ChatMessage::model_error(APOLOGY_MESSAGE));
                SendOutcome::Apologized(err)
            }
            Err(err) => {
                tracing::warn!(provider = ?self.client.provider(), error = %format!("{err:#}"), "chat request failed");
                self.transcript.push(ChatMessage::model_error(SERVICE_ERROR_MESSAGE));
                SendOutcome::Failed(err)
            }
        }
    }
}
