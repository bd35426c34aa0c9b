use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Model,
}

impl ChatRole {
    pub fn label(&self) -> &'static str {
        match self {
            ChatRole::User => "You",
            ChatRole::Model => "Assistant",
        }
    }
}

/// A web page the model cited while answering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    pub uri: String,
    pub title: String,
}

/// Model output after parsing: answer text plus grounding citations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroundedReply {
    pub text: String,
    pub sources: Vec<Source>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: Uuid,
    pub role: ChatRole,
    pub text: String,
    pub sources: Vec<Source>,
    pub created_at: DateTime<Utc>,
    /// Apology and failure notices are shown to the user but never replayed to the model.
    pub is_error: bool,
}

impl ChatMessage {
    pub fn user(text: impl Into<String>) -> Self {
        Self::new(ChatRole::User, text.into(), Vec::new(), false)
    }

    pub fn model(reply: GroundedReply) -> Self {
        Self::new(ChatRole::Model, reply.text, reply.sources, false)
    }

    pub fn model_error(text: impl Into<String>) -> Self {
        Self::new(ChatRole::Model, text.into(), Vec::new(), true)
    }

    fn new(role: ChatRole, text: String, sources: Vec<Source>, is_error: bool) -> Self {
        Self {
            id: Uuid::new_v4(),
            role,
            text,
            sources,
            created_at: Utc::now(),
            is_error,
        }
    }
}
