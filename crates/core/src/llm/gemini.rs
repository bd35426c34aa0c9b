use crate::config::Settings;
use crate::domain::chat::{ChatMessage, ChatRole, GroundedReply};
use crate::http::retry::{send_with_backoff, BackoffPolicy};
use crate::http::{HttpRequest, HttpTransport, ReqwestTransport};
use crate::llm::error::LlmDiagnosticsError;
use crate::llm::grounding::{collect_sources, GroundingMetadata};
use crate::llm::{ChatClient, Provider};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
const DEFAULT_MODEL: &str = "gemini-2.5-flash";
const DEFAULT_TIMEOUT_SECS: u64 = 60;
const API_KEY_HEADER: &str = "x-goog-api-key";

const SYSTEM_PROMPT: &str = "You are a concise stock market assistant inside a trading dashboard. \
Answer questions about stocks, indices, sectors and market news. \
Use Google Search for anything time-sensitive such as prices, results or announcements, \
and say when information may be delayed. \
Do not give personalised financial advice; explain the factors an investor would weigh instead.";

#[derive(Clone)]
pub struct GeminiClient {
    transport: Arc<dyn HttpTransport>,
    api_key: String,
    base_url: String,
    model: String,
    policy: BackoffPolicy,
}

impl GeminiClient {
    pub fn from_settings(settings: &Settings) -> anyhow::Result<Self> {
        let api_key = settings.require_gemini_api_key()?.to_string();
        let timeout_secs = settings.gemini_timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS);
        let transport = ReqwestTransport::new(Duration::from_secs(timeout_secs))
            .context("failed to build Gemini http client")?;

        let policy = BackoffPolicy::new(settings.chat_max_attempts, settings.chat_initial_backoff);

        Ok(Self::new(Arc::new(transport), api_key, policy)
            .with_base_url(settings.gemini_base_url.as_deref().unwrap_or(DEFAULT_BASE_URL))
            .with_model(settings.gemini_model.as_deref().unwrap_or(DEFAULT_MODEL)))
    }

    pub fn new(transport: Arc<dyn HttpTransport>, api_key: String, policy: BackoffPolicy) -> Self {
        Self {
            transport,
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            policy,
        }
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    pub fn with_model(mut self, model: &str) -> Self {
        self.model = model.to_string();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn url(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        )
    }

    fn build_request(history: &[ChatMessage]) -> GenerateContentRequest {
        let contents = history
            .iter()
            .filter(|m| !m.is_error && !m.text.trim().is_empty())
            .map(|m| Content {
                role: Some(match m.role {
                    ChatRole::User => "user",
                    ChatRole::Model => "model",
                }),
                parts: vec![Part {
                    text: m.text.clone(),
                }],
            })
            .collect();

        GenerateContentRequest {
            contents,
            tools: vec![Tool {
                google_search: GoogleSearch {},
            }],
            system_instruction: Content {
                role: None,
                parts: vec![Part {
                    text: SYSTEM_PROMPT.to_string(),
                }],
            },
        }
    }

    fn parse_reply(raw: &str) -> anyhow::Result<GroundedReply> {
        let res = serde_json::from_str::<GenerateContentResponse>(raw).map_err(|err| {
            LlmDiagnosticsError {
                provider: Provider::Gemini,
                stage: "decode",
                detail: err.to_string(),
                raw_output: Some(raw.to_string()),
            }
        })?;

        let Some(candidate) = res.candidates.into_iter().next() else {
            return Err(LlmDiagnosticsError {
                provider: Provider::Gemini,
                stage: "candidates",
                detail: "response has no candidates".to_string(),
                raw_output: Some(raw.to_string()),
            }
            .into());
        };

        let text = Self::response_text(&candidate);
        if text.trim().is_empty() {
            return Err(LlmDiagnosticsError {
                provider: Provider::Gemini,
                stage: "text",
                detail: format!(
                    "candidate has no text (finish_reason={})",
                    candidate.finish_reason.as_deref().unwrap_or("none")
                ),
                raw_output: Some(raw.to_string()),
            }
            .into());
        }

        let sources = candidate
            .grounding_metadata
            .as_ref()
            .map(collect_sources)
            .unwrap_or_default();

        Ok(GroundedReply { text, sources })
    }

    fn response_text(candidate: &Candidate) -> String {
        let mut out = String::new();
        let Some(content) = &candidate.content else {
            return out;
        };
        for part in &content.parts {
            // Non-text parts (function calls, inline data) are ignored.
            if let Some(text) = &part.text {
                out.push_str(text);
            }
        }
        out
    }
}

#[async_trait::async_trait]
impl ChatClient for GeminiClient {
    fn provider(&self) -> Provider {
        Provider::Gemini
    }

    async fn generate_reply(&self, history: &[ChatMessage]) -> anyhow::Result<GroundedReply> {
        let body = Self::build_request(history);
        anyhow::ensure!(!body.contents.is_empty(), "chat history has no user turn to answer");

        let body = serde_json::to_value(&body).context("failed to encode Gemini request")?;
        let req = HttpRequest::post_json(self.url(), body).header(API_KEY_HEADER, self.api_key.clone());

        let res = send_with_backoff(self.transport.as_ref(), &req, &self.policy)
            .await
            .context("Gemini request failed")?;

        let reply = Self::parse_reply(&res.body)?;
        tracing::debug!(
            model = %self.model,
            chars = reply.text.len(),
            sources = reply.sources.len(),
            "Gemini reply received"
        );
        Ok(reply)
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    tools: Vec<Tool>,
    system_instruction: Content,
}

#[derive(Debug, Clone, Serialize)]
struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'static str>,
    parts: Vec<Part>,
}

#[derive(Debug, Clone, Serialize)]
struct Part {
    text: String,
}

#[derive(Debug, Clone, Serialize)]
struct Tool {
    google_search: GoogleSearch,
}

#[derive(Debug, Clone, Serialize)]
struct GoogleSearch {}

#[derive(Debug, Clone, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Option<ResponseContent>,
    #[serde(default)]
    grounding_metadata: Option<GroundingMetadata>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Clone, Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
}
