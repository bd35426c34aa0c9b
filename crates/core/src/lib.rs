pub mod chat;
pub mod domain;
pub mod http;
pub mod llm;
pub mod market;
pub mod time;
pub mod view;

pub mod config {
    use anyhow::Context;
    use std::time::Duration;

    pub const DEFAULT_MARKET_API_BASE_URL: &str = "http://127.0.0.1:5000";
    const DEFAULT_MARKET_API_TIMEOUT_SECS: u64 = 30;
    const DEFAULT_CHAT_MAX_ATTEMPTS: u32 = 5;
    const DEFAULT_CHAT_INITIAL_BACKOFF_MS: u64 = 1000;

    #[derive(Debug, Clone)]
    pub struct Settings {
        pub market_api_base_url: String,
        pub market_api_timeout: Duration,
        pub gemini_api_key: Option<String>,
        pub gemini_base_url: Option<String>,
        pub gemini_model: Option<String>,
        pub gemini_timeout_secs: Option<u64>,
        pub chat_max_attempts: u32,
        pub chat_initial_backoff: Duration,
        pub sentry_dsn: Option<String>,
    }

    impl Settings {
        pub fn from_env() -> anyhow::Result<Self> {
            Self::from_lookup(|key| std::env::var(key).ok())
        }

        /// Builds settings from an arbitrary key lookup so tests don't have to touch
        /// the process environment.
        pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
        where
            F: Fn(&str) -> Option<String>,
        {
            let non_empty = |key: &str| lookup(key).filter(|s| !s.trim().is_empty());

            let market_api_timeout_secs = match non_empty("MARKET_API_TIMEOUT_SECS") {
                Some(s) => s
                    .trim()
                    .parse::<u64>()
                    .with_context(|| format!("MARKET_API_TIMEOUT_SECS must be an integer (got {s})"))?,
                None => DEFAULT_MARKET_API_TIMEOUT_SECS,
            };

            let gemini_timeout_secs = match non_empty("GEMINI_TIMEOUT_SECS") {
                Some(s) => Some(
                    s.trim()
                        .parse::<u64>()
                        .with_context(|| format!("GEMINI_TIMEOUT_SECS must be an integer (got {s})"))?,
                ),
                None => None,
            };

            let chat_max_attempts = match non_empty("CHAT_MAX_ATTEMPTS") {
                Some(s) => s
                    .trim()
                    .parse::<u32>()
                    .with_context(|| format!("CHAT_MAX_ATTEMPTS must be an integer (got {s})"))?,
                None => DEFAULT_CHAT_MAX_ATTEMPTS,
            };
            anyhow::ensure!(chat_max_attempts >= 1, "CHAT_MAX_ATTEMPTS must be >= 1");

            let chat_initial_backoff_ms = match non_empty("CHAT_INITIAL_BACKOFF_MS") {
                Some(s) => s
                    .trim()
                    .parse::<u64>()
                    .with_context(|| format!("CHAT_INITIAL_BACKOFF_MS must be an integer (got {s})"))?,
                None => DEFAULT_CHAT_INITIAL_BACKOFF_MS,
            };

            Ok(Self {
                market_api_base_url: non_empty("MARKET_API_BASE_URL")
                    .unwrap_or_else(|| DEFAULT_MARKET_API_BASE_URL.to_string()),
                market_api_timeout: Duration::from_secs(market_api_timeout_secs),
                gemini_api_key: non_empty("GEMINI_API_KEY"),
                gemini_base_url: non_empty("GEMINI_BASE_URL"),
                gemini_model: non_empty("GEMINI_MODEL"),
                gemini_timeout_secs,
                chat_max_attempts,
                chat_initial_backoff: Duration::from_millis(chat_initial_backoff_ms),
                sentry_dsn: non_empty("SENTRY_DSN"),
            })
        }

        pub fn require_gemini_api_key(&self) -> anyhow::Result<&str> {
            self.gemini_api_key
                .as_deref()
                .context("GEMINI_API_KEY is required")
        }
    }

}
