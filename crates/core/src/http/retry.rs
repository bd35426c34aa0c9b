use crate::http::{HttpRequest, HttpResponse, HttpTransport};
use reqwest::StatusCode;
use std::fmt;
use std::time::Duration;

pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;
pub const DEFAULT_INITIAL_DELAY: Duration = Duration::from_millis(1000);

/// Pure exponential backoff: the wait after the n-th failed attempt is
/// `initial_delay * 2^(n-1)`. No jitter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackoffPolicy {
    pub max_attempts: u32,
    pub initial_delay: Duration,
}

impl Default for BackoffPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            initial_delay: DEFAULT_INITIAL_DELAY,
        }
    }
}

impl BackoffPolicy {
    pub fn new(max_attempts: u32, initial_delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            initial_delay,
        }
    }

    /// Wait that follows failed attempt number `attempt` (1-based).
    pub fn delay_after(&self, attempt: u32) -> Duration {
        let exp = attempt.saturating_sub(1).min(31);
        self.initial_delay.saturating_mul(1u32 << exp)
    }

    /// Upper bound on total sleeping: `initial_delay * (2^max_attempts - 1)`.
    pub fn worst_case_wait(&self) -> Duration {
        let exp = self.max_attempts.min(31);
        self.initial_delay.saturating_mul((1u32 << exp) - 1)
    }
}

#[derive(Debug, Clone)]
pub enum RetryError {
    /// Non-retryable status; returned on the attempt that saw it.
    Status {
        status: StatusCode,
        attempts: u32,
        body: String,
    },
    /// Every attempt was rate limited or failed in transport.
    Exhausted { attempts: u32, last_failure: String },
}

impl RetryError {
    pub fn attempts(&self) -> u32 {
        match self {
            RetryError::Status { attempts, .. } | RetryError::Exhausted { attempts, .. } => {
                *attempts
            }
        }
    }

    pub fn status(&self) -> Option<StatusCode> {
        match self {
            RetryError::Status { status, .. } => Some(*status),
            RetryError::Exhausted { .. } => None,
        }
    }
}

impl fmt::Display for RetryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RetryError::Status {
                status, attempts, ..
            } => write!(f, "HTTP {status} on attempt {attempts} (not retried)"),
            RetryError::Exhausted {
                attempts,
                last_failure,
            } => write!(
                f,
                "giving up after {attempts} attempts; last failure: {last_failure}"
            ),
        }
    }
}

impl std::error::Error for RetryError {}

/// Sends `req`, retrying on 429 and transport errors with exponential backoff.
///
/// Other non-success statuses fail immediately. Errors are `RetryError`s wrapped in
/// `anyhow` so callers can `downcast_ref` them.
pub async fn send_with_backoff<T>(
    transport: &T,
    req: &HttpRequest,
    policy: &BackoffPolicy,
) -> anyhow::Result<HttpResponse>
where
    T: HttpTransport + ?Sized,
{
    let mut attempt: u32 = 0;
    loop {
        attempt += 1;

        let failure = match transport.send(req).await {
            Ok(res) if res.status.is_success() => return Ok(res),
            Ok(res) if res.status == StatusCode::TOO_MANY_REQUESTS => {
                format!("HTTP {}", res.status)
            }
            Ok(res) => {
                tracing::warn!(attempt, url = %req.url, http_status = %res.status, "request rejected; not retrying");
                return Err(RetryError::Status {
                    status: res.status,
                    attempts: attempt,
                    body: res.body,
                }
                .into());
            }
            Err(err) => format!("{err:#}"),
        };

        if attempt >= policy.max_attempts {
            tracing::error!(attempts = attempt, url = %req.url, %failure, "retries exhausted");
            return Err(RetryError::Exhausted {
                attempts: attempt,
                last_failure: failure,
            }
            .into());
        }

        let backoff = policy.delay_after(attempt);
        tracing::warn!(attempt, ?backoff, url = %req.url, %failure, "request failed; retrying");
        tokio::time::sleep(backoff).await;
    }
}
