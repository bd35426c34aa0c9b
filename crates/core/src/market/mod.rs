pub mod client;

use crate::domain::analysis::FullAnalysisData;
use crate::domain::trending::TrendingStocksResponse;
use anyhow::Result;
use std::fmt;

pub use client::HttpMarketDataClient;

#[async_trait::async_trait]
pub trait MarketDataClient: Send + Sync {
    async fn fetch_trending_stocks(&self) -> Result<TrendingStocksResponse>;

    /// `ticker` is normalised before the request; see [`normalize_ticker`].
    async fn fetch_full_analysis(&self, ticker: &str) -> Result<FullAnalysisData>;
}

/// Error reported by the analysis backend itself (as opposed to transport failures).
#[derive(Debug, Clone)]
pub struct BackendError {
    pub endpoint: &'static str,
    pub status: u16,
    /// The backend's `{error}` text. Empty when the body was not that shape.
    pub message: String,
}

impl fmt::Display for BackendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "backend error (endpoint={}, status={})",
            self.endpoint, self.status
        )?;
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        Ok(())
    }
}

impl std::error::Error for BackendError {}

/// Trims and upper-cases a ticker symbol, rejecting empty or oddly shaped input.
pub fn normalize_ticker(raw: &str) -> Result<String> {
    let ticker = raw.trim().to_ascii_uppercase();
    anyhow::ensure!(!ticker.is_empty(), "ticker must be non-empty");
    anyhow::ensure!(
        ticker.len() <= 20,
        "ticker is too long ({} chars): {ticker}",
        ticker.len()
    );
    anyhow::ensure!(
        ticker
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '&' | '_')),
        "ticker contains unsupported characters: {ticker}"
    );
    anyhow::ensure!(
        ticker.chars().any(|c| c.is_ascii_alphanumeric()),
        "ticker must contain a letter or digit: {ticker}"
    );
    Ok(ticker)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_case_and_whitespace() {
        assert_eq!(normalize_ticker("  reliance ").unwrap(), "RELIANCE");
        assert_eq!(normalize_ticker("m&m").unwrap(), "M&M");
        assert_eq!(normalize_ticker("bajaj-auto").unwrap(), "BAJAJ-AUTO");
    }

    #[test]
    fn rejects_empty_and_path_like_input() {
        assert!(normalize_ticker("   ").is_err());
        assert!(normalize_ticker("../admin").is_err());
        assert!(normalize_ticker("TCS INFY").is_err());
    }

    #[test]
    fn rejects_punctuation_only_tickers() {
        for raw in ["..", ".", "-", "&_", " .. "] {
            assert!(normalize_ticker(raw).is_err(), "{raw:?} should be rejected");
        }
        assert_eq!(normalize_ticker("m&m.ns").unwrap(), "M&M.NS");
    }
}
