use crate::config::Settings;
use crate::domain::analysis::FullAnalysisData;
use crate::domain::trending::TrendingStocksResponse;
use crate::http::{HttpRequest, HttpTransport, ReqwestTransport};
use crate::market::{normalize_ticker, BackendError, MarketDataClient};
use anyhow::{Context, Result};
use serde::Deserialize;
use std::sync::Arc;

const TRENDING_PATH: &str = "/api/trending-stocks";
const FULL_ANALYSIS_PATH: &str = "/api/full-analysis";

/// Client for the analysis backend's REST endpoints. Single attempt per call.
#[derive(Clone)]
pub struct HttpMarketDataClient {
    transport: Arc<dyn HttpTransport>,
    base_url: String,
}

impl HttpMarketDataClient {
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let transport = ReqwestTransport::new(settings.market_api_timeout)
            .context("failed to build market data http client")?;
        Ok(Self::new(Arc::new(transport), &settings.market_api_base_url))
    }

    pub fn new(transport: Arc<dyn HttpTransport>, base_url: &str) -> Self {
        Self {
            transport,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

#[async_trait::async_trait]
impl MarketDataClient for HttpMarketDataClient {
    async fn fetch_trending_stocks(&self) -> Result<TrendingStocksResponse> {
        let url = self.url(TRENDING_PATH);
        let res = self
            .transport
            .send(&HttpRequest::get(&url))
            .await
            .context("trending stocks request failed")?;

        // The backend answers 500 with the same envelope and `success=false`.
        match res.json::<TrendingStocksResponse>() {
            Ok(parsed) => {
                if !res.status.is_success() {
                    tracing::warn!(http_status = %res.status, message = %parsed.message, "trending stocks reported failure");
                }
                tracing::debug!(results = parsed.results.len(), "fetched trending stocks");
                Ok(parsed)
            }
            Err(err) if res.status.is_success() => Err(err),
            Err(_) => {
                tracing::warn!(http_status = %res.status, body = %res.body, "trending stocks failed without an envelope");
                Err(BackendError {
                    endpoint: TRENDING_PATH,
                    status: res.status.as_u16(),
                    message: String::new(),
                }
                .into())
            }
        }
    }

    async fn fetch_full_analysis(&self, ticker: &str) -> Result<FullAnalysisData> {
        let ticker = normalize_ticker(ticker)?;
        let url = self.url(&format!("{FULL_ANALYSIS_PATH}/{ticker}"));

        let res = self
            .transport
            .send(&HttpRequest::get(&url))
            .await
            .with_context(|| format!("full analysis request failed for {ticker}"))?;

        if !res.status.is_success() {
            // Only the backend's own `{error}` text is user-presentable; HTML error
            // pages and proxy bodies stay in the logs.
            let message = match res.json::<ErrorBody>() {
                Ok(body) => body.error,
                Err(_) => {
                    tracing::warn!(%ticker, http_status = %res.status, body = %res.body, "full analysis failed without an error body");
                    String::new()
                }
            };
            return Err(BackendError {
                endpoint: FULL_ANALYSIS_PATH,
                status: res.status.as_u16(),
                message,
            }
            .into());
        }

        // A 200 can still carry `{error}` if a proxy rewrote the status.
        if let Ok(body) = res.json::<ErrorBody>() {
            anyhow::bail!(BackendError {
                endpoint: FULL_ANALYSIS_PATH,
                status: res.status.as_u16(),
                message: body.error,
            });
        }

        res.json::<FullAnalysisData>()
            .with_context(|| format!("failed to decode full analysis for {ticker}"))
    }
}
