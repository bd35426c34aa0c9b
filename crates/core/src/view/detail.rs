use crate::domain::analysis::{Fundamentals, FullAnalysisData, NewsHeadline, Timeframe};
use crate::market::{BackendError, MarketDataClient};
use crate::view::badge::{advice_badge, change_color, risk_badge, sentiment_badge, Badge, BadgeColor};
use crate::view::chart::ChartSeries;
use crate::view::format;
use crate::view::PageState;

pub const ANALYSIS_UNAVAILABLE: &str = "Analysis is unavailable for this stock right now.";

#[derive(Debug, Clone, PartialEq)]
pub enum FundamentalsView {
    Rows(Vec<(&'static str, String)>),
    Notice(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct StockDetailView {
    pub ticker: String,
    pub advice: Badge,
    pub risk: Badge,
    pub sentiment: Badge,
    pub sentiment_score: String,
    pub reason_summary: String,
    /// Absent when the backend had no latest quote (it sends 0).
    pub latest_price: Option<String>,
    pub today_change: Option<(String, BadgeColor)>,
    pub fundamentals: FundamentalsView,
    pub metrics: Vec<(String, String)>,
    pub news: Vec<NewsHeadline>,
    pub active_timeframe: Timeframe,
    pub available_timeframes: Vec<Timeframe>,
    pub chart: Option<ChartSeries>,
    data: FullAnalysisData,
}

impl StockDetailView {
    pub fn new(ticker: &str, data: FullAnalysisData, timeframe: Timeframe) -> Self {
        let fundamentals = match &data.fundamentals {
            Fundamentals::Metrics(m) => FundamentalsView::Rows(
                m.rows()
                    .into_iter()
                    .map(|(label, value)| (label, value.to_string()))
                    .collect(),
            ),
            Fundamentals::Unavailable { status } => FundamentalsView::Notice(status.clone()),
            Fundamentals::Failed { message } => FundamentalsView::Notice(message.clone()),
        };

        let latest_price = data
            .latest_price
            .filter(|p| p.is_finite() && *p > 0.0)
            .map(format::price);
        let today_change = match (&latest_price, data.today_change_percent) {
            (Some(_), Some(change)) => Some((format::signed_percent(change), change_color(change))),
            _ => None,
        };

        let mut view = Self {
            ticker: ticker.to_string(),
            advice: advice_badge(&data.advice),
            risk: risk_badge(&data.risk_level),
            sentiment: sentiment_badge(&data.sentiment_status),
            sentiment_score: format::sentiment_score(data.sentiment_score),
            reason_summary: data.reason_summary.clone(),
            latest_price,
            today_change,
            fundamentals,
            metrics: data
                .additional_metrics
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
            news: data.latest_news.clone(),
            active_timeframe: timeframe,
            available_timeframes: data.available_timeframes(),
            chart: None,
            data,
        };
        view.set_timeframe(timeframe);
        view
    }

    /// Switches the chart to another timeframe. No refetch; all series arrive together.
    pub fn set_timeframe(&mut self, timeframe: Timeframe) {
        self.active_timeframe = timeframe;
        self.chart = ChartSeries::from_points(timeframe, self.data.series(timeframe));
    }

    /// Text shown in place of the chart when the active timeframe has no data.
    pub fn chart_notice(&self) -> Option<String> {
        match self.chart {
            Some(_) => None,
            None => Some(format!(
                "No chart data available for {}.",
                self.active_timeframe
            )),
        }
    }

    pub fn data(&self) -> &FullAnalysisData {
        &self.data
    }
}

/// Fetches and builds the detail page for `ticker`. Never fails; errors end up as `Empty`.
pub async fn load_stock_detail(
    client: &dyn MarketDataClient,
    ticker: &str,
    timeframe: Timeframe,
) -> PageState<StockDetailView> {
    let ticker = ticker.trim().to_ascii_uppercase();
    match client.fetch_full_analysis(&ticker).await {
        Ok(data) => PageState::Ready(StockDetailView::new(&ticker, data, timeframe)),
        Err(err) => {
            tracing::error!(ticker = %ticker, error = %format!("{err:#}"), "failed to load stock analysis");
            match err.downcast_ref::<BackendError>() {
                Some(backend) if !backend.message.trim().is_empty() => {
                    PageState::empty(backend.message.clone())
                }
                _ => PageState::empty(ANALYSIS_UNAVAILABLE),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::trending::TrendingStocksResponse;
    use serde_json::json;

    fn analysis() -> FullAnalysisData {
        serde_json::from_value(json!({
            "advice": "STRONG BUY",
            "reason_summary": "Strong technical momentum.",
            "risk_level": "Low",
            "fundamentals": {
                "MarketCap": "₹1834512.25 Cr",
                "TrailingPE": 27.314,
                "ForwardPE": "N/A",
                "DebtToEquity": 0.41
            },
            "sentiment_score": 0.1523,
            "sentiment_status": "Positive",
            "latest_news": [{"title": "Shares climb", "source": "Mint", "link": "https://example.com/a"}],
            "historical_data": {
                "1 Day": [
                    {"date": "2026-10-16T09:15:00", "price": 100.0},
                    {"date": "2026-10-16T09:20:00", "price": 102.0}
                ],
                "1 Week": [{"date": "2026-10-12", "price": null}]
            },
            "additional_metrics": {"52W High": "₹3100.0", "52W Low": "₹2400.5"},
            "latest_price": 2950.1,
            "today_change_percent": 0.35
        }))
        .unwrap()
    }

    #[test]
    fn builds_badges_fundamentals_and_chart() {
        let view = StockDetailView::new("RELIANCE", analysis(), Timeframe::OneDay);

        assert_eq!(view.advice.color, BadgeColor::Green);
        assert_eq!(view.risk.label, "Low Risk");
        assert_eq!(view.sentiment.color, BadgeColor::Green);
        assert_eq!(view.sentiment_score, "+0.1523");
        assert_eq!(view.latest_price.as_deref(), Some("₹2,950.10"));
        assert_eq!(
            view.today_change,
            Some(("+0.35%".to_string(), BadgeColor::Green))
        );

        let FundamentalsView::Rows(rows) = &view.fundamentals else {
            panic!("expected rows, got {:?}", view.fundamentals);
        };
        assert_eq!(rows[0], ("Market Cap", "₹1834512.25 Cr".to_string()));
        assert_eq!(rows[1], ("P/E (TTM)", "27.31".to_string()));

        assert_eq!(view.metrics[0].0, "52W High");
        assert_eq!(view.news.len(), 1);
        assert_eq!(view.available_timeframes, vec![Timeframe::OneDay, Timeframe::OneWeek]);

        let chart = view.chart.as_ref().unwrap();
        assert!((chart.change_percent() - 2.0).abs() < 1e-9);
        assert!(view.chart_notice().is_none());
    }

    #[test]
    fn switching_to_gap_only_or_missing_timeframe_shows_notice() {
        let mut view = StockDetailView::new("RELIANCE", analysis(), Timeframe::OneDay);

        view.set_timeframe(Timeframe::OneWeek);
        assert!(view.chart.is_none());
        assert_eq!(
            view.chart_notice().as_deref(),
            Some("No chart data available for 1 Week.")
        );

        view.set_timeframe(Timeframe::FiveYears);
        assert_eq!(view.active_timeframe, Timeframe::FiveYears);
        assert!(view.chart.is_none());

        view.set_timeframe(Timeframe::OneDay);
        assert!(view.chart.is_some());
    }

    #[test]
    fn missing_quote_hides_price_and_change() {
        let mut data = analysis();
        data.latest_price = Some(0.0);
        data.fundamentals = Fundamentals::Unavailable {
            status: "Fundamental data unavailable.".to_string(),
        };
        let view = StockDetailView::new("XYZ", data, Timeframe::OneDay);
        assert!(view.latest_price.is_none());
        assert!(view.today_change.is_none());
        assert_eq!(
            view.fundamentals,
            FundamentalsView::Notice("Fundamental data unavailable.".to_string())
        );
    }

    struct StubClient {
        result: fn() -> anyhow::Result<FullAnalysisData>,
    }

    #[async_trait::async_trait]
    impl MarketDataClient for StubClient {
        async fn fetch_trending_stocks(&self) -> anyhow::Result<TrendingStocksResponse> {
            anyhow::bail!("not used")
        }

        async fn fetch_full_analysis(&self, _ticker: &str) -> anyhow::Result<FullAnalysisData> {
            (self.result)()
        }
    }

    #[tokio::test]
    async fn loader_maps_results_to_page_state() {
        let ok = StubClient {
            result: || Ok(analysis()),
        };
        let page = load_stock_detail(&ok, " reliance ", Timeframe::OneDay).await;
        assert_eq!(page.ready().unwrap().ticker, "RELIANCE");

        let backend = StubClient {
            result: || {
                Err(BackendError {
                    endpoint: "/api/full-analysis",
                    status: 500,
                    message: "Failed to fetch price data for XYZ".to_string(),
                }
                .into())
            },
        };
        let page = load_stock_detail(&backend, "XYZ", Timeframe::OneDay).await;
        assert_eq!(page, PageState::empty("Failed to fetch price data for XYZ"));

        let down = StubClient {
            result: || Err(anyhow::anyhow!("connection refused")),
        };
        let page = load_stock_detail(&down, "XYZ", Timeframe::OneDay).await;
        assert_eq!(page, PageState::empty(ANALYSIS_UNAVAILABLE));
    }

    #[tokio::test]
    async fn html_error_page_falls_back_to_generic_notice() {
        use crate::http::testing::ScriptedTransport;
        use crate::market::HttpMarketDataClient;
        use std::sync::Arc;

        let html = "<!doctype html>\n<html lang=en>\n<title>500 Internal Server Error</title>\n<h1>Internal Server Error</h1>";
        let transport = Arc::new(ScriptedTransport::new().respond(500, html));
        let client = HttpMarketDataClient::new(transport, "http://backend.test");

        let page = load_stock_detail(&client, "TCS", Timeframe::OneDay).await;
        assert_eq!(page, PageState::empty(ANALYSIS_UNAVAILABLE));
    }
}
