use crate::domain::analysis::Timeframe;
use crate::market::{normalize_ticker, MarketDataClient};
use crate::view::detail::{load_stock_detail, StockDetailView};
use crate::view::PageState;

pub const INVALID_QUERY: &str = "Enter a valid ticker symbol.";

/// Result of a single-ticker lookup. `query` is the normalised symbol when valid.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResult {
    pub query: String,
    pub page: PageState<StockDetailView>,
}

/// Looks up one ticker. Invalid input never reaches the backend.
pub async fn search_stock(client: &dyn MarketDataClient, raw_query: &str) -> SearchResult {
    let query = match normalize_ticker(raw_query) {
        Ok(t) => t,
        Err(err) => {
            tracing::debug!(query = %raw_query, error = %err, "rejected search query");
            return SearchResult {
                query: raw_query.trim().to_string(),
                page: PageState::empty(INVALID_QUERY),
            };
        }
    };

    let page = load_stock_detail(client, &query, Timeframe::default()).await;
    SearchResult { query, page }
}
