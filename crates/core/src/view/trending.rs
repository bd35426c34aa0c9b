use crate::domain::trending::{rank_stocks, TrendingStocksResponse};
use crate::market::MarketDataClient;
use crate::time::nse_market::{self, DataFreshness};
use crate::view::badge::{change_color, BadgeColor};
use crate::view::format;
use crate::view::PageState;
use chrono::{DateTime, NaiveDate, Utc};

pub const TRENDING_UNAVAILABLE: &str = "Trending stocks are unavailable right now.";
pub const NO_TRENDING_STOCKS: &str = "No trending stocks at the moment.";

#[derive(Debug, Clone, PartialEq)]
pub struct TrendingView {
    pub freshness: DataFreshness,
    /// Session the end-of-day figures belong to; `None` while the market is open.
    pub as_of: Option<NaiveDate>,
    pub message: String,
    pub rows: Vec<TrendingRow>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TrendingRow {
    pub rank: usize,
    pub ticker: String,
    pub name: String,
    pub price: String,
    pub change: String,
    pub change_color: BadgeColor,
    pub volume_factor: String,
    pub momentum_5d: String,
    pub momentum_color: BadgeColor,
    pub reason: String,
}

/// Fetches and builds the trending page. Never fails; errors end up as `Empty`.
pub async fn load_trending(
    client: &dyn MarketDataClient,
    now: DateTime<Utc>,
) -> PageState<TrendingView> {
    trending_page(client.fetch_trending_stocks().await, now)
}

pub fn trending_page(
    fetched: anyhow::Result<TrendingStocksResponse>,
    now: DateTime<Utc>,
) -> PageState<TrendingView> {
    let response = match fetched {
        Ok(r) => r,
        Err(err) => {
            tracing::error!(error = %format!("{err:#}"), "failed to load trending stocks");
            return PageState::empty(TRENDING_UNAVAILABLE);
        }
    };

    if !response.success {
        tracing::error!(message = %response.message, "backend could not build trending list");
        return PageState::empty(TRENDING_UNAVAILABLE);
    }
    if response.results.is_empty() {
        return PageState::empty(NO_TRENDING_STOCKS);
    }

    let rows = rank_stocks(response.results)
        .into_iter()
        .map(|ranked| {
            let s = ranked.stock;
            TrendingRow {
                rank: ranked.rank,
                price: format::price(s.current_price),
                change: format::signed_percent(s.today_change_percent),
                change_color: change_color(s.today_change_percent),
                volume_factor: format::volume_factor(s.volume_factor),
                momentum_5d: format::signed_percent(s.price_change_5d),
                momentum_color: change_color(s.price_change_5d),
                ticker: s.ticker,
                name: s.name,
                reason: s.reason,
            }
        })
        .collect();

    let freshness = nse_market::freshness(now);
    let as_of = match freshness {
        DataFreshness::Live => None,
        DataFreshness::EndOfDay => Some(nse_market::last_closed_session(now)),
    };

    PageState::Ready(TrendingView {
        freshness,
        as_of,
        message: response.message,
        rows,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::trending::TrendingStock;
    use chrono::TimeZone;

    fn stock(ticker: &str, change: f64) -> TrendingStock {
        TrendingStock {
            ticker: ticker.to_string(),
            name: format!("{ticker} Ltd."),
            current_price: 1234.5,
            today_change_percent: change,
            volume_factor: 2.345,
            price_change_5d: -1.2,
            reason: "Volume spike".to_string(),
        }
    }

    fn ok(results: Vec<TrendingStock>) -> anyhow::Result<TrendingStocksResponse> {
        Ok(TrendingStocksResponse {
            success: true,
            message: "Trending stocks list.".to_string(),
            results,
        })
    }

    // Monday 10:30 IST.
    fn session_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 19, 5, 0, 0).unwrap()
    }

    #[test]
    fn builds_ranked_rows_with_formatting() {
        let page = trending_page(ok(vec![stock("TCS", 1.5), stock("INFY", -0.25)]), session_time());
        let view = page.ready().unwrap();

        assert_eq!(view.freshness, DataFreshness::Live);
        assert_eq!(view.as_of, None);
        assert_eq!(view.message, "Trending stocks list.");
        assert_eq!(view.rows.len(), 2);

        let first = &view.rows[0];
        assert_eq!(first.rank, 1);
        assert_eq!(first.ticker, "TCS");
        assert_eq!(first.price, "₹1,234.50");
        assert_eq!(first.change, "+1.50%");
        assert_eq!(first.change_color, BadgeColor::Green);
        assert_eq!(first.momentum_5d, "-1.20%");
        assert_eq!(first.momentum_color, BadgeColor::Red);

        assert_eq!(view.rows[1].rank, 2);
        assert_eq!(view.rows[1].change_color, BadgeColor::Red);
    }

    #[test]
    fn outside_session_is_labelled_eod() {
        // Saturday.
        let now = Utc.with_ymd_and_hms(2026, 10, 17, 5, 0, 0).unwrap();
        let page = trending_page(ok(vec![stock("TCS", 0.0)]), now);
        let view = page.ready().unwrap();
        assert_eq!(view.freshness, DataFreshness::EndOfDay);
        assert_eq!(view.as_of, NaiveDate::from_ymd_opt(2026, 10, 16));
    }

    #[test]
    fn errors_and_empty_lists_become_empty_state() {
        let failed = trending_page(Err(anyhow::anyhow!("connection refused")), session_time());
        assert_eq!(failed, PageState::empty(TRENDING_UNAVAILABLE));

        let reported = trending_page(
            Ok(TrendingStocksResponse {
                success: false,
                message: "Backend processing failed".to_string(),
                results: Vec::new(),
            }),
            session_time(),
        );
        assert_eq!(reported, PageState::empty(TRENDING_UNAVAILABLE));

        let none = trending_page(ok(Vec::new()), session_time());
        assert_eq!(none, PageState::empty(NO_TRENDING_STOCKS));
    }
}
