use serde::{Deserialize, Serialize};

/// Envelope returned by `GET /api/trending-stocks`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrendingStocksResponse {
    pub success: bool,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub results: Vec<TrendingStock>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendingStock {
    pub ticker: String,
    pub name: String,
    pub current_price: f64,
    pub today_change_percent: f64,
    pub volume_factor: f64,
    pub price_change_5d: f64,
    #[serde(default)]
    pub reason: String,
}

/// A trending stock with its position in the backend's ordering.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedStock {
    pub rank: usize,
    pub stock: TrendingStock,
}

/// Ranks follow response order: the first stock is rank 1.
pub fn rank_stocks(stocks: Vec<TrendingStock>) -> Vec<RankedStock> {
    stocks
        .into_iter()
        .enumerate()
        .map(|(idx, stock)| RankedStock {
            rank: idx + 1,
            stock,
        })
        .collect()
}
