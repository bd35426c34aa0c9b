use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Body of `GET /api/full-analysis/:ticker`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FullAnalysisData {
    pub advice: Advice,
    #[serde(default)]
    pub reason_summary: String,
    pub risk_level: RiskLevel,
    pub fundamentals: Fundamentals,
    #[serde(default)]
    pub sentiment_score: f64,
    pub sentiment_status: SentimentStatus,
    #[serde(default)]
    pub latest_news: Vec<NewsHeadline>,
    #[serde(default)]
    pub historical_data: BTreeMap<String, Vec<PricePoint>>,
    #[serde(default)]
    pub additional_metrics: BTreeMap<String, String>,
    #[serde(default)]
    pub latest_price: Option<f64>,
    #[serde(default)]
    pub today_change_percent: Option<f64>,
}

impl FullAnalysisData {
    /// Points for a timeframe, or an empty slice when the backend sent none.
    pub fn series(&self, timeframe: Timeframe) -> &[PricePoint] {
        self.historical_data
            .get(timeframe.label())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Timeframes that actually carry data, in display order.
    pub fn available_timeframes(&self) -> Vec<Timeframe> {
        Timeframe::ALL
            .into_iter()
            .filter(|tf| !self.series(*tf).is_empty())
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: String,
    /// Null when the upstream series had a gap.
    pub price: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsHeadline {
    pub title: String,
    #[serde(default = "unknown_source")]
    pub source: String,
    #[serde(default)]
    pub link: String,
}

fn unknown_source() -> String {
    "Unknown".to_string()
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Timeframe {
    #[default]
    OneDay,
    OneWeek,
    SixMonths,
    OneYear,
    FiveYears,
}

impl Timeframe {
    pub const ALL: [Timeframe; 5] = [
        Timeframe::OneDay,
        Timeframe::OneWeek,
        Timeframe::SixMonths,
        Timeframe::OneYear,
        Timeframe::FiveYears,
    ];

    /// Key used by the backend in `historical_data`.
    pub fn label(self) -> &'static str {
        match self {
            Timeframe::OneDay => "1 Day",
            Timeframe::OneWeek => "1 Week",
            Timeframe::SixMonths => "6 Months",
            Timeframe::OneYear => "1 Year",
            Timeframe::FiveYears => "5 Year",
        }
    }

    /// Accepts the backend label as well as short forms like `1d`, `1w`, `6m`, `1y`, `5y`.
    pub fn parse(s: &str) -> Option<Self> {
        let normalized = s.trim().to_ascii_lowercase();
        Timeframe::ALL.into_iter().find(|tf| {
            tf.label().to_ascii_lowercase() == normalized || tf.short_label() == normalized
        })
    }

    pub fn short_label(self) -> &'static str {
        match self {
            Timeframe::OneDay => "1d",
            Timeframe::OneWeek => "1w",
            Timeframe::SixMonths => "6m",
            Timeframe::OneYear => "1y",
            Timeframe::FiveYears => "5y",
        }
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Advice {
    StrongBuy,
    AvoidSell,
    HoldCaution,
    Hold,
    Other(String),
}

impl From<String> for Advice {
    fn from(s: String) -> Self {
        match s.trim() {
            "STRONG BUY" => Advice::StrongBuy,
            "AVOID / SELL" => Advice::AvoidSell,
            "HOLD / CAUTION" => Advice::HoldCaution,
            "HOLD" => Advice::Hold,
            _ => Advice::Other(s),
        }
    }
}

impl From<Advice> for String {
    fn from(a: Advice) -> Self {
        a.as_str().to_string()
    }
}

impl Advice {
    pub fn as_str(&self) -> &str {
        match self {
            Advice::StrongBuy => "STRONG BUY",
            Advice::AvoidSell => "AVOID / SELL",
            Advice::HoldCaution => "HOLD / CAUTION",
            Advice::Hold => "HOLD",
            Advice::Other(s) => s.as_str(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Other(String),
}

impl From<String> for RiskLevel {
    fn from(s: String) -> Self {
        match s.trim() {
            "Low" => RiskLevel::Low,
            "Medium" => RiskLevel::Medium,
            "High" => RiskLevel::High,
            _ => RiskLevel::Other(s),
        }
    }
}

impl From<RiskLevel> for String {
    fn from(r: RiskLevel) -> Self {
        r.as_str().to_string()
    }
}

impl RiskLevel {
    pub fn as_str(&self) -> &str {
        match self {
            RiskLevel::Low => "Low",
            RiskLevel::Medium => "Medium",
            RiskLevel::High => "High",
            RiskLevel::Other(s) => s.as_str(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SentimentStatus {
    Positive,
    Negative,
    Neutral,
    Other(String),
}

impl From<String> for SentimentStatus {
    fn from(s: String) -> Self {
        match s.trim() {
            "Positive" => SentimentStatus::Positive,
            "Negative" => SentimentStatus::Negative,
            "Neutral" => SentimentStatus::Neutral,
            _ => SentimentStatus::Other(s),
        }
    }
}

impl From<&str> for SentimentStatus {
    fn from(s: &str) -> Self {
        SentimentStatus::from(s.to_string())
    }
}

impl From<SentimentStatus> for String {
    fn from(s: SentimentStatus) -> Self {
        s.as_str().to_string()
    }
}

impl SentimentStatus {
    pub fn as_str(&self) -> &str {
        match self {
            SentimentStatus::Positive => "Positive",
            SentimentStatus::Negative => "Negative",
            SentimentStatus::Neutral => "Neutral",
            SentimentStatus::Other(s) => s.as_str(),
        }
    }
}

/// The backend sends one of three shapes here depending on how its lookup went.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Fundamentals {
    Metrics(FundamentalMetrics),
    Unavailable { status: String },
    Failed { message: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FundamentalMetrics {
    #[serde(rename = "MarketCap")]
    pub market_cap: MetricValue,
    #[serde(rename = "TrailingPE", default)]
    pub trailing_pe: MetricValue,
    #[serde(rename = "ForwardPE", default)]
    pub forward_pe: MetricValue,
    #[serde(rename = "DebtToEquity", default)]
    pub debt_to_equity: MetricValue,
}

impl FundamentalMetrics {
    pub fn rows(&self) -> [(&'static str, &MetricValue); 4] {
        [
            ("Market Cap", &self.market_cap),
            ("P/E (TTM)", &self.trailing_pe),
            ("Forward P/E", &self.forward_pe),
            ("Debt/Equity", &self.debt_to_equity),
        ]
    }
}

/// A number, or preformatted text such as `"N/A"` or `"₹1234.50 Cr"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetricValue {
    Number(f64),
    Text(String),
}

impl Default for MetricValue {
    fn default() -> Self {
        MetricValue::Text("N/A".to_string())
    }
}

impl fmt::Display for MetricValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetricValue::Number(n) => write!(f, "{n:.2}"),
            MetricValue::Text(s) => f.write_str(s),
        }
    }
}
