use chrono::{
    DateTime, Datelike, Duration, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Utc,
};
use std::collections::HashSet;

// IST is UTC+05:30.
const IST_OFFSET_SECS: i32 = 5 * 3600 + 30 * 60;

const SESSION_OPEN: (u32, u32) = (9, 15);
const SESSION_CLOSE: (u32, u32) = (15, 30);

/// Whether quotes shown now are intraday or the last close.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataFreshness {
    Live,
    EndOfDay,
}

impl DataFreshness {
    pub fn label(&self) -> &'static str {
        match self {
            DataFreshness::Live => "Live",
            DataFreshness::EndOfDay => "EOD",
        }
    }
}

fn ist_local(now_utc: DateTime<Utc>) -> NaiveDateTime {
    match FixedOffset::east_opt(IST_OFFSET_SECS) {
        Some(ist) => now_utc.with_timezone(&ist).naive_local(),
        None => now_utc.naive_utc(),
    }
}

/// NSE cash session: Monday to Friday, 09:15 to 15:30 IST inclusive, excluding holidays.
pub fn is_session_open(now_utc: DateTime<Utc>) -> bool {
    let now = ist_local(now_utc);
    let date = now.date();
    if is_weekend(date) || configured_holidays().contains(&date) {
        return false;
    }

    let t = now.time();
    match (session_time(SESSION_OPEN), session_time(SESSION_CLOSE)) {
        (Some(open), Some(close)) => open <= t && t <= close,
        _ => false,
    }
}

pub fn freshness(now_utc: DateTime<Utc>) -> DataFreshness {
    if is_session_open(now_utc) {
        DataFreshness::Live
    } else {
        DataFreshness::EndOfDay
    }
}

/// The most recent trading date whose close is known at `now_utc`.
pub fn last_closed_session(now_utc: DateTime<Utc>) -> NaiveDate {
    let now = ist_local(now_utc);
    let closed_today = match session_time(SESSION_CLOSE) {
        Some(close) => now.time() > close,
        None => false,
    };

    let mut date = now.date();
    if !closed_today {
        date = date - Duration::days(1);
    }

    let holidays = configured_holidays();
    while is_weekend(date) || holidays.contains(&date) {
        date = date - Duration::days(1);
    }
    date
}

fn session_time((h, m): (u32, u32)) -> Option<NaiveTime> {
    NaiveTime::from_hms_opt(h, m, 0)
}

fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), chrono::Weekday::Sat | chrono::Weekday::Sun)
}

fn configured_holidays() -> HashSet<NaiveDate> {
    // Fixed-date exchange holidays. Extend via NSE_MARKET_HOLIDAYS="YYYY-MM-DD,YYYY-MM-DD".
    let mut out = HashSet::new();
    for y in 2024..=2030 {
        for (m, d) in [(1, 26), (8, 15), (10, 2), (12, 25)] {
            if let Some(date) = NaiveDate::from_ymd_opt(y, m, d) {
                out.insert(date);
            }
        }
    }

    if let Ok(s) = std::env::var("NSE_MARKET_HOLIDAYS") {
        for part in s.split(',') {
            let part = part.trim();
            if part.is_empty() {
                continue;
            }
            if let Ok(d) = NaiveDate::parse_from_str(part, "%Y-%m-%d") {
                out.insert(d);
            }
        }
    }

    out
}
