use marketlens_core::view::detail::{FundamentalsView, StockDetailView};
use marketlens_core::view::search::SearchResult;
use marketlens_core::view::trending::TrendingView;
use marketlens_core::view::{Badge, BadgeColor, PageState};
use std::fmt::Write;

const SPARKLINE_WIDTH: usize = 60;
const RESET: &str = "\x1b[0m";

fn ansi(color: BadgeColor) -> &'static str {
    match color {
        BadgeColor::Green => "\x1b[32m",
        BadgeColor::Red => "\x1b[31m",
        BadgeColor::Yellow => "\x1b[33m",
        BadgeColor::Gray => "\x1b[90m",
    }
}

pub fn paint(text: &str, color: BadgeColor) -> String {
    format!("{}{text}{RESET}", ansi(color))
}

fn badge(b: &Badge) -> String {
    paint(&format!("[{}]", b.label), b.color)
}

fn empty_or_loading<T>(page: &PageState<T>) -> Option<String> {
    match page {
        PageState::Loading => Some("Loading...\n".to_string()),
        PageState::Empty { message } => Some(format!("{message}\n")),
        PageState::Ready(_) => None,
    }
}

pub fn trending_page(page: &PageState<TrendingView>) -> String {
    let view = match page {
        PageState::Ready(view) => view,
        other => return empty_or_loading(other).unwrap_or_default(),
    };

    let mut out = String::new();
    match view.as_of {
        Some(date) => {
            let _ = writeln!(out, "Trending stocks ({} {date})", view.freshness.label());
        }
        None => {
            let _ = writeln!(out, "Trending stocks ({})", view.freshness.label());
        }
    }
    if !view.message.is_empty() {
        let _ = writeln!(out, "{}", view.message);
    }
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "{:>3}  {:<14} {:>12} {:>9} {:>8} {:>9}",
        "#", "TICKER", "PRICE", "TODAY", "VOLUME", "5D"
    );
    for row in &view.rows {
        // Pad before painting so escape codes don't break alignment.
        let _ = writeln!(
            out,
            "{:>3}  {:<14} {:>12} {} {:>8} {}",
            row.rank,
            row.ticker,
            row.price,
            paint(&format!("{:>9}", row.change), row.change_color),
            row.volume_factor,
            paint(&format!("{:>9}", row.momentum_5d), row.momentum_color),
        );
        let _ = writeln!(out, "     {}", row.name);
        if !row.reason.is_empty() {
            let _ = writeln!(out, "     {}", paint(&row.reason, BadgeColor::Gray));
        }
    }
    out
}

pub fn detail_page(ticker: &str, page: &PageState<StockDetailView>) -> String {
    match page {
        PageState::Ready(view) => detail(view),
        _ => format!(
            "{ticker}: {}",
            empty_or_loading(page).unwrap_or_default()
        ),
    }
}

fn detail(view: &StockDetailView) -> String {
    let mut out = String::new();

    let _ = write!(out, "{}", view.ticker);
    if let Some(price) = &view.latest_price {
        let _ = write!(out, "  {price}");
    }
    if let Some((change, color)) = &view.today_change {
        let _ = write!(out, "  {}", paint(change, *color));
    }
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "{} {} {} (score {})",
        badge(&view.advice),
        badge(&view.risk),
        badge(&view.sentiment),
        view.sentiment_score
    );
    if !view.reason_summary.is_empty() {
        let _ = writeln!(out, "{}", view.reason_summary);
    }

    let _ = writeln!(out, "\nFundamentals");
    match &view.fundamentals {
        FundamentalsView::Rows(rows) => {
            for (label, value) in rows {
                let _ = writeln!(out, "  {label:<14} {value}");
            }
        }
        FundamentalsView::Notice(text) => {
            let _ = writeln!(out, "  {}", paint(text, BadgeColor::Gray));
        }
    }
    for (label, value) in &view.metrics {
        let _ = writeln!(out, "  {label:<14} {value}");
    }

    let _ = writeln!(out, "\nChart ({})", view.active_timeframe);
    match &view.chart {
        Some(chart) => {
            let (from, to) = chart.date_range();
            let change = chart.change_percent();
            let color = marketlens_core::view::badge::change_color(change);
            let _ = writeln!(out, "  {}", paint(&chart.sparkline(SPARKLINE_WIDTH), color));
            let _ = writeln!(
                out,
                "  {from} .. {to}  low {:.2}  high {:.2}  {}",
                chart.min(),
                chart.max(),
                paint(&marketlens_core::view::format::signed_percent(change), color)
            );
        }
        None => {
            let _ = writeln!(out, "  {}", view.chart_notice().unwrap_or_default());
        }
    }
    if !view.available_timeframes.is_empty() {
        let labels: Vec<&str> = view
            .available_timeframes
            .iter()
            .map(|tf| tf.short_label())
            .collect();
        let _ = writeln!(out, "  available: {}", labels.join(" "));
    }

    if !view.news.is_empty() {
        let _ = writeln!(out, "\nLatest news");
        for item in &view.news {
            let _ = writeln!(out, "  - {} ({})", item.title, item.source);
            if !item.link.is_empty() {
                let _ = writeln!(out, "    {}", paint(&item.link, BadgeColor::Gray));
            }
        }
    }
    out
}

pub fn search_result(result: &SearchResult) -> String {
    match &result.page {
        PageState::Ready(view) => detail(view),
        page => {
            let message = empty_or_loading(page).unwrap_or_default();
            if result.query.is_empty() {
                message
            } else {
                format!("{}: {message}", result.query)
            }
        }
    }
}
