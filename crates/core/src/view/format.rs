/// `₹2,950.10`. Non-finite values print as `N/A`.
pub fn price(value: f64) -> String {
    if !value.is_finite() {
        return "N/A".to_string();
    }
    let sign = if value < 0.0 { "-" } else { "" };
    format!("{sign}₹{}", group_thousands(value.abs(), 2))
}

/// Percentage with an explicit sign: `+1.25%`, `-0.40%`, `0.00%`.
pub fn signed_percent(value: f64) -> String {
    if !value.is_finite() {
        return "N/A".to_string();
    }
    let rounded = (value * 100.0).round() / 100.0;
    if rounded > 0.0 {
        format!("+{rounded:.2}%")
    } else if rounded < 0.0 {
        format!("{rounded:.2}%")
    } else {
        "0.00%".to_string()
    }
}

/// Current volume relative to the 20-day average: `2.35x`.
pub fn volume_factor(value: f64) -> String {
    if !value.is_finite() {
        return "N/A".to_string();
    }
    format!("{value:.2}x")
}

/// Sentiment compound score with sign, four decimals as the backend rounds it.
pub fn sentiment_score(value: f64) -> String {
    if value > 0.0 {
        format!("+{value:.4}")
    } else {
        format!("{value:.4}")
    }
}

fn group_thousands(value: f64, decimals: usize) -> String {
    let formatted = format!("{value:.decimals$}");
    let (int_part, frac_part) = match formatted.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (formatted.as_str(), None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (idx, ch) in int_part.chars().enumerate() {
        if idx != 0 && (int_part.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    match frac_part {
        Some(f) => format!("{grouped}.{f}"),
        None => grouped,
    }
}
