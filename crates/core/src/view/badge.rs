use crate::domain::analysis::{Advice, RiskLevel, SentimentStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BadgeColor {
    Green,
    Red,
    Yellow,
    Gray,
}

impl BadgeColor {
    /// Stable class name for front ends that style by name.
    pub fn class_name(&self) -> &'static str {
        match self {
            BadgeColor::Green => "green",
            BadgeColor::Red => "red",
            BadgeColor::Yellow => "yellow",
            BadgeColor::Gray => "gray",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Badge {
    pub label: String,
    pub color: BadgeColor,
}

pub fn sentiment_color(status: &SentimentStatus) -> BadgeColor {
    match status {
        SentimentStatus::Positive => BadgeColor::Green,
        SentimentStatus::Negative => BadgeColor::Red,
        SentimentStatus::Neutral => BadgeColor::Yellow,
        SentimentStatus::Other(_) => BadgeColor::Gray,
    }
}

pub fn advice_color(advice: &Advice) -> BadgeColor {
    match advice {
        Advice::StrongBuy => BadgeColor::Green,
        Advice::AvoidSell => BadgeColor::Red,
        Advice::HoldCaution | Advice::Hold => BadgeColor::Yellow,
        Advice::Other(_) => BadgeColor::Gray,
    }
}

pub fn risk_color(risk: &RiskLevel) -> BadgeColor {
    match risk {
        RiskLevel::Low => BadgeColor::Green,
        RiskLevel::Medium => BadgeColor::Yellow,
        RiskLevel::High => BadgeColor::Red,
        RiskLevel::Other(_) => BadgeColor::Gray,
    }
}

/// Up is green, down is red, flat is gray.
pub fn change_color(change: f64) -> BadgeColor {
    if change > 0.0 {
        BadgeColor::Green
    } else if change < 0.0 {
        BadgeColor::Red
    } else {
        BadgeColor::Gray
    }
}

pub fn sentiment_badge(status: &SentimentStatus) -> Badge {
    Badge {
        label: status.as_str().to_string(),
        color: sentiment_color(status),
    }
}

pub fn advice_badge(advice: &Advice) -> Badge {
    Badge {
        label: advice.as_str().to_string(),
        color: advice_color(advice),
    }
}

pub fn risk_badge(risk: &RiskLevel) -> Badge {
    Badge {
        label: format!("{} Risk", risk.as_str()),
        color: risk_color(risk),
    }
}
