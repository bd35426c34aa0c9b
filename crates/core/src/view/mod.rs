//! Presentation logic: turns backend payloads into what a page shows.
//!
//! Nothing here performs rendering; front ends (the CLI today) decide how a
//! `BadgeColor` or a sparkline is drawn.

pub mod badge;
pub mod chart;
pub mod detail;
pub mod format;
pub mod search;
pub mod state;
pub mod trending;

pub use badge::{Badge, BadgeColor};
pub use state::PageState;
