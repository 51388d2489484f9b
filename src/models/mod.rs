//! Shared data models spanning the screening layers.

pub mod bars;
pub mod screening;

pub use bars::{closes, normalize_weekly, PriceBar};
pub use screening::{
    display_symbol, ScreenReport, ScreeningResult, SkipReason, SkippedTicker, SummaryStats,
};
