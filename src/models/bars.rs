//! Weekly price bars as delivered by a time-series source.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// One weekly observation. Only the close participates in the oscillator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    pub date: NaiveDate,
    pub close: f64,
}

impl PriceBar {
    pub fn new(date: NaiveDate, close: f64) -> Self {
        Self { date, close }
    }

    /// ISO (year, week) key used to detect duplicate weeks.
    pub fn week_key(&self) -> (i32, u32) {
        let week = self.date.iso_week();
        (week.year(), week.week())
    }
}

/// Bring raw bars into the shape the indicators expect.
///
/// Drops non-finite or non-positive closes, orders by date and keeps the last
/// bar of any ISO week that appears more than once (providers tend to append
/// an in-progress week next to the completed one).
pub fn normalize_weekly(mut bars: Vec<PriceBar>) -> Vec<PriceBar> {
    bars.retain(|b| b.close.is_finite() && b.close > 0.0);
    bars.sort_by_key(|b| b.date);

    let mut normalized: Vec<PriceBar> = Vec::with_capacity(bars.len());
    for bar in bars {
        match normalized.last_mut() {
            Some(last) if last.week_key() == bar.week_key() => *last = bar,
            _ => normalized.push(bar),
        }
    }
    normalized
}

/// Extract closing prices in bar order.
pub fn closes(bars: &[PriceBar]) -> Vec<f64> {
    bars.iter().map(|b| b.close).collect()
}
