//! Screening outputs: per-ticker results and the aggregated report.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// A ticker that passed both the historical-dip and the current-crossover test.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScreeningResult {
    pub ticker: String,
    /// Latest oscillator (RSI) value.
    pub oscillator: f64,
    /// Latest smoothed (RSI SMA) value.
    pub smoothed: f64,
    /// `oscillator - smoothed`, always positive for a qualifying ticker.
    pub difference: f64,
    pub min_smoothed: f64,
    pub min_smoothed_date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_below_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weeks_since_below: Option<usize>,
    pub price: f64,
    pub fresh_crossover: bool,
}

impl ScreeningResult {
    /// Ticker without its exchange suffix (`AKBNK.IS` -> `AKBNK`).
    pub fn display_symbol(&self) -> &str {
        display_symbol(&self.ticker)
    }
}

pub fn display_symbol(ticker: &str) -> &str {
    ticker
        .rsplit_once('.')
        .map(|(symbol, _)| symbol)
        .filter(|symbol| !symbol.is_empty())
        .unwrap_or(ticker)
}

/// Why a ticker is absent from the result set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    DataUnavailable,
    InsufficientHistory,
    InsufficientRecentData,
    ThresholdNeverBreached,
    UndefinedComparison,
    NoCrossover,
}

impl SkipReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            SkipReason::DataUnavailable => "data_unavailable",
            SkipReason::InsufficientHistory => "insufficient_history",
            SkipReason::InsufficientRecentData => "insufficient_recent_data",
            SkipReason::ThresholdNeverBreached => "threshold_never_breached",
            SkipReason::UndefinedComparison => "undefined_comparison",
            SkipReason::NoCrossover => "no_crossover",
        }
    }
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkippedTicker {
    pub ticker: String,
    pub reason: SkipReason,
    pub detail: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SummaryStats {
    pub total: usize,
    pub fresh_count: usize,
    pub earlier_count: usize,
    pub mean_oscillator: f64,
    pub mean_smoothed: f64,
    pub mean_difference: f64,
}

/// Immutable hand-off object for report sinks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScreenReport {
    pub generated_at: DateTime<Utc>,
    /// All qualifying tickers, strongest difference first.
    pub results: Vec<ScreeningResult>,
    /// Fresh crossovers only, same relative order as `results`.
    pub fresh: Vec<ScreeningResult>,
    /// `None` when nothing qualified.
    pub summary: Option<SummaryStats>,
    pub scanned: usize,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub skipped: Vec<SkippedTicker>,
}

impl ScreenReport {
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// The `n` strongest tickers.
    pub fn top(&self, n: usize) -> &[ScreeningResult] {
        &self.results[..n.min(self.results.len())]
    }
}
