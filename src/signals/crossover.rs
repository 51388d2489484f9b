//! RSI / RSI-SMA crossover classification for a single ticker.
//!
//! A ticker qualifies when, inside the trailing lookback window, its RSI SMA
//! dipped below the threshold at least once and its latest RSI sits above
//! the latest RSI SMA. A crossover is "fresh" when that inequality flipped
//! on the most recent bar.

use chrono::Duration;
use std::fmt;

use crate::config::ScreeningParams;
use crate::indicators::{compute_smoothed, rsi_series};
use crate::models::bars::PriceBar;
use crate::models::screening::{ScreeningResult, SkipReason};

/// Minimum number of bars that must fall inside the lookback window.
pub const MIN_RECENT_BARS: usize = 10;

/// Why `evaluate` declined a ticker.
#[derive(Debug, Clone, PartialEq)]
pub enum Rejection {
    InsufficientHistory { bars: usize, required: usize },
    InsufficientRecentData { bars: usize },
    ThresholdNeverBreached,
    UndefinedComparison,
    NoCrossover { oscillator: f64, smoothed: f64 },
}

impl Rejection {
    pub fn reason(&self) -> SkipReason {
        match self {
            Rejection::InsufficientHistory { .. } => SkipReason::InsufficientHistory,
            Rejection::InsufficientRecentData { .. } => SkipReason::InsufficientRecentData,
            Rejection::ThresholdNeverBreached => SkipReason::ThresholdNeverBreached,
            Rejection::UndefinedComparison => SkipReason::UndefinedComparison,
            Rejection::NoCrossover { .. } => SkipReason::NoCrossover,
        }
    }
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::InsufficientHistory { bars, required } => {
                write!(f, "only {} bars, {} required", bars, required)
            }
            Rejection::InsufficientRecentData { bars } => write!(
                f,
                "only {} bars in lookback window, {} required",
                bars, MIN_RECENT_BARS
            ),
            Rejection::ThresholdNeverBreached => {
                write!(f, "RSI SMA never dropped below threshold in lookback window")
            }
            Rejection::UndefinedComparison => write!(f, "latest RSI or RSI SMA undefined"),
            Rejection::NoCrossover {
                oscillator,
                smoothed,
            } => write!(f, "RSI {:.2} not above RSI SMA {:.2}", oscillator, smoothed),
        }
    }
}

/// Classify a ticker, discarding the rejection cause.
pub fn classify(ticker: &str, bars: &[PriceBar], params: &ScreeningParams) -> Option<ScreeningResult> {
    evaluate(ticker, bars, params).ok()
}

/// Classify a ticker.
///
/// `bars` must be ordered by date with one bar per week, see
/// [`crate::models::bars::normalize_weekly`].
pub fn evaluate(
    ticker: &str,
    bars: &[PriceBar],
    params: &ScreeningParams,
) -> Result<ScreeningResult, Rejection> {
    let required = params.min_history();
    if bars.len() < required {
        return Err(Rejection::InsufficientHistory {
            bars: bars.len(),
            required,
        });
    }

    let oscillator = rsi_series(bars, params.rsi_period);
    let smoothed = compute_smoothed(&oscillator, params.sma_period);

    let latest = bars.len() - 1;
    let window_start = lookback_start(bars, params.lookback_weeks);
    let recent = window_start..bars.len();
    if recent.len() < MIN_RECENT_BARS {
        return Err(Rejection::InsufficientRecentData { bars: recent.len() });
    }

    let last_below = recent
        .clone()
        .rev()
        .find(|&i| smoothed[i].is_some_and(|v| v < params.sma_threshold))
        .ok_or(Rejection::ThresholdNeverBreached)?;

    let (current_rsi, current_sma) = match (oscillator[latest], smoothed[latest]) {
        (Some(rsi), Some(sma)) => (rsi, sma),
        _ => return Err(Rejection::UndefinedComparison),
    };
    if current_rsi <= current_sma {
        return Err(Rejection::NoCrossover {
            oscillator: current_rsi,
            smoothed: current_sma,
        });
    }

    // First occurrence wins on ties. A defined value exists since last_below
    // is one.
    let (min_idx, min_smoothed) = recent
        .filter_map(|i| smoothed[i].map(|v| (i, v)))
        .fold(None, |acc: Option<(usize, f64)>, (i, v)| match acc {
            Some((_, min)) if min <= v => acc,
            _ => Some((i, v)),
        })
        .ok_or(Rejection::ThresholdNeverBreached)?;

    Ok(ScreeningResult {
        ticker: ticker.to_string(),
        oscillator: current_rsi,
        smoothed: current_sma,
        difference: current_rsi - current_sma,
        min_smoothed,
        min_smoothed_date: bars[min_idx].date,
        last_below_date: Some(bars[last_below].date),
        weeks_since_below: Some(latest - last_below),
        price: bars[latest].close,
        fresh_crossover: is_fresh_crossover(&oscillator, &smoothed),
    })
}

/// True when the RSI was below its SMA on the previous bar and is above it now.
pub fn is_fresh_crossover(oscillator: &[Option<f64>], smoothed: &[Option<f64>]) -> bool {
    let n = oscillator.len().min(smoothed.len());
    if n < 2 {
        return false;
    }

    match (
        oscillator[n - 2],
        smoothed[n - 2],
        oscillator[n - 1],
        smoothed[n - 1],
    ) {
        (Some(prev_rsi), Some(prev_sma), Some(rsi), Some(sma)) => prev_rsi < prev_sma && rsi > sma,
        _ => false,
    }
}

/// Index of the first bar inside the trailing `lookback_weeks` window,
/// measured back from the latest bar's date.
pub fn lookback_start(bars: &[PriceBar], lookback_weeks: usize) -> usize {
    let Some(latest) = bars.last() else {
        return 0;
    };
    // A window reaching past the calendar covers every bar.
    let cutoff = i64::try_from(lookback_weeks)
        .ok()
        .and_then(Duration::try_weeks)
        .and_then(|span| latest.date.checked_sub_signed(span));
    match cutoff {
        Some(cutoff) => bars.partition_point(|b| b.date <= cutoff),
        None => 0,
    }
}
