//! RSI (Relative Strength Index) indicator, simple-mean variant.

use crate::models::bars::{closes, PriceBar};

/// RSI when both average gain and average loss are zero (flat window).
pub const NEUTRAL_RSI: f64 = 50.0;

/// Calculate the RSI series over `prices`.
///
/// RSI = 100 - (100 / (1 + RS))
/// RS = Average Gain / Average Loss
///
/// Averages are plain trailing means over the last `period` price changes, so
/// the first `period` entries are `None`. A window that touches a non-finite
/// price is also `None`.
pub fn compute_oscillator(prices: &[f64], period: usize) -> Vec<Option<f64>> {
    let mut series = vec![None; prices.len()];
    if period == 0 || prices.len() <= period {
        return series;
    }

    let changes: Vec<f64> = prices.windows(2).map(|w| w[1] - w[0]).collect();

    for (i, slot) in series.iter_mut().enumerate().skip(period) {
        // changes[j] is the move into bar j + 1
        let window = &changes[i - period..i];
        if window.iter().any(|c| !c.is_finite()) {
            continue;
        }

        // Summed per window: a flat stretch must give a loss of exactly zero.
        let gain: f64 = window.iter().filter(|c| **c > 0.0).sum();
        let loss: f64 = window.iter().filter(|c| **c < 0.0).map(|c| c.abs()).sum();

        *slot = Some(rsi_from_averages(gain / period as f64, loss / period as f64));
    }

    series
}

/// RSI for one pair of averages.
///
/// No losses saturates at 100; no movement at all is neutral (50).
pub fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        return if avg_gain > 0.0 { 100.0 } else { NEUTRAL_RSI };
    }

    let rs = avg_gain / avg_loss;
    (100.0 - (100.0 / (1.0 + rs))).clamp(0.0, 100.0)
}

/// Calculate the RSI series from weekly bars.
pub fn rsi_series(bars: &[PriceBar], period: usize) -> Vec<Option<f64>> {
    compute_oscillator(&closes(bars), period)
}
