//! Synthetic weekly series shared by the unit tests

#![allow(dead_code)]

use chrono::{Duration, NaiveDate};
use trendscreen::config::ScreeningParams;
use trendscreen::models::bars::PriceBar;
use trendscreen::models::screening::ScreeningResult;

pub fn first_monday() -> NaiveDate {
    NaiveDate::from_ymd_opt(2020, 1, 6).unwrap()
}

pub fn week(index: usize) -> NaiveDate {
    first_monday() + Duration::weeks(index as i64)
}

/// One bar per week starting 2020-01-06.
pub fn weekly_bars(closes: &[f64]) -> Vec<PriceBar> {
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| PriceBar::new(week(i), close))
        .collect()
}

/// Short windows so scenarios stay readable: min history is 30 bars.
pub fn small_params() -> ScreeningParams {
    ScreeningParams {
        rsi_period: 5,
        sma_period: 5,
        sma_threshold: 51.0,
        lookback_weeks: 104,
    }
}

/// 40 weeks falling by 1 from 200, then 6 weeks rising by 1 (46 bars).
///
/// With `small_params` the RSI ends at 100 over an SMA of 76.
pub fn decline_then_rise() -> Vec<f64> {
    let mut closes: Vec<f64> = (0..40).map(|i| 200.0 - i as f64).collect();
    closes.extend((1..=6).map(|i| 161.0 + i as f64));
    closes
}

/// `decline_then_rise`, a four-week pullback, then a jump on the last bar.
///
/// With `small_params` the RSI sits below its SMA on the second to last bar
/// (20 vs 60) and above it on the last (55.56 vs 51.11).
pub fn fresh_crossover_series() -> Vec<f64> {
    let mut closes = decline_then_rise();
    closes.extend([166.0, 165.0, 164.0, 163.0, 168.0]);
    closes
}

pub fn result(ticker: &str, difference: f64, fresh: bool) -> ScreeningResult {
    ScreeningResult {
        ticker: ticker.to_string(),
        oscillator: 50.0 + difference,
        smoothed: 50.0,
        difference,
        min_smoothed: 40.0,
        min_smoothed_date: week(10),
        last_below_date: Some(week(20)),
        weeks_since_below: Some(3),
        price: 12.5,
        fresh_crossover: fresh,
    }
}
