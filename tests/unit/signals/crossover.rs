//! Unit tests for the crossover classifier

use trendscreen::config::ScreeningParams;
use trendscreen::models::screening::SkipReason;
use trendscreen::signals::crossover::{
    classify, evaluate, is_fresh_crossover, lookback_start, Rejection, MIN_RECENT_BARS,
};

use crate::helpers::{decline_then_rise, fresh_crossover_series, small_params, week, weekly_bars};

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {}, got {}",
        expected,
        actual
    );
}

#[test]
fn test_short_history_is_rejected() {
    let params = ScreeningParams::default();
    let bars = weekly_bars(&vec![100.0; params.min_history() - 1]);

    assert!(classify("SHORT.IS", &bars, &params).is_none());
    assert_eq!(
        evaluate("SHORT.IS", &bars, &params),
        Err(Rejection::InsufficientHistory {
            bars: 81,
            required: 82
        })
    );
}

#[test]
fn test_empty_history_is_rejected() {
    let rejection = evaluate("EMPTY.IS", &[], &small_params()).unwrap_err();
    assert_eq!(rejection.reason(), SkipReason::InsufficientHistory);
}

#[test]
fn test_sixty_constant_weeks_never_qualify() {
    let bars = weekly_bars(&[100.0; 60]);

    // 60 < 31 + 31 + 20 with the default parameters
    assert!(classify("FLAT.IS", &bars, &ScreeningParams::default()).is_none());

    // With short windows the RSI and its SMA are both 50: equal, so no crossover
    assert_eq!(
        evaluate("FLAT.IS", &bars, &small_params()),
        Err(Rejection::NoCrossover {
            oscillator: 50.0,
            smoothed: 50.0
        })
    );
}

#[test]
fn test_steady_uptrend_never_breaches_threshold() {
    let closes: Vec<f64> = (0..60).map(|i| 100.0 + i as f64).collect();
    let bars = weekly_bars(&closes);
    assert_eq!(
        evaluate("UP.IS", &bars, &small_params()),
        Err(Rejection::ThresholdNeverBreached)
    );
}

#[test]
fn test_decline_then_rise_qualifies() {
    let closes = decline_then_rise();
    let bars = weekly_bars(&closes);
    let result = classify("AKBNK.IS", &bars, &small_params()).expect("qualifies");

    assert_eq!(result.ticker, "AKBNK.IS");
    assert_eq!(result.oscillator, 100.0);
    assert_close(result.smoothed, 76.0);
    assert_close(result.difference, 24.0);
    assert_eq!(result.price, 167.0);

    // SMA is first defined at bar 9 and sits at 0 through the decline
    assert_eq!(result.min_smoothed, 0.0);
    assert_eq!(result.min_smoothed_date, week(9));

    // bar 43 has SMA 40, bar 44 has SMA 60
    assert_eq!(result.last_below_date, Some(week(43)));
    assert_eq!(result.weeks_since_below, Some(2));
    assert!(!result.fresh_crossover);
}

#[test]
fn test_fresh_crossover_on_latest_bar() {
    let bars = weekly_bars(&fresh_crossover_series());
    let result = classify("THYAO.IS", &bars, &small_params()).expect("qualifies");

    assert!(result.fresh_crossover);
    assert_close(result.oscillator, 500.0 / 9.0);
    assert_close(result.smoothed, 460.0 / 9.0);
    assert_close(result.difference, 40.0 / 9.0);
    assert_eq!(result.price, 168.0);
    assert_eq!(result.last_below_date, Some(week(43)));
    assert_eq!(result.weeks_since_below, Some(7));
}

#[test]
fn test_nine_bars_in_lookback_window_is_rejected() {
    let bars = weekly_bars(&decline_then_rise());
    let params = ScreeningParams {
        lookback_weeks: 9,
        ..small_params()
    };

    assert_eq!(
        evaluate("RECENT.IS", &bars, &params),
        Err(Rejection::InsufficientRecentData { bars: 9 })
    );

    // one more week of lookback is enough
    let params = ScreeningParams {
        lookback_weeks: MIN_RECENT_BARS,
        ..small_params()
    };
    assert!(classify("RECENT.IS", &bars, &params).is_some());
}

#[test]
fn test_threshold_breach_outside_window_is_ignored() {
    // the SMA was last below 51 at bar 43, the window covers bars 54..=65
    let mut closes = decline_then_rise();
    closes.extend((1..=20).map(|i| 167.0 + i as f64));
    let bars = weekly_bars(&closes);
    let params = ScreeningParams {
        lookback_weeks: 12,
        ..small_params()
    };

    assert_eq!(
        evaluate("OLD.IS", &bars, &params),
        Err(Rejection::ThresholdNeverBreached)
    );
}

#[test]
fn test_threshold_is_strict() {
    // flat series: SMA is exactly 50 everywhere
    let bars = weekly_bars(&[100.0; 60]);
    let params = ScreeningParams {
        sma_threshold: 50.0,
        ..small_params()
    };
    assert_eq!(
        evaluate("FLAT.IS", &bars, &params),
        Err(Rejection::ThresholdNeverBreached)
    );
}

#[test]
fn test_undefined_latest_value_is_rejected() {
    let mut closes = decline_then_rise();
    closes.push(f64::NAN);
    let bars = weekly_bars(&closes);

    assert_eq!(
        evaluate("NAN.IS", &bars, &small_params()),
        Err(Rejection::UndefinedComparison)
    );
}

#[test]
fn test_classify_is_idempotent() {
    let bars = weekly_bars(&fresh_crossover_series());
    let params = small_params();
    assert_eq!(
        classify("SISE.IS", &bars, &params),
        classify("SISE.IS", &bars, &params)
    );
}

#[test]
fn test_fresh_flag_requires_flip_on_latest_bar() {
    assert!(is_fresh_crossover(
        &[Some(40.0), Some(55.0)],
        &[Some(50.0), Some(52.0)]
    ));
    // already above on the previous bar
    assert!(!is_fresh_crossover(
        &[Some(53.0), Some(55.0)],
        &[Some(50.0), Some(52.0)]
    ));
    // equal on the previous bar is not "below"
    assert!(!is_fresh_crossover(
        &[Some(50.0), Some(55.0)],
        &[Some(50.0), Some(52.0)]
    ));
    // not above now
    assert!(!is_fresh_crossover(
        &[Some(40.0), Some(52.0)],
        &[Some(50.0), Some(52.0)]
    ));
}

#[test]
fn test_fresh_flag_needs_two_defined_bars() {
    assert!(!is_fresh_crossover(&[], &[]));
    assert!(!is_fresh_crossover(&[Some(60.0)], &[Some(50.0)]));
    assert!(!is_fresh_crossover(
        &[None, Some(60.0)],
        &[Some(50.0), Some(50.0)]
    ));
    assert!(!is_fresh_crossover(
        &[Some(40.0), Some(60.0)],
        &[None, Some(50.0)]
    ));
}

#[test]
fn test_lookback_start_counts_back_from_latest_bar() {
    let bars = weekly_bars(&[1.0; 30]);
    assert_eq!(lookback_start(&bars, 10), 20);
    assert_eq!(lookback_start(&bars, 104), 0);
    assert_eq!(lookback_start(&[], 10), 0);
}

#[test]
fn test_rejection_maps_to_skip_reason() {
    assert_eq!(
        Rejection::InsufficientRecentData { bars: 3 }.reason(),
        SkipReason::InsufficientRecentData
    );
    assert_eq!(
        Rejection::UndefinedComparison.reason(),
        SkipReason::UndefinedComparison
    );
    assert!(Rejection::InsufficientHistory { bars: 5, required: 82 }
        .to_string()
        .contains("82"));
}

#[test]
fn test_lookback_longer_than_calendar_covers_all_bars() {
    let bars = weekly_bars(&decline_then_rise());
    assert_eq!(lookback_start(&bars, usize::MAX), 0);
    assert_eq!(lookback_start(&bars, 20_000_000), 0);

    let params = ScreeningParams {
        lookback_weeks: usize::MAX,
        ..small_params()
    };
    let result = classify("AKBNK.IS", &bars, &params).expect("qualifies");
    assert_eq!(result.min_smoothed_date, week(9));
}

#[test]
fn test_oversized_periods_are_insufficient_history() {
    let bars = weekly_bars(&decline_then_rise());
    let params = ScreeningParams {
        rsi_period: usize::MAX,
        ..small_params()
    };
    assert_eq!(
        evaluate("AKBNK.IS", &bars, &params),
        Err(Rejection::InsufficientHistory {
            bars: 46,
            required: usize::MAX
        })
    );
}
