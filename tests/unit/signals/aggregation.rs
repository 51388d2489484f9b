//! Unit tests for ranking and summary statistics

use chrono::{TimeZone, Utc};
use trendscreen::models::screening::{SkipReason, SkippedTicker};
use trendscreen::signals::aggregation::Aggregator;

use crate::helpers::result;

fn tickers(results: &[trendscreen::models::screening::ScreeningResult]) -> Vec<&str> {
    results.iter().map(|r| r.ticker.as_str()).collect()
}

#[test]
fn test_rank_orders_by_difference_descending() {
    let ranked = Aggregator::rank(vec![
        result("A.IS", 1.5, false),
        result("B.IS", 7.25, true),
        result("C.IS", 3.0, false),
    ]);
    assert_eq!(tickers(&ranked), vec!["B.IS", "C.IS", "A.IS"]);
}

#[test]
fn test_rank_keeps_scan_order_on_ties() {
    let ranked = Aggregator::rank(vec![
        result("FIRST.IS", 2.0, false),
        result("TOP.IS", 9.0, false),
        result("SECOND.IS", 2.0, true),
        result("THIRD.IS", 2.0, false),
    ]);
    assert_eq!(
        tickers(&ranked),
        vec!["TOP.IS", "FIRST.IS", "SECOND.IS", "THIRD.IS"]
    );
}

#[test]
fn test_rank_is_permutation() {
    let input = vec![
        result("A.IS", 0.5, false),
        result("B.IS", 4.0, false),
        result("C.IS", 2.0, true),
    ];
    let ranked = Aggregator::rank(input.clone());
    assert_eq!(ranked.len(), input.len());
    for r in &input {
        assert!(ranked.contains(r));
    }
}

#[test]
fn test_fresh_is_ordered_subset() {
    let ranked = Aggregator::rank(vec![
        result("A.IS", 1.0, true),
        result("B.IS", 5.0, false),
        result("C.IS", 3.0, true),
    ]);
    let fresh = Aggregator::fresh(&ranked);
    assert_eq!(tickers(&fresh), vec!["C.IS", "A.IS"]);
    assert!(fresh.iter().all(|r| r.fresh_crossover));
}

#[test]
fn test_summarize_empty_is_none() {
    assert!(Aggregator::summarize(&[]).is_none());
}

#[test]
fn test_summarize_means_and_counts() {
    let results = vec![
        result("A.IS", 2.0, true),
        result("B.IS", 4.0, false),
        result("C.IS", 6.0, false),
    ];
    let summary = Aggregator::summarize(&results).unwrap();

    assert_eq!(summary.total, 3);
    assert_eq!(summary.fresh_count, 1);
    assert_eq!(summary.earlier_count, 2);
    assert!((summary.mean_difference - 4.0).abs() < 1e-9);
    assert!((summary.mean_oscillator - 54.0).abs() < 1e-9);
    assert!((summary.mean_smoothed - 50.0).abs() < 1e-9);
}

#[test]
fn test_build_report() {
    let generated_at = Utc.with_ymd_and_hms(2024, 6, 14, 18, 30, 0).unwrap();
    let skipped = vec![SkippedTicker {
        ticker: "GONE.IS".to_string(),
        reason: SkipReason::DataUnavailable,
        detail: "no bars returned".to_string(),
    }];
    let report = Aggregator::build_report(
        vec![result("A.IS", 1.0, true), result("B.IS", 2.0, false)],
        3,
        skipped,
        generated_at,
    );

    assert_eq!(report.generated_at, generated_at);
    assert_eq!(tickers(&report.results), vec!["B.IS", "A.IS"]);
    assert_eq!(tickers(&report.fresh), vec!["A.IS"]);
    assert_eq!(report.scanned, 3);
    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.summary.unwrap().total, 2);
    assert_eq!(tickers(report.top(1)), vec!["B.IS"]);
    assert_eq!(report.top(10).len(), 2);
}

#[test]
fn test_build_report_with_no_results() {
    let report = Aggregator::build_report(Vec::new(), 5, Vec::new(), Utc::now());
    assert!(report.is_empty());
    assert!(report.fresh.is_empty());
    assert!(report.summary.is_none());
    assert_eq!(report.scanned, 5);
}
