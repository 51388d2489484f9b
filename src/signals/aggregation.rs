//! Ranking and summary statistics over qualifying tickers

use chrono::{DateTime, Utc};

use crate::models::screening::{ScreenReport, ScreeningResult, SkippedTicker, SummaryStats};

/// Aggregate per-ticker results into a report
pub struct Aggregator;

impl Aggregator {
    /// Sort strongest first by `oscillator - smoothed`.
    ///
    /// The sort is stable, so equal differences keep scan order.
    pub fn rank(mut results: Vec<ScreeningResult>) -> Vec<ScreeningResult> {
        results.sort_by(|a, b| b.difference.total_cmp(&a.difference));
        results
    }

    /// Fresh crossovers, preserving the order of `ranked`.
    pub fn fresh(ranked: &[ScreeningResult]) -> Vec<ScreeningResult> {
        ranked.iter().filter(|r| r.fresh_crossover).cloned().collect()
    }

    /// Means and counts over the full result set. `None` when empty.
    pub fn summarize(results: &[ScreeningResult]) -> Option<SummaryStats> {
        if results.is_empty() {
            return None;
        }

        let count = results.len() as f64;
        let mean = |f: fn(&ScreeningResult) -> f64| results.iter().map(f).sum::<f64>() / count;
        let fresh_count = results.iter().filter(|r| r.fresh_crossover).count();

        Some(SummaryStats {
            total: results.len(),
            fresh_count,
            earlier_count: results.len() - fresh_count,
            mean_oscillator: mean(|r| r.oscillator),
            mean_smoothed: mean(|r| r.smoothed),
            mean_difference: mean(|r| r.difference),
        })
    }

    /// Assemble the report from results given in scan order.
    pub fn build_report(
        results: Vec<ScreeningResult>,
        scanned: usize,
        skipped: Vec<SkippedTicker>,
        generated_at: DateTime<Utc>,
    ) -> ScreenReport {
        let results = Self::rank(results);
        let fresh = Self::fresh(&results);
        let summary = Self::summarize(&results);

        ScreenReport {
            generated_at,
            results,
            fresh,
            summary,
            scanned,
            skipped,
        }
    }
}
