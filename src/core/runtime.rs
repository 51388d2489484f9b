//! Screening runtime: fetch, classify and aggregate a ticker universe.

use chrono::{DateTime, Duration as ChronoDuration, NaiveDate, Utc};
use futures_util::stream::{self, StreamExt};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use crate::config::{ScreenerConfig, ScreeningParams};
use crate::error::ScreenError;
use crate::models::bars::normalize_weekly;
use crate::models::screening::{ScreenReport, ScreeningResult, SkipReason, SkippedTicker};
use crate::report::{publish_all, ReportSink};
use crate::services::market_data::TimeSeriesSource;
use crate::signals::aggregation::Aggregator;
use crate::signals::crossover::evaluate;

/// What happened to one ticker.
#[derive(Debug, Clone, PartialEq)]
pub enum TickerOutcome {
    Qualified(ScreeningResult),
    Skipped(SkippedTicker),
}

/// Runs the screen over a ticker universe.
///
/// Tickers are evaluated independently with at most `concurrency` fetches in
/// flight. Failures on one ticker only remove that ticker from the results.
pub struct Screener {
    source: Arc<dyn TimeSeriesSource>,
    params: ScreeningParams,
    history_days: i64,
    concurrency: usize,
    fetch_timeout: Duration,
}

impl Screener {
    pub fn new(source: Arc<dyn TimeSeriesSource>, params: ScreeningParams) -> Self {
        let defaults = ScreenerConfig::default();
        Self {
            source,
            params,
            history_days: defaults.history_days,
            concurrency: defaults.concurrency,
            fetch_timeout: Duration::from_secs(defaults.fetch_timeout_seconds),
        }
    }

    pub fn from_config(source: Arc<dyn TimeSeriesSource>, config: &ScreenerConfig) -> Self {
        Self::new(source, config.params)
            .with_history_days(config.history_days)
            .with_concurrency(config.concurrency)
            .with_fetch_timeout(Duration::from_secs(config.fetch_timeout_seconds))
    }

    pub fn with_history_days(mut self, days: i64) -> Self {
        self.history_days = days;
        self
    }

    /// Set custom concurrency (minimum 1)
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    pub fn with_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = timeout;
        self
    }

    pub fn params(&self) -> &ScreeningParams {
        &self.params
    }

    /// Screen `tickers` with history ending now.
    pub async fn run(&self, tickers: &[String]) -> ScreenReport {
        self.run_at(tickers, Utc::now()).await
    }

    /// Screen `tickers` with history ending at `now`.
    pub async fn run_at(&self, tickers: &[String], now: DateTime<Utc>) -> ScreenReport {
        let started = Instant::now();
        info!(
            tickers = tickers.len(),
            concurrency = self.concurrency,
            "Screening {} tickers",
            tickers.len()
        );

        // Owned tickers keep the returned future `Send` for tokio::spawn.
        let mut outcomes: Vec<(usize, TickerOutcome)> = stream::iter(tickers.iter().cloned().enumerate())
            .map(|(index, ticker)| async move {
                let outcome = self.screen_ticker(&ticker, now).await;
                (index, outcome)
            })
            .buffer_unordered(self.concurrency)
            .collect()
            .await;

        // Back to scan order so equal differences rank by scan position.
        outcomes.sort_by_key(|(index, _)| *index);

        let mut results = Vec::new();
        let mut skipped = Vec::new();
        for (_, outcome) in outcomes {
            match outcome {
                TickerOutcome::Qualified(result) => results.push(result),
                TickerOutcome::Skipped(skip) => skipped.push(skip),
            }
        }

        info!(
            qualified = results.len(),
            skipped = skipped.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Screening finished"
        );

        Aggregator::build_report(results, tickers.len(), skipped, now)
    }

    /// Fetch and classify a single ticker.
    pub async fn screen_ticker(&self, ticker: &str, now: DateTime<Utc>) -> TickerOutcome {
        let end = now.date_naive();
        let start = ChronoDuration::try_days(self.history_days)
            .and_then(|span| end.checked_sub_signed(span))
            .unwrap_or(NaiveDate::MIN);

        let fetched = tokio::time::timeout(
            self.fetch_timeout,
            self.source.fetch_weekly_bars(ticker, start, end),
        )
        .await
        .unwrap_or_else(|_| {
            Err(ScreenError::Timeout {
                ticker: ticker.to_string(),
                seconds: self.fetch_timeout.as_secs(),
            })
        });

        let bars = match fetched {
            Ok(bars) => normalize_weekly(bars),
            Err(e) => {
                warn!(ticker = %ticker, error = %e, "Skipping ticker, data unavailable");
                return skip(ticker, SkipReason::DataUnavailable, e.to_string());
            }
        };

        if bars.is_empty() {
            warn!(ticker = %ticker, "Skipping ticker, source returned no bars");
            return skip(ticker, SkipReason::DataUnavailable, "no bars returned".to_string());
        }

        match evaluate(ticker, &bars, &self.params) {
            Ok(result) => {
                info!(
                    ticker = %ticker,
                    rsi = result.oscillator,
                    rsi_sma = result.smoothed,
                    diff = result.difference,
                    fresh = result.fresh_crossover,
                    "Ticker qualified"
                );
                TickerOutcome::Qualified(result)
            }
            Err(rejection) => {
                debug!(ticker = %ticker, reason = %rejection.reason(), detail = %rejection, "Ticker rejected");
                skip(ticker, rejection.reason(), rejection.to_string())
            }
        }
    }
}

fn skip(ticker: &str, reason: SkipReason, detail: String) -> TickerOutcome {
    TickerOutcome::Skipped(SkippedTicker {
        ticker: ticker.to_string(),
        reason,
        detail,
    })
}

/// One full batch: screen, then hand the report to every sink.
///
/// Sink failures are logged and do not change the returned report.
pub async fn run_pipeline(
    screener: &Screener,
    tickers: &[String],
    sinks: &[Box<dyn ReportSink>],
) -> ScreenReport {
    let report = screener.run(tickers).await;
    let failures = publish_all(sinks, &report).await;
    if failures > 0 {
        warn!(failures = failures, "Some report sinks failed");
    }
    report
}
