//! Time-series source interface consumed by the screener.

use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::HashMap;

use crate::error::{ScreenError, ScreenResult};
use crate::models::bars::PriceBar;

#[async_trait]
pub trait TimeSeriesSource: Send + Sync {
    /// Weekly bars for `ticker` between `start` and `end` inclusive, oldest
    /// first. May return fewer bars than requested, or none.
    async fn fetch_weekly_bars(
        &self,
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> ScreenResult<Vec<PriceBar>>;
}

/// Source backed by bars held in memory, e.g. loaded from a previous export.
#[derive(Debug, Default, Clone)]
pub struct InMemorySource {
    series: HashMap<String, Vec<PriceBar>>,
}

impl InMemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_series(mut self, ticker: &str, bars: Vec<PriceBar>) -> Self {
        self.series.insert(ticker.to_string(), bars);
        self
    }
}

#[async_trait]
impl TimeSeriesSource for InMemorySource {
    async fn fetch_weekly_bars(
        &self,
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> ScreenResult<Vec<PriceBar>> {
        let bars = self
            .series
            .get(ticker)
            .ok_or_else(|| ScreenError::data_unavailable(ticker, "unknown ticker"))?;

        Ok(bars
            .iter()
            .filter(|b| b.date >= start && b.date <= end)
            .copied()
            .collect())
    }
}
