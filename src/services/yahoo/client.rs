//! Yahoo Finance chart client.
//!
//! Fetches weekly bars from `/v8/finance/chart/{symbol}?interval=1wk`.
//! Adjusted closes are preferred when the response carries them.

use async_trait::async_trait;
use backon::{ExponentialBuilder, Retryable};
use chrono::{DateTime, NaiveDate, NaiveTime};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

use crate::error::{ScreenError, ScreenResult};
use crate::models::bars::{normalize_weekly, PriceBar};
use crate::services::market_data::TimeSeriesSource;

const USER_AGENT: &str = "Mozilla/5.0 (compatible; trendscreen/0.1)";
const MAX_RETRIES: usize = 3;

#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: Chart,
}

#[derive(Debug, Deserialize)]
struct Chart {
    result: Option<Vec<ChartData>>,
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartData {
    #[serde(default)]
    meta: Option<ChartMeta>,
    #[serde(default)]
    timestamp: Vec<i64>,
    indicators: Indicators,
}

#[derive(Debug, Deserialize)]
struct ChartMeta {
    #[serde(default)]
    gmtoffset: i64,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    #[serde(default)]
    quote: Vec<Quote>,
    #[serde(default)]
    adjclose: Vec<AdjClose>,
}

#[derive(Debug, Deserialize)]
struct Quote {
    #[serde(default)]
    close: Vec<Option<f64>>,
}

#[derive(Debug, Deserialize)]
struct AdjClose {
    #[serde(default)]
    adjclose: Vec<Option<f64>>,
}

/// Yahoo Finance client
#[derive(Debug, Clone)]
pub struct YahooClient {
    base_url: String,
    client: Client,
}

impl YahooClient {
    /// Create a client whose requests time out after `timeout`.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> ScreenResult<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()?;
        Ok(Self::with_client(base_url, client))
    }

    pub fn with_client(base_url: impl Into<String>, client: Client) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        }
    }

    fn chart_url(&self, ticker: &str, start: NaiveDate, end: NaiveDate) -> String {
        let period1 = start.and_time(NaiveTime::MIN).and_utc().timestamp();
        // end is inclusive
        let period2 = (end + chrono::Duration::days(1))
            .and_time(NaiveTime::MIN)
            .and_utc()
            .timestamp();
        format!(
            "{}/v8/finance/chart/{}?interval=1wk&period1={}&period2={}&includeAdjustedClose=true",
            self.base_url, ticker, period1, period2
        )
    }

    async fn request_chart(&self, ticker: &str, url: &str) -> ScreenResult<ChartResponse> {
        let response = self.client.get(url).send().await?;
        let status = response.status();

        // Unknown symbols come back as 404 with a chart.error body.
        if status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS {
            return Err(response.error_for_status().err().map(ScreenError::Http).unwrap_or_else(
                || ScreenError::data_unavailable(ticker, format!("HTTP {}", status)),
            ));
        }

        response.json::<ChartResponse>().await.map_err(|e| {
            ScreenError::data_unavailable(ticker, format!("malformed chart response ({}): {}", status, e))
        })
    }

    /// Fetch and normalise weekly bars.
    pub async fn fetch(
        &self,
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> ScreenResult<Vec<PriceBar>> {
        let url = self.chart_url(ticker, start, end);
        debug!(ticker = %ticker, url = %url, "Fetching Yahoo weekly chart");

        let response = (|| async { self.request_chart(ticker, &url).await })
            .retry(ExponentialBuilder::default().with_max_times(MAX_RETRIES))
            .when(is_transient)
            .notify(|err: &ScreenError, after: Duration| {
                warn!(ticker = %ticker, error = %err, retry_in_ms = after.as_millis() as u64, "Yahoo request failed, retrying");
            })
            .await?;

        let bars = parse_chart(ticker, response)?;
        debug!(ticker = %ticker, count = bars.len(), "Fetched {} weekly bars for {}", bars.len(), ticker);
        Ok(bars)
    }
}

#[async_trait]
impl TimeSeriesSource for YahooClient {
    async fn fetch_weekly_bars(
        &self,
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> ScreenResult<Vec<PriceBar>> {
        self.fetch(ticker, start, end).await
    }
}

fn is_transient(err: &ScreenError) -> bool {
    match err {
        ScreenError::Http(e) => {
            e.is_timeout()
                || e.is_connect()
                || e.status().is_some_and(|s| {
                    s.is_server_error() || s == StatusCode::TOO_MANY_REQUESTS
                })
        }
        _ => false,
    }
}

fn parse_chart(ticker: &str, response: ChartResponse) -> ScreenResult<Vec<PriceBar>> {
    if let Some(error) = response.chart.error {
        return Err(ScreenError::data_unavailable(
            ticker,
            format!("Yahoo API error: {} - {}", error.code, error.description),
        ));
    }

    let data = response
        .chart
        .result
        .and_then(|r| r.into_iter().next())
        .ok_or_else(|| ScreenError::data_unavailable(ticker, "no chart result"))?;

    let offset = data.meta.map(|m| m.gmtoffset).unwrap_or(0);
    let adjusted = data
        .indicators
        .adjclose
        .into_iter()
        .next()
        .map(|a| a.adjclose)
        .filter(|a| a.len() == data.timestamp.len());
    let closes = match adjusted {
        Some(adjclose) => adjclose,
        None => data
            .indicators
            .quote
            .into_iter()
            .next()
            .map(|q| q.close)
            .ok_or_else(|| ScreenError::data_unavailable(ticker, "no quote data"))?,
    };

    let bars = data
        .timestamp
        .iter()
        .zip(closes)
        .filter_map(|(&ts, close)| {
            let date = DateTime::from_timestamp(ts + offset, 0)?.date_naive();
            Some(PriceBar::new(date, close?))
        })
        .collect();

    Ok(normalize_weekly(bars))
}
