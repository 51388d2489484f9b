//! Error taxonomy for a screening run.
//!
//! Only configuration errors are fatal. Everything raised while processing a
//! single ticker is downgraded to a skip by the runtime, and delivery errors
//! are reported as warnings.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScreenError {
    #[error("data unavailable for {ticker}: {reason}")]
    DataUnavailable { ticker: String, reason: String },

    #[error("fetching {ticker} timed out after {seconds}s")]
    Timeout { ticker: String, seconds: u64 },

    #[error("report delivery failed: {0}")]
    Delivery(String),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
}

impl ScreenError {
    pub fn data_unavailable(ticker: &str, reason: impl Into<String>) -> Self {
        ScreenError::DataUnavailable {
            ticker: ticker.to_string(),
            reason: reason.into(),
        }
    }
}

pub type ScreenResult<T> = Result<T, ScreenError>;
