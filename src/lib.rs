//! Weekly RSI / RSI-SMA crossover screener.
//!
//! The pipeline is: `services` fetch weekly bars, `indicators` derive the
//! oscillator and its moving average, `signals` classify and rank tickers,
//! and `report` renders the result to the console, CSV files and Telegram.

pub mod config;
pub mod core;
pub mod error;
pub mod indicators;
pub mod logging;
pub mod models;
pub mod report;
pub mod services;
pub mod signals;

pub use error::ScreenError;
