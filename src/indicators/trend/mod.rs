//! Trend indicators: SMA

pub mod sma;

pub use sma::*;
