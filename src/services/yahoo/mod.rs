//! Yahoo Finance chart API as a weekly time-series source

pub mod client;

pub use client::YahooClient;
