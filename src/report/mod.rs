//! Report sinks: console, CSV files and Telegram.

pub mod console;
pub mod csv_export;
pub mod telegram;

use async_trait::async_trait;
use tracing::{info, warn};

use crate::error::ScreenResult;
use crate::models::screening::{ScreenReport, ScreeningResult};

pub use console::ConsoleSink;
pub use csv_export::CsvSink;
pub use telegram::{format_telegram_message, TelegramSink};

/// Anything that can render or deliver a finished report.
#[async_trait]
pub trait ReportSink: Send + Sync {
    fn name(&self) -> &'static str;

    async fn publish(&self, report: &ScreenReport) -> ScreenResult<()>;
}

/// Publish to every sink in order. Failures are logged and counted, never
/// propagated.
pub async fn publish_all(sinks: &[Box<dyn ReportSink>], report: &ScreenReport) -> usize {
    let mut failures = 0;
    for sink in sinks {
        match sink.publish(report).await {
            Ok(()) => info!(sink = sink.name(), "Report published"),
            Err(e) => {
                failures += 1;
                warn!(sink = sink.name(), error = %e, "Report sink failed");
            }
        }
    }
    failures
}

/// Column names shared by the console table and the CSV exports.
pub const COLUMNS: [&str; 10] = [
    "Ticker",
    "RSI",
    "RSI_SMA",
    "Diff",
    "Min_SMA",
    "Min_Date",
    "Last_Below",
    "Weeks_Since",
    "Price",
    "Fresh_Crossover",
];

/// Presentation row: two decimals, ISO dates, `N/A` for missing values.
pub fn row_fields(result: &ScreeningResult) -> [String; 10] {
    [
        result.display_symbol().to_string(),
        format!("{:.2}", result.oscillator),
        format!("{:.2}", result.smoothed),
        format!("{:.2}", result.difference),
        format!("{:.2}", result.min_smoothed),
        result.min_smoothed_date.format("%Y-%m-%d").to_string(),
        result
            .last_below_date
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "N/A".to_string()),
        result
            .weeks_since_below
            .map(|w| w.to_string())
            .unwrap_or_else(|| "N/A".to_string()),
        format!("{:.2}", result.price),
        if result.fresh_crossover { "YES" } else { "no" }.to_string(),
    ]
}
