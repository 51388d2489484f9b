//! Plain-text rendering to stdout

use async_trait::async_trait;

use super::{row_fields, ReportSink, COLUMNS};
use crate::config::ScreeningParams;
use crate::error::ScreenResult;
use crate::models::screening::{ScreenReport, ScreeningResult};

const RULE_WIDTH: usize = 90;

pub struct ConsoleSink;

impl ConsoleSink {
    /// Everything `publish` prints, as a string.
    pub fn render(report: &ScreenReport) -> String {
        let rule = "=".repeat(RULE_WIDTH);
        let mut lines: Vec<String> = report.results.iter().map(ticker_line).collect();
        lines.push(rule.clone());

        let Some(summary) = report.summary else {
            lines.push(format!(
                "\nNo ticker satisfied the screening conditions ({} scanned).",
                report.scanned
            ));
            return lines.join("\n") + "\n";
        };

        lines.push(format!("\nALL RESULTS - {} tickers found:\n", report.results.len()));
        lines.push(table(&report.results));

        if !report.fresh.is_empty() {
            lines.push(format!("\n{}", rule));
            lines.push(format!(
                "🔥 FRESH CROSSOVERS THIS WEEK - {} tickers:\n",
                report.fresh.len()
            ));
            lines.push(table(&report.fresh));
        }

        lines.extend([
            format!("\n{}", rule),
            "📈 STATISTICS (all tickers):".to_string(),
            format!("  • Mean RSI: {:.2}", summary.mean_oscillator),
            format!("  • Mean RSI SMA: {:.2}", summary.mean_smoothed),
            format!("  • Mean difference: {:.2}", summary.mean_difference),
            format!("  • Crossed this week: {} tickers", summary.fresh_count),
            format!("  • Crossed earlier: {} tickers", summary.earlier_count),
        ]);

        lines.join("\n") + "\n"
    }
}

#[async_trait]
impl ReportSink for ConsoleSink {
    fn name(&self) -> &'static str {
        "console"
    }

    async fn publish(&self, report: &ScreenReport) -> ScreenResult<()> {
        print!("{}", Self::render(report));
        Ok(())
    }
}

/// Scan banner describing the rule being applied.
pub fn banner(params: &ScreeningParams, tickers: usize) -> String {
    format!(
        "Scanning {} tickers...\n\n\
         Definitions:\n  • RSI = {}-week RSI\n  • RSI SMA = {}-week SMA of the RSI\n\n\
         Conditions:\n  1) RSI SMA below {} at least once in the last {} weeks\n  2) Now: RSI > RSI SMA\n\n{}",
        tickers,
        params.rsi_period,
        params.sma_period,
        params.sma_threshold,
        params.lookback_weeks,
        "=".repeat(RULE_WIDTH)
    )
}

fn ticker_line(result: &ScreeningResult) -> String {
    let (marker, note) = if result.fresh_crossover {
        ("🔥", " | FRESH CROSSOVER THIS WEEK!")
    } else {
        ("✓ ", "")
    };
    format!(
        "{} {:8} | RSI: {:5.2} | SMA: {:5.2} | Diff: +{:5.2}{} | Price: {:8.2}",
        marker,
        result.display_symbol(),
        result.oscillator,
        result.smoothed,
        result.difference,
        note,
        result.price
    )
}

fn table(results: &[ScreeningResult]) -> String {
    let rows: Vec<[String; 10]> = results.iter().map(row_fields).collect();
    let mut widths = COLUMNS.map(|c| c.chars().count());
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let align = |cells: Vec<&str>| -> String {
        cells
            .iter()
            .zip(widths)
            .map(|(c, w)| format!("{:>w$}", c, w = w))
            .collect::<Vec<_>>()
            .join(" ")
    };

    std::iter::once(align(COLUMNS.to_vec()))
        .chain(rows.iter().map(|row| align(row.iter().map(String::as_str).collect())))
        .collect::<Vec<_>>()
        .join("\n")
}
