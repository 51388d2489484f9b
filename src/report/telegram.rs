//! Telegram HTML message rendering and delivery

use async_trait::async_trait;
use tracing::info;

use super::ReportSink;
use crate::error::{ScreenError, ScreenResult};
use crate::models::screening::ScreenReport;
use crate::services::telegram::TelegramClient;

const TOP_N: usize = 5;
const RULE_WIDTH: usize = 40;

/// Render the report as a Telegram HTML message.
pub fn format_telegram_message(report: &ScreenReport) -> String {
    let rule = "=".repeat(RULE_WIDTH);
    let mut lines = vec![
        "📊 <b>Weekly RSI Screen</b>".to_string(),
        format!("📅 Date: {}", report.generated_at.format("%d.%m.%Y %H:%M")),
        format!("{}\n", rule),
    ];

    if !report.fresh.is_empty() {
        lines.push("🔥 <b>CROSSED UP THIS WEEK</b> 🔥".to_string());
        lines.push(format!("Total: {} tickers", report.fresh.len()));
        lines.push(format!("{}\n", "-".repeat(RULE_WIDTH)));

        for r in &report.fresh {
            lines.extend([
                format!("<b>{}</b>", escape_html(r.display_symbol())),
                format!("  • RSI: {:.2}", r.oscillator),
                format!("  • RSI SMA: {:.2}", r.smoothed),
                format!("  • Diff: +{:.2}", r.difference),
                format!("  • Price: {:.2}", r.price),
                format!(
                    "  • Min SMA: {:.2} ({})\n",
                    r.min_smoothed,
                    r.min_smoothed_date.format("%Y-%m-%d")
                ),
            ]);
        }

        lines.push(format!("{}\n", rule));
    }

    if let Some(summary) = report.summary {
        lines.extend([
            "📈 <b>SUMMARY</b>".to_string(),
            format!("Total: {} tickers", summary.total),
            format!("Crossed this week: {} tickers", summary.fresh_count),
            format!("Crossed earlier: {} tickers\n", summary.earlier_count),
            "<b>Statistics:</b>".to_string(),
            format!("  • Mean RSI: {:.2}", summary.mean_oscillator),
            format!("  • Mean RSI SMA: {:.2}", summary.mean_smoothed),
            format!("  • Mean diff: {:.2}\n", summary.mean_difference),
            format!("<b>Strongest {}:</b>", TOP_N),
        ]);
        lines.extend(report.top(TOP_N).iter().map(|r| {
            format!(
                "  {}: Diff +{:.2} | Price {:.2}",
                escape_html(r.display_symbol()),
                r.difference,
                r.price
            )
        }));
    }

    lines.join("\n") + "\n"
}

/// Escape the characters Telegram's HTML parse mode treats as markup.
pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

pub struct TelegramSink {
    client: TelegramClient,
}

impl TelegramSink {
    pub fn new(client: TelegramClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ReportSink for TelegramSink {
    fn name(&self) -> &'static str {
        "telegram"
    }

    async fn publish(&self, report: &ScreenReport) -> ScreenResult<()> {
        if report.is_empty() {
            info!("Nothing qualified, Telegram message skipped");
            return Ok(());
        }

        let message = format_telegram_message(report);
        let delivery = self.client.send_message(&message, "HTML").await;
        if delivery.is_success() {
            return Ok(());
        }

        let details: Vec<String> = delivery
            .failed
            .iter()
            .map(|(index, e)| format!("chunk {}: {}", index + 1, e))
            .collect();
        Err(ScreenError::Delivery(format!(
            "{} of {} chunks failed ({})",
            delivery.failed.len(),
            delivery.chunks,
            details.join("; ")
        )))
    }
}
