//! trendscreen
//!
//! Screens the configured ticker universe once, or on every tick of
//! `SCREEN_CRON`, and publishes the report to the console, CSV files and
//! optionally Telegram.

use dotenvy::dotenv;
use std::sync::Arc;
use std::time::Duration;
use tokio::signal;
use tracing::{info, warn};

use trendscreen::config::{get_environment, ScreenerConfig};
use trendscreen::core::runtime::{run_pipeline, Screener};
use trendscreen::core::scheduler::ScreenScheduler;
use trendscreen::error::ScreenResult;
use trendscreen::logging;
use trendscreen::report::console::banner;
use trendscreen::report::{ConsoleSink, CsvSink, ReportSink, TelegramSink};
use trendscreen::services::market_data::TimeSeriesSource;
use trendscreen::services::telegram::TelegramClient;
use trendscreen::services::yahoo::YahooClient;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables from .env if present
    dotenv().ok();

    logging::init_logging();

    let config = ScreenerConfig::from_env()?;
    info!(environment = %get_environment(), "Starting trendscreen");
    info!(
        rsi_period = config.params.rsi_period,
        sma_period = config.params.sma_period,
        sma_threshold = config.params.sma_threshold,
        lookback_weeks = config.params.lookback_weeks,
        tickers = config.tickers.len(),
        "Screening parameters"
    );

    let timeout = Duration::from_secs(config.fetch_timeout_seconds);
    let source: Arc<dyn TimeSeriesSource> =
        Arc::new(YahooClient::new(config.yahoo_base_url.clone(), timeout)?);
    let screener = Arc::new(Screener::from_config(source, &config));
    let sinks = Arc::new(build_sinks(&config, timeout)?);
    let tickers = Arc::new(config.tickers.clone());

    let Some(expression) = config.cron.as_deref() else {
        println!("{}", banner(&config.params, tickers.len()));
        run_pipeline(&screener, &tickers, &sinks).await;
        return Ok(());
    };

    let scheduler = ScreenScheduler::new(expression)?;
    scheduler
        .start(move || {
            let screener = screener.clone();
            let tickers = tickers.clone();
            let sinks = sinks.clone();
            async move {
                run_pipeline(&screener, &tickers, &sinks).await;
            }
        })
        .await;

    info!(cron = %scheduler.expression(), "Scheduler started, waiting for shutdown signal...");
    signal::ctrl_c().await?;
    info!("Shutting down...");
    scheduler.stop().await;

    Ok(())
}

fn build_sinks(config: &ScreenerConfig, timeout: Duration) -> ScreenResult<Vec<Box<dyn ReportSink>>> {
    let mut sinks: Vec<Box<dyn ReportSink>> = vec![
        Box::new(ConsoleSink),
        Box::new(CsvSink::new(&config.output_dir, &config.report_prefix)),
    ];

    match (config.send_to_telegram, &config.telegram) {
        (true, Some(telegram)) => {
            sinks.push(Box::new(TelegramSink::new(TelegramClient::new(telegram, timeout)?)));
        }
        (true, None) => {
            warn!("SEND_TO_TELEGRAM is set but TELEGRAM_BOT_TOKEN / TELEGRAM_CHAT_ID are missing");
            warn!("Bot token: send /newbot to @BotFather. Chat ID: message @userinfobot");
        }
        (false, _) => info!("Telegram delivery disabled, set SEND_TO_TELEGRAM=true to enable"),
    }

    Ok(sinks)
}
