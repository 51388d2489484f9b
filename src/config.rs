//! Runtime configuration.
//!
//! Everything is read from the process environment (optionally seeded from a
//! `.env` file by the binary). Secrets never have defaults.

use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use crate::error::{ScreenError, ScreenResult};

/// Extra bars required on top of the RSI and SMA warm-up.
pub const HISTORY_MARGIN: usize = 20;

/// Upper bound for `RSI_PERIOD` and `SMA_PERIOD`, in weeks.
pub const MAX_PERIOD_WEEKS: usize = 1040;
/// Upper bound for `LOOKBACK_WEEKS`.
pub const MAX_LOOKBACK_WEEKS: usize = 2600;
/// Upper bound for `HISTORY_DAYS`.
pub const MAX_HISTORY_DAYS: i64 = 36_500;

pub const DEFAULT_YAHOO_BASE_URL: &str = "https://query1.finance.yahoo.com";
pub const DEFAULT_TELEGRAM_API_BASE: &str = "https://api.telegram.org";

const TOKEN_PLACEHOLDER: &str = "YOUR_BOT_TOKEN_HERE";
const CHAT_ID_PLACEHOLDER: &str = "YOUR_CHAT_ID_HERE";

/// Universe used when neither `SCREEN_TICKERS` nor `SCREEN_TICKERS_FILE` is set.
pub const DEFAULT_UNIVERSE: &[&str] = &[
    "AKBNK.IS", "THYAO.IS", "TUPRS.IS", "EREGL.IS", "SAHOL.IS",
    "KCHOL.IS", "GARAN.IS", "SISE.IS", "PETKM.IS", "ASELS.IS",
    "TTKOM.IS", "KOZAL.IS", "KOZAA.IS", "TAVHL.IS", "BIMAS.IS",
    "EKGYO.IS", "TCELL.IS", "ISCTR.IS", "FROTO.IS", "HEKTS.IS",
    "ENKAI.IS", "PGSUS.IS", "OYAKC.IS", "SODA.IS", "VESTL.IS",
    "TOASO.IS", "KRDMD.IS", "VAKBN.IS", "DOHOL.IS", "ARCLK.IS",
    "AEFES.IS", "ODAS.IS", "KONTR.IS", "ENJSA.IS", "HALKB.IS",
    "MGROS.IS", "BTCIM.IS", "SKBNK.IS", "SOKM.IS", "TTRAK.IS",
    "GUBRF.IS", "AGHOL.IS", "ULKER.IS", "CCOLA.IS", "AKSEN.IS",
    "ANACM.IS", "GESAN.IS", "GLYHO.IS", "MAVI.IS", "YATAS.IS",
    "ALARK.IS", "PRKME.IS", "LOGO.IS", "BRSAN.IS", "TKFEN.IS",
    "ISGYO.IS", "TRILC.IS", "CEMAS.IS", "EGEEN.IS",
];

/// Get the deployment environment (`production`, `sandbox`, ...)
pub fn get_environment() -> String {
    env::var("APP_ENV")
        .or_else(|_| env::var("ENVIRONMENT"))
        .unwrap_or_else(|_| "sandbox".to_string())
}

/// Indicator and screening-rule parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScreeningParams {
    /// RSI window, in weeks.
    pub rsi_period: usize,
    /// Window of the RSI moving average, in weeks.
    pub sma_period: usize,
    /// The RSI SMA must have been strictly below this inside the lookback window.
    pub sma_threshold: f64,
    /// Length of the historical window, in weeks.
    pub lookback_weeks: usize,
}

impl Default for ScreeningParams {
    fn default() -> Self {
        Self {
            rsi_period: 31,
            sma_period: 31,
            sma_threshold: 51.0,
            lookback_weeks: 104,
        }
    }
}

impl ScreeningParams {
    /// Bars a ticker needs before it is considered at all.
    pub fn min_history(&self) -> usize {
        self.rsi_period
            .saturating_add(self.sma_period)
            .saturating_add(HISTORY_MARGIN)
    }

    pub fn validate(&self) -> ScreenResult<()> {
        check_range("RSI_PERIOD", self.rsi_period, MAX_PERIOD_WEEKS)?;
        check_range("SMA_PERIOD", self.sma_period, MAX_PERIOD_WEEKS)?;
        check_range("LOOKBACK_WEEKS", self.lookback_weeks, MAX_LOOKBACK_WEEKS)?;
        if !(0.0..=100.0).contains(&self.sma_threshold) {
            return Err(ScreenError::Config(format!(
                "SMA_THRESHOLD must be within [0, 100], got {}",
                self.sma_threshold
            )));
        }
        Ok(())
    }
}

/// Telegram Bot API credentials.
#[derive(Debug, Clone, PartialEq)]
pub struct TelegramConfig {
    pub bot_token: String,
    pub chat_id: String,
    pub api_base: String,
}

impl TelegramConfig {
    fn from_lookup(lookup: &impl Fn(&str) -> Option<String>) -> Option<Self> {
        let bot_token = non_empty(lookup("TELEGRAM_BOT_TOKEN"))?;
        let chat_id = non_empty(lookup("TELEGRAM_CHAT_ID"))?;
        if bot_token == TOKEN_PLACEHOLDER || chat_id == CHAT_ID_PLACEHOLDER {
            return None;
        }

        Some(Self {
            bot_token,
            chat_id,
            api_base: non_empty(lookup("TELEGRAM_API_BASE"))
                .unwrap_or_else(|| DEFAULT_TELEGRAM_API_BASE.to_string()),
        })
    }
}

#[derive(Debug, Clone)]
pub struct ScreenerConfig {
    pub params: ScreeningParams,
    /// Calendar days of weekly history requested from the source.
    pub history_days: i64,
    pub tickers: Vec<String>,
    pub concurrency: usize,
    pub fetch_timeout_seconds: u64,
    pub yahoo_base_url: String,
    pub output_dir: PathBuf,
    pub report_prefix: String,
    pub send_to_telegram: bool,
    /// `None` when credentials are missing or still placeholders.
    pub telegram: Option<TelegramConfig>,
    /// Six-field cron expression; run once when absent.
    pub cron: Option<String>,
}

impl Default for ScreenerConfig {
    fn default() -> Self {
        Self {
            params: ScreeningParams::default(),
            history_days: 1095,
            tickers: DEFAULT_UNIVERSE.iter().map(|t| t.to_string()).collect(),
            concurrency: 4,
            fetch_timeout_seconds: 30,
            yahoo_base_url: DEFAULT_YAHOO_BASE_URL.to_string(),
            output_dir: PathBuf::from("."),
            report_prefix: "bist100_rsi".to_string(),
            send_to_telegram: false,
            telegram: None,
            cron: None,
        }
    }
}

impl ScreenerConfig {
    /// Load from the process environment.
    pub fn from_env() -> ScreenResult<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load from an arbitrary key/value lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> ScreenResult<Self> {
        let defaults = Self::default();

        let params = ScreeningParams {
            rsi_period: parse_or(&lookup, "RSI_PERIOD", defaults.params.rsi_period)?,
            sma_period: parse_or(&lookup, "SMA_PERIOD", defaults.params.sma_period)?,
            sma_threshold: parse_or(&lookup, "SMA_THRESHOLD", defaults.params.sma_threshold)?,
            lookback_weeks: parse_or(&lookup, "LOOKBACK_WEEKS", defaults.params.lookback_weeks)?,
        };
        params.validate()?;

        let tickers = if let Some(list) = non_empty(lookup("SCREEN_TICKERS")) {
            parse_ticker_list(&list)
        } else if let Some(path) = non_empty(lookup("SCREEN_TICKERS_FILE")) {
            let contents = std::fs::read_to_string(&path).map_err(|e| {
                ScreenError::Config(format!("cannot read SCREEN_TICKERS_FILE {}: {}", path, e))
            })?;
            parse_ticker_list(&contents)
        } else {
            defaults.tickers
        };
        if tickers.is_empty() {
            return Err(ScreenError::Config("ticker universe is empty".into()));
        }

        let concurrency: usize = parse_or(&lookup, "SCREEN_CONCURRENCY", defaults.concurrency)?;
        let history_days: i64 = parse_or(&lookup, "HISTORY_DAYS", defaults.history_days)?;
        if !(1..=MAX_HISTORY_DAYS).contains(&history_days) {
            return Err(ScreenError::Config(format!(
                "HISTORY_DAYS must be within [1, {}], got {}",
                MAX_HISTORY_DAYS, history_days
            )));
        }

        Ok(Self {
            params,
            history_days,
            tickers,
            concurrency: concurrency.max(1),
            fetch_timeout_seconds: parse_or(
                &lookup,
                "FETCH_TIMEOUT_SECONDS",
                defaults.fetch_timeout_seconds,
            )?,
            yahoo_base_url: non_empty(lookup("YAHOO_BASE_URL"))
                .unwrap_or(defaults.yahoo_base_url),
            output_dir: non_empty(lookup("OUTPUT_DIR"))
                .map(PathBuf::from)
                .unwrap_or(defaults.output_dir),
            report_prefix: non_empty(lookup("REPORT_PREFIX")).unwrap_or(defaults.report_prefix),
            send_to_telegram: parse_bool(lookup("SEND_TO_TELEGRAM").as_deref()),
            telegram: TelegramConfig::from_lookup(&lookup),
            cron: non_empty(lookup("SCREEN_CRON")),
        })
    }
}

/// Split a comma or newline separated ticker list.
///
/// Blank entries and `#` comments are ignored, symbols are upper-cased and
/// duplicates are dropped keeping the first occurrence.
pub fn parse_ticker_list(text: &str) -> Vec<String> {
    let mut tickers: Vec<String> = Vec::new();
    for line in text.lines() {
        let line = line.split('#').next().unwrap_or("");
        for entry in line.split(',') {
            let ticker = entry.trim().to_uppercase();
            if !ticker.is_empty() && !tickers.contains(&ticker) {
                tickers.push(ticker);
            }
        }
    }
    tickers
}

fn check_range(key: &str, value: usize, max: usize) -> ScreenResult<()> {
    if value == 0 || value > max {
        return Err(ScreenError::Config(format!(
            "{} must be within [1, {}], got {}",
            key, max, value
        )));
    }
    Ok(())
}

fn parse_or<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> ScreenResult<T>
where
    T::Err: std::fmt::Display,
{
    match non_empty(lookup(key)) {
        Some(raw) => raw
            .parse()
            .map_err(|e| ScreenError::Config(format!("{} = {:?}: {}", key, raw, e))),
        None => Ok(default),
    }
}

fn parse_bool(value: Option<&str>) -> bool {
    matches!(
        value.map(|v| v.trim().to_ascii_lowercase()).as_deref(),
        Some("1" | "true" | "yes" | "on")
    )
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}
