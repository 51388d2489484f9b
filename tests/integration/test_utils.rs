//! Mocked Yahoo Finance and Telegram endpoints

#![allow(dead_code)]

use chrono::{Duration, NaiveDate, NaiveTime};
use serde_json::{json, Value};
use trendscreen::config::{ScreeningParams, TelegramConfig};
use wiremock::matchers::{method, path, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Istanbul, UTC+3
pub const GMT_OFFSET: i64 = 3 * 3600;
pub const BOT_TOKEN: &str = "123456:test-token";
pub const CHAT_ID: &str = "-1001234";

pub fn first_monday() -> NaiveDate {
    NaiveDate::from_ymd_opt(2020, 1, 6).unwrap()
}

pub fn week(index: usize) -> NaiveDate {
    first_monday() + Duration::weeks(index as i64)
}

pub fn small_params() -> ScreeningParams {
    ScreeningParams {
        rsi_period: 5,
        sma_period: 5,
        sma_threshold: 51.0,
        lookback_weeks: 104,
    }
}

/// A long decline, a recovery, a pullback and a jump on the last week.
/// Qualifies under `small_params` as a fresh crossover.
pub fn fresh_crossover_closes() -> Vec<f64> {
    let mut closes: Vec<f64> = (0..40).map(|i| 200.0 - i as f64).collect();
    closes.extend((1..=6).map(|i| 161.0 + i as f64));
    closes.extend([166.0, 165.0, 164.0, 163.0, 168.0]);
    closes
}

/// Weekly timestamps at local midnight, as Yahoo reports them.
pub fn timestamps(count: usize) -> Vec<i64> {
    (0..count)
        .map(|i| week(i).and_time(NaiveTime::MIN).and_utc().timestamp() - GMT_OFFSET)
        .collect()
}

pub fn chart_body(closes: &[Option<f64>], adjclose: Option<&[Option<f64>]>) -> Value {
    let mut indicators = json!({ "quote": [{ "close": closes }] });
    if let Some(adjclose) = adjclose {
        indicators["adjclose"] = json!([{ "adjclose": adjclose }]);
    }

    json!({
        "chart": {
            "result": [{
                "meta": { "symbol": "AKBNK.IS", "gmtoffset": GMT_OFFSET },
                "timestamp": timestamps(closes.len()),
                "indicators": indicators
            }],
            "error": null
        }
    })
}

pub async fn mock_chart(server: &MockServer, ticker: &str, body: Value) {
    Mock::given(method("GET"))
        .and(path(format!("/v8/finance/chart/{}", ticker)))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

pub async fn mock_unknown_symbols(server: &MockServer) {
    let body = json!({
        "chart": {
            "result": null,
            "error": {
                "code": "Not Found",
                "description": "No data found, symbol may be delisted"
            }
        }
    });

    Mock::given(method("GET"))
        .and(path_regex(r"^/v8/finance/chart/.+$"))
        .respond_with(ResponseTemplate::new(404).set_body_json(body))
        .mount(server)
        .await;
}

pub fn send_message_path() -> String {
    format!("/bot{}/sendMessage", BOT_TOKEN)
}

pub fn telegram_config(server: &MockServer) -> TelegramConfig {
    TelegramConfig {
        bot_token: BOT_TOKEN.to_string(),
        chat_id: CHAT_ID.to_string(),
        api_base: server.uri(),
    }
}

pub fn telegram_ok() -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({ "ok": true, "result": { "message_id": 1 } }))
}

pub fn telegram_error(description: &str) -> ResponseTemplate {
    ResponseTemplate::new(400).set_body_json(json!({
        "ok": false,
        "error_code": 400,
        "description": description
    }))
}
