#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/quotestore/quotes/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Alpha Vantage quote provider.
//!
//! This crate implements the [`QuoteProvider`] trait for the
//! [Alpha Vantage](https://www.alphavantage.co/) API.
//!
//! # Usage
//!
//! ```rust,ignore
//! use quotes_alphavantage::AlphaVantage;
//! use quotes_core::{OutputSize, QuoteProvider, Symbol};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let provider = AlphaVantage::new("your_api_key");
//!
//!     let symbol = Symbol::new("AAPL");
//!     let records = provider.fetch(&symbol, OutputSize::Compact).await?;
//!     println!("{} records", records.len());
//!
//!     Ok(())
//! }
//! ```

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use quotes_core::{OutputSize, ProviderError, QuoteProvider, QuoteRecord, Symbol};
use reqwest::Client;
use serde_json::{Map, Value};
use std::fmt;
use std::time::Duration;
use tracing::{debug, warn};

/// Query endpoint for the Alpha Vantage API.
const ALPHA_VANTAGE_URL: &str = "https://www.alphavantage.co/query";

/// Top-level key holding daily time series data.
const DAILY_SERIES_KEY: &str = "Time Series (Daily)";

/// Ceiling for one network call; a hang becomes a `Transport` error.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Intraday bucket width accepted by the `TIME_SERIES_INTRADAY` function.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Interval {
    /// One-minute buckets.
    Min1,
    /// Five-minute buckets.
    #[default]
    Min5,
    /// Fifteen-minute buckets.
    Min15,
    /// Thirty-minute buckets.
    Min30,
    /// Sixty-minute buckets.
    Min60,
}

impl Interval {
    /// Returns the wire value used in the query string.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Min1 => "1min",
            Self::Min5 => "5min",
            Self::Min15 => "15min",
            Self::Min30 => "30min",
            Self::Min60 => "60min",
        }
    }

    /// Returns the top-level response key holding this interval's series.
    #[must_use]
    pub fn series_key(&self) -> String {
        format!("Time Series ({})", self.as_str())
    }
}

/// Alpha Vantage quote provider.
///
/// Holds one reusable HTTP client constructed with a bounded per-call
/// timeout; the client is shared across fetches and released with the
/// provider regardless of how parsing went.
#[derive(Clone)]
pub struct AlphaVantage {
    client: Client,
    api_key: String,
}

impl fmt::Debug for AlphaVantage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AlphaVantage")
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}

impl AlphaVantage {
    /// Creates a new provider with the given API key.
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_default();
        Self {
            client,
            api_key: api_key.into(),
        }
    }

    /// Creates a new provider with a custom HTTP client.
    #[must_use]
    pub fn with_client(client: Client, api_key: impl Into<String>) -> Self {
        Self {
            client,
            api_key: api_key.into(),
        }
    }

    /// Makes a GET request against the query endpoint and returns the raw
    /// JSON payload.
    async fn get_payload(&self, params: &[(&str, &str)]) -> Result<Value, ProviderError> {
        let response = self
            .client
            .get(ALPHA_VANTAGE_URL)
            .query(params)
            .query(&[("apikey", self.api_key.as_str()), ("datatype", "json")])
            .send()
            .await
            .map_err(|e| ProviderError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(ProviderError::Transport(format!("HTTP {status}")));
        }

        response
            .json()
            .await
            .map_err(|e| ProviderError::Transport(e.to_string()))
    }

    /// Fetches the daily series for a symbol.
    ///
    /// # Errors
    ///
    /// See [`QuoteProvider::fetch`]; this is the method backing it.
    pub async fn fetch_daily(
        &self,
        symbol: &Symbol,
        size: OutputSize,
    ) -> Result<Vec<QuoteRecord>, ProviderError> {
        debug!(symbol = %symbol, size = size.as_str(), "Fetching daily series");
        let payload = self
            .get_payload(&[
                ("function", "TIME_SERIES_DAILY"),
                ("symbol", symbol.as_str()),
                ("outputsize", size.as_str()),
            ])
            .await?;

        let series = classify_payload(&payload, symbol, DAILY_SERIES_KEY)?;
        parse_series(symbol, series)
    }

    /// Fetches an intraday series for a symbol.
    ///
    /// # Errors
    ///
    /// Same conditions as [`fetch_daily`](Self::fetch_daily).
    pub async fn fetch_intraday(
        &self,
        symbol: &Symbol,
        interval: Interval,
    ) -> Result<Vec<QuoteRecord>, ProviderError> {
        debug!(symbol = %symbol, interval = interval.as_str(), "Fetching intraday series");
        let payload = self
            .get_payload(&[
                ("function", "TIME_SERIES_INTRADAY"),
                ("symbol", symbol.as_str()),
                ("interval", interval.as_str()),
                ("outputsize", OutputSize::Compact.as_str()),
            ])
            .await?;

        let series = classify_payload(&payload, symbol, &interval.series_key())?;
        parse_series(symbol, series)
    }
}

#[async_trait]
impl QuoteProvider for AlphaVantage {
    fn name(&self) -> &str {
        "Alpha Vantage"
    }

    async fn fetch(
        &self,
        symbol: &Symbol,
        size: OutputSize,
    ) -> Result<Vec<QuoteRecord>, ProviderError> {
        self.fetch_daily(symbol, size).await
    }
}

/// Sorts the upstream payload into data vs. the provider's error shapes.
///
/// Alpha Vantage reports problems through top-level keys rather than HTTP
/// status codes: `"Note"` for quota exhaustion, `"Error Message"` and
/// `"Information"` for structured error/info payloads.
fn classify_payload<'a>(
    payload: &'a Value,
    symbol: &Symbol,
    series_key: &str,
) -> Result<&'a Map<String, Value>, ProviderError> {
    if payload.get("Note").is_some() {
        return Err(ProviderError::RateLimited);
    }

    for key in ["Error Message", "Information"] {
        if let Some(message) = payload.get(key) {
            let message = message.as_str().unwrap_or_default().to_string();
            return Err(ProviderError::UpstreamMessage(message));
        }
    }

    match payload.get(series_key).and_then(Value::as_object) {
        Some(series) if !series.is_empty() => Ok(series),
        _ => Err(ProviderError::NoData(symbol.to_string())),
    }
}

/// Parses a time-series object into validated records, ascending by
/// timestamp.
///
/// Individually malformed entries are logged and skipped; zero survivors is
/// an error so an all-invalid payload is never mistaken for a complete
/// series.
fn parse_series(
    symbol: &Symbol,
    series: &Map<String, Value>,
) -> Result<Vec<QuoteRecord>, ProviderError> {
    let mut records = Vec::with_capacity(series.len());

    for (stamp, fields) in series {
        match parse_entry(symbol, stamp, fields) {
            Some(record) if record.is_valid() => records.push(record),
            Some(_) => {
                warn!(symbol = %symbol, timestamp = %stamp, "Dropping record violating OHLCV invariant");
            }
            None => {
                warn!(symbol = %symbol, timestamp = %stamp, "Skipping malformed time series entry");
            }
        }
    }

    if records.is_empty() {
        return Err(ProviderError::NoValidRecords(symbol.to_string()));
    }

    records.sort_by_key(|r| r.timestamp);
    debug!(symbol = %symbol, count = records.len(), "Parsed time series");
    Ok(records)
}

fn parse_entry(symbol: &Symbol, stamp: &str, fields: &Value) -> Option<QuoteRecord> {
    Some(QuoteRecord::new(
        symbol.clone(),
        parse_timestamp(stamp)?,
        field_f64(fields, "1. open")?,
        field_f64(fields, "2. high")?,
        field_f64(fields, "3. low")?,
        field_f64(fields, "4. close")?,
        field_f64(fields, "5. volume")?,
    ))
}

/// Daily keys are bare dates, intraday keys carry a time component.
fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

/// Numeric fields arrive as JSON strings; tolerate plain numbers too.
fn field_f64(fields: &Value, key: &str) -> Option<f64> {
    match fields.get(key)? {
        Value::String(s) => s.trim().parse().ok(),
        value => value.as_f64(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn aapl() -> Symbol {
        Symbol::new("AAPL")
    }

    fn daily_entry(open: &str, high: &str, low: &str, close: &str, volume: &str) -> Value {
        json!({
            "1. open": open,
            "2. high": high,
            "3. low": low,
            "4. close": close,
            "5. volume": volume,
        })
    }

    #[test]
    fn provider_metadata() {
        let provider = AlphaVantage::new("test_key");
        assert_eq!(provider.name(), "Alpha Vantage");
    }

    #[test]
    fn debug_redacts_api_key() {
        let provider = AlphaVantage::new("secret_key_12345");
        let debug_str = format!("{provider:?}");
        assert!(!debug_str.contains("secret_key_12345"));
        assert!(debug_str.contains("[REDACTED]"));
    }

    #[test]
    fn note_payload_is_rate_limited() {
        let payload = json!({"Note": "Thank you for using Alpha Vantage!"});
        let err = classify_payload(&payload, &aapl(), DAILY_SERIES_KEY).unwrap_err();
        assert!(matches!(err, ProviderError::RateLimited));
    }

    #[test]
    fn error_message_payload_is_upstream_message() {
        let payload = json!({"Error Message": "Invalid API call."});
        let err = classify_payload(&payload, &aapl(), DAILY_SERIES_KEY).unwrap_err();
        assert!(matches!(err, ProviderError::UpstreamMessage(m) if m == "Invalid API call."));
    }

    #[test]
    fn information_payload_is_upstream_message() {
        let payload = json!({"Information": "Premium endpoint."});
        let err = classify_payload(&payload, &aapl(), DAILY_SERIES_KEY).unwrap_err();
        assert!(matches!(err, ProviderError::UpstreamMessage(_)));
    }

    #[test]
    fn missing_series_is_no_data() {
        let payload = json!({"Meta Data": {"2. Symbol": "AAPL"}});
        let err = classify_payload(&payload, &aapl(), DAILY_SERIES_KEY).unwrap_err();
        assert!(matches!(err, ProviderError::NoData(s) if s == "AAPL"));
    }

    #[test]
    fn empty_series_is_no_data() {
        let payload = json!({DAILY_SERIES_KEY: {}});
        let err = classify_payload(&payload, &aapl(), DAILY_SERIES_KEY).unwrap_err();
        assert!(matches!(err, ProviderError::NoData(_)));
    }

    #[test]
    fn parses_and_sorts_daily_series() {
        let payload = json!({
            DAILY_SERIES_KEY: {
                "2024-01-04": daily_entry("153.0", "155.0", "152.0", "154.0", "900000"),
                "2024-01-02": daily_entry("150.0", "152.0", "149.0", "151.0", "1000000"),
                "2024-01-03": daily_entry("151.0", "153.0", "150.0", "152.0", "1100000"),
            }
        });

        let series = classify_payload(&payload, &aapl(), DAILY_SERIES_KEY).unwrap();
        let records = parse_series(&aapl(), series).unwrap();

        assert_eq!(records.len(), 3);
        let stamps: Vec<String> = records
            .iter()
            .map(|r| r.timestamp.date().to_string())
            .collect();
        assert_eq!(stamps, vec!["2024-01-02", "2024-01-03", "2024-01-04"]);
        assert_eq!(records[0].open, 150.0);
        assert_eq!(records[0].volume, 1_000_000.0);
        assert!(records.iter().all(|r| r.symbol == aapl()));
    }

    #[test]
    fn invariant_violations_are_skipped() {
        // high < low on 01-03; the other two entries survive
        let payload = json!({
            DAILY_SERIES_KEY: {
                "2024-01-02": daily_entry("150.0", "152.0", "149.0", "151.0", "1000000"),
                "2024-01-03": daily_entry("151.0", "148.0", "150.0", "152.0", "1100000"),
                "2024-01-04": daily_entry("153.0", "155.0", "152.0", "154.0", "900000"),
            }
        });

        let series = classify_payload(&payload, &aapl(), DAILY_SERIES_KEY).unwrap();
        let records = parse_series(&aapl(), series).unwrap();
        assert_eq!(records.len(), 2);
        assert!(
            records
                .iter()
                .all(|r| r.timestamp.date().to_string() != "2024-01-03")
        );
    }

    #[test]
    fn malformed_entries_are_skipped() {
        let payload = json!({
            DAILY_SERIES_KEY: {
                "2024-01-02": daily_entry("150.0", "152.0", "149.0", "151.0", "1000000"),
                "2024-01-03": {"1. open": "not-a-number"},
                "not-a-date": daily_entry("1.0", "2.0", "0.5", "1.5", "10"),
            }
        });

        let series = classify_payload(&payload, &aapl(), DAILY_SERIES_KEY).unwrap();
        let records = parse_series(&aapl(), series).unwrap();
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn all_invalid_entries_is_an_error() {
        let payload = json!({
            DAILY_SERIES_KEY: {
                "2024-01-02": daily_entry("150.0", "148.0", "149.0", "151.0", "1000000"),
            }
        });

        let series = classify_payload(&payload, &aapl(), DAILY_SERIES_KEY).unwrap();
        let err = parse_series(&aapl(), series).unwrap_err();
        assert!(matches!(err, ProviderError::NoValidRecords(s) if s == "AAPL"));
    }

    #[test]
    fn intraday_series_key_and_timestamps() {
        let key = Interval::Min5.series_key();
        assert_eq!(key, "Time Series (5min)");

        let payload = json!({
            key.clone(): {
                "2024-01-02 09:35:00": daily_entry("150.0", "150.5", "149.8", "150.2", "52000"),
                "2024-01-02 09:30:00": daily_entry("149.9", "150.1", "149.7", "150.0", "64000"),
            }
        });

        let series = classify_payload(&payload, &aapl(), &key).unwrap();
        let records = parse_series(&aapl(), series).unwrap();
        assert_eq!(records.len(), 2);
        assert!(records[0].timestamp < records[1].timestamp);
        assert_eq!(records[0].timestamp.time().to_string(), "09:30:00");
    }

    #[test]
    fn numeric_fields_tolerate_plain_numbers() {
        let fields = json!({"1. open": 150.0});
        assert_eq!(field_f64(&fields, "1. open"), Some(150.0));
        assert_eq!(field_f64(&fields, "2. high"), None);
    }
}
