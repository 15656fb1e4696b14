//! Core data types for quote series.
//!
//! This module defines the fundamental data structures:
//!
//! - [`Symbol`] - Trading symbol/ticker
//! - [`QuoteRecord`] - One time bucket of OHLCV values
//! - [`OutputSize`] - Provider response size hint

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A trading symbol/ticker.
///
/// Symbols are automatically uppercased on creation, which is the single
/// normalization point for both the store write path and the read path.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Symbol(String);

impl Symbol {
    /// Creates a new symbol from a string, converting to uppercase.
    #[must_use]
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into().to_uppercase())
    }

    /// Returns the symbol as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Symbol {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(s))
    }
}

impl From<&str> for Symbol {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for Symbol {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

/// One time bucket of OHLCV (Open, High, Low, Close, Volume) data.
///
/// Records are keyed by `(symbol, timestamp)`; within a stored series that
/// key is unique and re-ingestion of an overlapping range is an idempotent
/// upsert.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct QuoteRecord {
    /// Symbol this bucket belongs to.
    pub symbol: Symbol,
    /// Start of the time bucket (daily buckets carry a midnight time).
    pub timestamp: NaiveDateTime,
    /// Opening price.
    pub open: f64,
    /// Highest price during the bucket.
    pub high: f64,
    /// Lowest price during the bucket.
    pub low: f64,
    /// Closing price.
    pub close: f64,
    /// Trading volume.
    pub volume: f64,
}

impl QuoteRecord {
    /// Creates a new quote record.
    #[must_use]
    pub const fn new(
        symbol: Symbol,
        timestamp: NaiveDateTime,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: f64,
    ) -> Self {
        Self {
            symbol,
            timestamp,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    /// Checks the OHLCV invariant: `low <= open, close <= high` and a
    /// non-negative volume.
    ///
    /// Upstream data is not trusted; records failing this check are dropped
    /// at parse time rather than stored. NaN fails every comparison and is
    /// therefore invalid.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.low <= self.high
            && self.low <= self.open
            && self.open <= self.high
            && self.low <= self.close
            && self.close <= self.high
            && self.volume >= 0.0
    }
}

/// Provider response size hint.
///
/// Selects how much history the upstream source returns. The exact meaning
/// is provider-specific and does not affect parsing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OutputSize {
    /// A recent window (for Alpha Vantage, roughly the last 100 buckets).
    #[default]
    Compact,
    /// Full available history.
    Full,
}

impl OutputSize {
    /// Returns the wire value used in provider query strings.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Compact => "compact",
            Self::Full => "full",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn ts(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    #[test]
    fn symbol_is_uppercased() {
        assert_eq!(Symbol::new("aapl"), Symbol::new("AAPL"));
        assert_eq!(Symbol::new("msft").as_str(), "MSFT");
    }

    #[test]
    fn valid_record_passes() {
        let rec = QuoteRecord::new(
            Symbol::new("AAPL"),
            ts(2024, 1, 2),
            150.0,
            152.0,
            149.0,
            151.0,
            1_000_000.0,
        );
        assert!(rec.is_valid());
    }

    #[test]
    fn high_below_low_is_invalid() {
        let rec = QuoteRecord::new(
            Symbol::new("AAPL"),
            ts(2024, 1, 2),
            150.0,
            148.0,
            149.0,
            150.0,
            1_000_000.0,
        );
        assert!(!rec.is_valid());
    }

    #[test]
    fn open_outside_range_is_invalid() {
        let rec = QuoteRecord::new(
            Symbol::new("AAPL"),
            ts(2024, 1, 2),
            155.0,
            152.0,
            149.0,
            151.0,
            1_000_000.0,
        );
        assert!(!rec.is_valid());
    }

    #[test]
    fn negative_volume_is_invalid() {
        let rec = QuoteRecord::new(
            Symbol::new("AAPL"),
            ts(2024, 1, 2),
            150.0,
            152.0,
            149.0,
            151.0,
            -1.0,
        );
        assert!(!rec.is_valid());
    }

    #[test]
    fn nan_field_is_invalid() {
        let rec = QuoteRecord::new(
            Symbol::new("AAPL"),
            ts(2024, 1, 2),
            f64::NAN,
            152.0,
            149.0,
            151.0,
            1_000_000.0,
        );
        assert!(!rec.is_valid());
    }

    #[test]
    fn output_size_wire_values() {
        assert_eq!(OutputSize::Compact.as_str(), "compact");
        assert_eq!(OutputSize::Full.as_str(), "full");
    }
}
