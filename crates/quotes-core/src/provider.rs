//! Provider trait for fetching quote series.

use async_trait::async_trait;
use std::fmt::Debug;

use crate::error::ProviderError;
use crate::types::{OutputSize, QuoteRecord, Symbol};

/// An upstream source of OHLCV quote series.
///
/// Implementations issue one network request per fetch, validate each parsed
/// record, skip individually malformed entries, and return the survivors
/// sorted ascending by timestamp. A provider never touches the series store.
#[async_trait]
pub trait QuoteProvider: Send + Sync + Debug {
    /// Returns the name of this provider (e.g. "Alpha Vantage").
    fn name(&self) -> &str;

    /// Fetches the quote series for a symbol.
    ///
    /// `size` hints at how much history the provider should return; its
    /// semantics are provider-specific and do not affect parsing.
    ///
    /// # Errors
    ///
    /// Returns a [`ProviderError`] for rate limiting, upstream error
    /// payloads, missing or all-invalid time-series data, and transport
    /// failures. An `Ok` result always contains at least one record.
    async fn fetch(
        &self,
        symbol: &Symbol,
        size: OutputSize,
    ) -> Result<Vec<QuoteRecord>, ProviderError>;
}
