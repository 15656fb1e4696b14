//! Error types for warehouse operations.
//!
//! Three layers are kept distinct so the boundary layer can map them to
//! user-facing responses: [`ProviderError`] for upstream failures,
//! [`StoreError`] for persistence failures, and [`WarehouseError`] as the
//! top-level taxonomy returned by the orchestrator. Nothing here is retried
//! or substituted; all errors propagate to the caller undecorated.

use thiserror::Error;

use crate::types::Symbol;

/// Errors raised by an upstream quote provider.
///
/// Each variant is distinguishable so callers can tell "no such symbol"
/// from "upstream temporarily unavailable".
#[derive(Error, Debug)]
pub enum ProviderError {
    /// The provider signalled quota exhaustion.
    #[error("provider rate limit exceeded")]
    RateLimited,

    /// The provider returned a structured error/info payload instead of data.
    #[error("provider message: {0}")]
    UpstreamMessage(String),

    /// Well-formed response but no time-series section (e.g. unknown symbol).
    #[error("no time series data returned for {0}")]
    NoData(String),

    /// A data section was present but every entry failed validation.
    ///
    /// Kept separate from [`NoData`](Self::NoData) so an all-invalid payload
    /// is never cached as "complete".
    #[error("no valid records in time series for {0}")]
    NoValidRecords(String),

    /// Network, timeout, or non-2xx failure.
    #[error("transport error: {0}")]
    Transport(String),
}

/// Error from the series store backend.
#[derive(Error, Debug)]
#[error("series store error: {0}")]
pub struct StoreError(
    /// Backend error message.
    pub String,
);

/// Errors returned by the warehouse orchestrator.
#[derive(Error, Debug)]
pub enum WarehouseError {
    /// The caller supplied a range with `start > end`.
    #[error("invalid range: start {start} is after end {end}")]
    InvalidRange {
        /// Requested range start.
        start: chrono::NaiveDateTime,
        /// Requested range end.
        end: chrono::NaiveDateTime,
    },

    /// The cache-miss path found nothing valid upstream.
    #[error("no data available for symbol {0}")]
    NoDataForSymbol(Symbol),

    /// An upstream provider failure.
    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// A persistence layer failure.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Result type alias using [`WarehouseError`].
pub type Result<T> = std::result::Result<T, WarehouseError>;
