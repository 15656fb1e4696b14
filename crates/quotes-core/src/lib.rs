#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/quotestore/quotes/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Core traits and types for the cached quote warehouse.
//!
//! This crate provides the foundational abstractions the rest of the
//! workspace builds on:
//!
//! - [`QuoteRecord`](types::QuoteRecord) - one time bucket of OHLCV data
//! - [`Symbol`](types::Symbol) - normalized ticker symbol
//! - [`QuoteProvider`](provider::QuoteProvider) - upstream quote source
//! - [`SeriesStore`](store::SeriesStore) - keyed persistence for quote series
//! - [`WarehouseError`](error::WarehouseError) - error taxonomy

/// Error types for warehouse operations.
pub mod error;
/// Provider trait for fetching quote series.
pub mod provider;
/// Store trait for persisting quote series.
pub mod store;
/// Core data types (Symbol, QuoteRecord, OutputSize).
pub mod types;

// Re-export commonly used items at crate root
pub use error::{ProviderError, Result, StoreError, WarehouseError};
pub use provider::QuoteProvider;
pub use store::SeriesStore;
pub use types::{OutputSize, QuoteRecord, Symbol};
