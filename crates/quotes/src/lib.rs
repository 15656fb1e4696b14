#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/quotestore/quotes/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Cached OHLCV quote warehouse.
//!
//! This crate re-exports the core types and the provider/store
//! implementations, and provides the [`Warehouse`] orchestrator that decides
//! cache-hit vs. cache-miss per request.
//!
//! # Features
//!
//! - `alphavantage` - Alpha Vantage quote provider (default)
//! - `store-sqlite` - SQLite-backed series store (default)

// Core types and traits
pub use quotes_core::*;

// Store implementations
pub use quotes_store::MemoryStore;
#[cfg(feature = "store-sqlite")]
pub use quotes_store::SqliteStore;

// Providers
#[cfg(feature = "alphavantage")]
pub use quotes_alphavantage::AlphaVantage;

mod warehouse;
pub use warehouse::Warehouse;
