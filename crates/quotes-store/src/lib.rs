#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/quotestore/quotes/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Series store implementations for the cached quote warehouse.
//!
//! This crate provides implementations of the [`SeriesStore`] trait from
//! `quotes-core`:
//!
//! - [`SqliteStore`] - Persistent SQLite-backed store (default, requires the `sqlite` feature)
//! - [`MemoryStore`] - Simple in-memory store for testing

/// In-memory store implementation.
pub mod memory;

/// SQLite-backed store implementation.
#[cfg(feature = "sqlite")]
pub mod sqlite;

// Re-export the trait for convenience
pub use quotes_core::SeriesStore;

// Re-export implementations
pub use memory::MemoryStore;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteStore;
