//! Store trait for persisting quote series.

use async_trait::async_trait;
use chrono::NaiveDateTime;
use std::fmt::Debug;

use crate::error::StoreError;
use crate::types::{QuoteRecord, Symbol};

/// Keyed persistence for quote series.
///
/// Records are keyed by `(symbol, timestamp)`. Implementations must make
/// [`upsert_many`](Self::upsert_many) safe under concurrent callers writing
/// the same keys: identical concurrent upserts must not create duplicate
/// rows or race-introduced gaps.
#[async_trait]
pub trait SeriesStore: Send + Sync + Debug {
    /// Inserts records, ignoring any whose `(symbol, timestamp)` key already
    /// exists.
    ///
    /// The batch commits as a unit: either all records are durably stored or
    /// none are. Returns the number of rows actually inserted, which may be
    /// less than `records.len()` when keys already existed.
    async fn upsert_many(&self, records: &[QuoteRecord]) -> Result<usize, StoreError>;

    /// Returns records for `symbol` with `start <= timestamp <= end`,
    /// ascending by timestamp. Both bounds are inclusive; an empty vec means
    /// no match.
    async fn range_query(
        &self,
        symbol: &Symbol,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<Vec<QuoteRecord>, StoreError>;
}
