//! In-memory store implementation.

use async_trait::async_trait;
use chrono::NaiveDateTime;
use quotes_core::{QuoteRecord, SeriesStore, StoreError, Symbol};
use std::collections::BTreeMap;
use tokio::sync::RwLock;
use tracing::{debug, instrument};

/// Key ordering gives us chronological range scans per symbol for free.
type SeriesKey = (String, NaiveDateTime);

/// Simple in-memory store for testing and development.
///
/// Records live in an `RwLock`-protected `BTreeMap` keyed by
/// `(symbol, timestamp)` and are lost when the store is dropped. A whole
/// upsert batch is applied under one write lock, so concurrent identical
/// upserts cannot interleave partial batches.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: RwLock<BTreeMap<SeriesKey, QuoteRecord>>,
}

impl MemoryStore {
    /// Creates a new empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the total number of stored records across all symbols.
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    /// Returns true if no records are stored.
    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl SeriesStore for MemoryStore {
    #[instrument(skip(self, records), fields(count = records.len()))]
    async fn upsert_many(&self, records: &[QuoteRecord]) -> Result<usize, StoreError> {
        let mut map = self.records.write().await;

        let mut inserted = 0usize;
        for record in records {
            let key = (record.symbol.as_str().to_string(), record.timestamp);
            map.entry(key).or_insert_with(|| {
                inserted += 1;
                record.clone()
            });
        }

        debug!(inserted, "Upserted quote records");
        Ok(inserted)
    }

    #[instrument(skip(self), fields(symbol = %symbol))]
    async fn range_query(
        &self,
        symbol: &Symbol,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<Vec<QuoteRecord>, StoreError> {
        if start > end {
            return Ok(Vec::new());
        }

        let map = self.records.read().await;
        let lo = (symbol.as_str().to_string(), start);
        let hi = (symbol.as_str().to_string(), end);

        let records: Vec<QuoteRecord> = map.range(lo..=hi).map(|(_, r)| r.clone()).collect();

        debug!(count = records.len(), "Range query served from memory");
        Ok(records)
    }
}
