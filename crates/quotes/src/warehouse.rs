//! Cache-or-fetch orchestration over a provider and a series store.

use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime, Utc};
use tracing::{debug, warn};

use quotes_core::{
    OutputSize, QuoteProvider, QuoteRecord, Result, SeriesStore, Symbol, WarehouseError,
};

/// Default range floor when the caller omits `start`.
fn epoch_floor() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2000, 1, 1)
        .unwrap_or(NaiveDate::MIN)
        .and_hms_opt(0, 0, 0)
        .unwrap_or(NaiveDateTime::MIN)
}

/// Orchestrator for cached quote series.
///
/// Holds a [`QuoteProvider`] and a [`SeriesStore`] and decides per request
/// whether locally stored data satisfies it. On a miss it fetches upstream,
/// persists the normalized records, and answers from the freshly fetched set
/// without a second store round trip.
///
/// Known limitation: a cache hit is "the store returned at least one record
/// in range" with no freshness check against wall-clock time. Staleness is
/// only resolved via an explicit [`refresh`](Self::refresh).
///
/// # Example
///
/// ```rust,ignore
/// use std::sync::Arc;
/// use quotes::{AlphaVantage, SqliteStore, Warehouse};
///
/// let warehouse = Warehouse::new(
///     Arc::new(AlphaVantage::new("your_api_key")),
///     Arc::new(SqliteStore::new("quotes.db")?),
/// );
///
/// let series = warehouse.get_series(&"AAPL".into(), None, None).await?;
/// ```
pub struct Warehouse {
    provider: Arc<dyn QuoteProvider>,
    store: Arc<dyn SeriesStore>,
}

impl std::fmt::Debug for Warehouse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Warehouse")
            .field("provider", &self.provider.name())
            .finish_non_exhaustive()
    }
}

impl Warehouse {
    /// Creates a warehouse over the given provider and store.
    #[must_use]
    pub fn new(provider: Arc<dyn QuoteProvider>, store: Arc<dyn SeriesStore>) -> Self {
        Self { provider, store }
    }

    /// Returns the quote series for `symbol` within `[start, end]`
    /// (inclusive), ascending by timestamp.
    ///
    /// `start` defaults to 2000-01-01 and `end` to now (UTC) when omitted.
    /// A non-empty store result is authoritative and returned without a
    /// provider call; an empty one triggers one upstream fetch whose records
    /// are persisted before the call returns.
    ///
    /// # Errors
    ///
    /// [`WarehouseError::InvalidRange`] when `start > end`,
    /// [`WarehouseError::NoDataForSymbol`] when the miss path found nothing
    /// valid upstream, and provider/store failures propagated undecorated.
    pub async fn get_series(
        &self,
        symbol: &Symbol,
        start: Option<NaiveDateTime>,
        end: Option<NaiveDateTime>,
    ) -> Result<Vec<QuoteRecord>> {
        let start = start.unwrap_or_else(epoch_floor);
        let end = end.unwrap_or_else(|| Utc::now().naive_utc());
        if start > end {
            return Err(WarehouseError::InvalidRange { start, end });
        }

        let cached = self.store.range_query(symbol, start, end).await?;
        if !cached.is_empty() {
            debug!(symbol = %symbol, count = cached.len(), "Cache hit for quote series");
            return Ok(cached);
        }

        debug!(symbol = %symbol, provider = self.provider.name(), "Cache miss, fetching upstream");
        let fetched = self.provider.fetch(symbol, OutputSize::Compact).await?;
        if fetched.is_empty() {
            // Provider contract already forbids this; never cache it as complete.
            warn!(symbol = %symbol, "Provider returned an empty series");
            return Err(WarehouseError::NoDataForSymbol(symbol.clone()));
        }

        // Commit before answering so a success is always durably queryable.
        self.store.upsert_many(&fetched).await?;

        // Answer from the fetched set to avoid a second store round trip.
        let records: Vec<QuoteRecord> = fetched
            .into_iter()
            .filter(|r| r.timestamp >= start && r.timestamp <= end)
            .collect();

        debug!(symbol = %symbol, count = records.len(), "Serving freshly fetched series");
        Ok(records)
    }

    /// Unconditionally re-fetches `symbol` from the provider and persists
    /// the result, bypassing the cache-hit check. This is the explicit
    /// invalidation mechanism; there is no time-based expiry.
    ///
    /// Returns the number of records ingested (post-validation, pre-dedup).
    ///
    /// # Errors
    ///
    /// Provider and store failures propagate undecorated.
    pub async fn refresh(&self, symbol: &Symbol) -> Result<usize> {
        debug!(symbol = %symbol, provider = self.provider.name(), "Refreshing quote series");
        let fetched = self.provider.fetch(symbol, OutputSize::Compact).await?;
        let count = fetched.len();

        let inserted = self.store.upsert_many(&fetched).await?;
        debug!(symbol = %symbol, fetched = count, inserted, "Refresh complete");
        Ok(count)
    }
}
