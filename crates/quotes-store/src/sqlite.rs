//! SQLite-backed store implementation.

use async_trait::async_trait;
use chrono::NaiveDateTime;
use quotes_core::{QuoteRecord, SeriesStore, StoreError, Symbol};
use rusqlite::{Connection, params};
use std::path::Path;
use std::sync::Mutex;
use tracing::{debug, instrument};

/// Fixed-width text format so lexicographic comparison in SQL is
/// chronological.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Persistent SQLite-backed series store.
///
/// Rows are keyed by a `(symbol, timestamp)` primary key; upserts use
/// `INSERT OR IGNORE` inside a single transaction, so a batch commits as a
/// unit and concurrent identical upserts cannot duplicate rows.
#[derive(Debug)]
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Opens (or creates) a store at the given path.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or schema creation
    /// fails.
    pub fn new(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let conn = Connection::open(path).map_err(|e| StoreError(e.to_string()))?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.initialize_schema()?;
        Ok(store)
    }

    /// Creates an in-memory store.
    ///
    /// Useful for testing; data is lost when the store is dropped.
    ///
    /// # Errors
    /// Returns an error if schema creation fails.
    pub fn in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory().map_err(|e| StoreError(e.to_string()))?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.initialize_schema()?;
        Ok(store)
    }

    fn initialize_schema(&self) -> Result<(), StoreError> {
        let conn = self.conn.lock().map_err(|e| StoreError(e.to_string()))?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS quotes (
                symbol TEXT NOT NULL,
                timestamp TEXT NOT NULL,
                open REAL NOT NULL,
                high REAL NOT NULL,
                low REAL NOT NULL,
                close REAL NOT NULL,
                volume REAL NOT NULL,
                PRIMARY KEY (symbol, timestamp)
            )",
            [],
        )
        .map_err(|e| StoreError(e.to_string()))?;

        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_quotes_symbol_timestamp
             ON quotes(symbol, timestamp)",
            [],
        )
        .map_err(|e| StoreError(e.to_string()))?;

        debug!("SQLite quote schema initialized");
        Ok(())
    }
}

#[async_trait]
impl SeriesStore for SqliteStore {
    #[instrument(skip(self, records), fields(count = records.len()))]
    async fn upsert_many(&self, records: &[QuoteRecord]) -> Result<usize, StoreError> {
        let conn = self.conn.lock().map_err(|e| StoreError(e.to_string()))?;
        let tx = conn
            .unchecked_transaction()
            .map_err(|e| StoreError(e.to_string()))?;

        let mut inserted = 0usize;
        for record in records {
            inserted += tx
                .execute(
                    "INSERT OR IGNORE INTO quotes
                     (symbol, timestamp, open, high, low, close, volume)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                    params![
                        record.symbol.as_str(),
                        record.timestamp.format(TIMESTAMP_FORMAT).to_string(),
                        record.open,
                        record.high,
                        record.low,
                        record.close,
                        record.volume,
                    ],
                )
                .map_err(|e| StoreError(e.to_string()))?;
        }

        tx.commit().map_err(|e| StoreError(e.to_string()))?;
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
        let conn = self.conn.lock().map_err(|e| StoreError(e.to_string()))?;

        let mut stmt = conn
            .prepare(
                "SELECT symbol, timestamp, open, high, low, close, volume
                 FROM quotes
                 WHERE symbol = ?1 AND timestamp >= ?2 AND timestamp <= ?3
                 ORDER BY timestamp ASC",
            )
            .map_err(|e| StoreError(e.to_string()))?;

        let rows = stmt
            .query_map(
                params![
                    symbol.as_str(),
                    start.format(TIMESTAMP_FORMAT).to_string(),
                    end.format(TIMESTAMP_FORMAT).to_string(),
                ],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, f64>(2)?,
                        row.get::<_, f64>(3)?,
                        row.get::<_, f64>(4)?,
                        row.get::<_, f64>(5)?,
                        row.get::<_, f64>(6)?,
                    ))
                },
            )
            .map_err(|e| StoreError(e.to_string()))?;

        let mut records = Vec::new();
        for row in rows {
            let (sym, stamp, open, high, low, close, volume) =
                row.map_err(|e| StoreError(e.to_string()))?;
            let timestamp = NaiveDateTime::parse_from_str(&stamp, TIMESTAMP_FORMAT)
                .map_err(|e| StoreError(format!("corrupt timestamp {stamp}: {e}")))?;
            records.push(QuoteRecord::new(
                Symbol::new(sym),
                timestamp,
                open,
                high,
                low,
                close,
                volume,
            ));
        }

        debug!(count = records.len(), "Range query served from SQLite");
        Ok(records)
    }
}
