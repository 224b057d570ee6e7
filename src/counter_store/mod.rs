mod in_memory_counter_store;
mod sqlite_counter_store;
mod versioned_schema;

pub use in_memory_counter_store::InMemoryCounterStore;
pub use sqlite_counter_store::SqliteCounterStore;

use std::collections::HashMap;
use thiserror::Error;

/// Any failure talking to the backing store. There is no finer taxonomy on
/// purpose: every store failure is an infrastructure condition and maps to
/// the same retry-later response at the HTTP boundary.
#[derive(Debug, Error)]
#[error("counter store unavailable: {0}")]
pub struct StoreError(pub String);

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        StoreError(err.to_string())
    }
}

/// A single mutation inside an atomic batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreWrite {
    /// Add `delta` to `table[field]`, creating the counter at zero first if
    /// it does not exist yet.
    Increment {
        table: String,
        field: String,
        delta: u64,
    },
    /// Insert a raw entry. An existing entry under the same field is kept
    /// untouched, so a colliding append can never overwrite history.
    Append {
        table: String,
        field: String,
        value: String,
    },
}

impl StoreWrite {
    pub fn increment(table: impl Into<String>, field: impl Into<String>) -> StoreWrite {
        StoreWrite::Increment {
            table: table.into(),
            field: field.into(),
            delta: 1,
        }
    }

    pub fn append(
        table: impl Into<String>,
        field: impl Into<String>,
        value: impl Into<String>,
    ) -> StoreWrite {
        StoreWrite::Append {
            table: table.into(),
            field: field.into(),
            value: value.into(),
        }
    }
}

/// Narrow interface over the store of named counter tables backing all
/// analytics state. Writes are increments and appends only; nothing ever
/// reads a counter back before writing, which is what makes concurrent
/// ingestion safe without any application-level locking.
pub trait CounterStore: Send + Sync {
    /// Applies all writes in one atomic batch, all-or-nothing.
    fn apply(&self, batch: &[StoreWrite]) -> Result<(), StoreError>;

    /// Reads a whole counter table. Missing tables read as empty.
    fn read_counters(&self, table: &str) -> Result<HashMap<String, u64>, StoreError>;

    /// Reads a whole raw-entry table (appended values, e.g. the diagnostic
    /// log). Missing tables read as empty.
    fn read_entries(&self, table: &str) -> Result<HashMap<String, String>, StoreError>;

    /// Lists the names of all counter tables starting with `prefix`.
    fn list_tables(&self, prefix: &str) -> Result<Vec<String>, StoreError>;

    /// Deletes all but the `keep` lexicographically greatest entries of a
    /// raw-entry table, returning how many were removed.
    fn prune_entries(&self, table: &str, keep: usize) -> Result<usize, StoreError>;
}
