use super::{CounterStore, StoreError, StoreWrite};
use std::collections::HashMap;
use std::sync::Mutex;

/// Hash-map implementation of the counter store, used by tests.
#[derive(Default)]
pub struct InMemoryCounterStore {
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    counters: HashMap<String, HashMap<String, u64>>,
    entries: HashMap<String, HashMap<String, String>>,
}

impl CounterStore for InMemoryCounterStore {
    fn apply(&self, batch: &[StoreWrite]) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().unwrap();
        for write in batch {
            match write {
                StoreWrite::Increment { table, field, delta } => {
                    *inner
                        .counters
                        .entry(table.clone())
                        .or_default()
                        .entry(field.clone())
                        .or_insert(0) += delta;
                }
                StoreWrite::Append { table, field, value } => {
                    inner
                        .entries
                        .entry(table.clone())
                        .or_default()
                        .entry(field.clone())
                        .or_insert_with(|| value.clone());
                }
            }
        }
        Ok(())
    }

    fn read_counters(&self, table: &str) -> Result<HashMap<String, u64>, StoreError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.counters.get(table).cloned().unwrap_or_default())
    }

    fn read_entries(&self, table: &str) -> Result<HashMap<String, String>, StoreError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.entries.get(table).cloned().unwrap_or_default())
    }

    fn list_tables(&self, prefix: &str) -> Result<Vec<String>, StoreError> {
        let inner = self.inner.lock().unwrap();
        let mut tables: Vec<String> = inner
            .counters
            .keys()
            .filter(|name| name.starts_with(prefix))
            .cloned()
            .collect();
        tables.sort();
        Ok(tables)
    }

    fn prune_entries(&self, table: &str, keep: usize) -> Result<usize, StoreError> {
        let mut inner = self.inner.lock().unwrap();
        let Some(entries) = inner.entries.get_mut(table) else {
            return Ok(0);
        };
        if entries.len() <= keep {
            return Ok(0);
        }
        let mut fields: Vec<String> = entries.keys().cloned().collect();
        fields.sort();
        fields.reverse();
        let doomed = fields.split_off(keep);
        for field in &doomed {
            entries.remove(field);
        }
        Ok(doomed.len())
    }
}
