//! store.rs — in-memory collection of scored trends, keyed by name.
//!
//! Stand-in for the hosted table the dashboard upserts into: same-name
//! writes overwrite the previous record wholesale, first-insertion order is
//! preserved so views have a deterministic tie-break, and records are never
//! deleted, only superseded.

use std::sync::Mutex;

use crate::model::TrendScored;

#[derive(Debug, Default)]
pub struct TrendStore {
    inner: Mutex<Vec<TrendScored>>,
}

impl TrendStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace by `name`. Replacement keeps the record's original
    /// position; new names append.
    pub fn upsert(&self, record: TrendScored) {
        let mut v = self.inner.lock().expect("trend store mutex poisoned");
        match v.iter_mut().find(|t| t.name == record.name) {
            Some(slot) => *slot = record,
            None => v.push(record),
        }
    }

    /// Upsert a whole scored batch in input order.
    pub fn upsert_all(&self, records: Vec<TrendScored>) {
        for r in records {
            self.upsert(r);
        }
    }

    /// Clone of the current contents, in first-insertion order.
    pub fn snapshot(&self) -> Vec<TrendScored> {
        self.inner.lock().expect("trend store mutex poisoned").clone()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().expect("trend store mutex poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
