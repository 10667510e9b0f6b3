//! In-memory note index
//!
//! Maps vault-relative paths to shared [`NoteRecord`]s. Writers take the lock
//! for the length of a single map operation, so readers only ever observe a
//! record fully old or fully new.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

use super::record::NoteRecord;

#[derive(Debug, Default)]
pub struct NoteIndex {
    records: RwLock<HashMap<String, Arc<NoteRecord>>>,
}

impl NoteIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the record stored at `record.path`
    pub fn upsert(&self, record: NoteRecord) {
        let record = Arc::new(record);
        self.records.write().insert(record.path.clone(), record);
    }

    /// Remove the record at `path`. Returns whether one was present.
    pub fn remove(&self, path: &str) -> bool {
        self.records.write().remove(path).is_some()
    }

    pub fn get(&self, path: &str) -> Option<Arc<NoteRecord>> {
        self.records.read().get(path).cloned()
    }

    /// Snapshot of every record, taken under one read lock.
    ///
    /// The returned iterator owns its data; later mutations do not affect it.
    pub fn all_records(&self) -> impl Iterator<Item = Arc<NoteRecord>> {
        let snapshot: Vec<Arc<NoteRecord>> = self.records.read().values().cloned().collect();
        snapshot.into_iter()
    }

    /// Paths currently indexed
    pub fn paths(&self) -> Vec<String> {
        self.records.read().keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }
}
