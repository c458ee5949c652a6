//! Shared application state
//!
//! `AppState` bundles the quote collection, its category index and the
//! pending sync conflicts. It is shared between the coordinator and the sync
//! engine behind an async mutex.

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::categories::CategoryIndex;
use crate::models::{ConflictId, ConflictRecord};
use crate::storage::KeyValueStore;
use crate::store::QuoteStore;

/// State shared between the coordinator and the sync engine
pub type SharedState = Arc<Mutex<AppState>>;

/// Mutable application state
pub struct AppState {
    pub quotes: QuoteStore,
    pub categories: CategoryIndex,
    /// Conflicts raised by sync, oldest first
    pub conflicts: Vec<ConflictRecord>,
}

impl AppState {
    /// Load the collection from `storage` and index it
    pub fn load(storage: Arc<dyn KeyValueStore>) -> Self {
        let quotes = QuoteStore::load(storage.clone());
        let categories = CategoryIndex::new(&quotes, storage);
        Self {
            quotes,
            categories,
            conflicts: Vec::new(),
        }
    }

    /// Wrap into a `SharedState`
    pub fn into_shared(self) -> SharedState {
        Arc::new(Mutex::new(self))
    }

    /// Recompute the category index from the collection
    pub fn refresh_categories(&mut self) {
        self.categories.refresh(&self.quotes);
    }

    /// Queue a conflict and return it as queued
    ///
    /// A pending conflict for the same local text and server quote is
    /// replaced rather than duplicated, and the replacement keeps its id so
    /// earlier handles to it stay valid.
    pub fn push_conflict(&mut self, mut record: ConflictRecord) -> ConflictRecord {
        let duplicate = self
            .conflicts
            .iter()
            .position(|c| c.local.text == record.local.text && c.server == record.server);
        if let Some(position) = duplicate {
            record.id = self.conflicts.remove(position).id;
        }
        self.conflicts.push(record.clone());
        record
    }

    /// Remove and return the pending conflict with `id`
    pub fn take_conflict(&mut self, id: ConflictId) -> Option<ConflictRecord> {
        let position = self.conflicts.iter().position(|c| c.id == id)?;
        Some(self.conflicts.remove(position))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Quote;
    use crate::storage::MemoryStore;

    #[test]
    fn test_load_indexes_defaults() {
        let state = AppState::load(Arc::new(MemoryStore::new()));
        assert_eq!(state.quotes.len(), 3);
        assert_eq!(state.categories.categories().len(), 3);
        assert!(state.conflicts.is_empty());
    }

    #[test]
    fn test_push_conflict_replaces_duplicate_keeping_id() {
        let mut state = AppState::load(Arc::new(MemoryStore::new()));

        let first = ConflictRecord::new(Quote::new("A", "X"), Quote::new("A", "Y"), 0);
        let again = ConflictRecord::new(Quote::new("A", "X"), Quote::new("A", "Y"), 2);
        let other = ConflictRecord::new(Quote::new("A", "X"), Quote::new("A", "Z"), 0);
        let first_id = first.id;
        state.push_conflict(first);
        let queued = state.push_conflict(again);
        state.push_conflict(other);

        assert_eq!(queued.id, first_id);
        assert_eq!(queued.index, 2);
        assert_eq!(state.conflicts.len(), 2);
        assert_eq!(state.conflicts[0].id, first_id);
        assert_eq!(state.conflicts[0].index, 2);
    }

    #[test]
    fn test_take_conflict() {
        let mut state = AppState::load(Arc::new(MemoryStore::new()));
        let record = ConflictRecord::new(Quote::new("A", "X"), Quote::new("A", "Y"), 0);
        let id = record.id;
        state.push_conflict(record);

        assert!(state.take_conflict(id).is_some());
        assert!(state.take_conflict(id).is_none());
        assert!(state.conflicts.is_empty());
    }
}
