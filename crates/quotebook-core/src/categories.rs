//! Category index and filter selection

use std::collections::BTreeSet;
use std::sync::Arc;

use tracing::warn;

use crate::error::Result;
use crate::models::{Filter, ALL_CATEGORIES};
use crate::storage::{KeyValueStore, SELECTED_CATEGORY_KEY};
use crate::store::QuoteStore;

/// Distinct categories of the collection plus the persisted filter
pub struct CategoryIndex {
    categories: BTreeSet<String>,
    storage: Arc<dyn KeyValueStore>,
}

impl CategoryIndex {
    /// Build the index for `quotes`, persisting the filter in `storage`
    pub fn new(quotes: &QuoteStore, storage: Arc<dyn KeyValueStore>) -> Self {
        let mut index = Self {
            categories: BTreeSet::new(),
            storage,
        };
        index.refresh(quotes);
        index
    }

    /// Recompute the category set after the collection changed
    pub fn refresh(&mut self, quotes: &QuoteStore) {
        self.categories = quotes
            .quotes()
            .iter()
            .map(|q| q.category.clone())
            .collect();
    }

    /// Distinct categories, sorted
    pub fn categories(&self) -> Vec<String> {
        self.categories.iter().cloned().collect()
    }

    /// Filter choices as offered to the user: `"all"` followed by each category
    pub fn choices(&self) -> Vec<String> {
        std::iter::once(ALL_CATEGORIES.to_string())
            .chain(self.categories.iter().cloned())
            .collect()
    }

    pub fn contains(&self, category: &str) -> bool {
        self.categories.contains(category)
    }

    /// Persist the selected filter
    ///
    /// Any value is accepted, including categories not present in the
    /// collection.
    pub fn set_filter(&self, value: &str) -> Result<Filter> {
        self.storage.set(SELECTED_CATEGORY_KEY, value)?;
        Ok(Filter::parse(value))
    }

    /// The persisted filter, or `Filter::All` when none is stored
    pub fn get_filter(&self) -> Filter {
        match self.storage.get(SELECTED_CATEGORY_KEY) {
            Ok(Some(value)) => Filter::parse(&value),
            Ok(None) => Filter::All,
            Err(e) => {
                warn!("Failed to read selected category: {}", e);
                Filter::All
            }
        }
    }
}
