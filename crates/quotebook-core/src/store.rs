//! Quote collection storage
//!
//! The `QuoteStore` owns the in-memory quote collection and writes it back
//! to the persistent key-value store after every mutation.
//!
//! ## Usage
//!
//! ```ignore
//! let mut store = QuoteStore::load(Arc::new(FileStore::new(&config.data_dir)));
//!
//! store.add("Stay hungry.", "Motivation")?;
//! let quotes = store.quotes();
//! ```

use std::sync::Arc;

use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::models::{default_quotes, Quote};
use crate::storage::{KeyValueStore, QUOTES_KEY};

/// Owner of the quote collection
pub struct QuoteStore {
    /// The collection, in insertion order
    quotes: Vec<Quote>,
    /// Durable backing store
    storage: Arc<dyn KeyValueStore>,
}

impl QuoteStore {
    /// Load the collection from storage
    ///
    /// Falls back to the built-in default quotes when nothing is stored, the
    /// stored value is not a valid quote array, or storage cannot be read.
    pub fn load(storage: Arc<dyn KeyValueStore>) -> Self {
        let quotes = match storage.get(QUOTES_KEY) {
            Ok(Some(raw)) => match serde_json::from_str::<Vec<Quote>>(&raw) {
                Ok(quotes) => {
                    debug!("Loaded {} quotes from storage", quotes.len());
                    quotes
                }
                Err(e) => {
                    warn!("Stored quotes are invalid, using defaults: {}", e);
                    default_quotes()
                }
            },
            Ok(None) => {
                debug!("No stored quotes, using defaults");
                default_quotes()
            }
            Err(e) => {
                warn!("Failed to read stored quotes, using defaults: {}", e);
                default_quotes()
            }
        };

        Self { quotes, storage }
    }

    /// Add a manually entered quote
    ///
    /// Both values are trimmed; either being empty afterwards is a
    /// validation error and leaves the collection untouched.
    pub fn add(&mut self, text: &str, category: &str) -> Result<&Quote> {
        let text = text.trim();
        let category = category.trim();
        if text.is_empty() || category.is_empty() {
            return Err(Error::Validation);
        }

        self.quotes.push(Quote::new(text, category));
        if let Err(e) = self.save() {
            self.quotes.pop();
            return Err(e);
        }

        let index = self.quotes.len() - 1;
        Ok(&self.quotes[index])
    }

    /// Persist the collection
    pub fn save(&self) -> Result<()> {
        let json = serde_json::to_string(&self.quotes)?;
        self.storage.set(QUOTES_KEY, &json)?;
        debug!("Saved {} quotes", self.quotes.len());
        Ok(())
    }

    /// Overwrite the quote at `index`
    ///
    /// The old quote is put back if the collection cannot be saved.
    pub fn replace_at(&mut self, index: usize, quote: Quote) -> Result<()> {
        let len = self.quotes.len();
        let slot = self.quotes.get_mut(index).ok_or(Error::Index { index, len })?;
        let previous = std::mem::replace(slot, quote);
        if let Err(e) = self.save() {
            self.quotes[index] = previous;
            return Err(e);
        }
        Ok(())
    }

    /// Append quotes from an external source, without validation or dedup
    ///
    /// Returns the number of quotes appended. Nothing is kept if the
    /// collection cannot be saved.
    pub fn merge_append(&mut self, quotes: Vec<Quote>) -> Result<usize> {
        let count = quotes.len();
        let old_len = self.quotes.len();
        self.quotes.extend(quotes);
        if let Err(e) = self.save() {
            self.truncate_unsaved(old_len);
            return Err(e);
        }
        Ok(count)
    }

    /// Append one quote without persisting
    ///
    /// Callers batching several changes must call `save()` afterwards.
    pub(crate) fn append_unsaved(&mut self, quote: Quote) {
        self.quotes.push(quote);
    }

    /// Drop quotes appended after the first `len`, without persisting
    pub(crate) fn truncate_unsaved(&mut self, len: usize) {
        self.quotes.truncate(len);
    }

    /// All quotes in insertion order
    pub fn quotes(&self) -> &[Quote] {
        &self.quotes
    }

    /// Quote at `index`, if any
    pub fn get(&self, index: usize) -> Option<&Quote> {
        self.quotes.get(index)
    }

    /// Position of the first quote whose text equals `text`
    pub fn position_of_text(&self, text: &str) -> Option<usize> {
        self.quotes.iter().position(|q| q.text == text)
    }

    pub fn len(&self) -> usize {
        self.quotes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quotes.is_empty()
    }
}
