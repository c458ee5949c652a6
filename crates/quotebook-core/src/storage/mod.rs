//! Storage layer
//!
//! String key-value stores backing the quote collection.
//!
//! - **FileStore**: one file per key under a directory, written atomically.
//!   Used for the durable store (`data_dir`) and for the CLI's per-session
//!   store (`session_dir`).
//! - **MemoryStore**: process-local map, used for tests and embedding.

pub mod error;
pub mod file;
pub mod memory;

pub use error::{StorageError, StorageResult};
pub use file::FileStore;
pub use memory::MemoryStore;

/// Key under which the quote collection is persisted
pub const QUOTES_KEY: &str = "quotes";
/// Key under which the selected category filter is persisted
pub const SELECTED_CATEGORY_KEY: &str = "selectedCategory";
/// Session key holding the last displayed quote
pub const LAST_VIEWED_KEY: &str = "lastViewedQuote";

/// A string key-value store
///
/// Reads of absent keys return `Ok(None)`; errors are reserved for
/// backend failures.
pub trait KeyValueStore: Send + Sync {
    /// Get the value stored under `key`
    fn get(&self, key: &str) -> StorageResult<Option<String>>;

    /// Store `value` under `key`, replacing any previous value
    fn set(&self, key: &str, value: &str) -> StorageResult<()>;
}
