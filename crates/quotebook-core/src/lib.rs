//! Quotebook Core Library
//!
//! This crate provides the core functionality for Quotebook, a small
//! categorized quote collection with random display, JSON import/export and
//! synchronization against a remote quote source.
//!
//! # Architecture
//!
//! - **QuoteStore**: the ordered collection, persisted under `"quotes"`
//! - **CategoryIndex**: distinct categories plus the persisted filter
//! - **Selector**: uniform random pick, remembered per session
//! - **SyncEngine**: fetch, append unknown texts, raise conflicts for known ones
//!
//! Components share one `AppState` behind an async mutex; `App` ties them
//! together for front ends.
//!
//! # Quick Start
//!
//! ```text
//! let app = App::open(&Config::load()?)?;
//!
//! app.add_quote("Stay hungry.", "Motivation").await?;
//! if let Pick::Quote(quote) = app.show_random().await? {
//!     println!("{}", quote);
//! }
//!
//! let report = app.sync().await?;
//! app.resolve_all(Resolution::KeepLocal).await?;
//! ```
//!
//! # Modules
//!
//! - `app`: Application coordinator (main entry point)
//! - `store`: Quote collection
//! - `categories`: Category index and filter
//! - `selector`: Random quote selection
//! - `transfer`: JSON import and export
//! - `remote`: Remote quote source
//! - `sync`: Sync engine and auto-sync timer
//! - `storage`: Key-value persistence
//! - `config`: Application configuration

pub mod app;
pub mod categories;
pub mod config;
pub mod error;
pub mod models;
pub mod remote;
pub mod selector;
pub mod state;
pub mod storage;
pub mod store;
pub mod sync;
pub mod transfer;

pub use app::App;
pub use categories::CategoryIndex;
pub use config::Config;
pub use error::{Error, Result};
pub use models::{ConflictId, ConflictRecord, Filter, Quote, Resolution, ALL_CATEGORIES};
pub use remote::{HttpRemote, RemoteSource};
pub use selector::{Pick, Selector};
pub use state::{AppState, SharedState};
pub use storage::{FileStore, KeyValueStore, MemoryStore, StorageError};
pub use store::QuoteStore;
pub use sync::{ResolveOutcome, SyncEngine, SyncEvent, SyncReport, SyncStatus};
