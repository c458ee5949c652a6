//! Application coordinator
//!
//! `App` wires the quote collection, the category index, the selector and the
//! sync engine together over one shared state. Front ends talk to `App`
//! rather than to the components directly.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tracing::{debug, info};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::models::{ConflictId, ConflictRecord, Filter, Quote, Resolution};
use crate::remote::{HttpRemote, RemoteSource};
use crate::selector::{Pick, Selector};
use crate::state::{AppState, SharedState};
use crate::storage::{FileStore, KeyValueStore};
use crate::sync::{ResolveOutcome, SyncEngine, SyncReport};
use crate::transfer;

/// The quote application
pub struct App<R = HttpRemote> {
    state: SharedState,
    selector: Selector,
    engine: SyncEngine<R>,
}

impl App<HttpRemote> {
    /// Open the application described by `config`
    ///
    /// Durable data lives under `data_dir`, the last viewed quote under
    /// `session_dir`.
    pub fn open(config: &Config) -> Result<Self> {
        let storage = Arc::new(FileStore::new(&config.data_dir));
        let session = Arc::new(FileStore::new(&config.session_dir));
        let remote = HttpRemote::from_config(config)?;
        debug!("Opening quotebook in {:?}", config.data_dir);
        Ok(Self::with_parts(
            storage,
            session,
            remote,
            config.exclusive_sync,
        ))
    }
}

impl<R: RemoteSource> App<R> {
    /// Build from explicit storage backends and remote
    pub fn with_parts(
        storage: Arc<dyn KeyValueStore>,
        session: Arc<dyn KeyValueStore>,
        remote: R,
        exclusive_sync: bool,
    ) -> Self {
        let state = AppState::load(storage).into_shared();
        let engine = SyncEngine::new(state.clone(), remote, exclusive_sync);
        Self {
            state,
            selector: Selector::new(session),
            engine,
        }
    }

    /// The sync engine
    pub fn engine(&self) -> &SyncEngine<R> {
        &self.engine
    }

    /// Add a quote and refresh the category index
    pub async fn add_quote(&self, text: &str, category: &str) -> Result<Quote> {
        let mut state = self.state.lock().await;
        let quote = state.quotes.add(text, category)?.clone();
        state.refresh_categories();
        info!("Added quote in category '{}'", quote.category);
        Ok(quote)
    }

    /// All quotes in collection order
    pub async fn quotes(&self) -> Vec<Quote> {
        self.state.lock().await.quotes.quotes().to_vec()
    }

    /// Quotes matching `filter` in collection order
    pub async fn quotes_in(&self, filter: &Filter) -> Vec<Quote> {
        let state = self.state.lock().await;
        state
            .quotes
            .quotes()
            .iter()
            .filter(|q| filter.matches(q))
            .cloned()
            .collect()
    }

    /// Pick a random quote under the persisted filter
    pub async fn show_random(&self) -> Result<Pick> {
        let state = self.state.lock().await;
        let filter = state.categories.get_filter();
        self.selector.pick(&state.quotes, &filter)
    }

    /// Pick a random quote under `filter`
    pub async fn show_random_in(&self, filter: &Filter) -> Result<Pick> {
        let state = self.state.lock().await;
        self.selector.pick(&state.quotes, filter)
    }

    /// The quote shown last in this session, if any
    pub fn last_viewed(&self) -> Option<Quote> {
        self.selector.restore_last_viewed()
    }

    /// Distinct categories, sorted
    pub async fn categories(&self) -> Vec<String> {
        self.state.lock().await.categories.categories()
    }

    /// Filter choices: `all` followed by the categories
    pub async fn category_choices(&self) -> Vec<String> {
        self.state.lock().await.categories.choices()
    }

    /// Persist the category filter
    pub async fn set_filter(&self, value: &str) -> Result<Filter> {
        self.state.lock().await.categories.set_filter(value)
    }

    /// The persisted category filter
    pub async fn filter(&self) -> Filter {
        self.state.lock().await.categories.get_filter()
    }

    /// The collection as pretty-printed JSON
    pub async fn export_json(&self) -> Result<String> {
        transfer::export_all(&self.state.lock().await.quotes)
    }

    /// Write `quotes.json` into `dir`
    pub async fn export_to_dir(&self, dir: &Path) -> Result<PathBuf> {
        transfer::export_to_dir(&self.state.lock().await.quotes, dir)
    }

    /// Merge a JSON array of quotes into the collection
    pub async fn import_json(&self, raw: &str) -> Result<usize> {
        let mut state = self.state.lock().await;
        let count = transfer::import_merge(&mut state.quotes, raw)?;
        state.refresh_categories();
        Ok(count)
    }

    /// Merge the quotes stored in the file at `path`
    pub async fn import_file(&self, path: &Path) -> Result<usize> {
        let mut state = self.state.lock().await;
        let count = transfer::import_from_path(&mut state.quotes, path)?;
        state.refresh_categories();
        Ok(count)
    }

    /// Run one sync
    pub async fn sync(&self) -> Result<SyncReport> {
        self.engine.sync_once().await
    }

    /// Conflicts awaiting a decision
    pub async fn pending_conflicts(&self) -> Vec<ConflictRecord> {
        self.engine.pending_conflicts().await
    }

    /// Settle a pending conflict
    pub async fn resolve(&self, id: ConflictId, resolution: Resolution) -> Result<ResolveOutcome> {
        self.engine.resolve_conflict(id, resolution).await
    }

    /// Settle every pending conflict the same way
    pub async fn resolve_all(&self, resolution: Resolution) -> Result<Vec<ResolveOutcome>> {
        let mut outcomes = Vec::new();
        for conflict in self.pending_conflicts().await {
            match self.resolve(conflict.id, resolution).await {
                Ok(outcome) => outcomes.push(outcome),
                // Another caller settled it first
                Err(Error::ConflictNotFound(_)) => continue,
                Err(e) => return Err(e),
            }
        }
        Ok(outcomes)
    }

    /// Start or stop periodic syncing
    pub fn set_auto_sync(&self, enabled: bool, interval: Duration) {
        self.engine.set_auto_sync(enabled, interval);
    }

    /// Send a quote to the remote without storing it locally
    pub async fn post_quote(&self, quote: &Quote) -> Result<Value> {
        self.engine.post_local_quote(quote).await
    }
}

impl<R> App<R> {
    /// Stop background work
    pub fn shutdown(&self) {
        self.engine.stop_auto_sync();
    }
}

impl<R> Drop for App<R> {
    fn drop(&mut self) {
        self.shutdown();
    }
}
