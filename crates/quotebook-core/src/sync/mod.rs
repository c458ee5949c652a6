//! Remote synchronization
//!
//! Reconciles the local quote collection with a remote quote source.
//!
//! ## Protocol
//!
//! 1. Fetch the remote quote set
//! 2. Remote quotes whose text is unknown locally are appended
//! 3. Remote quotes whose text matches a local quote become conflicts,
//!    left pending until the user keeps the local or the server version
//! 4. Persist and refresh the category index
//!
//! ## Usage
//!
//! ```ignore
//! let engine = SyncEngine::new(state, HttpRemote::from_config(&config)?, false);
//! let report = engine.sync_once().await?;
//! for conflict in report.conflicts {
//!     engine.resolve_conflict(conflict.id, Resolution::KeepServer).await?;
//! }
//! ```

mod auto;
mod engine;

pub use engine::{
    apply_remote, resolve_record, ResolveOutcome, SyncEngine, SyncEvent, SyncReport, SyncStatus,
    MSG_FAILED, MSG_SYNCED, MSG_SYNCING,
};
