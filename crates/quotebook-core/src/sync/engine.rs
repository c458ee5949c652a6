//! Sync engine implementation

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde_json::Value;
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::auto::auto_sync_loop;
use crate::error::{Error, Result};
use crate::models::{ConflictId, ConflictRecord, Quote, Resolution};
use crate::remote::RemoteSource;
use crate::state::{AppState, SharedState};

/// Status text announced when a sync starts
pub const MSG_SYNCING: &str = "Syncing...";
/// Status text announced when a sync succeeds
pub const MSG_SYNCED: &str = "Quotes synced with server!";
/// Status text announced when a sync fails
pub const MSG_FAILED: &str = "Sync Failed!";

/// Event channel capacity; slow subscribers miss older events
const EVENT_CAPACITY: usize = 64;

/// Engine status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncStatus {
    /// No sync running
    Idle,
    /// Fetching or applying remote quotes
    Syncing,
    /// The last sync failed; reported, then back to `Idle`
    Failed,
}

/// Events emitted by the sync engine
#[derive(Debug, Clone)]
pub enum SyncEvent {
    /// Status changed
    StatusChanged(SyncStatus),
    /// User-facing status text
    Message(String),
    /// A remote quote matched a local one
    ConflictRaised(ConflictRecord),
    /// The collection changed (categories were refreshed)
    QuotesChanged,
    /// Error occurred
    Error(String),
}

/// Summary of one completed sync
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncReport {
    /// Number of remote quotes received
    pub fetched: usize,
    /// Number of remote quotes appended locally
    pub added: usize,
    /// Conflicts raised by this sync
    pub conflicts: Vec<ConflictRecord>,
    pub finished_at: DateTime<Utc>,
}

/// Result of resolving a conflict
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolveOutcome {
    /// The local quote was kept
    KeptLocal,
    /// The local quote at `index` was replaced by the server quote
    Replaced { index: usize },
    /// The local quote no longer exists; the conflict was dropped
    Stale,
}

/// Merge a fetched remote quote set into `state`
///
/// Unknown texts are appended; known texts raise a conflict and leave the
/// local quote untouched. Quotes appended earlier in the same batch count as
/// known. The collection is persisted once at the end and the category index
/// refreshed. If saving fails nothing is appended and no conflict is queued.
pub fn apply_remote(state: &mut AppState, remote: Vec<Quote>) -> Result<SyncReport> {
    let fetched = remote.len();
    let old_len = state.quotes.len();
    let mut raised = Vec::new();

    for server in remote {
        match state.quotes.position_of_text(&server.text) {
            Some(index) => {
                let local = state.quotes.quotes()[index].clone();
                raised.push(ConflictRecord::new(local, server, index));
            }
            None => state.quotes.append_unsaved(server),
        }
    }

    if let Err(e) = state.quotes.save() {
        state.quotes.truncate_unsaved(old_len);
        return Err(e);
    }
    state.refresh_categories();

    let conflicts: Vec<ConflictRecord> = raised
        .into_iter()
        .map(|record| state.push_conflict(record))
        .collect();
    for record in &conflicts {
        debug!("Conflict on quote {} ({})", record.index, record.id);
    }

    Ok(SyncReport {
        fetched,
        added: state.quotes.len() - old_len,
        conflicts,
        finished_at: Utc::now(),
    })
}

/// Settle a conflict that has already been removed from the pending list
///
/// Keeping the server version re-locates the local quote by its text: the
/// recorded index is used while it still holds that text, otherwise the
/// first quote with that text. If the text is gone the outcome is `Stale`
/// and nothing changes.
pub fn resolve_record(
    state: &mut AppState,
    record: ConflictRecord,
    resolution: Resolution,
) -> Result<ResolveOutcome> {
    match resolution {
        Resolution::KeepLocal => Ok(ResolveOutcome::KeptLocal),
        Resolution::KeepServer => {
            let still_in_place = state
                .quotes
                .get(record.index)
                .is_some_and(|q| q.text == record.local.text);
            let index = if still_in_place {
                Some(record.index)
            } else {
                state.quotes.position_of_text(&record.local.text)
            };

            let Some(index) = index else {
                warn!(
                    "Conflict {} is stale: local quote no longer exists",
                    record.id
                );
                return Ok(ResolveOutcome::Stale);
            };

            state.quotes.replace_at(index, record.server)?;
            state.refresh_categories();
            Ok(ResolveOutcome::Replaced { index })
        }
    }
}

/// Releases the in-flight flag when a sync ends
struct InFlight<'a>(&'a AtomicBool);

impl<'a> InFlight<'a> {
    fn acquire(flag: &'a AtomicBool) -> Result<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| Error::SyncInProgress)?;
        Ok(Self(flag))
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

struct Inner<R> {
    state: SharedState,
    remote: R,
    /// Reject overlapping syncs
    exclusive: bool,
    in_flight: AtomicBool,
    status: watch::Sender<SyncStatus>,
    status_rx: watch::Receiver<SyncStatus>,
    events: broadcast::Sender<SyncEvent>,
    /// Running auto-sync timer, if any
    auto_sync: Mutex<Option<JoinHandle<()>>>,
}

/// Sync engine for a remote quote source
///
/// Cloning is cheap; clones share state, status and the auto-sync timer.
pub struct SyncEngine<R> {
    inner: Arc<Inner<R>>,
}

impl<R> Clone for SyncEngine<R> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<R> SyncEngine<R> {
    /// Whether an auto-sync timer is running
    pub fn auto_sync_enabled(&self) -> bool {
        self.inner
            .auto_sync
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    /// Cancel the auto-sync timer, if running
    pub fn stop_auto_sync(&self) {
        let handle = self
            .inner
            .auto_sync
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(handle) = handle {
            handle.abort();
            debug!("Stopped auto-sync timer");
        }
    }
}

impl<R: RemoteSource> SyncEngine<R> {
    /// Create an engine over `state`
    ///
    /// With `exclusive` set, a sync requested while another is in flight
    /// fails with `Error::SyncInProgress` instead of running concurrently.
    pub fn new(state: SharedState, remote: R, exclusive: bool) -> Self {
        let (status, status_rx) = watch::channel(SyncStatus::Idle);
        let (events, _) = broadcast::channel(EVENT_CAPACITY);

        Self {
            inner: Arc::new(Inner {
                state,
                remote,
                exclusive,
                in_flight: AtomicBool::new(false),
                status,
                status_rx,
                events,
                auto_sync: Mutex::new(None),
            }),
        }
    }

    /// Get the current status
    pub fn status(&self) -> SyncStatus {
        *self.inner.status_rx.borrow()
    }

    /// Subscribe to engine events
    pub fn subscribe_events(&self) -> broadcast::Receiver<SyncEvent> {
        self.inner.events.subscribe()
    }

    /// The remote source
    pub fn remote(&self) -> &R {
        &self.inner.remote
    }

    /// Fetch the remote quote set and merge it into the collection
    ///
    /// On fetch failure the collection is left as it was and the error is
    /// returned after `Sync Failed!` has been announced.
    pub async fn sync_once(&self) -> Result<SyncReport> {
        let _guard = if self.inner.exclusive {
            Some(InFlight::acquire(&self.inner.in_flight)?)
        } else {
            None
        };

        info!("Starting sync");
        self.set_status(SyncStatus::Syncing);
        self.announce(MSG_SYNCING);

        let result = match self.inner.remote.fetch_quotes().await {
            Ok(remote) => {
                let mut state = self.inner.state.lock().await;
                apply_remote(&mut state, remote)
            }
            Err(e) => Err(e),
        };

        match result {
            Ok(report) => {
                info!(
                    "Sync complete: fetched={}, added={}, conflicts={}",
                    report.fetched,
                    report.added,
                    report.conflicts.len()
                );
                for conflict in &report.conflicts {
                    self.emit(SyncEvent::ConflictRaised(conflict.clone()));
                }
                self.emit(SyncEvent::QuotesChanged);
                self.announce(MSG_SYNCED);
                self.set_status(SyncStatus::Idle);
                Ok(report)
            }
            Err(e) => {
                warn!("Sync failed: {}", e);
                self.set_status(SyncStatus::Failed);
                self.announce(MSG_FAILED);
                self.emit(SyncEvent::Error(e.to_string()));
                self.set_status(SyncStatus::Idle);
                Err(e)
            }
        }
    }

    /// Pending conflicts, oldest first
    pub async fn pending_conflicts(&self) -> Vec<ConflictRecord> {
        self.inner.state.lock().await.conflicts.clone()
    }

    /// Resolve the pending conflict `id`
    ///
    /// The conflict is removed from the pending list whatever the outcome.
    pub async fn resolve_conflict(
        &self,
        id: ConflictId,
        resolution: Resolution,
    ) -> Result<ResolveOutcome> {
        let mut state = self.inner.state.lock().await;
        let record = state
            .take_conflict(id)
            .ok_or_else(|| Error::ConflictNotFound(id.to_string()))?;

        let outcome = match resolve_record(&mut state, record.clone(), resolution) {
            Ok(outcome) => outcome,
            Err(e) => {
                // Still undecided
                state.conflicts.push(record);
                return Err(e);
            }
        };
        drop(state);

        debug!("Resolved conflict {}: {:?}", id, outcome);
        if matches!(outcome, ResolveOutcome::Replaced { .. }) {
            self.emit(SyncEvent::QuotesChanged);
        }
        Ok(outcome)
    }

    /// Send one local quote to the remote
    ///
    /// The local collection is never changed by this call.
    pub async fn post_local_quote(&self, quote: &Quote) -> Result<Value> {
        match self.inner.remote.post_quote(quote).await {
            Ok(ack) => {
                info!("Posted quote to remote");
                Ok(ack)
            }
            Err(e) => {
                warn!("Posting quote failed: {}", e);
                self.emit(SyncEvent::Error(e.to_string()));
                Err(e)
            }
        }
    }

    /// Start or stop periodic syncing
    ///
    /// Enabling replaces any running timer, so at most one is ever active.
    /// Must be called from within a Tokio runtime.
    pub fn set_auto_sync(&self, enabled: bool, interval: Duration) {
        let mut slot = self
            .inner
            .auto_sync
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        if let Some(handle) = slot.take() {
            handle.abort();
            debug!("Stopped auto-sync timer");
        }

        if enabled {
            info!("Auto-sync every {:?}", interval);
            *slot = Some(tokio::spawn(auto_sync_loop(self.clone(), interval)));
        }
    }

    fn set_status(&self, status: SyncStatus) {
        let _ = self.inner.status.send(status);
        self.emit(SyncEvent::StatusChanged(status));
    }

    fn announce(&self, message: &str) {
        self.emit(SyncEvent::Message(message.to_string()));
    }

    fn emit(&self, event: SyncEvent) {
        let _ = self.inner.events.send(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{KeyValueStore, MemoryStore, StorageError, StorageResult, QUOTES_KEY};
    use crate::sync::testing::FakeRemote;

    /// Memory store whose writes can be switched off
    #[derive(Default)]
    struct SwitchableStore {
        values: MemoryStore,
        reject_writes: AtomicBool,
    }

    impl KeyValueStore for SwitchableStore {
        fn get(&self, key: &str) -> StorageResult<Option<String>> {
            self.values.get(key)
        }

        fn set(&self, key: &str, value: &str) -> StorageResult<()> {
            if self.reject_writes.load(Ordering::SeqCst) {
                return Err(StorageError::Write {
                    path: key.into(),
                    source: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
                });
            }
            self.values.set(key, value)
        }
    }

    fn switchable_scenario() -> (Arc<SwitchableStore>, SyncEngine<FakeRemote>) {
        let storage = Arc::new(SwitchableStore::default());
        storage
            .set(QUOTES_KEY, &serde_json::to_string(&[Quote::new("A", "X")]).unwrap())
            .unwrap();
        let state = AppState::load(storage.clone()).into_shared();
        let remote = FakeRemote::with_quotes(vec![Quote::new("A", "Y"), Quote::new("B", "Server")]);
        (storage, SyncEngine::new(state, remote, false))
    }

    fn state_with(local: &[Quote]) -> (Arc<MemoryStore>, SharedState) {
        let storage = Arc::new(MemoryStore::new());
        storage
            .set(QUOTES_KEY, &serde_json::to_string(local).unwrap())
            .unwrap();
        let state = AppState::load(storage.clone()).into_shared();
        (storage, state)
    }

    fn scenario() -> (Arc<MemoryStore>, SyncEngine<FakeRemote>) {
        let (storage, state) = state_with(&[Quote::new("A", "X")]);
        let remote = FakeRemote::with_quotes(vec![Quote::new("A", "Y"), Quote::new("B", "Server")]);
        (storage, SyncEngine::new(state, remote, false))
    }

    fn drain(rx: &mut broadcast::Receiver<SyncEvent>) -> Vec<SyncEvent> {
        let mut events = Vec::new();
        while let Ok(event) = rx.try_recv() {
            events.push(event);
        }
        events
    }

    fn messages(events: &[SyncEvent]) -> Vec<String> {
        events
            .iter()
            .filter_map(|e| match e {
                SyncEvent::Message(m) => Some(m.clone()),
                _ => None,
            })
            .collect()
    }

    #[tokio::test]
    async fn test_sync_appends_new_and_raises_conflict() {
        let (_, engine) = scenario();

        let report = engine.sync_once().await.unwrap();
        assert_eq!(report.fetched, 2);
        assert_eq!(report.added, 1);
        assert_eq!(report.conflicts.len(), 1);

        let state = engine.inner.state.lock().await;
        assert_eq!(
            state.quotes.quotes(),
            &[Quote::new("A", "X"), Quote::new("B", "Server")]
        );
        assert_eq!(state.conflicts.len(), 1);
        let conflict = &state.conflicts[0];
        assert_eq!(conflict.local, Quote::new("A", "X"));
        assert_eq!(conflict.server, Quote::new("A", "Y"));
        assert_eq!(conflict.index, 0);
        assert!(state.categories.contains("Server"));
    }

    #[tokio::test]
    async fn test_sync_persists_merged_collection() {
        let (storage, engine) = scenario();
        engine.sync_once().await.unwrap();

        let stored: Vec<Quote> =
            serde_json::from_str(&storage.get(QUOTES_KEY).unwrap().unwrap()).unwrap();
        assert_eq!(stored.len(), 2);
        assert_eq!(stored[1], Quote::new("B", "Server"));
    }

    #[tokio::test]
    async fn test_resolve_keep_server_replaces() {
        let (storage, engine) = scenario();
        let report = engine.sync_once().await.unwrap();
        let id = report.conflicts[0].id;

        let outcome = engine
            .resolve_conflict(id, Resolution::KeepServer)
            .await
            .unwrap();
        assert_eq!(outcome, ResolveOutcome::Replaced { index: 0 });

        let state = engine.inner.state.lock().await;
        assert_eq!(state.quotes.get(0), Some(&Quote::new("A", "Y")));
        assert!(state.conflicts.is_empty());
        assert!(state.categories.contains("Y"));
        assert!(!state.categories.contains("X"));
        drop(state);

        let stored = storage.get(QUOTES_KEY).unwrap().unwrap();
        assert!(stored.contains(r#""category":"Y""#));
    }

    #[tokio::test]
    async fn test_resolve_keep_local_leaves_collection() {
        let (_, engine) = scenario();
        let report = engine.sync_once().await.unwrap();
        let id = report.conflicts[0].id;

        let outcome = engine
            .resolve_conflict(id, Resolution::KeepLocal)
            .await
            .unwrap();
        assert_eq!(outcome, ResolveOutcome::KeptLocal);

        let state = engine.inner.state.lock().await;
        assert_eq!(state.quotes.get(0), Some(&Quote::new("A", "X")));
        assert!(state.conflicts.is_empty());
    }

    #[tokio::test]
    async fn test_resolve_twice_is_not_found() {
        let (_, engine) = scenario();
        let report = engine.sync_once().await.unwrap();
        let id = report.conflicts[0].id;

        engine
            .resolve_conflict(id, Resolution::KeepLocal)
            .await
            .unwrap();
        let err = engine
            .resolve_conflict(id, Resolution::KeepServer)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::ConflictNotFound(_)));
    }

    #[tokio::test]
    async fn test_resolve_relocates_moved_quote() {
        let (_, engine) = scenario();
        let report = engine.sync_once().await.unwrap();
        let id = report.conflicts[0].id;

        // Local quote moves from index 0 to index 1
        {
            let mut state = engine.inner.state.lock().await;
            state.quotes.replace_at(0, Quote::new("C", "Z")).unwrap();
            state.quotes.replace_at(1, Quote::new("A", "X")).unwrap();
        }

        let outcome = engine
            .resolve_conflict(id, Resolution::KeepServer)
            .await
            .unwrap();
        assert_eq!(outcome, ResolveOutcome::Replaced { index: 1 });

        let state = engine.inner.state.lock().await;
        assert_eq!(state.quotes.get(0), Some(&Quote::new("C", "Z")));
        assert_eq!(state.quotes.get(1), Some(&Quote::new("A", "Y")));
    }

    #[tokio::test]
    async fn test_resolve_stale_conflict_is_discarded() {
        let (_, engine) = scenario();
        let report = engine.sync_once().await.unwrap();
        let id = report.conflicts[0].id;

        {
            let mut state = engine.inner.state.lock().await;
            state.quotes.replace_at(0, Quote::new("Gone", "X")).unwrap();
        }

        let outcome = engine
            .resolve_conflict(id, Resolution::KeepServer)
            .await
            .unwrap();
        assert_eq!(outcome, ResolveOutcome::Stale);

        let state = engine.inner.state.lock().await;
        assert_eq!(state.quotes.get(0), Some(&Quote::new("Gone", "X")));
        assert!(state.conflicts.is_empty());
    }

    #[tokio::test]
    async fn test_sync_failure_leaves_collection_and_reports() {
        let (_, state) = state_with(&[Quote::new("A", "X")]);
        let engine = SyncEngine::new(state, FakeRemote::failing(), false);
        let mut events = engine.subscribe_events();

        let err = engine.sync_once().await.unwrap_err();
        assert!(err.is_remote());
        assert_eq!(engine.status(), SyncStatus::Idle);

        let events = drain(&mut events);
        assert_eq!(messages(&events), vec![MSG_SYNCING, MSG_FAILED]);
        assert!(events
            .iter()
            .any(|e| matches!(e, SyncEvent::StatusChanged(SyncStatus::Failed))));

        let state = engine.inner.state.lock().await;
        assert_eq!(state.quotes.quotes(), &[Quote::new("A", "X")]);
    }

    #[tokio::test]
    async fn test_sync_announces_progress() {
        let (_, engine) = scenario();
        let mut events = engine.subscribe_events();

        engine.sync_once().await.unwrap();

        let events = drain(&mut events);
        assert_eq!(messages(&events), vec![MSG_SYNCING, MSG_SYNCED]);
        assert!(events
            .iter()
            .any(|e| matches!(e, SyncEvent::ConflictRaised(_))));
        assert_eq!(engine.status(), SyncStatus::Idle);
    }

    #[tokio::test]
    async fn test_repeated_sync_does_not_stack_conflicts() {
        let (_, engine) = scenario();

        engine.sync_once().await.unwrap();
        let second = engine.sync_once().await.unwrap();

        // B is now local too, so the second run conflicts on both
        assert_eq!(second.added, 0);
        assert_eq!(second.conflicts.len(), 2);
        assert_eq!(engine.pending_conflicts().await.len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_overlapping_syncs_interleave_by_default() {
        let (_, state) = state_with(&[]);
        let remote = FakeRemote {
            delay: Some(Duration::from_secs(1)),
            ..FakeRemote::with_quotes(vec![Quote::new("B", "Server")])
        };
        let engine = SyncEngine::new(state, remote, false);

        let (first, second) = tokio::join!(engine.sync_once(), engine.sync_once());
        let first = first.unwrap();
        let second = second.unwrap();

        assert_eq!(first.added + second.added, 1);
        assert_eq!(first.conflicts.len() + second.conflicts.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_exclusive_sync_rejects_overlap() {
        let (_, state) = state_with(&[]);
        let remote = FakeRemote {
            delay: Some(Duration::from_secs(1)),
            ..FakeRemote::with_quotes(vec![Quote::new("B", "Server")])
        };
        let engine = SyncEngine::new(state, remote, true);

        let (first, second) = tokio::join!(engine.sync_once(), engine.sync_once());
        assert!(first.is_ok());
        assert!(matches!(second, Err(Error::SyncInProgress)));
        assert_eq!(engine.remote().fetch_count(), 1);

        // Flag is released afterwards
        assert!(engine.sync_once().await.is_ok());
    }

    #[tokio::test]
    async fn test_post_local_quote_does_not_touch_store() {
        let (_, engine) = scenario();

        let ack = engine
            .post_local_quote(&Quote::new("Posted", "Mine"))
            .await
            .unwrap();
        assert_eq!(ack["text"], "Posted");
        assert_eq!(ack["id"], 101);

        let state = engine.inner.state.lock().await;
        assert_eq!(state.quotes.len(), 1);
    }

    #[tokio::test]
    async fn test_post_failure_is_reported() {
        let (_, state) = state_with(&[]);
        let engine = SyncEngine::new(state, FakeRemote::failing(), false);
        let mut events = engine.subscribe_events();

        assert!(engine
            .post_local_quote(&Quote::new("A", "X"))
            .await
            .is_err());
        assert!(drain(&mut events)
            .iter()
            .any(|e| matches!(e, SyncEvent::Error(_))));
    }

    #[test]
    fn test_apply_remote_matches_batch_appends() {
        let mut state = AppState::load(Arc::new(MemoryStore::new()));
        let report = apply_remote(
            &mut state,
            vec![Quote::new("N", "Server"), Quote::new("N", "Server")],
        )
        .unwrap();

        assert_eq!(report.added, 1);
        assert_eq!(report.conflicts.len(), 1);
        assert_eq!(report.conflicts[0].index, 3);
    }

    #[tokio::test]
    async fn test_resync_keeps_conflict_id() {
        let (_, engine) = scenario();
        let first = engine.sync_once().await.unwrap().conflicts[0].id;

        let second = engine.sync_once().await.unwrap();
        assert!(second.conflicts.iter().any(|c| c.id == first));

        let outcome = engine
            .resolve_conflict(first, Resolution::KeepServer)
            .await
            .unwrap();
        assert_eq!(outcome, ResolveOutcome::Replaced { index: 0 });
    }

    #[tokio::test]
    async fn test_sync_save_failure_changes_nothing() {
        let (storage, engine) = switchable_scenario();
        storage.reject_writes.store(true, Ordering::SeqCst);

        let err = engine.sync_once().await.unwrap_err();
        assert!(matches!(err, Error::Storage(_)));
        assert_eq!(engine.status(), SyncStatus::Idle);

        let state = engine.inner.state.lock().await;
        assert_eq!(state.quotes.quotes(), &[Quote::new("A", "X")]);
        assert!(state.conflicts.is_empty());
        assert!(!state.categories.contains("Server"));
    }

    #[tokio::test]
    async fn test_resolve_save_failure_keeps_conflict_pending() {
        let (storage, engine) = switchable_scenario();
        let id = engine.sync_once().await.unwrap().conflicts[0].id;
        storage.reject_writes.store(true, Ordering::SeqCst);

        assert!(engine
            .resolve_conflict(id, Resolution::KeepServer)
            .await
            .is_err());

        let pending = engine.pending_conflicts().await;
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].id, id);
        let state = engine.inner.state.lock().await;
        assert_eq!(state.quotes.get(0), Some(&Quote::new("A", "X")));
        assert!(state.categories.contains("X"));
    }
}
