//! Synchronization service for the quote list.
//!
//! Fetches a remote batch and merges it into the shared repository. Only one
//! sync runs at a time in a process: a request arriving while another is in
//! flight is dropped rather than queued. Across processes the merge itself is
//! serialized by the store's exclusive write section.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::{mpsc, watch, Mutex};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::domain::{Quote, ReconcileReport, SyncOutcome, SyncReport, SyncState};
use crate::infrastructure::RemoteSource;

use super::repository::QuoteRepository;

/// Fetch a batch, treating any failure as "no remote data".
pub async fn fetch_remote_batch(source: &dyn RemoteSource) -> Vec<Quote> {
    match source.fetch_batch().await {
        Ok(batch) => batch,
        Err(e) => {
            tracing::warn!(error = %e, "Remote fetch failed, treating as empty batch");
            Vec::new()
        }
    }
}

/// Service for syncing the local quote list with a remote source.
pub struct SyncService {
    repository: Arc<Mutex<QuoteRepository>>,
    source: Arc<dyn RemoteSource>,
    in_flight: AtomicBool,
    state: watch::Sender<SyncState>,
}

/// Clears the in-flight flag and resets state when a sync ends, however it ends.
struct InFlightGuard<'a> {
    service: &'a SyncService,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.service.state.send_replace(SyncState::Idle);
        self.service.in_flight.store(false, Ordering::SeqCst);
    }
}

impl SyncService {
    /// Create a new sync service over a shared repository.
    #[must_use]
    pub fn new(repository: Arc<Mutex<QuoteRepository>>, source: Arc<dyn RemoteSource>) -> Self {
        let (state, _) = watch::channel(SyncState::Idle);
        Self {
            repository,
            source,
            in_flight: AtomicBool::new(false),
            state,
        }
    }

    /// Current phase of the sync state machine.
    #[must_use]
    pub fn state(&self) -> SyncState {
        *self.state.borrow()
    }

    /// Subscribe to state transitions.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SyncState> {
        self.state.subscribe()
    }

    /// Run one fetch-reconcile-persist cycle unless one is already running.
    pub async fn sync_now(&self) -> SyncOutcome {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            tracing::debug!("Sync already in flight, skipping");
            return SyncOutcome::Skipped;
        }
        let _guard = InFlightGuard { service: self };

        tracing::info!("Starting sync...");
        let start = std::time::Instant::now();

        self.state.send_replace(SyncState::Fetching);
        let batch = fetch_remote_batch(self.source.as_ref()).await;

        self.state.send_replace(SyncState::Reconciling);
        let applied = self.repository.lock().await.apply_remote(&batch);
        let (reconcile, persisted) = applied.unwrap_or_else(|e| {
            tracing::error!(error = %e, "Could not apply remote batch");
            (ReconcileReport::default(), false)
        });

        tracing::info!(
            fetched = batch.len(),
            added = reconcile.added,
            updated = reconcile.updated,
            duration_ms = start.elapsed().as_millis(),
            "Sync completed"
        );

        SyncOutcome::Completed(SyncReport {
            fetched: batch.len(),
            reconcile,
            persisted,
            finished_at: Utc::now(),
        })
    }

    /// Start syncing every `period`, beginning immediately.
    ///
    /// Each completed run is sent on the returned task's report channel.
    #[must_use]
    pub fn spawn_periodic(self: &Arc<Self>, period: Duration) -> SyncTask {
        let (shutdown_tx, mut shutdown_rx) = watch::channel(false);
        let (report_tx, report_rx) = mpsc::channel(16);
        let service = Arc::clone(self);
        let period = period.max(Duration::from_millis(1));

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        if let SyncOutcome::Completed(report) = service.sync_now().await {
                            // Nobody listening is fine; keep syncing.
                            let _ = report_tx.try_send(report);
                        }
                    }
                    _ = shutdown_rx.changed() => {
                        tracing::debug!("Periodic sync stopped");
                        break;
                    }
                }
            }
        });

        tracing::info!(period_secs = period.as_secs_f64(), "Periodic sync started");

        SyncTask {
            handle,
            shutdown: shutdown_tx,
            reports: report_rx,
        }
    }
}

/// Handle to a running periodic sync.
pub struct SyncTask {
    handle: JoinHandle<()>,
    shutdown: watch::Sender<bool>,
    reports: mpsc::Receiver<SyncReport>,
}

impl SyncTask {
    /// Wait for the next completed sync report.
    pub async fn next_report(&mut self) -> Option<SyncReport> {
        self.reports.recv().await
    }

    /// Stop the schedule and wait for the task to exit.
    pub async fn cancel(self) {
        let _ = self.shutdown.send(true);
        if let Err(e) = self.handle.await {
            tracing::warn!(error = %e, "Periodic sync task ended abnormally");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::QuoteStore;
    use crate::domain::{AppError, Result};
    use crate::infrastructure::LocalStorage;
    use async_trait::async_trait;
    use std::sync::atomic::AtomicUsize;
    use tokio::sync::Notify;

    struct FixedSource(Vec<Quote>);

    #[async_trait]
    impl RemoteSource for FixedSource {
        async fn fetch_batch(&self) -> Result<Vec<Quote>> {
            Ok(self.0.clone())
        }
    }

    struct FailingSource;

    #[async_trait]
    impl RemoteSource for FailingSource {
        async fn fetch_batch(&self) -> Result<Vec<Quote>> {
            Err(AppError::Remote {
                message: "connection refused".into(),
                source: None,
            })
        }
    }

    /// Holds each fetch until released.
    struct GatedSource {
        batch: Vec<Quote>,
        gate: Notify,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl RemoteSource for GatedSource {
        async fn fetch_batch(&self) -> Result<Vec<Quote>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.gate.notified().await;
            Ok(self.batch.clone())
        }
    }

    fn shared_repo(quotes: &str) -> Arc<Mutex<QuoteRepository>> {
        let mut repo = QuoteRepository::open(QuoteStore::new(Box::new(
            LocalStorage::open_in_memory().unwrap(),
        )));
        repo.import_json(quotes).unwrap();
        Arc::new(Mutex::new(repo))
    }

    #[tokio::test]
    async fn test_sync_merges_and_is_idempotent() {
        let repo = shared_repo(r#"[{"text":"A","category":"X"}]"#);
        let source = Arc::new(FixedSource(vec![
            Quote::new("A", "Y"),
            Quote::new("B", "Server"),
        ]));
        let service = SyncService::new(Arc::clone(&repo), source);

        let SyncOutcome::Completed(first) = service.sync_now().await else {
            panic!("expected completed sync");
        };
        assert_eq!(first.fetched, 2);
        assert_eq!(first.reconcile.added, 1);
        assert_eq!(first.reconcile.updated, 1);
        assert!(first.persisted);

        let SyncOutcome::Completed(second) = service.sync_now().await else {
            panic!("expected completed sync");
        };
        assert!(!second.changed());
        assert!(!second.persisted);

        let guard = repo.lock().await;
        assert_eq!(
            guard.all(),
            [Quote::new("A", "Y"), Quote::new("B", "Server")].as_slice()
        );
        assert_eq!(service.state(), SyncState::Idle);
    }

    #[tokio::test]
    async fn test_sync_keeps_quotes_written_by_another_session() {
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("storage.db");
        let open = || {
            QuoteRepository::open(QuoteStore::new(Box::new(LocalStorage::open(&db).unwrap())))
        };

        let repo = Arc::new(Mutex::new(open()));
        let source = Arc::new(FixedSource(vec![Quote::new("remote title", "Server")]));
        let service = SyncService::new(Arc::clone(&repo), source);

        open().add("Added from another terminal", "Mine").unwrap();

        let SyncOutcome::Completed(report) = service.sync_now().await else {
            panic!("expected completed sync");
        };
        assert!(report.persisted);

        let stored = open();
        assert!(stored.find_by_text("Added from another terminal").is_some());
        assert!(stored.find_by_text("remote title").is_some());
        assert_eq!(repo.lock().await.all(), stored.all());
    }

    #[tokio::test]
    async fn test_remote_failure_is_no_change() {
        let repo = shared_repo(r#"[{"text":"A","category":"X"}]"#);
        let service = SyncService::new(Arc::clone(&repo), Arc::new(FailingSource));

        let SyncOutcome::Completed(report) = service.sync_now().await else {
            panic!("expected completed sync");
        };

        assert_eq!(report.fetched, 0);
        assert!(!report.changed());
        assert_eq!(repo.lock().await.len(), 1);
    }

    #[tokio::test]
    async fn test_overlapping_sync_is_skipped() {
        let repo = shared_repo("[]");
        let source = Arc::new(GatedSource {
            batch: vec![Quote::new("B", "Server")],
            gate: Notify::new(),
            calls: AtomicUsize::new(0),
        });
        let service = Arc::new(SyncService::new(
            Arc::clone(&repo),
            Arc::clone(&source) as Arc<dyn RemoteSource>,
        ));

        let mut states = service.subscribe();
        let running = {
            let service = Arc::clone(&service);
            tokio::spawn(async move { service.sync_now().await })
        };
        states
            .wait_for(|s| *s == SyncState::Fetching)
            .await
            .unwrap();

        assert!(matches!(service.sync_now().await, SyncOutcome::Skipped));

        source.gate.notify_one();
        let outcome = running.await.unwrap();

        assert!(matches!(outcome, SyncOutcome::Completed(ref r) if r.reconcile.added == 1));
        assert_eq!(source.calls.load(Ordering::SeqCst), 1);
        assert_eq!(repo.lock().await.len(), 1);
        assert_eq!(service.state(), SyncState::Idle);
    }

    #[tokio::test]
    async fn test_periodic_sync_reports_and_cancels() {
        let repo = shared_repo("[]");
        let source = Arc::new(FixedSource(vec![Quote::new("B", "Server")]));
        let service = Arc::new(SyncService::new(Arc::clone(&repo), source));

        let mut task = service.spawn_periodic(Duration::from_millis(20));

        let first = task.next_report().await.unwrap();
        assert_eq!(first.reconcile.added, 1);
        let second = task.next_report().await.unwrap();
        assert!(!second.changed());

        task.cancel().await;
        assert_eq!(repo.lock().await.len(), 1);
    }
}
