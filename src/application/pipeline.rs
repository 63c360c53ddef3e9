//! Pipeline orchestration for one promotion check cycle
//!
//! Wires collector, parser, differ, and store into the single entry point
//! the scheduler and notifier collaborators call. Nothing propagates past
//! `run_cycle`: every failure category degrades to a well-defined fallback
//! (empty candidate list, dropped record, fresh-start snapshot), so the
//! caller always receives a change set. Concurrent invocations are
//! serialized through an internal lock; a run triggered while another is
//! collecting waits its turn instead of racing the shared page state.

use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::domain::changes::{ChangeSet, detect_changes};
use crate::domain::promotion::Promotion;
use crate::infrastructure::collector::CandidateCollector;
use crate::infrastructure::parsing::parse_candidates;
use crate::infrastructure::session::SessionProvider;
use crate::infrastructure::store::SnapshotStore;

/// Result of one pipeline cycle, handed to the notification collaborator.
#[derive(Debug, Clone, Default)]
pub struct CycleOutcome {
    /// The full snapshot observed this cycle.
    pub current: Vec<Promotion>,
    /// Delta against the previously stored snapshot.
    pub changes: ChangeSet,
    /// Candidates dropped because no airline keyword matched.
    pub unresolved_dropped: usize,
    /// Candidates dropped by per-record parse failures.
    pub parse_failures: usize,
}

/// Extraction → normalization → change-detection pipeline.
pub struct PromotionPipeline<P: SessionProvider> {
    sessions: P,
    collector: CandidateCollector,
    store: SnapshotStore,
    cancel: CancellationToken,
    run_lock: Mutex<()>,
}

impl<P: SessionProvider> PromotionPipeline<P> {
    pub fn new(
        sessions: P,
        collector: CandidateCollector,
        store: SnapshotStore,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            sessions,
            collector,
            store,
            cancel,
            run_lock: Mutex::new(()),
        }
    }

    /// Run one full check cycle. Never fails; see module docs for the
    /// degradation policy.
    pub async fn run_cycle(&self) -> CycleOutcome {
        let _running = self.run_lock.lock().await;

        info!("Starting promotion check cycle...");

        let candidates = match self.sessions.acquire().await {
            Ok(session) => self.collector.collect(&session, &self.cancel).await,
            Err(e) => {
                warn!("{}", e);
                Vec::new()
            }
        };
        if candidates.is_empty() {
            warn!("No promotion candidates found during scraping");
        }

        let report = parse_candidates(&candidates);

        let old_promotions = self.store.load_current().await;
        let changes = detect_changes(&old_promotions, &report.promotions);

        info!(
            "Changes detected: {} new, {} expired, {} updated",
            changes.new.len(),
            changes.expired.len(),
            changes.updated.len()
        );

        // Persistence is fire-and-forget relative to cycle correctness: a
        // failed write only means the next cycle diffs against stale data.
        if let Err(e) = self.store.save_current(&report.promotions).await {
            warn!("Error saving current promotions: {}", e);
        }
        if let Err(e) = self.store.append_history(&report.promotions).await {
            warn!("Error adding to history: {}", e);
        }

        info!("Promotion check cycle completed");

        CycleOutcome {
            current: report.promotions,
            changes,
            unresolved_dropped: report.unresolved_dropped,
            parse_failures: report.failed,
        }
    }

    /// Request cooperative cancellation of an in-flight carousel sampling
    /// window (e.g. on shutdown).
    pub fn cancel(&self) {
        self.cancel.cancel();
    }
}
