//! Synchronous dashboard state machine.
//!
//! [`DashboardState`] decides when a fetch may be issued and whether a
//! completed fetch is applied. It never awaits anything; the async driver in
//! the parent module feeds it ticks, refresh requests and completions.
//!
//! ```text
//!   Idle ──tick──▶ Fetching ──ok──▶ Ready ──tick──▶ Fetching ...
//!                     │                                 ▲
//!                     └──err──▶ Error ──────tick────────┘
//!
//!   any state ──dispose──▶ Disposed
//! ```
//!
//! Every fetch carries the sequence number current when it was issued. Only
//! the completion of the latest issued, still outstanding fetch is applied,
//! so the published view never goes back to an older snapshot.
//!
//! At most [`MAX_IN_FLIGHT`] fetches run at once: the wanted one plus one it
//! superseded. A refresh requested while that limit is reached is deferred
//! until a running fetch finishes.

use std::sync::Arc;
use std::time::SystemTime;

use healthpie_types::{ChartSet, HealthSnapshot, OverallHealth};

use crate::charts::{build_all, UnitFormatter};
use crate::classify::CategoryClassifier;
use crate::source::SourceError;

/// Upper bound on concurrently running fetches.
pub const MAX_IN_FLIGHT: usize = 2;

/// Lifecycle status of a dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DashboardStatus {
    /// Created, nothing fetched yet.
    #[default]
    Idle,
    /// A fetch is outstanding.
    Fetching,
    /// The latest fetch was applied.
    Ready,
    /// The latest fetch failed. Earlier charts are kept.
    Error,
    /// Torn down. Terminal.
    Disposed,
}

impl DashboardStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DashboardStatus::Idle => "idle",
            DashboardStatus::Fetching => "fetching",
            DashboardStatus::Ready => "ready",
            DashboardStatus::Error => "error",
            DashboardStatus::Disposed => "disposed",
        }
    }
}

/// Running fetch counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FetchStats {
    /// Fetches started, by tick or by refresh.
    pub issued: u64,
    /// Completions whose snapshot was applied.
    pub applied: u64,
    /// Completions that reported an error.
    pub failed: u64,
    /// Timer ticks dropped because a fetch was outstanding.
    pub skipped_ticks: u64,
    /// Completions thrown away because a newer fetch had been issued.
    pub discarded: u64,
    /// Refresh requests held back because too many fetches were running.
    pub deferred_refreshes: u64,
}

/// What consumers see. Replaced wholesale on every change, never mutated.
#[derive(Debug, Clone, Default)]
pub struct DashboardView {
    pub status: DashboardStatus,
    /// Sequence number of the applied snapshot, 0 before the first one.
    pub sequence: u64,
    /// Last successfully fetched snapshot.
    pub snapshot: Option<Arc<HealthSnapshot>>,
    /// Charts derived from `snapshot`.
    pub charts: Option<Arc<ChartSet>>,
    /// Overall health from `snapshot`.
    pub health: OverallHealth,
    /// Message of the last failed fetch, cleared by the next success.
    pub error: Option<String>,
    /// When `snapshot` was applied.
    pub updated_at: Option<SystemTime>,
    pub stats: FetchStats,
}

impl DashboardView {
    /// Check if charts are available to render.
    pub fn has_charts(&self) -> bool {
        self.charts.is_some()
    }
}

/// Permission to run one fetch. Hand it back to [`DashboardState::complete`].
#[derive(Debug)]
pub struct FetchTicket {
    sequence: u64,
}

impl FetchTicket {
    pub fn sequence(&self) -> u64 {
        self.sequence
    }
}

/// Outcome of handing a completed fetch back to the state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// The snapshot was applied and the charts rebuilt.
    Applied,
    /// The fetch failed; the error is now on the view.
    Failed,
    /// A newer fetch has been issued since; nothing changed but the counter.
    Superseded,
    /// The dashboard is disposed; ignored.
    Disposed,
}

/// Fetch sequencing and the current [`DashboardView`].
pub struct DashboardState {
    classifier: Arc<CategoryClassifier>,
    formatter: Arc<dyn UnitFormatter>,
    /// Latest sequence number handed out.
    issued: u64,
    /// Sequence of the fetch whose result is still wanted.
    outstanding: Option<u64>,
    /// Fetches issued and not yet completed, wanted or not.
    in_flight: usize,
    /// A refresh is waiting for a running fetch to finish.
    refresh_deferred: bool,
    view: Arc<DashboardView>,
}

impl DashboardState {
    pub fn new(classifier: Arc<CategoryClassifier>, formatter: Arc<dyn UnitFormatter>) -> Self {
        Self {
            classifier,
            formatter,
            issued: 0,
            outstanding: None,
            in_flight: 0,
            refresh_deferred: false,
            view: Arc::new(DashboardView::default()),
        }
    }

    /// The current view.
    pub fn view(&self) -> Arc<DashboardView> {
        Arc::clone(&self.view)
    }

    /// Check if a fetch is outstanding.
    pub fn is_fetching(&self) -> bool {
        self.outstanding.is_some()
    }

    /// Number of fetches issued and not yet completed.
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    pub fn is_disposed(&self) -> bool {
        self.view.status == DashboardStatus::Disposed
    }

    /// Timer fired. Issues a fetch unless one is already outstanding, in
    /// which case the tick is dropped.
    pub fn on_tick(&mut self) -> Option<FetchTicket> {
        if self.is_disposed() {
            return None;
        }
        if self.outstanding.is_some() || self.in_flight >= MAX_IN_FLIGHT {
            tracing::debug!(in_flight = self.in_flight, "fetch outstanding, dropping tick");
            self.update(|view| view.stats.skipped_ticks += 1);
            return None;
        }
        Some(self.issue())
    }

    /// Issue a fetch now. An outstanding fetch is superseded and its
    /// completion will be discarded.
    ///
    /// If [`MAX_IN_FLIGHT`] fetches are already running, the request is
    /// deferred instead; see [`take_deferred_refresh`](Self::take_deferred_refresh).
    /// Repeated deferred requests collapse into one.
    pub fn force_fetch(&mut self) -> Option<FetchTicket> {
        if self.is_disposed() {
            return None;
        }
        if self.in_flight >= MAX_IN_FLIGHT {
            tracing::debug!(in_flight = self.in_flight, "too many fetches running, deferring refresh");
            self.refresh_deferred = true;
            self.update(|view| view.stats.deferred_refreshes += 1);
            return None;
        }
        if let Some(sequence) = self.outstanding {
            tracing::debug!(sequence, "superseding outstanding fetch");
        }
        Some(self.issue())
    }

    fn issue(&mut self) -> FetchTicket {
        self.issued += 1;
        self.in_flight += 1;
        self.outstanding = Some(self.issued);
        self.update(|view| {
            view.status = DashboardStatus::Fetching;
            view.stats.issued += 1;
        });
        FetchTicket {
            sequence: self.issued,
        }
    }

    /// Hand back a finished fetch.
    pub fn complete(
        &mut self,
        ticket: FetchTicket,
        result: Result<HealthSnapshot, SourceError>,
    ) -> Completion {
        self.in_flight = self.in_flight.saturating_sub(1);
        if self.is_disposed() {
            return Completion::Disposed;
        }
        if self.outstanding != Some(ticket.sequence) {
            tracing::debug!(
                sequence = ticket.sequence,
                latest = self.issued,
                "discarding superseded fetch"
            );
            self.update(|view| view.stats.discarded += 1);
            return Completion::Superseded;
        }
        self.outstanding = None;

        match result {
            Ok(snapshot) => {
                let charts = build_all(&snapshot, &self.classifier, self.formatter.as_ref());
                self.update(|view| {
                    view.status = DashboardStatus::Ready;
                    view.sequence = ticket.sequence;
                    view.health = snapshot.health;
                    view.snapshot = Some(Arc::new(snapshot));
                    view.charts = Some(Arc::new(charts));
                    view.error = None;
                    view.updated_at = Some(SystemTime::now());
                    view.stats.applied += 1;
                });
                Completion::Applied
            }
            Err(e) => {
                tracing::warn!(sequence = ticket.sequence, error = %e, "fetch failed");
                self.update(|view| {
                    view.status = DashboardStatus::Error;
                    view.error = Some(e.to_string());
                    view.stats.failed += 1;
                });
                Completion::Failed
            }
        }
    }

    /// Issue the deferred refresh, once a running fetch has finished.
    pub fn take_deferred_refresh(&mut self) -> Option<FetchTicket> {
        if !self.refresh_deferred || self.in_flight >= MAX_IN_FLIGHT {
            return None;
        }
        self.refresh_deferred = false;
        self.force_fetch()
    }

    /// Tear down. Later ticks, refreshes and completions are ignored.
    ///
    /// Returns `false` if already disposed.
    pub fn dispose(&mut self) -> bool {
        if self.is_disposed() {
            return false;
        }
        self.outstanding = None;
        self.refresh_deferred = false;
        self.update(|view| view.status = DashboardStatus::Disposed);
        true
    }

    fn update(&mut self, f: impl FnOnce(&mut DashboardView)) {
        let mut next = DashboardView::clone(&self.view);
        f(&mut next);
        self.view = Arc::new(next);
    }
}

impl std::fmt::Debug for DashboardState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DashboardState")
            .field("issued", &self.issued)
            .field("outstanding", &self.outstanding)
            .field("in_flight", &self.in_flight)
            .field("status", &self.view.status)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charts::DimlessFormatter;

    fn state() -> DashboardState {
        DashboardState::new(
            Arc::new(CategoryClassifier::ceph_default()),
            Arc::new(DimlessFormatter),
        )
    }

    fn snapshot(read_ops: f64) -> HealthSnapshot {
        HealthSnapshot::builder()
            .health(OverallHealth::Ok)
            .client_perf(|p| p.read_ops(read_ops))
            .pg_status("active+clean", 4)
            .build()
    }

    #[test]
    fn test_starts_idle() {
        let state = state();
        let view = state.view();
        assert_eq!(view.status, DashboardStatus::Idle);
        assert_eq!(view.sequence, 0);
        assert!(!view.has_charts());
        assert!(!state.is_fetching());
    }

    #[test]
    fn test_tick_fetch_apply() {
        let mut state = state();
        let ticket = state.on_tick().unwrap();
        assert_eq!(ticket.sequence(), 1);
        assert_eq!(state.view().status, DashboardStatus::Fetching);

        assert_eq!(state.complete(ticket, Ok(snapshot(10.0))), Completion::Applied);
        let view = state.view();
        assert_eq!(view.status, DashboardStatus::Ready);
        assert_eq!(view.sequence, 1);
        assert_eq!(view.health, OverallHealth::Ok);
        assert!(view.updated_at.is_some());
        let charts = view.charts.as_ref().unwrap();
        assert_eq!(charts.read_write_ratio.segments, vec![100, 0]);
        assert_eq!(charts.pg_status.segments, vec![100, 0, 0, 0]);
    }

    #[test]
    fn test_tick_while_fetching_is_dropped() {
        let mut state = state();
        let ticket = state.on_tick().unwrap();

        assert!(state.on_tick().is_none());
        assert!(state.on_tick().is_none());
        assert_eq!(state.view().stats.skipped_ticks, 2);
        assert_eq!(state.view().stats.issued, 1);

        state.complete(ticket, Ok(snapshot(1.0)));
        assert_eq!(state.on_tick().unwrap().sequence(), 2);
    }

    #[test]
    fn test_newer_fetch_wins_out_of_order() {
        let mut state = state();
        let first = state.on_tick().unwrap();
        let second = state.force_fetch().unwrap();

        // The newer fetch resolves first.
        assert_eq!(state.complete(second, Ok(snapshot(2.0))), Completion::Applied);
        assert_eq!(state.complete(first, Ok(snapshot(1.0))), Completion::Superseded);

        let view = state.view();
        assert_eq!(view.sequence, 2);
        assert_eq!(view.snapshot.as_ref().unwrap().client_perf.read_ops_per_sec, 2.0);
        assert_eq!(view.stats.discarded, 1);
        assert_eq!(view.stats.applied, 1);
    }

    #[test]
    fn test_superseded_completion_does_not_clear_outstanding() {
        let mut state = state();
        let first = state.on_tick().unwrap();
        let _second = state.force_fetch().unwrap();

        assert_eq!(state.complete(first, Ok(snapshot(1.0))), Completion::Superseded);
        assert!(state.is_fetching());
        assert_eq!(state.view().status, DashboardStatus::Fetching);
        assert!(state.on_tick().is_none());
    }

    #[test]
    fn test_refresh_is_deferred_at_in_flight_limit() {
        let mut state = state();
        let first = state.on_tick().unwrap();
        let second = state.force_fetch().unwrap();
        assert_eq!(state.in_flight(), 2);

        // A third concurrent fetch is never started; requests collapse.
        assert!(state.force_fetch().is_none());
        assert!(state.force_fetch().is_none());
        assert!(state.on_tick().is_none());
        assert!(state.take_deferred_refresh().is_none());
        assert_eq!(state.view().stats.deferred_refreshes, 2);
        assert_eq!(state.view().stats.issued, 2);

        // The superseded fetch finishing frees a slot for the deferred one.
        assert_eq!(state.complete(first, Ok(snapshot(1.0))), Completion::Superseded);
        let third = state.take_deferred_refresh().unwrap();
        assert_eq!(third.sequence(), 3);
        assert_eq!(state.in_flight(), 2);
        assert!(state.take_deferred_refresh().is_none());

        // Second is now superseded by third.
        assert_eq!(state.complete(second, Ok(snapshot(2.0))), Completion::Superseded);
        assert_eq!(state.complete(third, Ok(snapshot(3.0))), Completion::Applied);
        assert_eq!(state.in_flight(), 0);
        assert_eq!(state.view().sequence, 3);
        assert_eq!(state.view().stats.discarded, 2);
    }

    #[test]
    fn test_failure_keeps_previous_charts() {
        let mut state = state();
        let ticket = state.on_tick().unwrap();
        state.complete(ticket, Ok(snapshot(5.0)));
        let before = state.view();

        let ticket = state.on_tick().unwrap();
        assert_eq!(state.complete(ticket, Err(SourceError::Empty)), Completion::Failed);

        let view = state.view();
        assert_eq!(view.status, DashboardStatus::Error);
        assert_eq!(view.error.as_deref(), Some("No snapshot available yet"));
        assert_eq!(view.sequence, 1);
        assert!(Arc::ptr_eq(
            view.charts.as_ref().unwrap(),
            before.charts.as_ref().unwrap()
        ));

        // Next tick retries, and success clears the error.
        let ticket = state.on_tick().unwrap();
        assert_eq!(state.view().status, DashboardStatus::Fetching);
        state.complete(ticket, Ok(snapshot(6.0)));
        let view = state.view();
        assert_eq!(view.status, DashboardStatus::Ready);
        assert!(view.error.is_none());
        assert_eq!(view.sequence, 3);
        assert_eq!(view.stats.failed, 1);
    }

    #[test]
    fn test_dispose_ignores_in_flight_completion() {
        let mut state = state();
        let ticket = state.on_tick().unwrap();

        assert!(state.dispose());
        assert!(!state.dispose());
        assert_eq!(state.complete(ticket, Ok(snapshot(1.0))), Completion::Disposed);

        let view = state.view();
        assert_eq!(view.status, DashboardStatus::Disposed);
        assert!(!view.has_charts());
        assert!(state.on_tick().is_none());
        assert!(state.force_fetch().is_none());
    }

    #[test]
    fn test_views_are_replaced_not_mutated() {
        let mut state = state();
        let idle = state.view();
        let _ticket = state.on_tick().unwrap();

        assert_eq!(idle.status, DashboardStatus::Idle);
        assert!(!Arc::ptr_eq(&idle, &state.view()));
    }
}
