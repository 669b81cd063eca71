//! The health dashboard controller.
//!
//! [`HealthDashboard`] owns the refresh timer and the fetch sequencing for
//! one dashboard session. Starting it spawns a driver task and returns a
//! [`DashboardHandle`]; every change of state is published to subscribers
//! as a fresh `Arc<DashboardView>`, so readers always see a complete and
//! self-consistent set of charts.
//!
//! The driver never runs two tick-initiated fetches at once: a tick that
//! fires while a fetch is outstanding is dropped. A manual
//! [`refresh`](DashboardHandle::refresh) fetches right away, and whatever was
//! in flight before it is discarded when it completes. At most two fetches
//! run at once; a refresh beyond that waits for one of them to finish.

mod state;

pub use state::{
    Completion, DashboardState, DashboardStatus, DashboardView, FetchStats, FetchTicket,
    MAX_IN_FLIGHT,
};

use std::sync::Arc;
use std::time::Duration;

use healthpie_types::HealthSnapshot;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::charts::{DimlessFormatter, UnitFormatter};
use crate::classify::CategoryClassifier;
use crate::duration::format_duration;
use crate::settings::{DashboardConfig, DEFAULT_REFRESH_INTERVAL};
use crate::source::{MetricsSource, SourceError};

type FetchDone = (FetchTicket, Result<HealthSnapshot, SourceError>);

/// A configured, not yet running, dashboard.
///
/// # Example
///
/// ```rust,no_run
/// use healthpie::{FileSource, HealthDashboard};
/// use std::time::Duration;
///
/// #[tokio::main]
/// async fn main() {
///     let dashboard = HealthDashboard::builder()
///         .interval(Duration::from_secs(5))
///         .build(FileSource::new("health.json"));
///
///     let handle = dashboard.start();
///     let mut views = handle.subscribe();
///
///     while views.changed().await.is_ok() {
///         let view = views.borrow_and_update().clone();
///         if let Some(charts) = &view.charts {
///             println!("{:?}", charts.pg_status.segments);
///         }
///     }
/// }
/// ```
pub struct HealthDashboard {
    source: Arc<dyn MetricsSource>,
    interval: Duration,
    classifier: Arc<CategoryClassifier>,
    formatter: Arc<dyn UnitFormatter>,
}

impl HealthDashboard {
    /// Create a builder for configuring the dashboard.
    pub fn builder() -> HealthDashboardBuilder {
        HealthDashboardBuilder::new()
    }

    /// Create a dashboard from loaded settings.
    pub fn from_config<S: MetricsSource + 'static>(config: &DashboardConfig, source: S) -> Self {
        Self::builder()
            .interval(config.refresh_interval)
            .classifier(config.classifier())
            .build(source)
    }

    /// The refresh interval.
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Start refreshing.
    ///
    /// The first fetch is issued immediately, then once per interval. Must
    /// be called from within a tokio runtime.
    pub fn start(self) -> DashboardHandle {
        let state = DashboardState::new(self.classifier, self.formatter);
        let (view_tx, views) = watch::channel(state.view());
        let (refresh_tx, refresh_rx) = mpsc::channel(1);
        let (stop_tx, stop_rx) = watch::channel(false);

        tracing::info!(
            source = self.source.description(),
            interval = %format_duration(self.interval),
            "starting health dashboard"
        );

        let task = tokio::spawn(drive(
            self.source,
            self.interval,
            state,
            view_tx,
            refresh_rx,
            stop_rx,
        ));

        DashboardHandle {
            views,
            refresh_tx,
            stop_tx,
            task: Some(task),
        }
    }
}

impl std::fmt::Debug for HealthDashboard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HealthDashboard")
            .field("source", &self.source.description())
            .field("interval", &self.interval)
            .finish()
    }
}

/// Builder for configuring a [`HealthDashboard`].
#[derive(Default)]
pub struct HealthDashboardBuilder {
    interval: Option<Duration>,
    classifier: Option<CategoryClassifier>,
    formatter: Option<Arc<dyn UnitFormatter>>,
}

impl HealthDashboardBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the refresh interval.
    ///
    /// Defaults to 5 seconds if not specified.
    pub fn interval(mut self, interval: Duration) -> Self {
        self.interval = Some(interval);
        self
    }

    /// Set the PG classifier. Defaults to [`CategoryClassifier::ceph_default`].
    pub fn classifier(mut self, classifier: CategoryClassifier) -> Self {
        self.classifier = Some(classifier);
        self
    }

    /// Set the label formatter. Defaults to [`DimlessFormatter`].
    pub fn formatter<F: UnitFormatter + 'static>(mut self, formatter: F) -> Self {
        let formatter: Arc<dyn UnitFormatter> = Arc::new(formatter);
        self.formatter = Some(formatter);
        self
    }

    /// Build the dashboard around a source.
    pub fn build<S: MetricsSource + 'static>(self, source: S) -> HealthDashboard {
        HealthDashboard {
            source: Arc::new(source),
            interval: self
                .interval
                .filter(|i| !i.is_zero())
                .unwrap_or(DEFAULT_REFRESH_INTERVAL),
            classifier: Arc::new(self.classifier.unwrap_or_default()),
            formatter: match self.formatter {
                Some(formatter) => formatter,
                None => Arc::new(DimlessFormatter),
            },
        }
    }
}

/// Handle to a running dashboard.
///
/// Dropping the handle disposes the dashboard, or call
/// [`dispose`](Self::dispose) to wait for it.
#[derive(Debug)]
pub struct DashboardHandle {
    views: watch::Receiver<Arc<DashboardView>>,
    refresh_tx: mpsc::Sender<()>,
    stop_tx: watch::Sender<bool>,
    task: Option<JoinHandle<()>>,
}

impl DashboardHandle {
    /// The latest published view.
    pub fn current(&self) -> Arc<DashboardView> {
        Arc::clone(&self.views.borrow())
    }

    /// Receive every newly published view.
    pub fn subscribe(&self) -> watch::Receiver<Arc<DashboardView>> {
        self.views.clone()
    }

    /// Request an immediate fetch.
    ///
    /// Requests made before the driver picks up the previous one are
    /// coalesced. Returns `false` once the dashboard has stopped.
    pub fn refresh(&self) -> bool {
        match self.refresh_tx.try_send(()) {
            Ok(()) | Err(mpsc::error::TrySendError::Full(())) => true,
            Err(mpsc::error::TrySendError::Closed(())) => false,
        }
    }

    /// Stop the timer, ignore in-flight fetches, and wait for the driver to
    /// publish its final view.
    pub async fn dispose(mut self) -> Arc<DashboardView> {
        let _ = self.stop_tx.send(true);
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                tracing::warn!(error = %e, "dashboard driver did not shut down cleanly");
            }
        }
        self.current()
    }
}

impl Drop for DashboardHandle {
    fn drop(&mut self) {
        let _ = self.stop_tx.send(true);
    }
}

async fn drive(
    source: Arc<dyn MetricsSource>,
    interval: Duration,
    mut state: DashboardState,
    view_tx: watch::Sender<Arc<DashboardView>>,
    mut refresh_rx: mpsc::Receiver<()>,
    mut stop_rx: watch::Receiver<bool>,
) {
    let (done_tx, mut done_rx) = mpsc::unbounded_channel::<FetchDone>();
    let mut timer = tokio::time::interval(interval);
    timer.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = timer.tick() => {
                if let Some(ticket) = state.on_tick() {
                    spawn_fetch(&source, ticket, &done_tx);
                }
            }
            Some(()) = refresh_rx.recv() => {
                if let Some(ticket) = state.force_fetch() {
                    spawn_fetch(&source, ticket, &done_tx);
                }
            }
            Some((ticket, result)) = done_rx.recv() => {
                state.complete(ticket, result);
                if let Some(ticket) = state.take_deferred_refresh() {
                    spawn_fetch(&source, ticket, &done_tx);
                }
            }
            // Err means the handle is gone.
            res = stop_rx.changed() => {
                if res.is_err() || *stop_rx.borrow() {
                    break;
                }
            }
        }
        publish(&view_tx, state.view());
    }

    state.dispose();
    publish(&view_tx, state.view());
    tracing::info!(source = source.description(), "health dashboard disposed");
}

fn spawn_fetch(
    source: &Arc<dyn MetricsSource>,
    ticket: FetchTicket,
    done_tx: &mpsc::UnboundedSender<FetchDone>,
) {
    let source = Arc::clone(source);
    let done_tx = done_tx.clone();
    tokio::spawn(async move {
        let result = source.fetch().await;
        // The driver is gone after disposal; the result is simply dropped.
        let _ = done_tx.send((ticket, result));
    });
}

fn publish(view_tx: &watch::Sender<Arc<DashboardView>>, view: Arc<DashboardView>) {
    view_tx.send_if_modified(|current| {
        if Arc::ptr_eq(current, &view) {
            false
        } else {
            *current = view;
            true
        }
    });
}
