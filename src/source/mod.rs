//! Snapshot sources.
//!
//! The dashboard never talks to a cluster directly. It asks a
//! [`MetricsSource`] for the latest [`HealthSnapshot`] on every tick, so the
//! same controller runs against a JSON file, an in-process channel fed by
//! some other collector, or a scripted source in tests.

mod channel;
mod file;

pub use channel::{ChannelSource, SnapshotPublisher};
pub use file::FileSource;

use std::fmt::Debug;
use std::sync::Arc;

use async_trait::async_trait;
use healthpie_types::HealthSnapshot;
use thiserror::Error;

/// Errors a source can report for a single fetch.
///
/// A failed fetch is not fatal: the dashboard keeps its last charts and
/// tries again on the next tick.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The backing file could not be read.
    #[error("Read error: {0}")]
    Read(#[from] std::io::Error),

    /// The payload is not a valid health snapshot.
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Nothing has been published yet.
    #[error("No snapshot available yet")]
    Empty,

    /// The producing side has gone away.
    #[error("Source closed")]
    Closed,

    /// Any other backend failure.
    #[error("Backend error: {0}")]
    Backend(String),
}

/// Something the dashboard can fetch health snapshots from.
///
/// # Example
///
/// ```no_run
/// use healthpie::{FileSource, MetricsSource};
///
/// # async fn demo() -> Result<(), healthpie::SourceError> {
/// let source = FileSource::new("health.json");
/// let snapshot = source.fetch().await?;
/// println!("{} PGs via {}", snapshot.total_pgs(), source.description());
/// # Ok(())
/// # }
/// ```
#[async_trait]
pub trait MetricsSource: Send + Sync + Debug {
    /// Fetch the latest snapshot.
    async fn fetch(&self) -> Result<HealthSnapshot, SourceError>;

    /// Human-readable description, used in logs.
    fn description(&self) -> &str;
}

#[async_trait]
impl<S: MetricsSource + ?Sized> MetricsSource for Arc<S> {
    async fn fetch(&self) -> Result<HealthSnapshot, SourceError> {
        (**self).fetch().await
    }

    fn description(&self) -> &str {
        (**self).description()
    }
}
