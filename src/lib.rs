//! # healthpie
//!
//! Cluster health telemetry aggregation and donut-chart preparation for
//! storage dashboards.
//!
//! This crate turns periodically fetched health snapshots of a storage
//! cluster into small, percentage-based chart configurations: client IOPS
//! read/write ratio, client throughput, raw capacity usage, placement group
//! status distribution and object replica health. Rendering is left to the
//! consumer; every [`ChartConfig`](healthpie_types::ChartConfig) is plain
//! data.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                        HealthDashboard                           │
//! │  ┌──────────┐  fetch   ┌────────────┐  snapshot  ┌────────────┐  │
//! │  │  timer / │─────────▶│   source   │───────────▶│  charts    │  │
//! │  │ refresh  │          │ (Metrics-  │            │ (builders) │  │
//! │  └────┬─────┘          │  Source)   │            └─────┬──────┘  │
//! │       │ sequence       └────────────┘                  │         │
//! │       ▼                                                ▼         │
//! │  ┌──────────┐        ┌──────────┐   ┌───────┐   ┌────────────┐   │
//! │  │  state   │───────▶│  view    │   │ ratio │◀──│  classify  │   │
//! │  │ (fenced) │ publish│ (watch)  │   └───────┘   └────────────┘   │
//! │  └──────────┘        └──────────┘                                │
//! └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! - **[`classify`]**: ordered rule table mapping raw PG status labels to
//!   [`PgCategory`](healthpie_types::PgCategory) buckets
//! - **[`ratio`]**: percentage math that never divides by zero, and
//!   category folding
//! - **[`charts`]**: pure chart builders plus the [`UnitFormatter`] seam
//! - **[`source`]**: the [`MetricsSource`] trait with file and channel
//!   implementations
//! - **[`controller`]**: refresh timer, fetch sequencing and view publishing
//! - **[`settings`]**: layered configuration (file, environment)
//!
//! ## Usage
//!
//! ### Building charts from one snapshot
//!
//! ```
//! use healthpie::{charts, CategoryClassifier, DimlessFormatter};
//! use healthpie_types::HealthSnapshot;
//!
//! let snapshot = HealthSnapshot::builder()
//!     .client_perf(|p| p.read_ops(80.0).write_ops(20.0))
//!     .build();
//!
//! let set = charts::build_all(&snapshot, &CategoryClassifier::default(), &DimlessFormatter);
//! assert_eq!(set.read_write_ratio.segments, vec![80, 20]);
//! assert_eq!(set.read_write_ratio.center_label.as_deref(), Some("100\nIOPS"));
//! ```
//!
//! ### Running a dashboard over a channel source
//!
//! ```no_run
//! use healthpie::{ChannelSource, HealthDashboard};
//! use healthpie_types::HealthSnapshot;
//!
//! # tokio_test::block_on(async {
//! let (publisher, source) = ChannelSource::create("collector");
//! let handle = HealthDashboard::builder().build(source).start();
//!
//! publisher.publish(HealthSnapshot::default());
//! handle.refresh();
//!
//! let view = handle.current();
//! println!("{:?}", view.status);
//! handle.dispose().await;
//! # });
//! ```

pub mod charts;
pub mod classify;
pub mod controller;
pub mod duration;
pub mod ratio;
pub mod settings;
pub mod source;

// Re-export main types for convenience
pub use charts::{DimlessFormatter, UnitFormatter};
pub use classify::{CategoryClassifier, CategoryRule, Matcher};
pub use controller::{
    DashboardHandle, DashboardStatus, DashboardView, FetchStats, HealthDashboard,
    HealthDashboardBuilder,
};
pub use ratio::{classify_and_total, distribute, percentage, CategoryCounts};
pub use settings::{ConfigError, DashboardConfig};
pub use source::{ChannelSource, FileSource, MetricsSource, SnapshotPublisher, SourceError};
