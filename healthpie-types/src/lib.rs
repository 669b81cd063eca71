//! # healthpie-types
//!
//! Core types for cluster health charts. This crate defines the snapshot
//! schema received from a storage cluster's health endpoint and the
//! renderer-agnostic chart configurations produced from it.
//!
//! ## Design Goals
//!
//! - **Explicit schema**: every optional wire field is decoded once and
//!   zero-defaulted, so consumers never deal with missing values
//! - **Optional serialization**: enable the `serde` feature to decode the
//!   health endpoint's JSON and to serialize chart configurations
//! - **Fixed category order**: [`PgCategory::ALL`] is declared once and drives
//!   every segment ordering
//! - **Immutable outputs**: a [`ChartConfig`] is a value, never mutated after
//!   it is built
//!
//! ## Features
//!
//! - `serde`: JSON (or any serde format) support for snapshots and charts
//!
//! ## Example
//!
//! ```rust
//! use healthpie_types::{HealthSnapshot, ObjectStats, OverallHealth};
//!
//! let snapshot = HealthSnapshot::builder()
//!     .health(OverallHealth::Ok)
//!     .client_perf(|p| p.read_ops(80.0).write_ops(20.0))
//!     .capacity(1000.0, 250.0)
//!     .pg_status("active+clean", 10)
//!     .pg_status("active+recovering", 5)
//!     .object_stats(ObjectStats {
//!         num_objects: 100,
//!         num_object_copies: 300,
//!         ..Default::default()
//!     })
//!     .build();
//!
//! assert_eq!(snapshot.client_perf.total_ops(), 100.0);
//! assert_eq!(snapshot.total_pgs(), 15);
//! ```

mod category;
mod chart;
mod health;
mod snapshot;

#[cfg(feature = "serde")]
mod wire;

pub use category::*;
pub use chart::*;
pub use health::*;
pub use snapshot::*;
