//! Chart preparation.
//!
//! Turns a [`HealthSnapshot`](healthpie_types::HealthSnapshot) into the five
//! dashboard [`ChartConfig`](healthpie_types::ChartConfig)s. Builders are
//! pure and return fresh values; nothing here holds state.

mod builder;
mod format;
pub mod palette;

pub use builder::{
    build_all, client_throughput, is_client_read_write_showable, object_health,
    pg_status_distribution, raw_capacity_usage, read_write_ratio,
};
pub use format::{DimlessFormatter, UnitFormatter};
