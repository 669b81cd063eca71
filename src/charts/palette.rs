//! Segment colors for the dashboard donuts.

pub const RED: &str = "#c9190b";
pub const BLUE: &str = "#0066cc";
pub const ORANGE: &str = "#EF9234";
pub const YELLOW: &str = "#F6D173";
pub const GREEN: &str = "#7CC674";
pub const GRAY: &str = "#EDEDED";
pub const CYAN: &str = "#73C5C5";
pub const PURPLE: &str = "#3C3D99";

/// Reads vs. writes (ops and bytes).
pub const CLIENT: &[&str] = &[CYAN, PURPLE];

/// Used vs. available capacity.
pub const CAPACITY: &[&str] = &[BLUE, GRAY];

/// Good to bad, four steps: PG categories and object health.
pub const SEVERITY: &[&str] = &[GREEN, YELLOW, ORANGE, RED];
