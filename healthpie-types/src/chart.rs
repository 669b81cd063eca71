//! Renderer-agnostic chart configurations.

use core::fmt;

/// Separator between the two display lines of a center label.
pub const LINE_SEPARATOR: char = '\n';

/// Integer percentage, nominally in `0..=100`.
pub type Percent = u8;

/// Data handed to a donut/pie renderer: ordered labels, ordered percentage
/// segments (same length) and optional center text.
///
/// Segments are rounded independently, so their sum is within
/// `segments.len() - 1` of 100, or exactly 0 when the underlying total is 0.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct ChartConfig {
    /// One legend label per segment.
    pub labels: Vec<String>,
    /// One percentage per label.
    pub segments: Vec<Percent>,
    /// Two display lines joined by [`LINE_SEPARATOR`].
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub center_label: Option<String>,
    /// Segment background colors, in segment order.
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Vec::is_empty"))]
    pub colors: Vec<String>,
}

impl ChartConfig {
    /// Create a chart from labels and segments.
    ///
    /// Labels and segments are paired one to one; debug builds check it.
    pub fn new(labels: Vec<String>, segments: Vec<Percent>) -> Self {
        debug_assert_eq!(
            labels.len(),
            segments.len(),
            "chart labels and segments must have the same length"
        );
        Self {
            labels,
            segments,
            center_label: None,
            colors: Vec::new(),
        }
    }

    /// Set the center label from its two display lines.
    pub fn with_center(mut self, first: impl fmt::Display, second: impl fmt::Display) -> Self {
        self.center_label = Some(format!("{first}{LINE_SEPARATOR}{second}"));
        self
    }

    /// Set the center label verbatim.
    pub fn with_center_label(mut self, label: impl Into<String>) -> Self {
        self.center_label = Some(label.into());
        self
    }

    /// Set segment colors.
    pub fn with_colors(mut self, colors: &[&str]) -> Self {
        self.colors = colors.iter().map(|c| c.to_string()).collect();
        self
    }

    /// Number of segments.
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Check if the chart has no segments at all.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Sum of all segment percentages.
    pub fn total_percent(&self) -> u32 {
        self.segments.iter().map(|s| u32::from(*s)).sum()
    }

    /// Check if every segment is zero (nothing to draw).
    pub fn is_blank(&self) -> bool {
        self.segments.iter().all(|s| *s == 0)
    }

    /// Slice border width: 1 when more than one segment is visible, else 0.
    pub fn border_width(&self) -> u8 {
        let visible = self.segments.iter().filter(|s| **s > 0).count();
        if visible > 1 {
            1
        } else {
            0
        }
    }

    /// Tooltip text for a segment, e.g. `Reads: 80/s (80%)`.
    pub fn tooltip(&self, index: usize) -> Option<String> {
        let label = self.labels.get(index)?;
        let segment = self.segments.get(index)?;
        Some(format!("{label} ({segment}%)"))
    }

    /// The center label split into its display lines.
    pub fn center_lines(&self) -> Vec<&str> {
        self.center_label
            .as_deref()
            .map(|label| label.split(LINE_SEPARATOR).collect())
            .unwrap_or_default()
    }
}

/// The charts shown on the health dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ChartKind {
    ReadWriteRatio,
    ClientThroughput,
    RawCapacity,
    PgStatus,
    ObjectHealth,
}

impl ChartKind {
    /// All charts in dashboard order.
    pub const ALL: [ChartKind; 5] = [
        ChartKind::ReadWriteRatio,
        ChartKind::ClientThroughput,
        ChartKind::RawCapacity,
        ChartKind::PgStatus,
        ChartKind::ObjectHealth,
    ];

    /// Display title.
    pub fn title(&self) -> &'static str {
        match self {
            ChartKind::ReadWriteRatio => "Client Read/Write",
            ChartKind::ClientThroughput => "Client Throughput",
            ChartKind::RawCapacity => "Raw Capacity",
            ChartKind::PgStatus => "PG Status",
            ChartKind::ObjectHealth => "Objects",
        }
    }
}

/// One consistent set of dashboard charts, all derived from the same snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ChartSet {
    pub read_write_ratio: ChartConfig,
    pub client_throughput: ChartConfig,
    pub raw_capacity: ChartConfig,
    pub pg_status: ChartConfig,
    pub object_health: ChartConfig,
}

impl ChartSet {
    /// Get a chart by kind.
    pub fn get(&self, kind: ChartKind) -> &ChartConfig {
        match kind {
            ChartKind::ReadWriteRatio => &self.read_write_ratio,
            ChartKind::ClientThroughput => &self.client_throughput,
            ChartKind::RawCapacity => &self.raw_capacity,
            ChartKind::PgStatus => &self.pg_status,
            ChartKind::ObjectHealth => &self.object_health,
        }
    }

    /// Iterate over all charts in dashboard order.
    pub fn iter(&self) -> impl Iterator<Item = (ChartKind, &ChartConfig)> {
        ChartKind::ALL.into_iter().map(move |kind| (kind, self.get(kind)))
    }
}
