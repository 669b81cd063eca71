//! Placement group status categories.

use core::fmt;

/// Coarse-grained bucket a placement group status label is classified into.
///
/// The declaration order is the display order of every PG chart and never
/// changes at runtime. Use [`PgCategory::ALL`] to iterate in that order and
/// [`PgCategory::index`] to address fixed-size per-category storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum PgCategory {
    /// Active and clean, nothing to do.
    Clean,
    /// Recovery, backfill, scrubbing or peering in progress.
    Working,
    /// Degraded in a way that needs operator attention.
    Warning,
    /// Anything the rule table does not recognise.
    Unknown,
}

impl PgCategory {
    /// Number of categories.
    pub const COUNT: usize = 4;

    /// All categories in display order.
    pub const ALL: [PgCategory; PgCategory::COUNT] = [
        PgCategory::Clean,
        PgCategory::Working,
        PgCategory::Warning,
        PgCategory::Unknown,
    ];

    /// Ordinal of this category within [`PgCategory::ALL`].
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Machine name, as used in configuration files.
    pub fn as_str(&self) -> &'static str {
        match self {
            PgCategory::Clean => "clean",
            PgCategory::Working => "working",
            PgCategory::Warning => "warning",
            PgCategory::Unknown => "unknown",
        }
    }

    /// Display label used in chart legends.
    pub fn label(&self) -> &'static str {
        match self {
            PgCategory::Clean => "Clean",
            PgCategory::Working => "Working",
            PgCategory::Warning => "Warning",
            PgCategory::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for PgCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
