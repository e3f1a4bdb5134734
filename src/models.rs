//! Core data models for track identification.
//!
//! This module contains the catalog record, the transient per-file scoring
//! types, and the run statistics written at the end of a batch.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ============================================================================
// Type Aliases
// ============================================================================

/// Catalog entries grouped by edit distance to a normalized file stem.
/// Ascending key order is the ranking used for display and auto-selection;
/// within a bucket entries keep catalog order.
pub type DistanceBuckets<'a> = BTreeMap<usize, Vec<&'a CatalogEntry>>;

// ============================================================================
// Catalog Models
// ============================================================================

/// One track from the metadata export.
///
/// Every field is required; an unknown field or a missing one fails
/// deserialization of the whole catalog.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct CatalogEntry {
    pub id: String,
    pub album: String,
    pub artist: String,
    #[serde(rename = "duration")]
    pub duration_text: String, // "MM:SS", no hour component
    pub href: String,
    #[serde(rename = "isLiked")]
    pub is_liked: bool,
    pub title: String,
}

// ============================================================================
// Scoring Models
// ============================================================================

/// A catalog entry paired with its distance to the current file.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Candidate<'a> {
    pub entry: &'a CatalogEntry,
    pub distance: usize,
}

/// Qualitative rating shown next to a distance or a duration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Rating {
    Best,
    Medium,
    Worst,
}

// ============================================================================
// Decisions
// ============================================================================

/// Final per-file output of the engine.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Decision {
    /// Catalog id the file should be renamed to
    Matched(String),
    /// Operator chose to skip the file
    NoMatch,
}

impl Decision {
    pub fn id(&self) -> Option<&str> {
        match self {
            Decision::Matched(id) => Some(id),
            Decision::NoMatch => None,
        }
    }
}

/// How a decision was reached, for statistics and logging.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Resolution {
    /// Single exact title match, no prompt shown
    Auto,
    /// Operator picked a candidate
    Operator,
    /// Operator skipped the file
    Skipped,
}

// ============================================================================
// Statistics (Instrumentation)
// ============================================================================

/// Per-run counters, logged at the end and optionally written as JSON.
#[derive(Default, Debug, Clone, Serialize)]
pub struct RunStats {
    pub catalog_entries: usize,
    pub files_seen: usize,

    // Decisions
    pub auto_matched: usize,
    pub operator_selected: usize,
    pub operator_skipped: usize,

    // Files dropped before a decision (unsupported or unreadable container)
    pub probe_failures: usize,

    // Disposition
    pub copied: usize,
    pub moved: usize,
    pub refused_targets: usize,
    pub dry_run: bool,

    // Timing
    pub elapsed_seconds: f64,
}

impl RunStats {
    /// Record the outcome of one identified file.
    pub fn record_resolution(&mut self, resolution: Resolution) {
        match resolution {
            Resolution::Auto => self.auto_matched += 1,
            Resolution::Operator => self.operator_selected += 1,
            Resolution::Skipped => self.operator_skipped += 1,
        }
    }

    /// Number of files that ended with a catalog id.
    pub fn total_matches(&self) -> usize {
        self.auto_matched + self.operator_selected
    }

    /// Calculate match rate as a percentage
    pub fn match_rate(&self) -> f64 {
        if self.files_seen == 0 {
            0.0
        } else {
            100.0 * self.total_matches() as f64 / self.files_seen as f64
        }
    }

    /// Write stats to a JSON file
    pub fn write_to_file(&self, path: &std::path::Path) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}
