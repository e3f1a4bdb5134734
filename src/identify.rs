//! Per-file identification: normalize, score, auto-match, else ask.

use std::io::{BufRead, Write};
use std::path::Path;

use crate::disambiguate::{prompt, Disambiguation};
use crate::models::{CatalogEntry, Decision, Resolution};
use crate::normalize::normalize_name;
use crate::probe::{require_format, DurationProbe, ProbeError};
use crate::scoring::{auto_match, enumerate_distances, rank_candidates};
use thiserror::Error;

/// Identification errors
#[derive(Debug, Error)]
pub enum IdentifyError {
    /// Duration could not be read; only this file is affected
    #[error(transparent)]
    Probe(#[from] ProbeError),

    /// Operator console failed
    #[error("Operator prompt failed: {0}")]
    Prompt(#[from] std::io::Error),
}

/// Identification engine over a borrowed catalog.
///
/// Holds no per-file state; each `identify` call is independent.
pub struct Identifier<'a, P> {
    catalog: &'a [CatalogEntry],
    probe: P,
}

impl<'a, P: DurationProbe> Identifier<'a, P> {
    pub fn new(catalog: &'a [CatalogEntry], probe: P) -> Self {
        Self { catalog, probe }
    }

    pub fn catalog(&self) -> &'a [CatalogEntry] {
        self.catalog
    }

    /// Decide which catalog entry `path` is.
    ///
    /// Files with an unsupported extension fail with
    /// `ProbeError::UnsupportedFormat` before the catalog is touched. The
    /// duration is only probed when the operator has to be asked.
    pub fn identify<R: BufRead, W: Write>(
        &self,
        path: &Path,
        input: &mut R,
        output: &mut W,
    ) -> Result<(Decision, Resolution), IdentifyError> {
        require_format(path)?;

        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy())
            .unwrap_or_default();
        let name = normalize_name(&stem);
        let distances = enumerate_distances(&name, self.catalog);

        if let Some(entry) = auto_match(&distances) {
            tracing::info!(file = %path.display(), id = %entry.id, "Auto-matched");
            return Ok((Decision::Matched(entry.id.clone()), Resolution::Auto));
        }

        let probed = self.probe.duration(path)?;
        let state = Disambiguation::new(rank_candidates(&distances));
        let file_name = path
            .file_name()
            .map(|s| s.to_string_lossy())
            .unwrap_or_default();

        let decision = prompt(state, &file_name, probed, input, output)?;
        let resolution = match decision {
            Decision::Matched(_) => Resolution::Operator,
            Decision::NoMatch => Resolution::Skipped,
        };
        tracing::debug!(file = %path.display(), decision = ?decision, "Operator decision");
        Ok((decision, resolution))
    }
}
