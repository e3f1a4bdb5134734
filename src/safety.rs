//! Safety utilities to prevent accidental file loss.
//!
//! These checks run before a matched file is copied or moved, so a bad
//! catalog id can never clobber the source or an existing library file.

use anyhow::{bail, Result};
use std::path::Path;

/// Validates that a disposition target is safe to write.
///
/// Checks:
/// - The target cannot be the source file itself
/// - An existing target is only replaced when `overwrite` is set
/// - The catalog id must not smuggle path separators into the file name
///
/// # Arguments
/// * `source` - The audio file being identified
/// * `target` - The path it would be copied or moved to
/// * `overwrite` - Whether an existing target may be replaced
pub fn validate_target(source: &Path, target: &Path, overwrite: bool) -> Result<()> {
    if target == source {
        bail!(
            "Safety check failed: target '{}' is the source file",
            target.display()
        );
    }

    if let (Ok(s), Ok(t)) = (source.canonicalize(), target.canonicalize()) {
        if s == t {
            bail!(
                "Safety check failed: target '{}' resolves to source '{}'",
                target.display(),
                source.display()
            );
        }
    }

    if target.exists() && !overwrite {
        bail!(
            "Safety check failed: target '{}' already exists (use --overwrite to replace it)",
            target.display()
        );
    }

    Ok(())
}

/// Validates that a catalog id can be used as a bare file name.
pub fn validate_id(id: &str) -> Result<()> {
    if id.is_empty() || id == "." || id == ".." || id.contains(['/', '\\']) {
        bail!("Safety check failed: catalog id '{}' is not a valid file name", id);
    }
    Ok(())
}
