//! Copy or move an identified file to its canonical name.

use anyhow::{Context, Result};
use std::fs::{self, File, FileTimes};
use std::path::{Path, PathBuf};

/// What to do with a matched file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    Copy,
    Move,
}

/// `output_dir/<id><.ext>`, keeping the source extension exactly as written.
pub fn target_path(output_dir: &Path, id: &str, source: &Path) -> PathBuf {
    let mut name = id.to_string();
    if let Some(ext) = source.extension() {
        name.push('.');
        name.push_str(&ext.to_string_lossy());
    }
    output_dir.join(name)
}

/// Perform the disposition, creating the target's directory if needed.
pub fn dispose(source: &Path, target: &Path, disposition: Disposition) -> Result<()> {
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create output directory {}", parent.display()))?;
    }

    match disposition {
        Disposition::Copy => copy_preserving(source, target),
        Disposition::Move => move_file(source, target),
    }
}

/// Copy contents and permissions, then carry over access/modification times.
fn copy_preserving(source: &Path, target: &Path) -> Result<()> {
    fs::copy(source, target).with_context(|| {
        format!("Failed to copy {} to {}", source.display(), target.display())
    })?;

    let metadata = fs::metadata(source)?;
    let mut times = FileTimes::new();
    if let Ok(accessed) = metadata.accessed() {
        times = times.set_accessed(accessed);
    }
    if let Ok(modified) = metadata.modified() {
        times = times.set_modified(modified);
    }
    File::options()
        .write(true)
        .open(target)
        .and_then(|f| f.set_times(times))
        .with_context(|| format!("Failed to set file times on {}", target.display()))?;
    Ok(())
}

/// Rename, falling back to copy + remove when the rename cannot cross filesystems.
fn move_file(source: &Path, target: &Path) -> Result<()> {
    if let Err(e) = fs::rename(source, target) {
        tracing::debug!(error = %e, "Rename failed, falling back to copy");
        copy_preserving(source, target)?;
        fs::remove_file(source)
            .with_context(|| format!("Failed to remove {} after copy", source.display()))?;
    }
    Ok(())
}
