//! Catalog loading and input directory enumeration.

use anyhow::{Context, Result};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use crate::models::CatalogEntry;
use crate::probe::is_supported;

/// Read the metadata export. Any unreadable file, malformed JSON or
/// incomplete record fails the whole load.
pub fn load_catalog(path: &Path) -> Result<Vec<CatalogEntry>> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open metadata file {}", path.display()))?;
    let catalog: Vec<CatalogEntry> = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("Failed to parse metadata file {}", path.display()))?;
    Ok(catalog)
}

/// List candidate audio files directly inside `dir`.
///
/// Directories and files whose extension is not mp3/flac (any case) are
/// skipped. Results are sorted by file name so runs are reproducible.
pub fn scan_input_dir(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = std::fs::read_dir(dir)
        .with_context(|| format!("Failed to read input directory {}", dir.display()))?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry?;
        let path = entry.path();
        if path.is_dir() {
            continue;
        }
        if !is_supported(&path) {
            tracing::debug!(file = %path.display(), "Skipping unsupported file");
            continue;
        }
        files.push(path);
    }

    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}
