//! Audio duration probing.
//!
//! Only MP3 and FLAC containers are read. The file handle lives for the
//! duration of a single call and is released on every exit path.

use lofty::file::FileType;
use lofty::prelude::*;
use lofty::probe::Probe;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Duration probing errors
#[derive(Debug, Error)]
pub enum ProbeError {
    /// Extension is not one of the supported containers
    #[error("Unknown audio format '{extension}' for file {}", path.display())]
    UnsupportedFormat { path: PathBuf, extension: String },

    /// Container could not be parsed
    #[error("Failed to read {}: {message}", path.display())]
    Read { path: PathBuf, message: String },

    /// I/O error (file open)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Supported audio containers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioFormat {
    Mp3,
    Flac,
}

impl AudioFormat {
    /// Match a path's extension case-insensitively.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?;
        if ext.eq_ignore_ascii_case("mp3") {
            Some(AudioFormat::Mp3)
        } else if ext.eq_ignore_ascii_case("flac") {
            Some(AudioFormat::Flac)
        } else {
            None
        }
    }

    fn file_type(self) -> FileType {
        match self {
            AudioFormat::Mp3 => FileType::Mpeg,
            AudioFormat::Flac => FileType::Flac,
        }
    }
}

pub fn is_supported(path: &Path) -> bool {
    AudioFormat::from_path(path).is_some()
}

/// Resolve the format of a path or fail with `UnsupportedFormat`.
pub fn require_format(path: &Path) -> Result<AudioFormat, ProbeError> {
    AudioFormat::from_path(path).ok_or_else(|| ProbeError::UnsupportedFormat {
        path: path.to_path_buf(),
        extension: path
            .extension()
            .map(|e| format!(".{}", e.to_string_lossy()))
            .unwrap_or_default(),
    })
}

/// Source of playback durations. The engine only depends on this seam so
/// tests can supply fixed durations without real audio files.
pub trait DurationProbe {
    fn duration(&self, path: &Path) -> Result<Duration, ProbeError>;
}

impl<P: DurationProbe + ?Sized> DurationProbe for &P {
    fn duration(&self, path: &Path) -> Result<Duration, ProbeError> {
        (**self).duration(path)
    }
}

/// Reads the duration from the audio container with lofty.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoftyProbe;

impl DurationProbe for LoftyProbe {
    fn duration(&self, path: &Path) -> Result<Duration, ProbeError> {
        let format = require_format(path)?;

        let reader = BufReader::new(File::open(path)?);
        let tagged_file = Probe::new(reader)
            .set_file_type(format.file_type())
            .read()
            .map_err(|e| ProbeError::Read {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;

        let duration = tagged_file.properties().duration();
        tracing::debug!(
            file = %path.display(),
            format = ?format,
            duration_s = duration.as_secs_f64(),
            "Probed duration"
        );
        Ok(duration)
    }
}
