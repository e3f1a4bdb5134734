//! Filename normalization for catalog matching.
//!
//! Audio files named after a catalog title cannot carry characters that are
//! illegal (or awkward) in filenames, so rippers substitute `_` for them.
//! Applying the same substitution to a file stem makes it directly
//! comparable with the title it came from.

use once_cell::sync::Lazy;
use regex::Regex;

/// Characters that commonly stand in for quotes or punctuation in file names.
pub static FILENAME_UNSAFE: Lazy<Regex> = Lazy::new(|| Regex::new(r#"['"?&*:/]"#).unwrap());

/// Replace every filename-unsafe character with `_`.
/// Everything else, including case and whitespace, is left untouched.
pub fn normalize_name(name: &str) -> String {
    FILENAME_UNSAFE.replace_all(name, "_").into_owned()
}
