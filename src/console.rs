//! Console presentation: rating colors and duration formatting.
//!
//! Ratings are computed in `scoring`; this module only decides how they
//! look on a terminal.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use crate::models::Rating;

pub const COLOR_GOOD: &str = "\u{1B}[32m";
pub const COLOR_WARN: &str = "\u{1B}[33m";
pub const COLOR_BAD: &str = "\u{1B}[31m";
pub const COLOR_RESET: &str = "\u{1B}[0m";

/// Global flag for colored output (set from args in main)
pub static COLOR_ENABLED: AtomicBool = AtomicBool::new(true);

pub fn set_color(value: bool) {
    COLOR_ENABLED.store(value, Ordering::Relaxed);
}

pub fn is_color() -> bool {
    COLOR_ENABLED.load(Ordering::Relaxed)
}

pub fn rating_color(rating: Rating) -> &'static str {
    match rating {
        Rating::Best => COLOR_GOOD,
        Rating::Medium => COLOR_WARN,
        Rating::Worst => COLOR_BAD,
    }
}

/// Wrap text in the color for `rating`, or return it unchanged when colors are off.
pub fn paint(rating: Rating, text: &str) -> String {
    paint_with(is_color(), rating, text)
}

pub fn paint_with(color: bool, rating: Rating, text: &str) -> String {
    if color {
        format!("{}{}{}", rating_color(rating), text, COLOR_RESET)
    } else {
        text.to_string()
    }
}

/// Format a playback duration as `H:MM:SS`, fractional seconds dropped.
pub fn format_duration(d: Duration) -> String {
    let secs = d.as_secs();
    format!("{}:{:02}:{:02}", secs / 3600, (secs / 60) % 60, secs % 60)
}
