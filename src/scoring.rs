//! Scoring functions for track identification.
//!
//! This module contains all scoring-related functions including:
//! - Edit distance between a file stem and catalog titles
//! - Distance bucketing and the auto-match rule
//! - Qualitative ratings for distances and durations

use std::time::Duration;
use thiserror::Error;

use crate::models::{Candidate, CatalogEntry, DistanceBuckets, Rating};

// ============================================================================
// Rating Thresholds
// ============================================================================

/// Distances at or below this are rated `Best`
pub const DISTANCE_BEST_MAX: usize = 3;

/// Distances at or below this (and above `DISTANCE_BEST_MAX`) are rated `Medium`
pub const DISTANCE_MEDIUM_MAX: usize = 10;

/// Whole seconds of drift still rated `Medium`
pub const DURATION_MEDIUM_MAX_SECS: u64 = 1;

// ============================================================================
// Distance Scoring
// ============================================================================

/// Levenshtein distance over Unicode scalar values, case-sensitive.
pub fn edit_distance(a: &str, b: &str) -> usize {
    strsim::levenshtein(a, b)
}

/// Score every catalog entry against a normalized name.
///
/// Catalog titles are compared as-is. Every entry lands in exactly one
/// bucket, and entries sharing a distance keep their catalog order.
pub fn enumerate_distances<'a>(name: &str, catalog: &'a [CatalogEntry]) -> DistanceBuckets<'a> {
    let mut distances = DistanceBuckets::new();
    for entry in catalog {
        let distance = edit_distance(&entry.title, name);
        distances.entry(distance).or_default().push(entry);
    }
    distances
}

/// Accept a match without asking iff exactly one entry sits at distance 0.
pub fn auto_match<'a>(distances: &DistanceBuckets<'a>) -> Option<&'a CatalogEntry> {
    match distances.get(&0).map(Vec::as_slice) {
        Some([only]) => Some(*only),
        _ => None,
    }
}

/// Flatten buckets into the global ranking (ascending distance).
pub fn rank_candidates<'a>(distances: &DistanceBuckets<'a>) -> Vec<Candidate<'a>> {
    distances
        .iter()
        .flat_map(|(&distance, entries)| {
            entries.iter().map(move |&entry| Candidate { entry, distance })
        })
        .collect()
}

pub fn distance_rating(distance: usize) -> Rating {
    if distance <= DISTANCE_BEST_MAX {
        Rating::Best
    } else if distance <= DISTANCE_MEDIUM_MAX {
        Rating::Medium
    } else {
        Rating::Worst
    }
}

// ============================================================================
// Duration Scoring
// ============================================================================

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DurationParseError {
    #[error("duration '{0}' is not in MM:SS form")]
    Malformed(String),

    #[error("duration '{0}' has {1} seconds")]
    SecondsOutOfRange(String, u64),
}

/// Parse a catalog duration such as `"03:45"`. There is no hour component,
/// so long tracks show up as e.g. `"72:10"`.
pub fn parse_catalog_duration(text: &str) -> Result<Duration, DurationParseError> {
    let malformed = || DurationParseError::Malformed(text.to_string());

    let (minutes, seconds) = text.trim().split_once(':').ok_or_else(malformed)?;
    let all_digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    if !all_digits(minutes) || !all_digits(seconds) {
        return Err(malformed());
    }

    let minutes: u64 = minutes.parse().map_err(|_| malformed())?;
    let seconds: u64 = seconds.parse().map_err(|_| malformed())?;
    if seconds >= 60 {
        return Err(DurationParseError::SecondsOutOfRange(text.to_string(), seconds));
    }

    Ok(Duration::from_secs(minutes * 60 + seconds))
}

/// Rate a catalog duration against the probed one, at whole-second precision.
pub fn duration_rating(probed: Duration, catalog: Duration) -> Rating {
    let diff = probed.as_secs().abs_diff(catalog.as_secs());
    match diff {
        0 => Rating::Best,
        1..=DURATION_MEDIUM_MAX_SECS => Rating::Medium,
        _ => Rating::Worst,
    }
}

/// Rate a raw catalog duration string; unparseable text is rated `Worst`.
pub fn catalog_duration_rating(probed: Duration, duration_text: &str) -> Rating {
    match parse_catalog_duration(duration_text) {
        Ok(catalog) => duration_rating(probed, catalog),
        Err(e) => {
            tracing::debug!(error = %e, "Unparseable catalog duration");
            Rating::Worst
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: &str, title: &str) -> CatalogEntry {
        CatalogEntry {
            id: id.to_string(),
            album: String::new(),
            artist: String::new(),
            duration_text: "03:00".to_string(),
            href: String::new(),
            is_liked: false,
            title: title.to_string(),
        }
    }

    #[test]
    fn test_edit_distance() {
        assert_eq!(edit_distance("kitten", "sitting"), 3);
        assert_eq!(edit_distance("", "abc"), 3);
        assert_eq!(edit_distance("same", "same"), 0);
        // Case-sensitive
        assert_eq!(edit_distance("Song", "song"), 1);
        // Counted per character, not per byte
        assert_eq!(edit_distance("Jóga", "Joga"), 1);
    }

    #[test]
    fn test_enumerate_distances_every_entry_once() {
        let catalog = vec![
            entry("1", "Song_A"),
            entry("2", "Song_B"),
            entry("3", "Something Else"),
            entry("4", "Song_A"),
        ];
        let distances = enumerate_distances("Song_A", &catalog);

        let total: usize = distances.values().map(Vec::len).sum();
        assert_eq!(total, catalog.len());

        for (distance, entries) in &distances {
            for e in entries {
                assert_eq!(*distance, edit_distance(&e.title, "Song_A"));
            }
        }

        // Catalog order within a bucket
        let zero: Vec<&str> = distances[&0].iter().map(|e| e.id.as_str()).collect();
        assert_eq!(zero, vec!["1", "4"]);
    }

    #[test]
    fn test_enumerate_distances_catalog_side_not_normalized() {
        let catalog = vec![entry("1", "Who Are You?")];
        let distances = enumerate_distances("Who Are You_", &catalog);
        assert!(distances.contains_key(&1));
        assert!(!distances.contains_key(&0));
    }

    #[test]
    fn test_auto_match_single_zero() {
        let catalog = vec![entry("1", "Song_A"), entry("2", "Song_B")];
        let distances = enumerate_distances("Song_A", &catalog);
        assert_eq!(auto_match(&distances).map(|e| e.id.as_str()), Some("1"));
    }

    #[test]
    fn test_auto_match_defers_on_tie_or_no_exact() {
        let tied = vec![entry("1", "Song_A"), entry("2", "Song_A")];
        assert!(auto_match(&enumerate_distances("Song_A", &tied)).is_none());

        let inexact = vec![entry("1", "Song_B")];
        assert!(auto_match(&enumerate_distances("Song_A", &inexact)).is_none());

        let empty: Vec<CatalogEntry> = Vec::new();
        assert!(auto_match(&enumerate_distances("Song_A", &empty)).is_none());
    }

    #[test]
    fn test_rank_candidates_ascending() {
        let catalog = vec![
            entry("far", "Completely Different"),
            entry("near", "Song_B"),
            entry("exact", "Song_A"),
        ];
        let ranked = rank_candidates(&enumerate_distances("Song_A", &catalog));
        let ids: Vec<&str> = ranked.iter().map(|c| c.entry.id.as_str()).collect();
        assert_eq!(ids, vec!["exact", "near", "far"]);
        assert!(ranked.windows(2).all(|w| w[0].distance <= w[1].distance));
    }

    #[test]
    fn test_distance_rating_thresholds() {
        assert_eq!(distance_rating(0), Rating::Best);
        assert_eq!(distance_rating(3), Rating::Best);
        assert_eq!(distance_rating(4), Rating::Medium);
        assert_eq!(distance_rating(10), Rating::Medium);
        assert_eq!(distance_rating(11), Rating::Worst);
    }

    #[test]
    fn test_parse_catalog_duration() {
        assert_eq!(parse_catalog_duration("03:45"), Ok(Duration::from_secs(225)));
        assert_eq!(parse_catalog_duration("0:07"), Ok(Duration::from_secs(7)));
        assert_eq!(parse_catalog_duration("72:10"), Ok(Duration::from_secs(4330)));
        assert!(parse_catalog_duration("3m45").is_err());
        assert!(parse_catalog_duration("1:02:03").is_err());
        assert!(parse_catalog_duration(":45").is_err());
        assert!(parse_catalog_duration("-1:45").is_err());
        assert_eq!(
            parse_catalog_duration("03:75"),
            Err(DurationParseError::SecondsOutOfRange("03:75".to_string(), 75))
        );
    }

    #[test]
    fn test_duration_rating() {
        let catalog = parse_catalog_duration("03:45").unwrap();
        assert_eq!(duration_rating(Duration::from_secs(225), catalog), Rating::Best);
        assert_eq!(duration_rating(Duration::from_millis(225_600), catalog), Rating::Best);
        assert_eq!(duration_rating(Duration::from_secs(226), catalog), Rating::Medium);
        assert_eq!(duration_rating(Duration::from_secs(224), catalog), Rating::Medium);
        assert_eq!(duration_rating(Duration::from_secs(230), catalog), Rating::Worst);
    }

    #[test]
    fn test_catalog_duration_rating_malformed_is_worst() {
        assert_eq!(catalog_duration_rating(Duration::from_secs(225), "n/a"), Rating::Worst);
        assert_eq!(catalog_duration_rating(Duration::from_secs(225), "03:45"), Rating::Best);
    }
}
