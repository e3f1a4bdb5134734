//! End-to-end identification through the public API, with a fixed-duration
//! probe and scripted operator input.

use std::cell::Cell;
use std::io::Cursor;
use std::path::Path;
use std::time::Duration;

use track_identify::console::set_color;
use track_identify::identify::{IdentifyError, Identifier};
use track_identify::library::scan_input_dir;
use track_identify::models::{CatalogEntry, Decision, Rating, Resolution};
use track_identify::probe::{DurationProbe, ProbeError};
use track_identify::scoring::{catalog_duration_rating, enumerate_distances};

struct FixedProbe {
    duration: Duration,
    calls: Cell<usize>,
}

impl FixedProbe {
    fn new(secs: u64) -> Self {
        Self {
            duration: Duration::from_secs(secs),
            calls: Cell::new(0),
        }
    }
}

impl DurationProbe for FixedProbe {
    fn duration(&self, _path: &Path) -> Result<Duration, ProbeError> {
        self.calls.set(self.calls.get() + 1);
        Ok(self.duration)
    }
}

fn entry(id: &str, title: &str, duration: &str) -> CatalogEntry {
    CatalogEntry {
        id: id.to_string(),
        album: "Album".to_string(),
        artist: "Artist".to_string(),
        duration_text: duration.to_string(),
        href: format!("https://music.example.invalid/watch?v={}", id),
        is_liked: false,
        title: title.to_string(),
    }
}

fn run(
    identifier: &Identifier<'_, &FixedProbe>,
    file: &str,
    script: &str,
) -> (Result<(Decision, Resolution), IdentifyError>, String) {
    set_color(false);
    let mut input = Cursor::new(script.to_string());
    let mut output = Vec::new();
    let result = identifier.identify(Path::new(file), &mut input, &mut output);
    (result, String::from_utf8(output).unwrap())
}

#[test]
fn scenario_a_single_exact_match_is_automatic() {
    let catalog = vec![entry("id-a", "Song_A", "03:45")];
    let probe = FixedProbe::new(225);
    let identifier = Identifier::new(&catalog, &probe);

    let (result, output) = run(&identifier, "/music/Song_A.mp3", "");
    let (decision, resolution) = result.unwrap();

    assert_eq!(decision, Decision::Matched("id-a".to_string()));
    assert_eq!(resolution, Resolution::Auto);
    assert!(output.is_empty(), "no prompt expected, got: {}", output);
    assert_eq!(probe.calls.get(), 0);
}

#[test]
fn scenario_b_tied_exact_matches_prompt() {
    let catalog = vec![
        entry("first", "Song_A", "03:45"),
        entry("second", "Song_A", "03:45"),
    ];
    let probe = FixedProbe::new(225);
    let identifier = Identifier::new(&catalog, &probe);

    let (result, output) = run(&identifier, "/music/Song_A.flac", "2\n");
    assert_eq!(
        result.unwrap(),
        (Decision::Matched("second".to_string()), Resolution::Operator)
    );
    assert!(output.contains("[1] Song_A by Artist (distance = 0, duration = 03:45)"));
    assert!(output.contains("[2] Song_A by Artist (distance = 0, duration = 03:45)"));

    let (result, _) = run(&identifier, "/music/Song_A.flac", "skip\n");
    assert_eq!(result.unwrap(), (Decision::NoMatch, Resolution::Skipped));
}

#[test]
fn scenario_c_unsupported_extension_is_skipped() {
    let catalog = vec![entry("id-a", "Song_A", "03:45")];
    let probe = FixedProbe::new(225);
    let identifier = Identifier::new(&catalog, &probe);

    let (result, output) = run(&identifier, "/music/Song_A.wav", "1\n");
    assert!(matches!(
        result,
        Err(IdentifyError::Probe(ProbeError::UnsupportedFormat { .. }))
    ));
    assert!(output.is_empty());
    assert_eq!(probe.calls.get(), 0);

    // The directory scan never hands such files to the engine
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("Song_A.wav"), b"").unwrap();
    assert!(scan_input_dir(dir.path()).unwrap().is_empty());
}

#[test]
fn scenario_d_duration_ratings() {
    let at = |secs: u64| catalog_duration_rating(Duration::from_secs(secs), "03:45");
    assert_eq!(at(3 * 60 + 45), Rating::Best);
    assert_eq!(at(3 * 60 + 46), Rating::Medium);
    assert_eq!(at(3 * 60 + 50), Rating::Worst);
}

#[test]
fn scenario_e_more_twice_shows_all_thirteen() {
    let catalog: Vec<CatalogEntry> = (0..13)
        .map(|i| entry(&format!("id-{}", i), &format!("Track {:02}", i), "03:45"))
        .collect();
    let probe = FixedProbe::new(225);
    let identifier = Identifier::new(&catalog, &probe);

    let (result, output) = run(&identifier, "/music/Unknown Track.mp3", "m\nm\n13\n");
    let (decision, _) = result.unwrap();

    // Last listing before the selection shows the whole catalog
    let listings: Vec<&str> = output.split("Choose metadata for file").collect();
    assert_eq!(listings.len(), 4);
    assert_eq!(listings[1].matches("  [").count(), 5);
    assert_eq!(listings[2].matches("  [").count(), 10);
    assert_eq!(listings[3].matches("  [").count(), 13);
    assert!(!listings[3].contains("[14]"));

    let ranked_13th = {
        let distances = enumerate_distances("Unknown Track", &catalog);
        distances
            .values()
            .flatten()
            .nth(12)
            .map(|e| e.id.clone())
            .unwrap()
    };
    assert_eq!(decision, Decision::Matched(ranked_13th));
}

#[test]
fn invalid_input_reprompts_without_advancing() {
    let catalog: Vec<CatalogEntry> = (0..8)
        .map(|i| entry(&format!("id-{}", i), &format!("Other {}", i), "01:00"))
        .collect();
    let probe = FixedProbe::new(60);
    let identifier = Identifier::new(&catalog, &probe);

    // "7" is out of range while only five are displayed
    let (result, output) = run(&identifier, "/music/Something.mp3", "7\nwhat\n1\n");
    assert!(result.unwrap().0.id().is_some());
    assert!(output.contains("7 is not a valid option!"));
    assert!(output.contains("what is not a valid option!"));
    assert_eq!(probe.calls.get(), 1);
}
