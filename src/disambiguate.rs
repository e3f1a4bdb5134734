//! Interactive candidate selection.
//!
//! The selection state is an explicit value (`Disambiguation`) with a pure
//! transition function, so the rules can be tested without a console.
//! `prompt` is the thin loop that renders the window and feeds operator
//! input into it.

use std::io::{BufRead, Write};
use std::time::Duration;

use crate::console::{format_duration, paint};
use crate::models::{Candidate, Decision};
use crate::scoring::{catalog_duration_rating, distance_rating};

/// How many more candidates `more` reveals, and the initial window size.
pub const PAGE_SIZE: usize = 5;

/// One line of operator input, parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    More,
    Skip,
    /// 1-based index into the displayed window, with the text as typed
    Select { index: usize, text: String },
    Invalid(String),
}

/// Parse operator input. Accepts `m`/`more`, `s`/`skip` in any case, and
/// plain decimal numbers. Surrounding whitespace is ignored.
pub fn parse_command(line: &str) -> Command {
    let trimmed = line.trim();
    let lower = trimmed.to_lowercase();
    match lower.as_str() {
        "m" | "more" => Command::More,
        "s" | "skip" => Command::Skip,
        _ if !trimmed.is_empty() && trimmed.bytes().all(|b| b.is_ascii_digit()) => {
            match trimmed.parse() {
                Ok(index) => Command::Select {
                    index,
                    text: trimmed.to_string(),
                },
                Err(_) => Command::Invalid(trimmed.to_string()),
            }
        }
        _ => Command::Invalid(trimmed.to_string()),
    }
}

/// Result of applying one command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// Window changed (or not); ask again
    Continue,
    /// Input was not acceptable; state untouched
    Rejected(String),
    Done(Decision),
}

/// Ranked candidates plus the current display limit.
#[derive(Debug, Clone)]
pub struct Disambiguation<'a> {
    choices: Vec<Candidate<'a>>,
    limit: usize,
}

impl<'a> Disambiguation<'a> {
    /// `choices` must already be in ranking order.
    pub fn new(choices: Vec<Candidate<'a>>) -> Self {
        Self {
            choices,
            limit: PAGE_SIZE,
        }
    }

    /// Requested window size; may exceed the number of candidates.
    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Candidates currently on screen.
    pub fn window(&self) -> &[Candidate<'a>] {
        &self.choices[..self.limit.min(self.choices.len())]
    }

    pub fn apply(&mut self, command: Command) -> Step {
        match command {
            Command::More => {
                self.limit += PAGE_SIZE;
                Step::Continue
            }
            Command::Skip => Step::Done(Decision::NoMatch),
            Command::Select { index, text } => {
                match index.checked_sub(1).and_then(|i| self.window().get(i)) {
                    Some(candidate) => Step::Done(Decision::Matched(candidate.entry.id.clone())),
                    None => Step::Rejected(text),
                }
            }
            Command::Invalid(text) => Step::Rejected(text),
        }
    }
}

/// Render one candidate line (1-based `index`).
pub fn render_candidate(index: usize, candidate: &Candidate<'_>, probed: Duration) -> String {
    let entry = candidate.entry;
    let distance = paint(
        distance_rating(candidate.distance),
        &format!("distance = {}", candidate.distance),
    );
    let duration = paint(
        catalog_duration_rating(probed, &entry.duration_text),
        &format!("duration = {}", entry.duration_text),
    );
    format!(
        "  [{}] {} by {} ({}, {})",
        index, entry.title, entry.artist, distance, duration
    )
}

/// Ask the operator until a candidate is picked or the file is skipped.
///
/// End of input counts as `skip`.
pub fn prompt<R: BufRead, W: Write>(
    mut state: Disambiguation<'_>,
    file_name: &str,
    probed: Duration,
    input: &mut R,
    output: &mut W,
) -> std::io::Result<Decision> {
    let mut line = String::new();
    loop {
        writeln!(
            output,
            "Choose metadata for file {} (duration {})",
            file_name,
            format_duration(probed)
        )?;
        for (i, candidate) in state.window().iter().enumerate() {
            writeln!(output, "{}", render_candidate(i + 1, candidate, probed))?;
        }
        write!(output, "[m]ore, [s]kip: ")?;
        output.flush()?;

        line.clear();
        let command = if input.read_line(&mut line)? == 0 {
            writeln!(output)?;
            tracing::warn!(file = %file_name, "Input closed, skipping file");
            Command::Skip
        } else {
            parse_command(&line)
        };

        match state.apply(command) {
            Step::Continue => {}
            Step::Rejected(text) => writeln!(output, "{} is not a valid option!", text)?,
            Step::Done(decision) => return Ok(decision),
        }
    }
}
