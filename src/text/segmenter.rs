//! Sentence reconstruction for hard-wrapped text.
//!
//! Books are usually hard-wrapped at a fixed column, so one input line is rarely
//! one sentence. The segmenter joins wrapped lines back into complete units
//! before phonemization, collapses runs of blank lines to a single paragraph
//! break and keeps chapter headings (which lack terminal punctuation) together.
//!
//! All state lives in an explicit [`CarryState`] value that is passed in and
//! returned from every call, so each document owns its own state and the state
//! can be written into a checkpoint and restored later.

use serde::{Deserialize, Serialize};

/// Lines that open a chapter heading.
pub const HEADER_KEYWORDS: [&str; 3] = ["PROLOGUE", "CHAPTER", "EPILOGUE"];

/// Characters that mark a line as ending a unit. ASCII digits also count.
const SENTENCE_TERMINATORS: &str = ".!?'\")]}:;>";

/// Segmenter state carried between lines.
///
/// Serialized field names match the plain-mode checkpoint format.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CarryState {
    /// Text of an incomplete unit waiting for its end.
    #[serde(rename = "cached_text", default)]
    pub buffered: String,

    /// Consecutive blank lines seen while nothing was buffered.
    #[serde(rename = "line_end_count", default)]
    pub blank_run: usize,

    /// A header keyword was seen and its title line has not arrived yet.
    #[serde(rename = "is_chapter", default)]
    pub in_header: bool,
}

impl CarryState {
    /// Create an empty state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether an incomplete unit is buffered.
    pub fn has_buffered(&self) -> bool {
        !self.buffered.is_empty()
    }

    /// Consume the state and return any buffered text as a final unit.
    pub fn finish(self) -> Option<String> {
        if self.buffered.is_empty() {
            None
        } else {
            Some(self.buffered)
        }
    }

    /// Feed one line. See [`advance`].
    pub fn advance(self, line: &str) -> (Option<String>, CarryState) {
        advance(line, self)
    }
}

fn ends_with_terminator(stripped: &str) -> bool {
    stripped
        .chars()
        .last()
        .is_some_and(|c| c.is_ascii_digit() || SENTENCE_TERMINATORS.contains(c))
}

/// Feed one input line through the segmenter.
///
/// Returns the unit to transcribe, if the line completed one, together with the
/// new state. A blank line is emitted as `"\n"`, at most once per run of blank
/// lines.
///
/// # Examples
///
/// ```
/// use spoken_ipa::text::segmenter::{advance, CarryState};
///
/// let (first, state) = advance("Hello", CarryState::new());
/// assert!(first.is_none());
/// let (second, _) = advance(" world.\n", state);
/// assert_eq!(second.as_deref(), Some("Hello  world.\n"));
/// ```
pub fn advance(line: &str, mut state: CarryState) -> (Option<String>, CarryState) {
    let stripped = line.trim();
    let body = line.trim_end_matches(['\n', '\r']);

    if !stripped.is_empty() && !ends_with_terminator(stripped) {
        if HEADER_KEYWORDS.contains(&stripped) {
            let flushed = std::mem::take(&mut state.buffered);
            state.buffered = format!("\n{} ", body);
            state.in_header = true;
            let emit = if flushed.is_empty() { None } else { Some(flushed) };
            return (emit, state);
        }

        state.buffered.push_str(body);
        if state.in_header {
            state.in_header = false;
            let mut unit = std::mem::take(&mut state.buffered);
            unit.push_str("\n\n");
            return (Some(unit), state);
        }

        state.buffered.push(' ');
        return (None, state);
    }

    // Blank line, or a line that ends a unit.
    if state.has_buffered() {
        if stripped.is_empty() {
            return (None, state);
        }
        let mut unit = std::mem::take(&mut state.buffered);
        unit.push_str(line);
        state.blank_run = 0;
        return (Some(unit), state);
    }

    if stripped.is_empty() {
        state.blank_run += 1;
        if state.blank_run > 1 {
            return (None, state);
        }
        return (Some("\n".to_string()), state);
    }

    state.blank_run = 0;
    state.in_header = false;
    (Some(line.to_string()), state)
}
