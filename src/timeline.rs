//! Word timeline builder.
//!
//! Flattens a per-utterance transcript into one chronologically ordered list
//! of word events whose times are seconds from the start of the recording.

use crate::defaults::MS_PER_SEC;
use crate::error::{MeetlineError, Result};
use crate::transcript::{Utterance, parse_utterances};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// Positional identity of a word event: `(utterance_index, word_index)`.
///
/// Rendered and serialized as `"{utterance_index}-{word_index}"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct EventId {
    pub utterance_index: usize,
    pub word_index: usize,
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.utterance_index, self.word_index)
    }
}

impl FromStr for EventId {
    type Err = MeetlineError;

    fn from_str(s: &str) -> Result<Self> {
        let parse = |part: &str| {
            part.parse::<usize>()
                .map_err(|e| MeetlineError::Other(format!("Invalid event id '{s}': {e}")))
        };
        let (utterance, word) = s
            .split_once('-')
            .ok_or_else(|| MeetlineError::Other(format!("Invalid event id '{s}': missing '-'")))?;
        Ok(Self {
            utterance_index: parse(utterance)?,
            word_index: parse(word)?,
        })
    }
}

impl From<EventId> for String {
    fn from(id: EventId) -> Self {
        id.to_string()
    }
}

impl TryFrom<String> for EventId {
    type Error = MeetlineError;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

/// One word placed on the recording's time axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WordEvent {
    pub id: EventId,
    pub word: String,
    /// Seconds from recording start, never negative.
    pub start: f64,
    /// Seconds from recording start, never negative.
    pub end: f64,
    pub speaker: String,
    pub utterance_index: usize,
    pub word_index: usize,
}

/// Convert an utterance-relative offset to seconds from the recording start.
///
/// Negative results (clock skew, utterances stamped before the recording
/// began) are floored to zero. NaN also maps to zero.
fn recording_offset_secs(
    utterance_start_ms: f64,
    word_offset_secs: f64,
    recording_start_ms: f64,
) -> f64 {
    let absolute_ms = utterance_start_ms + word_offset_secs * MS_PER_SEC - recording_start_ms;
    let secs = absolute_ms / MS_PER_SEC;
    if secs > 0.0 { secs } else { 0.0 }
}

/// Build a flat, chronologically sorted word timeline.
///
/// Returns an empty timeline when `transcript` is absent, or when
/// `recording_start_ms` is absent or zero; a start of exactly zero is treated
/// as missing.
///
/// Events are sorted by `start` with a stable sort, so words sharing a start
/// time keep their utterance-then-word order.
pub fn build_word_timeline(
    transcript: Option<&[Utterance]>,
    recording_start_ms: Option<f64>,
) -> Vec<WordEvent> {
    let (Some(transcript), Some(recording_start_ms)) = (transcript, recording_start_ms) else {
        return Vec::new();
    };
    if recording_start_ms == 0.0 {
        return Vec::new();
    }

    let mut events: Vec<WordEvent> = transcript
        .iter()
        .enumerate()
        .flat_map(|(utterance_index, utterance)| {
            utterance
                .words()
                .iter()
                .enumerate()
                .map(move |(word_index, entry)| WordEvent {
                    id: EventId {
                        utterance_index,
                        word_index,
                    },
                    word: entry.word.clone(),
                    start: recording_offset_secs(
                        utterance.timestamp_ms,
                        entry.start,
                        recording_start_ms,
                    ),
                    end: recording_offset_secs(
                        utterance.timestamp_ms,
                        entry.end,
                        recording_start_ms,
                    ),
                    speaker: utterance.speaker.clone(),
                    utterance_index,
                    word_index,
                })
        })
        .collect();

    events.sort_by(|a, b| a.start.total_cmp(&b.start));

    debug!(
        utterances = transcript.len(),
        events = events.len(),
        "Built word timeline"
    );
    events
}

/// Build a timeline from loosely-typed JSON.
///
/// A `transcript` that is not an array, or a recording start that is missing,
/// zero or not a number, yields an empty timeline. Fractional milliseconds in
/// the recording start are used as-is. An utterance that does not
/// have the expected shape (e.g. a non-numeric `timestamp_ms`) aborts the whole
/// computation with [`MeetlineError::InvalidTranscript`]; no partial timeline is
/// returned.
pub fn timeline_from_json(
    transcript: &serde_json::Value,
    recording_start_ms: Option<&serde_json::Value>,
) -> Result<Vec<WordEvent>> {
    let Some(items) = transcript.as_array() else {
        debug!("Transcript is not an array, returning empty timeline");
        return Ok(Vec::new());
    };
    let recording_start_ms = recording_start_ms.and_then(serde_json::Value::as_f64);
    let utterances = parse_utterances(items)?;

    Ok(build_word_timeline(Some(&utterances), recording_start_ms))
}
