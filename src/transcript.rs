//! Transcript data model as delivered by the transcription service.
//!
//! A transcript is a sequence of [`Utterance`]s. Word offsets inside an
//! utterance are seconds relative to that utterance's own start, not the
//! recording's.

use crate::error::{MeetlineError, Result};
use serde::{Deserialize, Deserializer, Serialize};

/// One speech turn from a single speaker.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Utterance {
    /// Speaker label. Not guaranteed unique across a recording.
    #[serde(rename = "speaker_name", alias = "speaker", default)]
    pub speaker: String,
    /// Start of the utterance in milliseconds on the external clock.
    /// Fractional milliseconds are kept.
    pub timestamp_ms: f64,
    /// Absent when transcription failed for this utterance.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transcription: Option<Transcription>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Transcription {
    /// `null` and a missing list both decode as no words.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub words: Vec<WordEntry>,
}

fn null_as_empty<'de, D>(deserializer: D) -> std::result::Result<Vec<WordEntry>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<WordEntry>>::deserialize(deserializer)?.unwrap_or_default())
}

/// A single transcribed word.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WordEntry {
    pub word: String,
    /// Seconds from the utterance start.
    pub start: f64,
    /// Seconds from the utterance start. Expected `>= start`, not enforced.
    pub end: f64,
}

impl Utterance {
    pub fn new(speaker: impl Into<String>, timestamp_ms: f64, words: Vec<WordEntry>) -> Self {
        Self {
            speaker: speaker.into(),
            timestamp_ms,
            transcription: Some(Transcription { words }),
        }
    }

    /// An utterance whose transcription failed.
    pub fn untranscribed(speaker: impl Into<String>, timestamp_ms: f64) -> Self {
        Self {
            speaker: speaker.into(),
            timestamp_ms,
            transcription: None,
        }
    }

    /// Words of this utterance, empty when there is no transcription.
    pub fn words(&self) -> &[WordEntry] {
        self.transcription
            .as_ref()
            .map(|t| t.words.as_slice())
            .unwrap_or_default()
    }
}

impl WordEntry {
    pub fn new(word: impl Into<String>, start: f64, end: f64) -> Self {
        Self {
            word: word.into(),
            start,
            end,
        }
    }
}

/// Total number of word entries across all transcribed utterances.
pub fn word_count(transcript: &[Utterance]) -> usize {
    transcript.iter().map(|u| u.words().len()).sum()
}

/// Decode a JSON array of utterances, failing on the first malformed entry.
///
/// The error names the index of the offending utterance.
pub fn parse_utterances(items: &[serde_json::Value]) -> Result<Vec<Utterance>> {
    items
        .iter()
        .enumerate()
        .map(|(utterance_index, item)| {
            Utterance::deserialize(item).map_err(|e| MeetlineError::InvalidTranscript {
                utterance_index,
                message: e.to_string(),
            })
        })
        .collect()
}
