//! Per-speaker talk-time aggregates over a word timeline.

use crate::timeline::WordEvent;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Aggregated speaking statistics for one speaker label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeakerStats {
    pub speaker: String,
    pub word_count: usize,
    /// Sum of word durations in seconds.
    pub talk_time_secs: f64,
    /// Fraction of the total talk time, in `0.0..=1.0`.
    pub share: f64,
    /// Start of the speaker's first word, seconds from recording start.
    pub first_word_at: f64,
}

/// Summarise a timeline per speaker.
///
/// Ordered by descending talk time, then by speaker name. Words with
/// `end < start` contribute zero duration.
pub fn speaker_summary(timeline: &[WordEvent]) -> Vec<SpeakerStats> {
    let mut by_speaker: HashMap<&str, SpeakerStats> = HashMap::new();

    for event in timeline {
        let duration = (event.end - event.start).max(0.0);
        let stats = by_speaker
            .entry(event.speaker.as_str())
            .or_insert_with(|| SpeakerStats {
                speaker: event.speaker.clone(),
                word_count: 0,
                talk_time_secs: 0.0,
                share: 0.0,
                first_word_at: event.start,
            });
        stats.word_count += 1;
        stats.talk_time_secs += duration;
        stats.first_word_at = stats.first_word_at.min(event.start);
    }

    let total: f64 = by_speaker.values().map(|s| s.talk_time_secs).sum();
    let mut summary: Vec<SpeakerStats> = by_speaker
        .into_values()
        .map(|mut s| {
            s.share = if total > 0.0 {
                s.talk_time_secs / total
            } else {
                0.0
            };
            s
        })
        .collect();

    summary.sort_by(|a, b| {
        b.talk_time_secs
            .total_cmp(&a.talk_time_secs)
            .then_with(|| a.speaker.cmp(&b.speaker))
    });
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timeline::build_word_timeline;
    use crate::transcript::{Utterance, WordEntry};

    fn meeting() -> Vec<WordEvent> {
        let transcript = vec![
            Utterance::new(
                "Alice",
                1000.0,
                vec![WordEntry::new("hello", 0.0, 0.5), WordEntry::new("all", 0.5, 1.0)],
            ),
            Utterance::new("Bob", 3000.0, vec![WordEntry::new("hey", 0.0, 3.0)]),
            Utterance::new("Alice", 7000.0, vec![WordEntry::new("so", 0.0, 1.0)]),
        ];
        build_word_timeline(Some(&transcript), Some(1000.0))
    }

    #[test]
    fn test_summary_totals_and_order() {
        let summary = speaker_summary(&meeting());

        assert_eq!(summary.len(), 2);
        assert_eq!(summary[0].speaker, "Bob");
        assert_eq!(summary[0].word_count, 1);
        assert!((summary[0].talk_time_secs - 3.0).abs() < 1e-9);
        assert!((summary[0].first_word_at - 2.0).abs() < 1e-9);

        assert_eq!(summary[1].speaker, "Alice");
        assert_eq!(summary[1].word_count, 3);
        assert!((summary[1].talk_time_secs - 2.0).abs() < 1e-9);
        assert_eq!(summary[1].first_word_at, 0.0);

        let share_sum: f64 = summary.iter().map(|s| s.share).sum();
        assert!((share_sum - 1.0).abs() < 1e-9);
        assert!((summary[0].share - 0.6).abs() < 1e-9);
    }

    #[test]
    fn test_empty_timeline() {
        assert!(speaker_summary(&[]).is_empty());
    }

    #[test]
    fn test_zero_duration_words_have_zero_share() {
        let transcript = vec![
            Utterance::new("Zed", 2000.0, vec![WordEntry::new("um", 0.2, 0.2)]),
            Utterance::new("Amy", 2000.0, vec![WordEntry::new("uh", 0.1, 0.0)]),
        ];
        let summary = speaker_summary(&build_word_timeline(Some(&transcript), Some(1000.0)));

        assert_eq!(summary.len(), 2);
        // Equal talk time falls back to name order.
        assert_eq!(summary[0].speaker, "Amy");
        assert_eq!(summary[1].speaker, "Zed");
        assert!(summary.iter().all(|s| s.share == 0.0 && s.talk_time_secs == 0.0));
    }
}
