//! Terminal rendering for timelines and speaker summaries.

use crate::analytics::SpeakerStats;
use crate::timeline::WordEvent;
use owo_colors::{AnsiColors, OwoColorize};
use std::io::{self, Write};

/// Speaker colours, picked by a stable hash of the label.
const SPEAKER_PALETTE: [AnsiColors; 6] = [
    AnsiColors::Cyan,
    AnsiColors::Green,
    AnsiColors::Yellow,
    AnsiColors::Magenta,
    AnsiColors::Blue,
    AnsiColors::Red,
];

fn speaker_color(speaker: &str) -> AnsiColors {
    let hash = speaker
        .bytes()
        .fold(0usize, |acc, b| acc.wrapping_mul(31).wrapping_add(b as usize));
    SPEAKER_PALETTE[hash % SPEAKER_PALETTE.len()]
}

fn speaker_label(speaker: &str, color: bool) -> String {
    if color {
        speaker.color(speaker_color(speaker)).bold().to_string()
    } else {
        speaker.to_string()
    }
}

/// `[start-end] speaker: word`, times in seconds with millisecond precision.
pub fn format_event(event: &WordEvent, color: bool) -> String {
    format!(
        "[{:>8.3}-{:>8.3}] {}: {}",
        event.start,
        event.end,
        speaker_label(&event.speaker, color),
        event.word
    )
}

pub fn format_speaker(stats: &SpeakerStats, color: bool) -> String {
    format!(
        "{:<20} {:>5} words {:>9.2}s {:>5.1}%  first at {:.2}s",
        speaker_label(&stats.speaker, color),
        stats.word_count,
        stats.talk_time_secs,
        stats.share * 100.0,
        stats.first_word_at
    )
}

pub fn write_timeline(out: &mut impl Write, timeline: &[WordEvent], color: bool) -> io::Result<()> {
    for event in timeline {
        writeln!(out, "{}", format_event(event, color))?;
    }
    Ok(())
}

pub fn write_speakers(out: &mut impl Write, summary: &[SpeakerStats], color: bool) -> io::Result<()> {
    for stats in summary {
        writeln!(out, "{}", format_speaker(stats, color))?;
    }
    Ok(())
}
