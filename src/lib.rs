//! meetline - word timelines for meeting transcripts
//!
//! Turns per-utterance transcripts into a single chronological word timeline,
//! derives per-speaker talk-time statistics, and fetches meetings from the
//! transcription service with bounded retries.

#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]
#![warn(clippy::let_underscore_must_use)]

pub mod analytics;
#[cfg(feature = "api")]
pub mod api;
#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod defaults;
pub mod error;
pub mod logging;
#[cfg(feature = "cli")]
pub mod output;
pub mod timeline;
pub mod transcript;

// Timeline
pub use timeline::{EventId, WordEvent, build_word_timeline, timeline_from_json};
pub use transcript::{Transcription, Utterance, WordEntry};

// Analytics
pub use analytics::{SpeakerStats, speaker_summary};

// API
#[cfg(feature = "api")]
pub use api::{ApiClient, ApiRequest, MeetingApi, RetryPolicy, make_api_call};

// Error handling
pub use error::{MeetlineError, Result};

// Config
pub use config::Config;

/// Build version string with optional git commit hash.
///
/// Returns `"0.1.0+abc1234"` when git hash is available, `"0.1.0"` otherwise.
pub fn version_string() -> String {
    let version = env!("CARGO_PKG_VERSION");
    match option_env!("GIT_HASH") {
        Some(hash) if !hash.is_empty() => format!("{}+{}", version, hash),
        _ => version.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_string_starts_with_cargo_version() {
        let ver = version_string();
        assert!(
            ver.starts_with(env!("CARGO_PKG_VERSION")),
            "version_string should start with CARGO_PKG_VERSION, got: {}",
            ver
        );
    }

    #[test]
    fn version_string_contains_plus_when_git_hash_present() {
        let ver = version_string();
        if option_env!("GIT_HASH").is_some_and(|h| !h.is_empty()) {
            assert!(ver.contains('+'), "expected '+' in {}", ver);
        } else {
            assert_eq!(ver, env!("CARGO_PKG_VERSION"));
        }
    }
}
