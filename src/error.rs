//! Error types for meetline.

use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MeetlineError {
    // Configuration errors
    #[error("Configuration file not found at {path}")]
    ConfigFileNotFound { path: String },

    #[error("Failed to parse configuration: {message}")]
    ConfigParse { message: String },

    #[error("Invalid configuration value for {key}: {message}")]
    ConfigInvalidValue { key: String, message: String },

    #[error("Configuration error: {0}")]
    Config(#[from] toml::de::Error),

    // Transcript shape errors
    #[error("Invalid transcript at utterance {utterance_index}: {message}")]
    InvalidTranscript {
        utterance_index: usize,
        message: String,
    },

    // Network errors
    #[error("Request failed: {message}")]
    Request { message: String },

    #[error("Request to {url} timed out after {}", humanize(.timeout))]
    Timeout { url: String, timeout: Duration },

    #[error("HTTP {status} from {url}")]
    HttpStatus { status: u16, url: String },

    // Decoding errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // General I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // Generic error for cases not covered above
    #[error("{0}")]
    Other(String),
}

fn humanize(duration: &Duration) -> humantime::FormattedDuration {
    humantime::format_duration(*duration)
}

impl MeetlineError {
    /// Whether the retry helper should try again after this error.
    ///
    /// Transport failures and timeouts are retryable, as is a `502 Bad Gateway`.
    /// Everything else is terminal.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Request { .. } | Self::Timeout { .. } => true,
            Self::HttpStatus { status, .. } => *status == crate::defaults::RETRYABLE_STATUS,
            _ => false,
        }
    }
}

// Type alias for convenience
pub type Result<T> = std::result::Result<T, MeetlineError>;
