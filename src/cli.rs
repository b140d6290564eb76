//! Command-line interface for meetline
//!
//! Provides argument parsing using clap derive macros.

use clap::{Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use std::path::PathBuf;
use std::time::Duration;

/// Word timelines and speaker analytics for meeting transcripts
#[derive(Parser, Debug)]
#[command(
    name = "meetline",
    version,
    about = "Word timelines and speaker analytics for meeting transcripts"
)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Path to configuration file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Only log errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose logging (-v: info, -vv: debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// Output format for timeline and speaker listings
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// One line per entry
    #[default]
    Text,
    /// Pretty-printed JSON array
    Json,
}

/// Parse a request timeout.
///
/// Accepts bare seconds or any `humantime` duration (`500ms`, `30s`, `1m`).
fn parse_timeout(s: &str) -> Result<Duration, String> {
    let s = s.trim();
    let timeout = match s.parse::<u64>() {
        Ok(secs) => Duration::from_secs(secs),
        Err(_) => humantime::parse_duration(s).map_err(|e| e.to_string())?,
    };
    if timeout.is_zero() {
        return Err("timeout must be positive".to_string());
    }
    Ok(timeout)
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build a word timeline from a transcript file
    Timeline {
        /// Transcript JSON file ("-" for stdin)
        #[arg(long, short = 't', value_name = "FILE")]
        transcript: PathBuf,

        /// Absolute recording start in milliseconds
        #[arg(long, short = 's', value_name = "MS")]
        recording_start: f64,

        /// Output format
        #[arg(long, short = 'f', value_enum, default_value_t)]
        format: OutputFormat,
    },

    /// Summarise talk time per speaker from a transcript file
    Speakers {
        /// Transcript JSON file ("-" for stdin)
        #[arg(long, short = 't', value_name = "FILE")]
        transcript: PathBuf,

        /// Absolute recording start in milliseconds
        #[arg(long, short = 's', value_name = "MS")]
        recording_start: f64,

        /// Output format
        #[arg(long, short = 'f', value_enum, default_value_t)]
        format: OutputFormat,
    },

    /// Fetch a meeting from the API and print its word timeline
    Fetch {
        /// Meeting identifier
        meeting_id: String,

        /// Output format
        #[arg(long, short = 'f', value_enum, default_value_t)]
        format: OutputFormat,

        /// Per-request timeout (overrides config). Examples: 30s, 1m
        #[arg(long, value_name = "DURATION", value_parser = parse_timeout)]
        timeout: Option<Duration>,

        /// Total attempts per request (overrides config)
        #[arg(long, value_name = "N")]
        retries: Option<u32>,
    },

    /// Manage configuration
    Config {
        /// Action to perform
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

/// Configuration actions
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Print the effective configuration as TOML
    Show,
    /// Print the default configuration file path
    Path,
}
