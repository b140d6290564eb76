use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use meetline::cli::{Cli, Commands, ConfigAction, OutputFormat};
use meetline::config::Config;
use meetline::output::{write_speakers, write_timeline};
use meetline::{
    ApiClient, MeetingApi, RetryPolicy, WordEvent, speaker_summary, timeline_from_json,
};
use serde::Serialize;
use std::io::{IsTerminal, Read, Write};
use std::path::Path;
use tracing::{debug, warn};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    meetline::logging::init(cli.verbose, cli.quiet);
    debug!(version = %meetline::version_string(), "meetline starting");

    match cli.command {
        Commands::Timeline {
            transcript,
            recording_start,
            format,
        } => {
            let timeline = load_timeline(&transcript, recording_start)?;
            print_timeline(&timeline, format)?;
        }
        Commands::Speakers {
            transcript,
            recording_start,
            format,
        } => {
            let timeline = load_timeline(&transcript, recording_start)?;
            let summary = speaker_summary(&timeline);
            match format {
                OutputFormat::Json => print_json(&summary)?,
                OutputFormat::Text => {
                    let color = std::io::stdout().is_terminal();
                    write_speakers(&mut std::io::stdout().lock(), &summary, color)?;
                }
            }
        }
        Commands::Fetch {
            meeting_id,
            format,
            timeout,
            retries,
        } => {
            let config = load_config(cli.config.as_deref())?;
            config.validate()?;

            let mut policy = RetryPolicy::from_config(&config.api);
            if let Some(timeout) = timeout {
                policy.timeout = timeout;
            }
            if let Some(retries) = retries {
                policy.max_retries = retries;
            }
            let client = ApiClient::new(policy).with_token(config.api.token.clone());
            debug!(policy = ?client.policy(), "Effective retry policy");
            let api = MeetingApi::new(config.api.base_url.clone(), client);
            let timeline = api
                .fetch_timeline(&meeting_id)
                .await
                .with_context(|| format!("Failed to fetch meeting '{meeting_id}'"))?;
            print_timeline(&timeline, format)?;
        }
        Commands::Config { action } => handle_config_command(action, cli.config.as_deref())?,
        Commands::Completions { shell } => {
            clap_complete::generate(
                shell,
                &mut Cli::command(),
                "meetline",
                &mut std::io::stdout(),
            );
        }
    }

    Ok(())
}

/// Load configuration from file or use defaults.
///
/// Priority order:
/// 1. Custom config path from CLI (--config)
/// 2. Default config path (~/.config/meetline/config.toml)
/// 3. Built-in defaults with environment variable overrides
fn load_config(custom_path: Option<&Path>) -> Result<Config> {
    let config = match custom_path {
        Some(path) => Config::load(path)?,
        None => Config::load_or_default(&Config::default_path())?,
    };
    Ok(config.with_env_overrides())
}

fn handle_config_command(action: ConfigAction, custom_path: Option<&Path>) -> Result<()> {
    match action {
        ConfigAction::Show => {
            let config = load_config(custom_path)?;
            print!("{}", config.to_toml()?);
        }
        ConfigAction::Path => {
            let path = custom_path
                .map(Path::to_path_buf)
                .unwrap_or_else(Config::default_path);
            println!("{}", path.display());
        }
    }
    Ok(())
}

/// Read a transcript file (or stdin for "-") and build its timeline.
fn load_timeline(path: &Path, recording_start_ms: f64) -> Result<Vec<WordEvent>> {
    let contents = if path == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read transcript from stdin")?;
        buf
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read transcript {}", path.display()))?
    };

    let value: serde_json::Value = serde_json::from_str(&contents)
        .with_context(|| format!("Transcript {} is not valid JSON", path.display()))?;
    let recording_start = serde_json::Value::from(recording_start_ms);
    let timeline = timeline_from_json(&value, Some(&recording_start))?;
    if timeline.is_empty() {
        warn!("Timeline is empty (no words, or recording start is 0)");
    }
    Ok(timeline)
}

fn print_timeline(timeline: &[WordEvent], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => print_json(timeline),
        OutputFormat::Text => {
            let color = std::io::stdout().is_terminal();
            write_timeline(&mut std::io::stdout().lock(), timeline, color)?;
            Ok(())
        }
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let mut stdout = std::io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, value)?;
    writeln!(stdout)?;
    Ok(())
}
