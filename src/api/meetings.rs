//! Typed access to the meeting service's transcript and recording endpoints.

use crate::api::client::{ApiClient, ApiRequest};
use crate::config::ApiConfig;
use crate::error::{MeetlineError, Result};
use crate::timeline::{WordEvent, build_word_timeline};
use crate::transcript::{Utterance, parse_utterances};
use tracing::info;

/// Keys the recording metadata endpoint uses for the start timestamp.
const RECORDING_START_KEYS: [&str; 2] = ["recording_start_ms", "start_time_ms"];

pub struct MeetingApi {
    base_url: String,
    client: ApiClient,
}

impl MeetingApi {
    pub fn new(base_url: impl Into<String>, client: ApiClient) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        }
    }

    pub fn from_config(config: &ApiConfig) -> Self {
        Self::new(config.base_url.clone(), ApiClient::from_config(config))
    }

    fn endpoint(&self, meeting_id: &str, leaf: &str) -> Result<String> {
        let valid = !meeting_id.is_empty()
            && meeting_id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(MeetlineError::Other(format!(
                "Invalid meeting id '{meeting_id}': use letters, digits, '-' or '_'"
            )));
        }
        Ok(format!("{}/meetings/{meeting_id}/{leaf}", self.base_url))
    }

    async fn get_json(&self, url: String) -> Result<serde_json::Value> {
        let response = self.client.send(ApiRequest::get(url.clone())).await?;
        let status = response.status();
        if !status.is_success() {
            return Err(MeetlineError::HttpStatus {
                status: status.as_u16(),
                url,
            });
        }
        let text = response.text().await.map_err(|e| MeetlineError::Request {
            message: format!("Failed to read response from {url}: {e}"),
        })?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Fetch a meeting's transcript.
    ///
    /// A body that is not a JSON array is an empty transcript. A malformed
    /// utterance fails the whole fetch.
    pub async fn fetch_transcript(&self, meeting_id: &str) -> Result<Vec<Utterance>> {
        let value = self
            .get_json(self.endpoint(meeting_id, "transcript")?)
            .await?;
        let transcript = match value.as_array() {
            Some(items) => parse_utterances(items)?,
            None => Vec::new(),
        };
        info!(
            meeting_id,
            utterances = transcript.len(),
            "Fetched transcript"
        );
        Ok(transcript)
    }

    /// Fetch the absolute recording start in milliseconds, if the service knows it.
    pub async fn fetch_recording_start(&self, meeting_id: &str) -> Result<Option<f64>> {
        let value = self
            .get_json(self.endpoint(meeting_id, "recording")?)
            .await?;
        let start = RECORDING_START_KEYS
            .iter()
            .find_map(|key| value.get(key))
            .and_then(serde_json::Value::as_f64);
        info!(meeting_id, recording_start_ms = ?start, "Fetched recording metadata");
        Ok(start)
    }

    /// Fetch transcript and recording start concurrently and build the timeline.
    pub async fn fetch_timeline(&self, meeting_id: &str) -> Result<Vec<WordEvent>> {
        let (transcript, start) = tokio::try_join!(
            self.fetch_transcript(meeting_id),
            self.fetch_recording_start(meeting_id)
        )?;
        Ok(build_word_timeline(Some(&transcript), start))
    }
}
