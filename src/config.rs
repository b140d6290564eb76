use crate::defaults;
use crate::error::{MeetlineError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
}

/// Meeting API connection and retry configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    /// Bearer token sent with every request.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    /// Total attempts per request, including the first.
    pub max_retries: u32,
    pub timeout_secs: u64,
    pub backoff_step_ms: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::API_BASE_URL.to_string(),
            token: None,
            max_retries: defaults::MAX_RETRIES,
            timeout_secs: defaults::REQUEST_TIMEOUT_SECS,
            backoff_step_ms: defaults::BACKOFF_STEP_MS,
        }
    }
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn backoff_step(&self) -> Duration {
        Duration::from_millis(self.backoff_step_ms)
    }
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// Returns an error if the file is missing or contains invalid TOML.
    /// Missing fields will use default values.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                MeetlineError::ConfigFileNotFound {
                    path: path.display().to_string(),
                }
            } else {
                MeetlineError::Io(e)
            }
        })?;
        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Load configuration from a file or return defaults if file doesn't exist
    ///
    /// Only returns defaults if the file is missing.
    /// Returns errors for invalid TOML.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        match Self::load(path) {
            Ok(config) => Ok(config),
            Err(MeetlineError::ConfigFileNotFound { .. }) => Ok(Self::default()),
            Err(e) => Err(e),
        }
    }

    /// Apply environment variable overrides
    ///
    /// Supported environment variables:
    /// - MEETLINE_API_URL → api.base_url
    /// - MEETLINE_API_TOKEN → api.token
    /// - MEETLINE_MAX_RETRIES → api.max_retries (ignored unless it parses)
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(url) = std::env::var("MEETLINE_API_URL")
            && !url.is_empty()
        {
            self.api.base_url = url;
        }

        if let Ok(token) = std::env::var("MEETLINE_API_TOKEN")
            && !token.is_empty()
        {
            self.api.token = Some(token);
        }

        if let Ok(retries) = std::env::var("MEETLINE_MAX_RETRIES")
            && let Ok(retries) = retries.trim().parse::<u32>()
        {
            self.api.max_retries = retries;
        }

        self
    }

    /// Reject values the API client cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.api.base_url.trim().is_empty() {
            return Err(MeetlineError::ConfigInvalidValue {
                key: "api.base_url".to_string(),
                message: "must not be empty".to_string(),
            });
        }
        if self.api.timeout_secs == 0 {
            return Err(MeetlineError::ConfigInvalidValue {
                key: "api.timeout_secs".to_string(),
                message: "must be positive".to_string(),
            });
        }
        Ok(())
    }

    /// Get the default configuration file path
    ///
    /// Returns ~/.config/meetline/config.toml on Linux
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join("meetline")
            .join("config.toml")
    }

    /// Render as TOML for `meetline config show`.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| MeetlineError::ConfigParse {
            message: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::Mutex;
    use tempfile::NamedTempFile;

    // Mutex to serialize tests that modify environment variables
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    // SAFETY: These helpers are only used in tests with ENV_LOCK held,
    // ensuring no concurrent access to environment variables.
    fn set_env(key: &str, value: &str) {
        unsafe { std::env::set_var(key, value) }
    }

    fn remove_env(key: &str) {
        unsafe { std::env::remove_var(key) }
    }

    fn clear_meetline_env() {
        remove_env("MEETLINE_API_URL");
        remove_env("MEETLINE_API_TOKEN");
        remove_env("MEETLINE_MAX_RETRIES");
    }

    #[test]
    fn test_default_config_has_correct_values() {
        let config = Config::default();

        assert_eq!(config.api.base_url, "http://localhost:8000/api");
        assert_eq!(config.api.token, None);
        assert_eq!(config.api.max_retries, 3);
        assert_eq!(config.api.timeout(), Duration::from_secs(30));
        assert_eq!(config.api.backoff_step(), Duration::from_millis(2000));
    }

    #[test]
    fn test_load_from_toml_file() {
        let toml_content = r#"
            [api]
            base_url = "https://meetings.example.com/api"
            token = "secret"
            max_retries = 5
            timeout_secs = 10
            backoff_step_ms = 250
        "#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(toml_content.as_bytes()).unwrap();

        let config = Config::load(temp_file.path()).unwrap();

        assert_eq!(config.api.base_url, "https://meetings.example.com/api");
        assert_eq!(config.api.token.as_deref(), Some("secret"));
        assert_eq!(config.api.max_retries, 5);
        assert_eq!(config.api.timeout_secs, 10);
        assert_eq!(config.api.backoff_step_ms, 250);
    }

    #[test]
    fn test_load_partial_config_uses_defaults() {
        let toml_content = r#"
            [api]
            max_retries = 1
        "#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(toml_content.as_bytes()).unwrap();

        let config = Config::load(temp_file.path()).unwrap();

        assert_eq!(config.api.max_retries, 1);
        assert_eq!(config.api.base_url, defaults::API_BASE_URL);
        assert_eq!(config.api.timeout_secs, defaults::REQUEST_TIMEOUT_SECS);
        assert_eq!(config.api.backoff_step_ms, defaults::BACKOFF_STEP_MS);
    }

    #[test]
    fn test_env_override_url_and_token() {
        let _lock = ENV_LOCK.lock().unwrap();
        clear_meetline_env();

        set_env("MEETLINE_API_URL", "http://10.0.0.2/api");
        set_env("MEETLINE_API_TOKEN", "tok");
        let config = Config::default().with_env_overrides();

        assert_eq!(config.api.base_url, "http://10.0.0.2/api");
        assert_eq!(config.api.token.as_deref(), Some("tok"));
        assert_eq!(config.api.max_retries, 3); // Not overridden

        clear_meetline_env();
    }

    #[test]
    fn test_env_override_retries_must_parse() {
        let _lock = ENV_LOCK.lock().unwrap();
        clear_meetline_env();

        set_env("MEETLINE_MAX_RETRIES", "7");
        assert_eq!(Config::default().with_env_overrides().api.max_retries, 7);

        set_env("MEETLINE_MAX_RETRIES", "lots");
        assert_eq!(Config::default().with_env_overrides().api.max_retries, 3);

        clear_meetline_env();
    }

    #[test]
    fn test_env_override_empty_string_ignored() {
        let _lock = ENV_LOCK.lock().unwrap();
        clear_meetline_env();

        set_env("MEETLINE_API_URL", "");
        let config = Config::default().with_env_overrides();

        assert_eq!(config.api.base_url, defaults::API_BASE_URL);

        clear_meetline_env();
    }

    #[test]
    fn test_invalid_toml_returns_error() {
        let invalid_toml = r#"
            [api
            base_url = "broken
        "#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(invalid_toml.as_bytes()).unwrap();

        assert!(matches!(
            Config::load(temp_file.path()),
            Err(MeetlineError::Config(_))
        ));
        assert!(Config::load_or_default(temp_file.path()).is_err());
    }

    #[test]
    fn test_load_or_default_returns_default_for_missing_file() {
        let missing_path = Path::new("/tmp/nonexistent_meetline_config_12345.toml");
        let config = Config::load_or_default(missing_path).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_load_missing_file_is_not_found_error() {
        let missing_path = Path::new("/tmp/nonexistent_meetline_config_12345.toml");
        assert!(matches!(
            Config::load(missing_path),
            Err(MeetlineError::ConfigFileNotFound { .. })
        ));
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = Config::default();
        assert!(config.validate().is_ok());

        config.api.timeout_secs = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.api.base_url = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_default_path_ends_with_config_toml() {
        let path = Config::default_path();
        let path_str = path.to_string_lossy();

        assert!(path_str.contains("meetline"));
        assert!(path_str.ends_with("config.toml"));
    }

    #[test]
    fn test_to_toml_round_trips() {
        let config = Config::default();
        let rendered = config.to_toml().unwrap();
        assert!(rendered.contains("[api]"));
        let parsed: Config = toml::from_str(&rendered).unwrap();
        assert_eq!(parsed, config);
    }
}
