//! Default configuration constants for meetline.
//!
//! Shared between the config layer, the retry helper and the CLI so the
//! numbers only live in one place.

/// Default number of attempts the retry helper makes before giving up.
pub const MAX_RETRIES: u32 = 3;

/// Default per-request timeout in seconds.
pub const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Linear backoff step in milliseconds.
///
/// The wait before retry `n` (1-based) is `n * BACKOFF_STEP_MS`.
pub const BACKOFF_STEP_MS: u64 = 2000;

/// The only HTTP status the retry helper retries on (Bad Gateway).
pub const RETRYABLE_STATUS: u16 = 502;

/// Default meeting API base URL.
pub const API_BASE_URL: &str = "http://localhost:8000/api";

/// Milliseconds per second, used when moving word offsets onto the recording clock.
pub const MS_PER_SEC: f64 = 1000.0;

/// Default log filter when `RUST_LOG` is unset.
pub const LOG_FILTER: &str = "warn";
