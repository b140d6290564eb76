//! Meeting API access: the retrying request helper and typed endpoints.

pub mod client;
pub mod meetings;

pub use client::{ApiClient, ApiRequest, RetryPolicy, make_api_call};
pub use meetings::MeetingApi;
