//! Error taxonomy for calls against the clinical data API.

/// Failures of the fetch and submit calls.
///
/// `Transient` never escapes [`ApiClient::request_json`](super::ApiClient::request_json):
/// it is retried until it succeeds or turns into `RetriesExhausted`.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Transient HTTP status {status}")]
    Transient { status: u16 },

    #[error("API returned error (status {status}): {body}")]
    Fatal { status: u16, body: String },

    #[error("Retries exhausted after {attempts} attempts (last status {last_status})")]
    RetriesExhausted { attempts: u32, last_status: u16 },

    #[error("Unexpected API response at page {page}: {reason}")]
    MalformedResponse { page: u32, reason: String },

    #[error("Submit failed: {status} - {body}")]
    Submit { status: u16, body: String },

    #[error("HTTP client error: {0}")]
    HttpClient(String),

    #[error("Response parsing error: {0}")]
    ResponseParsing(String),
}

impl ApiError {
    /// Map a non-2xx status to its error class. 429 and 5xx are transient.
    pub fn from_status(status: u16, body: String) -> Self {
        if is_transient_status(status) {
            ApiError::Transient { status }
        } else {
            ApiError::Fatal { status, body }
        }
    }
}

/// Statuses worth retrying: rate limiting and server-side faults.
pub fn is_transient_status(status: u16) -> bool {
    status == 429 || (500..=599).contains(&status)
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ApiError::ResponseParsing(err.to_string())
        } else if err.is_connect() {
            ApiError::HttpClient(format!("Cannot connect to API: {err}"))
        } else {
            ApiError::HttpClient(err.to_string())
        }
    }
}
