//! Run configuration: named constants and the settings threaded through
//! the fetch → analyze → submit pipeline.

use std::time::Duration;

use crate::api::RetryPolicy;

/// Application-level constants
pub const APP_NAME: &str = "Carescore";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Clinical data API used when `CARESCORE_API_URL` is not set.
pub const DEFAULT_BASE_URL: &str = "https://assessment.ksensetech.com/api";

/// Header carrying the API credential on every request.
pub const API_KEY_HEADER: &str = "x-api-key";

/// Patients requested per page.
pub const PAGE_LIMIT: u32 = 5;

/// Retries after the first attempt for 429/5xx responses (8 attempts total).
pub const MAX_RETRIES: u32 = 7;

/// Base of the exponential backoff; also the exclusive upper bound of the jitter.
pub const RETRY_BASE_DELAY: Duration = Duration::from_millis(1000);

/// Pause between consecutive page requests, to stay under the API rate limit.
pub const INTER_PAGE_DELAY: Duration = Duration::from_millis(1500);

/// TCP connect timeout. Requests themselves have no overall timeout.
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

pub const ENV_API_KEY: &str = "CARESCORE_API_KEY";
pub const ENV_API_URL: &str = "CARESCORE_API_URL";

/// Log filter used when `RUST_LOG` is not set.
pub fn default_log_filter() -> &'static str {
    "info,carescore=debug,carescore_lib=debug"
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable {0}")]
    MissingVar(&'static str),

    #[error("Invalid value for {var}: {reason}")]
    InvalidVar { var: &'static str, reason: String },
}

// ═══════════════════════════════════════════════════════════
// AssessmentConfig
// ═══════════════════════════════════════════════════════════

/// Everything one assessment run needs to talk to the API.
#[derive(Clone)]
pub struct AssessmentConfig {
    /// API root without trailing slash, e.g. `https://host/api`.
    pub base_url: String,
    pub api_key: String,
    pub page_limit: u32,
    pub inter_page_delay: Duration,
    pub retry: RetryPolicy,
}

impl AssessmentConfig {
    /// Config with the production pacing constants.
    pub fn new(base_url: &str, api_key: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            page_limit: PAGE_LIMIT,
            inter_page_delay: INTER_PAGE_DELAY,
            retry: RetryPolicy::default(),
        }
    }

    /// Read `CARESCORE_API_KEY` (required) and `CARESCORE_API_URL` (optional).
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let api_key = lookup(ENV_API_KEY)
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .ok_or(ConfigError::MissingVar(ENV_API_KEY))?;

        let base_url = match lookup(ENV_API_URL) {
            Some(url) => {
                let url = url.trim().to_string();
                if !(url.starts_with("http://") || url.starts_with("https://")) {
                    return Err(ConfigError::InvalidVar {
                        var: ENV_API_URL,
                        reason: format!("expected an http(s) URL, got {url:?}"),
                    });
                }
                url
            }
            None => DEFAULT_BASE_URL.to_string(),
        };

        Ok(Self::new(&base_url, &api_key))
    }

    /// Same endpoints and credential, with all waits shrunk to `delay`.
    pub fn with_fast_pacing(mut self, delay: Duration) -> Self {
        self.inter_page_delay = delay;
        self.retry.base_delay = delay;
        self
    }

    pub fn patients_url(&self) -> String {
        format!("{}/patients", self.base_url)
    }

    pub fn submit_url(&self) -> String {
        format!("{}/submit-assessment", self.base_url)
    }
}

// The credential never goes to the logs.
impl std::fmt::Debug for AssessmentConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AssessmentConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .field("page_limit", &self.page_limit)
            .field("inter_page_delay", &self.inter_page_delay)
            .field("retry", &self.retry)
            .finish()
    }
}
