pub mod api;
pub mod assessment;
pub mod config;
pub mod fetch;
pub mod models;
pub mod submit;

use serde_json::Value;
use tracing_subscriber::EnvFilter;

use crate::api::{ApiClient, ApiError};
use crate::config::{AssessmentConfig, ConfigError};

/// Anything that ends an assessment run early.
#[derive(Debug, thiserror::Error)]
pub enum RunError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("API error: {0}")]
    Api(#[from] ApiError),
}

/// Install the global fmt subscriber. `RUST_LOG` overrides the default filter.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();
}

/// Read configuration from the environment and run one assessment.
pub async fn run() -> Result<Value, RunError> {
    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);
    let config = AssessmentConfig::from_env()?;
    tracing::debug!(?config, "Loaded configuration");
    run_assessment(&config).await
}

/// Fetch → analyze → submit. Returns the server's acknowledgment.
pub async fn run_assessment(config: &AssessmentConfig) -> Result<Value, RunError> {
    let client = ApiClient::from_config(config)?;

    let patients = fetch::fetch_all_patients(&client, config).await?;

    let results = assessment::analyze(&patients);
    tracing::info!(
        patients = patients.len(),
        summary = %results.summary(),
        "Risk analysis complete"
    );

    let acknowledgment = submit::submit_assessment(&client, config, &results).await?;
    tracing::info!(%acknowledgment, "Submission successful");

    Ok(acknowledgment)
}
