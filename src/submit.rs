//! Submission of the classification payload.

use serde_json::Value;

use crate::api::{ApiClient, ApiError};
use crate::config::AssessmentConfig;
use crate::models::AssessmentResults;

/// POST the three lists to `/submit-assessment` and return the server's
/// acknowledgment. Single attempt: any non-2xx fails with [`ApiError::Submit`].
pub async fn submit_assessment(
    client: &ApiClient,
    config: &AssessmentConfig,
    results: &AssessmentResults,
) -> Result<Value, ApiError> {
    let url = config.submit_url();
    tracing::info!(summary = %results.summary(), %url, "Submitting assessment");

    let response = client.post(&url).json(results).send().await?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        tracing::error!(status = status.as_u16(), body = %body, "Assessment submission rejected");
        return Err(ApiError::Submit {
            status: status.as_u16(),
            body,
        });
    }

    response
        .json::<Value>()
        .await
        .map_err(|e| ApiError::ResponseParsing(e.to_string()))
}
