use reqwest::{Method, RequestBuilder};
use serde_json::Value;

use super::{ApiError, RetryPolicy};
use crate::config::{AssessmentConfig, API_KEY_HEADER, CONNECT_TIMEOUT};

/// HTTP client for the clinical data API.
///
/// Every request carries the `x-api-key` credential. Reads go through
/// [`request_json`](Self::request_json), which retries 429/5xx responses
/// with exponential backoff.
pub struct ApiClient {
    http: reqwest::Client,
    api_key: String,
    retry: RetryPolicy,
}

impl ApiClient {
    pub fn new(api_key: &str, retry: RetryPolicy) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .build()
            .map_err(|e| ApiError::HttpClient(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            http,
            api_key: api_key.to_string(),
            retry,
        })
    }

    pub fn from_config(config: &AssessmentConfig) -> Result<Self, ApiError> {
        Self::new(&config.api_key, config.retry)
    }

    /// POST builder with the credential attached. Not retried.
    pub fn post(&self, url: &str) -> RequestBuilder {
        self.authorized(self.http.post(url))
    }

    pub async fn get_json(&self, url: &str, query: &[(&str, String)]) -> Result<Value, ApiError> {
        self.request_json(Method::GET, url, query).await
    }

    /// Send a request and parse the JSON body, retrying transient failures.
    ///
    /// 429 and 5xx are retried up to `max_retries` times. Other non-2xx
    /// statuses fail on the spot with [`ApiError::Fatal`].
    pub async fn request_json(
        &self,
        method: Method,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<Value, ApiError> {
        let max_attempts = self.retry.max_attempts();
        let mut last_status = 0;

        for attempt in 0..max_attempts {
            let response = self
                .authorized(self.http.request(method.clone(), url).query(query))
                .send()
                .await?;

            match read_json(response).await {
                Ok(body) => {
                    if attempt > 0 {
                        tracing::debug!(%url, attempts = attempt + 1, "API request recovered after retry");
                    }
                    return Ok(body);
                }
                Err(ApiError::Transient { status }) => {
                    last_status = status;
                    if attempt + 1 == max_attempts {
                        break;
                    }
                    let wait = self.retry.delay_for(attempt);
                    tracing::warn!(
                        status,
                        attempt = attempt + 1,
                        max_attempts,
                        wait_ms = u64::try_from(wait.as_millis()).unwrap_or(u64::MAX),
                        %url,
                        "Transient API error, retrying"
                    );
                    tokio::time::sleep(wait).await;
                }
                Err(e) => return Err(e),
            }
        }

        tracing::error!(%url, attempts = max_attempts, last_status, "API retries exhausted");
        Err(ApiError::RetriesExhausted {
            attempts: max_attempts,
            last_status,
        })
    }

    fn authorized(&self, builder: RequestBuilder) -> RequestBuilder {
        builder.header(API_KEY_HEADER, &self.api_key)
    }
}

/// Parse a 2xx body as JSON; classify anything else.
async fn read_json(response: reqwest::Response) -> Result<Value, ApiError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(ApiError::from_status(status.as_u16(), body));
    }

    response
        .json::<Value>()
        .await
        .map_err(|e| ApiError::ResponseParsing(e.to_string()))
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use serde_json::json;

    use super::*;
    use crate::api::mock_server::{MockApi, ScriptedResponse};

    fn fast_client() -> ApiClient {
        ApiClient::new("ak_test", RetryPolicy::new(7, Duration::from_millis(1))).unwrap()
    }

    fn ok_body() -> ScriptedResponse {
        ScriptedResponse::json(200, json!({"ok": true}))
    }

    #[tokio::test]
    async fn success_on_first_attempt() {
        let mock = MockApi::start(vec![ok_body()]).await;
        let client = fast_client();

        let body = client
            .get_json(&format!("{}/patients", mock.base_url), &[])
            .await
            .unwrap();

        assert_eq!(body, json!({"ok": true}));
        assert_eq!(mock.request_count(), 1);
    }

    #[tokio::test]
    async fn every_request_carries_api_key() {
        let mock = MockApi::start(vec![ScriptedResponse::text(500, "boom"), ok_body()]).await;
        let client = fast_client();

        client
            .get_json(&format!("{}/patients", mock.base_url), &[])
            .await
            .unwrap();

        let requests = mock.requests();
        assert_eq!(requests.len(), 2);
        for req in requests {
            assert_eq!(req.api_key.as_deref(), Some("ak_test"));
        }
    }

    #[tokio::test]
    async fn query_parameters_are_sent() {
        let mock = MockApi::start(vec![ok_body()]).await;
        let client = fast_client();

        client
            .get_json(
                &format!("{}/patients", mock.base_url),
                &[("page", "3".to_string()), ("limit", "5".to_string())],
            )
            .await
            .unwrap();

        let req = &mock.requests()[0];
        assert_eq!(req.method, axum::http::Method::GET);
        assert_eq!(req.path, "/api/patients");
        assert_eq!(req.query_param("page").as_deref(), Some("3"));
        assert_eq!(req.query_param("limit").as_deref(), Some("5"));
    }

    #[tokio::test]
    async fn transient_failures_are_retried_until_success() {
        let mock = MockApi::start(vec![
            ScriptedResponse::text(500, "down"),
            ScriptedResponse::text(500, "down"),
            ScriptedResponse::text(429, "slow down"),
            ok_body(),
        ])
        .await;
        let client = fast_client();

        let body = client
            .get_json(&format!("{}/patients", mock.base_url), &[])
            .await
            .unwrap();

        assert_eq!(body["ok"], json!(true));
        // Three retries after the first attempt.
        assert_eq!(mock.request_count(), 4);
    }

    #[tokio::test]
    async fn eight_server_errors_exhaust_retries() {
        let responses = (0..8).map(|_| ScriptedResponse::text(500, "down")).collect();
        let mock = MockApi::start(responses).await;
        let client = fast_client();

        let err = client
            .get_json(&format!("{}/patients", mock.base_url), &[])
            .await
            .unwrap_err();

        match err {
            ApiError::RetriesExhausted {
                attempts,
                last_status,
            } => {
                assert_eq!(attempts, 8);
                assert_eq!(last_status, 500);
            }
            other => panic!("expected RetriesExhausted, got {other:?}"),
        }
        assert_eq!(mock.request_count(), 8);
    }

    #[tokio::test]
    async fn client_error_fails_without_retry() {
        let mock = MockApi::start(vec![
            ScriptedResponse::text(404, "no such page"),
            ok_body(),
        ])
        .await;
        let client = fast_client();

        let err = client
            .get_json(&format!("{}/patients", mock.base_url), &[])
            .await
            .unwrap_err();

        match err {
            ApiError::Fatal { status, body } => {
                assert_eq!(status, 404);
                assert_eq!(body, "no such page");
            }
            other => panic!("expected Fatal, got {other:?}"),
        }
        assert_eq!(mock.request_count(), 1);
    }

    #[tokio::test]
    async fn zero_retry_policy_makes_one_attempt() {
        let mock = MockApi::start(vec![ScriptedResponse::text(503, "down"), ok_body()]).await;
        let client = ApiClient::new("ak_test", RetryPolicy::new(0, Duration::from_millis(1))).unwrap();

        let err = client
            .get_json(&format!("{}/patients", mock.base_url), &[])
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            ApiError::RetriesExhausted {
                attempts: 1,
                last_status: 503
            }
        ));
        assert_eq!(mock.request_count(), 1);
    }

    #[tokio::test]
    async fn non_json_success_body_is_a_parse_error() {
        let mock = MockApi::start(vec![ScriptedResponse::text(200, "<html>ok</html>")]).await;
        let client = fast_client();

        let err = client
            .get_json(&format!("{}/patients", mock.base_url), &[])
            .await
            .unwrap_err();

        assert!(matches!(err, ApiError::ResponseParsing(_)));
        assert_eq!(mock.request_count(), 1);
    }

    #[tokio::test]
    async fn unreachable_host_is_a_client_error() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = fast_client();
        let err = client
            .get_json(&format!("http://{addr}/api/patients"), &[])
            .await
            .unwrap_err();

        assert!(matches!(err, ApiError::HttpClient(_)));
    }

    #[tokio::test]
    async fn post_builder_carries_api_key() {
        let mock = MockApi::start(vec![ok_body()]).await;
        let client = fast_client();

        let resp = client
            .post(&format!("{}/submit-assessment", mock.base_url))
            .json(&json!({"a": 1}))
            .send()
            .await
            .unwrap();

        assert!(resp.status().is_success());
        let req = &mock.requests()[0];
        assert_eq!(req.method, axum::http::Method::POST);
        assert_eq!(req.api_key.as_deref(), Some("ak_test"));
        assert_eq!(req.body, r#"{"a":1}"#);
    }
}
