//! HTTP client helpers for tests.

use autograde::aggregate::GradingResult;
use serde::Deserialize;
use std::time::Duration;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

pub struct TestClient {
    client: reqwest::Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

#[derive(Debug, Deserialize)]
pub struct ReadyResponse {
    pub status: String,
    pub backend: String,
    pub mode: String,
}

#[derive(Debug, Deserialize)]
pub struct BatchResults {
    pub results: Vec<GradingResult>,
}

#[derive(Debug, thiserror::Error)]
pub enum TestClientError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("bad request: {0}")]
    BadRequest(serde_json::Value),
    #[error("unexpected status {0}: {1}")]
    UnexpectedStatus(u16, String),
}

impl TestClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_url: base_url.into(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Returns the result and the `x-autograde-method` header.
    pub async fn grade(
        &self,
        body: &serde_json::Value,
    ) -> Result<(GradingResult, String), TestClientError> {
        let resp = self.client.post(self.url("/v1/grade")).json(body).send().await?;

        let method_header = resp
            .headers()
            .get("x-autograde-method")
            .and_then(|h| h.to_str().ok())
            .unwrap_or("unknown")
            .to_string();

        match resp.status().as_u16() {
            200 => Ok((resp.json().await?, method_header)),
            400 => Err(TestClientError::BadRequest(resp.json().await?)),
            status => {
                let body = resp.text().await.unwrap_or_default();
                Err(TestClientError::UnexpectedStatus(status, body))
            }
        }
    }

    pub async fn grade_batch(
        &self,
        requests: Vec<serde_json::Value>,
    ) -> Result<BatchResults, TestClientError> {
        let resp = self
            .client
            .post(self.url("/v1/grade/batch"))
            .json(&serde_json::json!({ "requests": requests }))
            .send()
            .await?;

        match resp.status().as_u16() {
            200 => Ok(resp.json().await?),
            400 => Err(TestClientError::BadRequest(resp.json().await?)),
            status => {
                let body = resp.text().await.unwrap_or_default();
                Err(TestClientError::UnexpectedStatus(status, body))
            }
        }
    }

    pub async fn health(&self) -> Result<HealthResponse, TestClientError> {
        Ok(self.client.get(self.url("/healthz")).send().await?.json().await?)
    }

    pub async fn ready(&self) -> Result<ReadyResponse, TestClientError> {
        Ok(self.client.get(self.url("/ready")).send().await?.json().await?)
    }
}
