//! HTTP client for the persistence endpoints.
//!
//! ERROR HANDLING
//! ==============
//! A 404 on `get` is an expected miss and comes back as `Ok(None)`. Any other
//! non-success status becomes `ApiClientError::Status` carrying the server's
//! `error` message when the body has one.

use elements::{ElementsInput, ExtractedElementsRecord};
use reqwest::StatusCode;
use serde_json::Value;

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

#[derive(Debug, thiserror::Error)]
pub enum ApiClientError {
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("server returned {status}: {message}")]
    Status { status: StatusCode, message: String },
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    #[must_use]
    pub fn with_client(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_owned();
        Self { http, base_url }
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// `GET /healthz`.
    ///
    /// # Errors
    ///
    /// Transport failure or a non-success status.
    pub async fn health(&self) -> Result<Value, ApiClientError> {
        let response = self.http.get(self.url("/healthz")).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(status_error(status, response).await);
        }
        Ok(response.json::<Value>().await?)
    }

    /// `POST /api/extract`; returns the stored record with its new id.
    ///
    /// # Errors
    ///
    /// Transport failure or a non-success status (400 for a rejected body).
    pub async fn save(&self, input: &ElementsInput) -> Result<ExtractedElementsRecord, ApiClientError> {
        let response = self.http.post(self.url("/api/extract")).json(input).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(status_error(status, response).await);
        }
        let record = response.json::<ExtractedElementsRecord>().await?;
        tracing::debug!(id = record.id, "record saved");
        Ok(record)
    }

    /// `GET /api/elements/{id}`; `None` when the server has no such record.
    ///
    /// # Errors
    ///
    /// Transport failure or a non-success status other than 404.
    pub async fn get(&self, id: &str) -> Result<Option<ExtractedElementsRecord>, ApiClientError> {
        let response = self.http.get(self.url(&format!("/api/elements/{id}"))).send().await?;
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(status_error(status, response).await);
        }
        Ok(Some(response.json::<ExtractedElementsRecord>().await?))
    }
}

async fn status_error(status: StatusCode, response: reqwest::Response) -> ApiClientError {
    let message = match response.json::<Value>().await {
        Ok(body) => body.get("error").and_then(Value::as_str).map_or_else(|| body.to_string(), str::to_owned),
        Err(_) => status.canonical_reason().unwrap_or("request failed").to_owned(),
    };
    ApiClientError::Status { status, message }
}
