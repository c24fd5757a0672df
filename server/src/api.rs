//! Transport-neutral request handling.
//!
//! ARCHITECTURE
//! ============
//! Both transports (the axum router and the stateless function adapter)
//! reduce a request to `(method, path, body)` relative to their own prefix and
//! call into this module. Responses come back as `ApiResponse` (status plus
//! JSON body), which each adapter renders in its native shape.

use axum::http::{Method, StatusCode};
use elements::{ElementsInput, ExtractedElementsRecord};
use serde::Serialize;
use serde_json::{Value, json};

use crate::store::RecordStore;

#[cfg(test)]
#[path = "api_test.rs"]
mod tests;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The save body is not valid JSON or does not match the input shape.
    #[error("Invalid request data")]
    InvalidRequest(#[source] serde_json::Error),
    /// Unknown identifier, unparseable identifier, or unknown route.
    #[error("Not found")]
    NotFound,
}

impl ApiError {
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound => StatusCode::NOT_FOUND,
        }
    }
}

/// A response produced by the shared core.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl ApiResponse {
    fn ok<T: Serialize>(value: &T) -> Self {
        match serde_json::to_value(value) {
            Ok(body) => Self { status: StatusCode::OK, body },
            Err(e) => {
                tracing::error!(error = %e, "response serialization failed");
                Self { status: StatusCode::INTERNAL_SERVER_ERROR, body: json!({ "error": "Internal error" }) }
            }
        }
    }
}

impl From<ApiError> for ApiResponse {
    fn from(err: ApiError) -> Self {
        Self { status: err.status(), body: json!({ "error": err.to_string() }) }
    }
}

impl From<Result<ExtractedElementsRecord, ApiError>> for ApiResponse {
    fn from(result: Result<ExtractedElementsRecord, ApiError>) -> Self {
        match result {
            Ok(record) => Self::ok(&record),
            Err(err) => err.into(),
        }
    }
}

// =============================================================================
// OPERATIONS
// =============================================================================

/// `POST extract`: validate the body and store it.
///
/// # Errors
///
/// Returns [`ApiError::InvalidRequest`] when `body` is not an `ElementsInput`.
/// The store is untouched in that case.
pub async fn save_elements(store: &dyn RecordStore, body: &[u8]) -> Result<ExtractedElementsRecord, ApiError> {
    let input = serde_json::from_slice::<ElementsInput>(body).map_err(|e| {
        tracing::debug!(error = %e, "rejected extract request");
        ApiError::InvalidRequest(e)
    })?;
    let record = store.save(input).await;
    tracing::info!(id = record.id, elements = record.elements.len(), "saved extraction record");
    Ok(record)
}

/// `GET elements/{id}`: fetch a record. Unparseable ids are plain misses.
///
/// Only a full unsigned integer matches: a numeric prefix (`12abc`), a sign
/// and a percent-encoded digit (`%31`) all miss. `raw_id` is taken as it
/// appears in the path; nothing is percent-decoded.
///
/// # Errors
///
/// Returns [`ApiError::NotFound`] when no record matches `raw_id`.
pub async fn get_elements(store: &dyn RecordStore, raw_id: &str) -> Result<ExtractedElementsRecord, ApiError> {
    let Ok(id) = raw_id.trim().parse::<u64>() else {
        tracing::debug!(raw_id, "unparseable record id");
        return Err(ApiError::NotFound);
    };
    store.get(id).await.ok_or_else(|| {
        tracing::debug!(id, "record not found");
        ApiError::NotFound
    })
}

/// Route a prefix-relative request (`extract`, `elements/7`) to an operation.
pub async fn dispatch(store: &dyn RecordStore, method: &Method, path: &str, body: &[u8]) -> ApiResponse {
    let path = path.trim_matches('/');
    let mut segments = path.split('/');

    match (method, segments.next(), segments.next(), segments.next()) {
        (&Method::POST, Some("extract"), None, None) => save_elements(store, body).await.into(),
        (&Method::GET, Some("elements"), Some(id), None) => get_elements(store, id).await.into(),
        _ => ApiError::NotFound.into(),
    }
}
