//! Stateless function adapter.
//!
//! Translates a function-platform invocation (`httpMethod`, `path`, string
//! `body`) into a call on the shared API core and renders the result as a
//! `statusCode`/`headers`/`body` response object.

use std::collections::BTreeMap;

use axum::http::Method;
use serde::{Deserialize, Serialize};

use crate::api::{self, ApiError, ApiResponse};
use crate::store::RecordStore;

#[cfg(test)]
#[path = "function_test.rs"]
mod tests;

/// Incoming invocation event.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionEvent {
    pub http_method: String,
    pub path: String,
    #[serde(default)]
    pub body: Option<String>,
}

/// Response object returned to the function platform.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionResponse {
    pub status_code: u16,
    pub headers: BTreeMap<String, String>,
    pub body: String,
}

impl From<ApiResponse> for FunctionResponse {
    fn from(resp: ApiResponse) -> Self {
        let mut headers = BTreeMap::new();
        headers.insert("Content-Type".to_owned(), "application/json".to_owned());
        Self { status_code: resp.status.as_u16(), headers, body: resp.body.to_string() }
    }
}

/// Handle one invocation. `base_path` is stripped from `event.path` before
/// routing; paths outside it are not found.
pub async fn handle(store: &dyn RecordStore, base_path: &str, event: FunctionEvent) -> FunctionResponse {
    let Ok(method) = Method::from_bytes(event.http_method.to_ascii_uppercase().as_bytes()) else {
        return ApiResponse::from(ApiError::NotFound).into();
    };
    let body = event.body.unwrap_or_default();
    handle_request(store, base_path, &method, &event.path, body.as_bytes()).await
}

/// Byte-level entry shared by [`handle`] and the in-process route. The body
/// is passed through untouched so decoding errors surface as 400s from the
/// API core.
pub async fn handle_request(
    store: &dyn RecordStore,
    base_path: &str,
    method: &Method,
    path: &str,
    body: &[u8],
) -> FunctionResponse {
    let Some(relative) = strip_base(path, base_path) else {
        tracing::debug!(path, base_path, "function path outside base path");
        return ApiResponse::from(ApiError::NotFound).into();
    };
    api::dispatch(store, method, relative, body).await.into()
}

fn strip_base<'a>(path: &'a str, base_path: &str) -> Option<&'a str> {
    let rest = path.strip_prefix(base_path.trim_end_matches('/'))?;
    if rest.is_empty() || rest.starts_with('/') { Some(rest) } else { None }
}
