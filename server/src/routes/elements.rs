//! Extraction record routes.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderName, HeaderValue, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Json, Response};

use crate::api::{self, ApiResponse};
use crate::function::{self, FunctionResponse};
use crate::state::AppState;

/// Prefix of the persistent server's API routes.
pub const API_PREFIX: &str = "/api";

impl IntoResponse for ApiResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

impl IntoResponse for FunctionResponse {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let mut response = (status, self.body).into_response();
        for (name, value) in self.headers {
            if let (Ok(name), Ok(value)) = (HeaderName::try_from(name), HeaderValue::try_from(value)) {
                response.headers_mut().insert(name, value);
            }
        }
        response
    }
}

/// `ANY /api/*`: route through the API core.
///
/// The raw path and body go straight to `api::dispatch`, the same as the
/// function route, so both prefixes share trimming, id parsing and error
/// bodies.
pub async fn invoke_api(State(state): State<AppState>, method: Method, uri: Uri, body: Bytes) -> ApiResponse {
    let relative = uri.path().strip_prefix(API_PREFIX).unwrap_or_default();
    api::dispatch(state.store.as_ref(), &method, relative, &body).await
}

/// `ANY {function_base_path}/*`: run the stateless function adapter in-process.
pub async fn invoke_function(State(state): State<AppState>, method: Method, uri: Uri, body: Bytes) -> FunctionResponse {
    function::handle_request(state.store.as_ref(), &state.config.function_base_path, &method, uri.path(), &body).await
}
