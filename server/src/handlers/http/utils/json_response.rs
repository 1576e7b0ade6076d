use anyhow::{Context, Result};
use bytes::Bytes;
use http_body_util::Full;
use hyper::{Response, StatusCode, header};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, error, warn};

use cc_shared::types::ErrorResponse;

use crate::auth::{AuthError, ErrorCategory};

pub type JsonResponse = Response<Full<Bytes>>;

pub fn status_for(category: ErrorCategory) -> StatusCode {
    match category {
        ErrorCategory::Validation => StatusCode::BAD_REQUEST,
        ErrorCategory::Authentication => StatusCode::UNAUTHORIZED,
        ErrorCategory::Authorization => StatusCode::FORBIDDEN,
        ErrorCategory::Conflict => StatusCode::CONFLICT,
        ErrorCategory::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Serialize any `Serialize` type and deliver it as a JSON response.
pub fn deliver_serialized_json<T: Serialize>(data: &T, status: StatusCode) -> Result<JsonResponse> {
    let json = serde_json::to_string(data).context("Failed to serialize response")?;

    debug!("Delivering JSON response, size: {} bytes", json.len());

    Response::builder()
        .status(status)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Full::new(Bytes::from(json)))
        .context("Failed to build JSON response")
}

/// Log the full cause server-side and answer with the fixed public message.
pub fn deliver_auth_error(err: &AuthError) -> Result<JsonResponse> {
    let category = err.category();
    if category == ErrorCategory::Internal {
        error!("Request failed: {}", err);
    } else {
        warn!("Request rejected ({:?}): {}", category, err);
    }
    deliver_serialized_json(
        &ErrorResponse::new(err.public_message()),
        status_for(category),
    )
}

/// `200` with `data` on success, the mapped error otherwise.
pub fn respond<T: Serialize>(result: std::result::Result<T, AuthError>) -> Result<JsonResponse> {
    match result {
        Ok(data) => deliver_serialized_json(&data, StatusCode::OK),
        Err(err) => deliver_auth_error(&err),
    }
}

pub fn parse_json<T: DeserializeOwned>(body: &Bytes) -> std::result::Result<T, AuthError> {
    Ok(serde_json::from_slice(body)?)
}

/// Last-resort response for when building a normal one failed.
pub fn internal_error() -> JsonResponse {
    let mut response = Response::new(Full::new(Bytes::from_static(
        br#"{"error":"Internal server error"}"#,
    )));
    *response.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
    response.headers_mut().insert(
        header::CONTENT_TYPE,
        header::HeaderValue::from_static("application/json"),
    );
    response
}
