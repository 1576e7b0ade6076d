use anyhow::Result;
use bytes::Bytes;
use hyper::Request;

use cc_shared::types::{ChangePasswordRequest, ErrorResponse, ResetRequest};

use crate::AppState;
use crate::auth::AuthError;
use crate::handlers::http::utils::{JsonResponse, parse_json, respond};

/// POST /api/user/password/request
pub async fn handle_request_reset(req: Request<Bytes>, state: AppState) -> Result<JsonResponse> {
    respond(request_reset(req.body(), &state).await)
}

async fn request_reset(body: &Bytes, state: &AppState) -> Result<ErrorResponse, AuthError> {
    let request: ResetRequest = parse_json(body)?;
    state.flows.request_password_reset(&request.email).await?;
    Ok(ErrorResponse::ok())
}

/// POST /api/user/password/change
pub async fn handle_change_password(
    req: Request<Bytes>,
    state: AppState,
) -> Result<JsonResponse> {
    respond(change_password(req.body(), &state).await)
}

async fn change_password(body: &Bytes, state: &AppState) -> Result<ErrorResponse, AuthError> {
    let request: ChangePasswordRequest = parse_json(body)?;
    state
        .flows
        .complete_password_reset(&request.token, &request.password)
        .await?;
    Ok(ErrorResponse::ok())
}
