use anyhow::Result;
use bytes::Bytes;
use hyper::Request;
use tracing::info;

use cc_shared::types::{Credentials, ErrorResponse, VerifyRequest};

use crate::AppState;
use crate::auth::AuthError;
use crate::handlers::http::utils::{JsonResponse, parse_json, respond};

/// POST /api/user/new
pub async fn handle_register(req: Request<Bytes>, state: AppState) -> Result<JsonResponse> {
    info!("Processing registration request");
    respond(register(req.body(), &state).await)
}

async fn register(body: &Bytes, state: &AppState) -> Result<ErrorResponse, AuthError> {
    let credentials: Credentials = parse_json(body)?;
    state.flows.register(&credentials).await?;
    Ok(ErrorResponse::ok())
}

/// POST /api/user/verify
pub async fn handle_verify(req: Request<Bytes>, state: AppState) -> Result<JsonResponse> {
    respond(verify(req.body(), &state).await)
}

async fn verify(body: &Bytes, state: &AppState) -> Result<ErrorResponse, AuthError> {
    let request: VerifyRequest = parse_json(body)?;
    state.flows.verify(&request.token).await?;
    Ok(ErrorResponse::ok())
}
