use anyhow::Result;
use bytes::Bytes;
use hyper::Request;
use tracing::info;

use cc_shared::types::{CheckAuthRequest, CheckAuthResponse, Credentials, TokenResponse};

use crate::AppState;
use crate::auth::AuthError;
use crate::handlers::http::utils::{JsonResponse, parse_json, respond};

/// POST /api/user/login
pub async fn handle_login(req: Request<Bytes>, state: AppState) -> Result<JsonResponse> {
    info!("Processing login request");
    respond(login(req.body(), &state).await)
}

async fn login(body: &Bytes, state: &AppState) -> Result<TokenResponse, AuthError> {
    let credentials: Credentials = parse_json(body)?;
    let token = state.flows.login(&credentials).await?;
    Ok(TokenResponse::token(token))
}

/// POST /api/user/authenticated
pub async fn handle_check_authenticated(
    req: Request<Bytes>,
    state: AppState,
) -> Result<JsonResponse> {
    respond(check_authenticated(req.body(), &state))
}

fn check_authenticated(body: &Bytes, state: &AppState) -> Result<CheckAuthResponse, AuthError> {
    let request: CheckAuthRequest = parse_json(body)?;
    Ok(CheckAuthResponse {
        error: None,
        authenticated: state.flows.check_authenticated(&request.token),
    })
}
