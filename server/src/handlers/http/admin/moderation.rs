use anyhow::Result;
use bytes::Bytes;
use hyper::Request;
use tracing::info;

use cc_shared::types::{ErrorResponse, SetAccessLevelRequest, TargetRequest};

use crate::AppState;
use crate::auth::{AuthContext, AuthError};
use crate::handlers::http::utils::{JsonResponse, parse_json, respond};

/// POST /api/user/ban
pub async fn handle_ban(
    req: Request<Bytes>,
    state: AppState,
    ctx: AuthContext,
) -> Result<JsonResponse> {
    respond(ban(req.body(), &state, ctx).await)
}

async fn ban(
    body: &Bytes,
    state: &AppState,
    ctx: AuthContext,
) -> Result<ErrorResponse, AuthError> {
    let target: TargetRequest = parse_json(body)?;
    info!("User {} banning user {}", ctx.user_id, target.id);
    state.guard.ban(ctx.user_id, target.id).await?;
    Ok(ErrorResponse::ok())
}

/// POST /api/user/unban
pub async fn handle_unban(
    req: Request<Bytes>,
    state: AppState,
    ctx: AuthContext,
) -> Result<JsonResponse> {
    respond(unban(req.body(), &state, ctx).await)
}

async fn unban(
    body: &Bytes,
    state: &AppState,
    ctx: AuthContext,
) -> Result<ErrorResponse, AuthError> {
    let target: TargetRequest = parse_json(body)?;
    info!("User {} unbanning user {}", ctx.user_id, target.id);
    state.guard.unban(ctx.user_id, target.id).await?;
    Ok(ErrorResponse::ok())
}

/// POST /api/user/access-level
pub async fn handle_set_access_level(
    req: Request<Bytes>,
    state: AppState,
    ctx: AuthContext,
) -> Result<JsonResponse> {
    respond(set_access_level(req.body(), &state, ctx).await)
}

async fn set_access_level(
    body: &Bytes,
    state: &AppState,
    ctx: AuthContext,
) -> Result<ErrorResponse, AuthError> {
    let request: SetAccessLevelRequest = parse_json(body)?;
    state
        .guard
        .set_access_level(ctx.user_id, request.id, request.access_level)
        .await?;
    Ok(ErrorResponse::ok())
}
