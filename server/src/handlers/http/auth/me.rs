use anyhow::Result;
use bytes::Bytes;
use hyper::Request;

use cc_shared::types::AccountSummary;

use crate::AppState;
use crate::auth::{AuthContext, AuthError};
use crate::handlers::http::utils::{JsonResponse, respond};

/// GET /api/user/me
pub async fn handle_me(
    _req: Request<Bytes>,
    state: AppState,
    ctx: AuthContext,
) -> Result<JsonResponse> {
    respond(me(&state, ctx).await)
}

async fn me(state: &AppState, ctx: AuthContext) -> Result<AccountSummary, AuthError> {
    let account = state
        .store
        .get_by_id(ctx.user_id)
        .await?
        .ok_or(AuthError::AccountMissing(ctx.user_id))?;
    Ok(account.summary())
}
