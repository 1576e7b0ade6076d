use std::future::Future;
use std::pin::Pin;

use anyhow::{Context, Result};
use bytes::Bytes;
use http_body_util::BodyExt;
use hyper::body::Body;
use hyper::{Method, Request, StatusCode};
use tracing::{debug, error, warn};

use cc_shared::types::{AccessLevel, ErrorResponse};

use crate::AppState;
use crate::auth::{AuthContext, AuthError};
use crate::handlers::http::utils::{
    JsonResponse, deliver_auth_error, deliver_serialized_json, internal_error,
};
use crate::handlers::http::{admin, auth};

type HandlerFuture = Pin<Box<dyn Future<Output = Result<JsonResponse>> + Send>>;

// ---------------------------------------------------------------------------
// Handler type aliases
// ---------------------------------------------------------------------------
//
//   OpenHandler    — declared at Default.  Receives (req, state).
//                    The gate admits without looking at any token.
//
//   GuardedHandler — declared at User or above.  Receives
//                    (req, state, context) once the gate has admitted the
//                    caller against the stored account.

type OpenHandler = Box<dyn Fn(Request<Bytes>, AppState) -> HandlerFuture + Send + Sync>;

type GuardedHandler =
    Box<dyn Fn(Request<Bytes>, AppState, AuthContext) -> HandlerFuture + Send + Sync>;

enum RouteKind {
    Open(OpenHandler),
    Guarded(GuardedHandler),
}

struct Route {
    method: Method,
    path: String,
    /// The single level this operation is declared at.
    required: AccessLevel,
    kind: RouteKind,
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct Router {
    routes: Vec<Route>,
}

impl std::fmt::Debug for Router {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Router")
            .field("routes_count", &self.routes.len())
            .finish()
    }
}

impl Router {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Open (Default level, no token) ───────────────────────────────────────

    pub fn post<F, Fut>(self, path: &str, handler: F) -> Self
    where
        F: Fn(Request<Bytes>, AppState) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<JsonResponse>> + Send + 'static,
    {
        self.open(Method::POST, path, handler)
    }

    fn open<F, Fut>(mut self, method: Method, path: &str, handler: F) -> Self
    where
        F: Fn(Request<Bytes>, AppState) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<JsonResponse>> + Send + 'static,
    {
        self.routes.push(Route {
            method,
            path: path.to_string(),
            required: AccessLevel::DEFAULT,
            kind: RouteKind::Open(Box::new(
                move |req: Request<Bytes>, state: AppState| -> HandlerFuture {
                    Box::pin(handler(req, state))
                },
            )),
        });
        self
    }

    // ── Guarded (gate runs before the handler) ───────────────────────────────
    //
    // Handlers receive the `AuthContext` the gate produced and must NOT
    // repeat the check themselves.

    pub fn get_at<F, Fut>(self, path: &str, required: AccessLevel, handler: F) -> Self
    where
        F: Fn(Request<Bytes>, AppState, AuthContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<JsonResponse>> + Send + 'static,
    {
        self.guarded(Method::GET, path, required, handler)
    }

    pub fn post_at<F, Fut>(self, path: &str, required: AccessLevel, handler: F) -> Self
    where
        F: Fn(Request<Bytes>, AppState, AuthContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<JsonResponse>> + Send + 'static,
    {
        self.guarded(Method::POST, path, required, handler)
    }

    fn guarded<F, Fut>(
        mut self,
        method: Method,
        path: &str,
        required: AccessLevel,
        handler: F,
    ) -> Self
    where
        F: Fn(Request<Bytes>, AppState, AuthContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<JsonResponse>> + Send + 'static,
    {
        self.routes.push(Route {
            method,
            path: path.to_string(),
            required,
            kind: RouteKind::Guarded(Box::new(
                move |req: Request<Bytes>, state: AppState, ctx: AuthContext| -> HandlerFuture {
                    Box::pin(handler(req, state, ctx))
                },
            )),
        });
        self
    }

    /// The level `method path` is declared at, if it is routed at all.
    pub fn required_level(&self, method: &Method, path: &str) -> Option<AccessLevel> {
        self.find(method, path).map(|route| route.required)
    }

    fn find(&self, method: &Method, path: &str) -> Option<&Route> {
        let clean = path.split('?').next().unwrap_or(path);
        self.routes
            .iter()
            .find(|route| route.method == *method && route.path == clean)
    }

    // ── Dispatch ──────────────────────────────────────────────────────────────

    pub async fn route<B>(&self, mut req: Request<B>, state: AppState) -> Result<JsonResponse>
    where
        B: Body,
        B::Error: std::fmt::Display,
    {
        let method = req.method().clone();
        let path = req.uri().path().to_string();

        let Some(route) = self.find(&method, &path) else {
            debug!("No route for {} {}", method, path);
            return deliver_serialized_json(
                &ErrorResponse::new("Endpoint not found"),
                StatusCode::NOT_FOUND,
            )
            .context("Failed to deliver 404 response");
        };

        // The gate runs before the body is read; rejected callers never reach
        // the handler.
        let context = match state.gate.authorize_request(&mut req, route.required).await {
            Ok(context) => context,
            Err(err) => {
                warn!("Gate rejected {} {}", method, path);
                return deliver_auth_error(&err);
            }
        };

        let (parts, body) = req.into_parts();
        let body = match body.collect().await {
            Ok(collected) => collected.to_bytes(),
            Err(e) => {
                warn!("Failed to read body of {} {}: {}", method, path, e);
                return deliver_serialized_json(
                    &ErrorResponse::new("Invalid request body"),
                    StatusCode::BAD_REQUEST,
                );
            }
        };
        let req = Request::from_parts(parts, body);

        match (&route.kind, context) {
            (RouteKind::Open(h), _) => h(req, state).await,
            (RouteKind::Guarded(h), Some(context)) => h(req, state, context).await,
            (RouteKind::Guarded(_), None) => {
                error!("{} {} is guarded but declared at Default", method, path);
                deliver_auth_error(&AuthError::AccessDenied)
            }
        }
    }

    /// [`Router::route`] with any remaining error turned into a bare 500.
    pub async fn handle<B>(&self, req: Request<B>, state: AppState) -> JsonResponse
    where
        B: Body,
        B::Error: std::fmt::Display,
    {
        match self.route(req, state).await {
            Ok(response) => response,
            Err(e) => {
                error!("Handler failed: {:#}", e);
                internal_error()
            }
        }
    }
}

// ---------------------------------------------------------------------------
// API router
//
// Each operation is declared with exactly one required level:
//
//   .post(...)          → Default   — open, handler gets (req, state)
//   .get_at/.post_at    → User+     — handler gets (req, state, context)
// ---------------------------------------------------------------------------

pub fn build_api_router() -> Router {
    Router::new()
        // ── Open ──────────────────────────────────────────────────────────────
        .post("/api/user/new", |req, state| async move {
            auth::handle_register(req, state)
                .await
                .context("Register failed")
        })
        .post("/api/user/login", |req, state| async move {
            auth::handle_login(req, state).await.context("Login failed")
        })
        .post("/api/user/verify", |req, state| async move {
            auth::handle_verify(req, state).await.context("Verify failed")
        })
        .post("/api/user/password/request", |req, state| async move {
            auth::handle_request_reset(req, state)
                .await
                .context("Password reset request failed")
        })
        .post("/api/user/password/change", |req, state| async move {
            auth::handle_change_password(req, state)
                .await
                .context("Password change failed")
        })
        .post("/api/user/authenticated", |req, state| async move {
            auth::handle_check_authenticated(req, state)
                .await
                .context("Authentication check failed")
        })
        // ── User ──────────────────────────────────────────────────────────────
        .get_at("/api/user/me", AccessLevel::USER, |req, state, ctx| async move {
            auth::handle_me(req, state, ctx).await.context("Profile get failed")
        })
        // ── Moderator ─────────────────────────────────────────────────────────
        .post_at("/api/user/ban", AccessLevel::MODERATOR, |req, state, ctx| async move {
            admin::handle_ban(req, state, ctx).await.context("Ban failed")
        })
        .post_at("/api/user/unban", AccessLevel::MODERATOR, |req, state, ctx| async move {
            admin::handle_unban(req, state, ctx).await.context("Unban failed")
        })
        // ── Admin ─────────────────────────────────────────────────────────────
        .post_at("/api/user/access-level", AccessLevel::ADMIN, |req, state, ctx| async move {
            admin::handle_set_access_level(req, state, ctx)
                .await
                .context("Set access level failed")
        })
}
