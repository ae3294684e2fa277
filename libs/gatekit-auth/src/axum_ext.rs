//! Axum extractors and middleware for the combined guard.

use crate::{
    errors::AuthError,
    guard::{AuthGuard, Decision},
    identity::Identity,
    request::RequestContext,
};
use axum::{
    extract::{FromRequestParts, Request, State},
    http::{HeaderMap, Method, request::Parts},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::sync::Arc;

/// Shared state for the auth middleware.
#[derive(Clone)]
pub struct AuthState {
    guard: Arc<AuthGuard>,
}

impl AuthState {
    #[must_use]
    pub fn new(guard: Arc<AuthGuard>) -> Self {
        Self { guard }
    }
}

/// Extractor for the authenticated identity.
///
/// Rejects with an internal error if the auth middleware has not run —
/// a route wired without the middleware is a configuration bug, not an
/// anonymous request.
#[derive(Debug, Clone)]
pub struct AuthIdentity(pub Identity);

impl<S> FromRequestParts<S> for AuthIdentity
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Identity>()
            .cloned()
            .map(AuthIdentity)
            .ok_or(AuthError::Internal(
                "Identity not found - auth middleware not configured".to_owned(),
            ))
    }
}

/// Extractor for routes behind the optional-auth middleware: `None` means
/// the request is anonymous and the handler applies its own gating.
#[derive(Debug, Clone)]
pub struct MaybeIdentity(pub Option<Identity>);

impl<S> FromRequestParts<S> for MaybeIdentity
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(MaybeIdentity(parts.extensions.get::<Identity>().cloned()))
    }
}

/// Required-auth middleware: every request must authenticate via the API
/// key or an identity token, or it is rejected with the guard's denial.
///
/// Use with `axum::middleware::from_fn_with_state`.
pub async fn require_auth(
    State(state): State<AuthState>,
    mut request: Request,
    next: Next,
) -> Response {
    if is_preflight_request(request.method(), request.headers()) {
        return next.run(request).await;
    }

    let ctx = RequestContext::new(
        request.method(),
        request.uri().path(),
        request.uri().query(),
        request.headers(),
    );
    let decision = state.guard.authenticate(&ctx).await;

    match decision {
        Decision::Allowed(identity) => {
            request.extensions_mut().insert(identity);
            next.run(request).await
        }
        Decision::Denied(err) => err.into_response(),
    }
}

/// Optional-auth middleware: denials are swallowed and the request
/// proceeds without an identity in its extensions.
pub async fn optional_auth(
    State(state): State<AuthState>,
    mut request: Request,
    next: Next,
) -> Response {
    if is_preflight_request(request.method(), request.headers()) {
        return next.run(request).await;
    }

    let ctx = RequestContext::new(
        request.method(),
        request.uri().path(),
        request.uri().query(),
        request.headers(),
    );
    let identity = state.guard.authenticate_optional(&ctx).await;

    if let Some(identity) = identity {
        request.extensions_mut().insert(identity);
    }
    next.run(request).await
}

/// Check if this is a CORS preflight request.
///
/// Preflight requests are OPTIONS requests with:
/// - Origin header present
/// - Access-Control-Request-Method header present
fn is_preflight_request(method: &Method, headers: &HeaderMap) -> bool {
    method == Method::OPTIONS
        && headers.contains_key(axum::http::header::ORIGIN)
        && headers.contains_key(axum::http::header::ACCESS_CONTROL_REQUEST_METHOD)
}

// End-to-end middleware tests live in tests/guard_integration.rs; they
// need a full Router + tower stack rather than a unit harness.
