//! Protected `/v1` surface: route-action declarations and stub handlers.
//!
//! Every handler behind [`build_router`]'s `/v1` nest runs after the
//! combined auth middleware; the handlers read the identity from request
//! extensions via the extractors.

use axum::{
    Json, Router,
    middleware::from_fn_with_state,
    routing::{get, patch, post},
};
use gatekit_access::{Action, Resource, RouteAction};
use gatekit_auth::axum_ext::{AuthIdentity, AuthState, require_auth};
use http::Method;
use serde_json::{Value, json};

/// The authorization table for the protected surface. Checked against a
/// role's permissions after authentication; a route missing here is
/// denied for token-authenticated callers.
pub fn protected_route_actions() -> Vec<RouteAction> {
    vec![
        RouteAction::new(
            Method::GET,
            "/v1/notifications",
            Action::Read,
            Resource::Notification,
        ),
        RouteAction::new(
            Method::POST,
            "/v1/notifications",
            Action::Create,
            Resource::Notification,
        ),
        RouteAction::new(
            Method::PATCH,
            "/v1/notifications/{notification_id}/status",
            Action::Update,
            Resource::Notification,
        ),
        RouteAction::new(Method::GET, "/v1/users", Action::Read, Resource::User),
        RouteAction::new(Method::POST, "/v1/users", Action::Create, Resource::User),
        RouteAction::new(Method::PATCH, "/v1/users", Action::Update, Resource::User),
        RouteAction::new(Method::POST, "/v1/image", Action::Create, Resource::Image),
    ]
}

/// Assemble the application router: public health and root endpoints,
/// and the `/v1` surface behind the required-auth middleware.
///
/// The protected routes keep their full `/v1` paths (merged, not nested)
/// so the middleware sees the same path the registry was built from.
pub fn build_router(state: AuthState) -> Router {
    let protected = Router::new()
        .route(
            "/v1/notifications",
            get(list_notifications).post(create_notification),
        )
        .route(
            "/v1/notifications/{notification_id}/status",
            patch(update_notification_status),
        )
        .route(
            "/v1/users",
            get(list_users).post(create_user).patch(update_user),
        )
        .route("/v1/image", post(upload_image))
        .layer(from_fn_with_state(state, require_auth));

    Router::new()
        .route("/", get(root))
        .route("/healthz", get(healthz))
        .merge(protected)
}

async fn root() -> Json<Value> {
    Json(json!({
        "name": "gatekit",
        "status": "ok",
        "versions": [{ "version": "v1" }],
    }))
}

async fn healthz() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

async fn list_notifications(AuthIdentity(identity): AuthIdentity) -> Json<Value> {
    Json(json!({ "subject": identity.subject(), "notifications": [] }))
}

async fn create_notification(AuthIdentity(identity): AuthIdentity) -> Json<Value> {
    Json(json!({ "subject": identity.subject(), "created": true }))
}

async fn update_notification_status(
    AuthIdentity(identity): AuthIdentity,
    axum::extract::Path(notification_id): axum::extract::Path<String>,
) -> Json<Value> {
    Json(json!({
        "subject": identity.subject(),
        "notification_id": notification_id,
        "updated": true,
    }))
}

async fn list_users(AuthIdentity(identity): AuthIdentity) -> Json<Value> {
    Json(json!({ "subject": identity.subject(), "users": [] }))
}

async fn create_user(AuthIdentity(identity): AuthIdentity) -> Json<Value> {
    Json(json!({ "subject": identity.subject(), "created": true }))
}

async fn update_user(AuthIdentity(identity): AuthIdentity) -> Json<Value> {
    Json(json!({ "subject": identity.subject(), "updated": true }))
}

async fn upload_image(AuthIdentity(identity): AuthIdentity) -> Json<Value> {
    Json(json!({ "subject": identity.subject(), "uploaded": true }))
}
