use crate::role::Role;
use thiserror::Error;

/// Errors raised while building the access-control tables.
///
/// These are configuration bugs, not runtime conditions: both the
/// role-permission table and the route registry are constructed once at
/// startup and an invalid table must refuse to build.
#[derive(Debug, Error)]
pub enum AccessError {
    #[error("role '{0}' has no entry in the permission table")]
    MissingRole(Role),

    #[error("route registry conflict for {method} {path}: {reason}")]
    RouteConflict {
        method: http::Method,
        path: String,
        reason: String,
    },
}
