//! Authentication for the GateKit gateway.
//!
//! Two credential channels guard every protected route: a shared-secret
//! API key for service-to-service calls, and a structured identity token
//! (JWT) resolved against the user directory and authorized through the
//! role-permission table. [`AuthGuard`] arbitrates between them — API key
//! first, token as fallback — and produces a single terminal
//! [`Decision`](guard::Decision) per request.

pub mod api_key;
pub mod config;
pub mod directory;
pub mod errors;
pub mod guard;
pub mod identity;
pub mod request;
pub mod secret;
pub mod token;
pub mod verifier;

#[cfg(feature = "axum-ext")]
pub mod axum_ext;

pub use api_key::ApiKeyAuthenticator;
pub use config::{AuthConfig, TokenValidationConfig};
pub use directory::{DirectoryError, InMemoryDirectory, UserDirectory};
pub use errors::AuthError;
pub use guard::{AuthGuard, Decision};
pub use identity::{Identity, SERVICE_SUBJECT, UserRecord};
pub use request::RequestContext;
pub use secret::SecretString;
pub use token::TokenAuthenticator;
pub use verifier::{JwtVerifier, TokenClaims, TokenVerifier};

use gatekit_access::{RolePermissions, RouteRegistry};
use std::sync::Arc;

/// Build the combined guard from config and collaborators.
///
/// The registry and permission table are shared read-only; the verifier
/// and directory are the only I/O seams.
///
/// # Errors
///
/// [`AuthError::Misconfigured`] if the token signing secret is absent.
pub fn build_guard(
    config: &AuthConfig,
    directory: Arc<dyn UserDirectory>,
    registry: Arc<RouteRegistry>,
    permissions: Arc<RolePermissions>,
) -> Result<AuthGuard, AuthError> {
    let verifier = Arc::new(JwtVerifier::from_config(&config.token)?);
    build_guard_with_verifier(config, verifier, directory, registry, permissions)
}

/// Like [`build_guard`], with an explicit verifier (tests, alternative
/// identity providers).
///
/// # Errors
///
/// Currently infallible; kept fallible for parity with [`build_guard`].
pub fn build_guard_with_verifier(
    config: &AuthConfig,
    verifier: Arc<dyn TokenVerifier>,
    directory: Arc<dyn UserDirectory>,
    registry: Arc<RouteRegistry>,
    permissions: Arc<RolePermissions>,
) -> Result<AuthGuard, AuthError> {
    let api_key = ApiKeyAuthenticator::new(config.api_key.clone());
    let token = TokenAuthenticator::new(
        verifier,
        directory,
        registry,
        permissions,
        config.verify_timeout(),
    );
    Ok(AuthGuard::new(api_key, token))
}
