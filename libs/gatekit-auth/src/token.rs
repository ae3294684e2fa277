use crate::{
    directory::UserDirectory,
    errors::AuthError,
    identity::Identity,
    request::{RequestContext, is_structured_token},
    verifier::TokenVerifier,
};
use gatekit_access::{RolePermissions, RouteRegistry};
use std::{sync::Arc, time::Duration};
use tokio::time::timeout;

/// Identity-token authenticator: verifies a structured bearer token,
/// resolves its subject to a stored user, and authorizes the user's role
/// against the route-action registry.
///
/// Verification and the directory lookup are the only suspending steps;
/// both run under a bounded timeout so a slow identity provider fails the
/// request instead of holding a worker open.
pub struct TokenAuthenticator {
    verifier: Arc<dyn TokenVerifier>,
    directory: Arc<dyn UserDirectory>,
    registry: Arc<RouteRegistry>,
    permissions: Arc<RolePermissions>,
    verify_timeout: Duration,
}

impl TokenAuthenticator {
    #[must_use]
    pub fn new(
        verifier: Arc<dyn TokenVerifier>,
        directory: Arc<dyn UserDirectory>,
        registry: Arc<RouteRegistry>,
        permissions: Arc<RolePermissions>,
        verify_timeout: Duration,
    ) -> Self {
        Self {
            verifier,
            directory,
            registry,
            permissions,
            verify_timeout,
        }
    }

    /// Whether the request carries a structured bearer token.
    #[must_use]
    pub fn credential_present(&self, ctx: &RequestContext<'_>) -> bool {
        ctx.bearer_token().is_some_and(is_structured_token)
    }

    /// Run the full token flow for a request.
    ///
    /// # Errors
    ///
    /// * [`AuthError::Unauthenticated`] — no bearer token, verification
    ///   failure, timeout, or a subject with no stored user record.
    /// * [`AuthError::Forbidden`] — no registered route for the request
    ///   shape, or the user's role lacks the route's permission.
    /// * [`AuthError::Internal`] — the identity store failed to answer.
    pub async fn authenticate(&self, ctx: &RequestContext<'_>) -> Result<Identity, AuthError> {
        let Some(token) = ctx.bearer_token() else {
            tracing::warn!("token authentication failed: no bearer token provided");
            return Err(AuthError::Unauthenticated);
        };

        // 1. Verify the token against the identity provider.
        let claims = match timeout(self.verify_timeout, self.verifier.verify(token)).await {
            Ok(Ok(claims)) => claims,
            Ok(Err(err)) => {
                tracing::warn!(error = %err, "token verification failed");
                return Err(AuthError::Unauthenticated);
            }
            Err(_) => {
                tracing::warn!(
                    timeout_secs = self.verify_timeout.as_secs(),
                    "token verification timed out"
                );
                return Err(AuthError::Unauthenticated);
            }
        };

        // 2. Resolve the subject to a stored user record. A missing record
        //    is unauthenticated: the directory is the source of truth for
        //    live identities.
        let user = match timeout(
            self.verify_timeout,
            self.directory.find_user(&claims.subject),
        )
        .await
        {
            Ok(Ok(Some(user))) => user,
            Ok(Ok(None)) => {
                tracing::warn!(subject = %claims.subject, "no user record for verified token");
                return Err(AuthError::Unauthenticated);
            }
            Ok(Err(err)) => {
                tracing::error!(error = %err, "identity store lookup failed");
                return Err(AuthError::Internal(err.to_string()));
            }
            Err(_) => {
                tracing::warn!(
                    timeout_secs = self.verify_timeout.as_secs(),
                    "identity store lookup timed out"
                );
                return Err(AuthError::Unauthenticated);
            }
        };

        // 3. Match the request shape against the route-action registry.
        let Some(route) = self.registry.match_route(ctx.method, ctx.path) else {
            tracing::warn!(method = %ctx.method, path = %ctx.path, "no route-action entry matches");
            return Err(AuthError::Forbidden);
        };

        // 4. Role-based authorization.
        if !self
            .permissions
            .has_permission(user.role, route.resource, route.action)
        {
            tracing::warn!(
                subject = %user.id,
                role = %user.role,
                resource = %route.resource,
                action = %route.action,
                "role lacks permission for matched route"
            );
            return Err(AuthError::Forbidden);
        }

        tracing::debug!(subject = %user.id, role = %user.role, "token authentication successful");
        Ok(Identity::User(user))
    }
}
