use crate::{
    api_key::ApiKeyAuthenticator, errors::AuthError, identity::Identity, request::RequestContext,
    token::TokenAuthenticator,
};

/// Terminal outcome of the combined authentication flow.
///
/// Authentication is decided exactly once per request and never retried;
/// a denial is final for that request.
#[derive(Debug)]
pub enum Decision {
    Allowed(Identity),
    Denied(AuthError),
}

impl Decision {
    /// Convert to a `Result`, consuming the decision.
    ///
    /// # Errors
    ///
    /// The denial reason, unchanged.
    pub fn into_result(self) -> Result<Identity, AuthError> {
        match self {
            Decision::Allowed(identity) => Ok(identity),
            Decision::Denied(err) => Err(err),
        }
    }
}

/// Combined authenticator: API key first, identity token second.
///
/// The flow is a small state machine:
///
/// ```text
/// START -> TRY_API_KEY -> (ALLOWED | TRY_IDENTITY_TOKEN) -> (ALLOWED | DENIED)
/// ```
///
/// An API-key failure is swallowed to allow the token fallthrough; a token
/// failure is the final denial. A request with neither a plausible API key
/// nor a structured bearer token is denied immediately with a message
/// naming the supported credential channels.
pub struct AuthGuard {
    api_key: ApiKeyAuthenticator,
    token: TokenAuthenticator,
}

impl AuthGuard {
    #[must_use]
    pub fn new(api_key: ApiKeyAuthenticator, token: TokenAuthenticator) -> Self {
        Self { api_key, token }
    }

    /// Decide authentication for a request. Required variant: a denial is
    /// surfaced to the caller.
    pub async fn authenticate(&self, ctx: &RequestContext<'_>) -> Decision {
        let has_api_key = self.api_key.credential_present(ctx);
        let has_token = self.token.credential_present(ctx);

        if has_api_key {
            match self.api_key.authenticate(ctx) {
                Ok(identity) => return Decision::Allowed(identity),
                Err(err) => {
                    // Fall through to the token path; the API-key failure
                    // is not terminal while another credential remains.
                    tracing::debug!(error = %err, "API key auth failed, trying identity token");
                }
            }
        }

        if has_token {
            return match self.token.authenticate(ctx).await {
                Ok(identity) => Decision::Allowed(identity),
                Err(err) => {
                    tracing::warn!(error = %err, "identity token authentication failed");
                    Decision::Denied(err)
                }
            };
        }

        if has_api_key {
            // The only credential present was an API key and it failed.
            return Decision::Denied(AuthError::Unauthenticated);
        }

        Decision::Denied(AuthError::MissingCredentials)
    }

    /// Optional variant: identical flow, but every denial is swallowed and
    /// the request proceeds anonymously. Downstream handlers must treat
    /// the absent identity as anonymous and gate their own operations.
    pub async fn authenticate_optional(&self, ctx: &RequestContext<'_>) -> Option<Identity> {
        match self.authenticate(ctx).await {
            Decision::Allowed(identity) => Some(identity),
            Decision::Denied(err) => {
                tracing::debug!(error = %err, "optional auth: continuing without identity");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directory::InMemoryDirectory;
    use crate::identity::UserRecord;
    use crate::secret::SecretString;
    use crate::token::TokenAuthenticator;
    use crate::verifier::{TokenClaims, TokenVerifier};
    use async_trait::async_trait;
    use gatekit_access::{Action, Resource, Role, RolePermissions, RouteAction, RouteRegistry};
    use http::{HeaderMap, HeaderValue, Method};
    use std::sync::Arc;
    use std::time::Duration;

    /// Verifier that accepts exactly one token string.
    struct OneTokenVerifier {
        expected: &'static str,
        subject: &'static str,
    }

    #[async_trait]
    impl TokenVerifier for OneTokenVerifier {
        async fn verify(&self, token: &str) -> Result<TokenClaims, AuthError> {
            if token == self.expected {
                Ok(TokenClaims {
                    subject: self.subject.to_owned(),
                    issuer: None,
                    expires_at: None,
                })
            } else {
                Err(AuthError::InvalidToken("unknown token".into()))
            }
        }
    }

    fn guard(api_key: Option<&str>) -> AuthGuard {
        let registry = Arc::new(
            RouteRegistry::new([RouteAction::new(
                Method::GET,
                "/v1/notifications",
                Action::Read,
                Resource::Notification,
            )])
            .unwrap(),
        );
        let token = TokenAuthenticator::new(
            Arc::new(OneTokenVerifier {
                expected: "good.jwt.token",
                subject: "u-1",
            }),
            Arc::new(
                InMemoryDirectory::default().with_user(UserRecord::new("u-1", Role::Member)),
            ),
            registry,
            Arc::new(RolePermissions::standard()),
            Duration::from_secs(5),
        );
        AuthGuard::new(
            ApiKeyAuthenticator::new(api_key.map(SecretString::new)),
            token,
        )
    }

    fn headers(pairs: &[(&'static str, &str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in pairs {
            map.insert(*name, HeaderValue::from_str(value).unwrap());
        }
        map
    }

    #[tokio::test]
    async fn valid_api_key_short_circuits_bad_bearer() {
        let guard = guard(Some("secret123"));
        let map = headers(&[
            ("x-api-key", "secret123"),
            ("authorization", "Bearer bad.jwt.token"),
        ]);
        let ctx = RequestContext::new(&Method::GET, "/v1/notifications", None, &map);

        // The bearer token is invalid, but the API-key path already
        // allowed the request; the token path is never consulted for a
        // rejection.
        let decision = guard.authenticate(&ctx).await;
        let identity = decision.into_result().unwrap();
        assert!(identity.is_service());
    }

    #[tokio::test]
    async fn failed_api_key_falls_through_to_token() {
        let guard = guard(Some("secret123"));
        let map = headers(&[
            ("x-api-key", "wrong"),
            ("authorization", "Bearer good.jwt.token"),
        ]);
        let ctx = RequestContext::new(&Method::GET, "/v1/notifications", None, &map);

        let identity = guard.authenticate(&ctx).await.into_result().unwrap();
        assert_eq!(identity.role(), Some(Role::Member));
    }

    #[tokio::test]
    async fn failed_api_key_without_token_is_denied() {
        let guard = guard(Some("secret123"));
        let map = headers(&[("x-api-key", "wrong")]);
        let ctx = RequestContext::new(&Method::GET, "/v1/notifications", None, &map);

        let err = guard.authenticate(&ctx).await.into_result().unwrap_err();
        assert!(matches!(err, AuthError::Unauthenticated));
    }

    #[tokio::test]
    async fn bad_token_is_the_final_denial() {
        let guard = guard(Some("secret123"));
        let map = headers(&[("authorization", "Bearer bad.jwt.token")]);
        let ctx = RequestContext::new(&Method::GET, "/v1/notifications", None, &map);

        let err = guard.authenticate(&ctx).await.into_result().unwrap_err();
        assert!(matches!(err, AuthError::Unauthenticated));
    }

    #[tokio::test]
    async fn no_credentials_names_the_channels() {
        let guard = guard(Some("secret123"));
        let map = HeaderMap::new();
        let ctx = RequestContext::new(&Method::GET, "/v1/notifications", None, &map);

        let err = guard.authenticate(&ctx).await.into_result().unwrap_err();
        assert!(matches!(err, AuthError::MissingCredentials));
        assert!(err.to_string().contains("X-API-Key"));
        assert!(err.to_string().contains("bearer"));
    }

    #[tokio::test]
    async fn optional_auth_swallows_denials() {
        let guard = guard(Some("secret123"));

        let map = HeaderMap::new();
        let ctx = RequestContext::new(&Method::GET, "/v1/notifications", None, &map);
        assert!(guard.authenticate_optional(&ctx).await.is_none());

        let map = headers(&[("authorization", "Bearer bad.jwt.token")]);
        let ctx = RequestContext::new(&Method::GET, "/v1/notifications", None, &map);
        assert!(guard.authenticate_optional(&ctx).await.is_none());
    }

    #[tokio::test]
    async fn optional_auth_keeps_successes() {
        let guard = guard(Some("secret123"));
        let map = headers(&[("x-api-key", "secret123")]);
        let ctx = RequestContext::new(&Method::GET, "/v1/notifications", None, &map);

        let identity = guard.authenticate_optional(&ctx).await.unwrap();
        assert!(identity.is_service());
    }
}
