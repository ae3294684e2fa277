use crate::{
    errors::AuthError, identity::Identity, request::RequestContext, secret::SecretString,
};
use std::borrow::Cow;
use subtle::ConstantTimeEq;

/// Header carrying the shared API key.
pub const API_KEY_HEADER: &str = "x-api-key";

/// Extract an API-key credential from the request, in priority order:
/// the `X-API-Key` header, then the `api_key`/`apikey` query parameters,
/// then an `Authorization: Bearer` value that does not look like a
/// structured token (structured tokens always contain `.` separators).
#[must_use]
pub fn extract_api_key<'a>(ctx: &RequestContext<'a>) -> Option<Cow<'a, str>> {
    if let Some(key) = ctx.header(API_KEY_HEADER) {
        tracing::debug!("API key found in X-API-Key header");
        return Some(Cow::Borrowed(key));
    }

    if let Some(key) = ctx
        .query_param("api_key")
        .or_else(|| ctx.query_param("apikey"))
    {
        tracing::debug!("API key found in query parameter");
        return Some(key);
    }

    if let Some(bearer) = ctx.bearer_token() {
        if !bearer.contains('.') {
            tracing::debug!("API key found in Authorization bearer header");
            return Some(Cow::Borrowed(bearer));
        }
    }

    None
}

/// Validates a shared-secret API-key credential.
///
/// Holds the server-side secret from [`AuthConfig`](crate::AuthConfig);
/// an unconfigured secret is a server fault, not a client one.
#[derive(Debug, Clone, Default)]
pub struct ApiKeyAuthenticator {
    key: Option<SecretString>,
}

impl ApiKeyAuthenticator {
    #[must_use]
    pub fn new(key: Option<SecretString>) -> Self {
        Self { key }
    }

    /// Whether the request carries anything that could be an API key.
    #[must_use]
    pub fn credential_present(&self, ctx: &RequestContext<'_>) -> bool {
        extract_api_key(ctx).is_some()
    }

    /// Validate the request's API-key credential.
    ///
    /// # Errors
    ///
    /// * [`AuthError::MissingCredentials`] — no credential in any channel.
    /// * [`AuthError::Misconfigured`] — no server-side secret configured.
    /// * [`AuthError::Unauthenticated`] — credential mismatch.
    pub fn authenticate(&self, ctx: &RequestContext<'_>) -> Result<Identity, AuthError> {
        let Some(candidate) = extract_api_key(ctx) else {
            tracing::warn!("API key authentication failed: no API key provided");
            return Err(AuthError::MissingCredentials);
        };

        let Some(expected) = &self.key else {
            tracing::error!("API key authentication failed: no API key configured");
            return Err(AuthError::Misconfigured("API key not configured".into()));
        };

        // Constant-time comparison over the full credential.
        let matches: bool = expected
            .expose()
            .as_bytes()
            .ct_eq(candidate.as_bytes())
            .into();

        if !matches {
            tracing::warn!("API key authentication failed: invalid API key");
            return Err(AuthError::Unauthenticated);
        }

        tracing::debug!("API key authentication successful");
        Ok(Identity::Service)
    }
}
