use crate::{config::TokenValidationConfig, errors::AuthError, secret::SecretString};
use async_trait::async_trait;
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde::Deserialize;
use time::OffsetDateTime;

/// Normalized claims from a verified identity token.
#[derive(Debug, Clone)]
pub struct TokenClaims {
    /// Subject identifier, resolved against the user directory.
    pub subject: String,
    pub issuer: Option<String>,
    pub expires_at: Option<OffsetDateTime>,
}

/// Verifies a structured identity token against the identity provider.
///
/// Implementations must treat every verification defect — bad signature,
/// expiry, wrong issuer or audience, malformed payload — as a failure;
/// the caller maps all of them to the unauthenticated class.
#[async_trait]
pub trait TokenVerifier: Send + Sync {
    /// Verify the raw token and return its normalized claims.
    ///
    /// # Errors
    ///
    /// [`AuthError::InvalidToken`] on any verification failure.
    async fn verify(&self, token: &str) -> Result<TokenClaims, AuthError>;
}

#[derive(Debug, Deserialize)]
struct RawClaims {
    sub: String,
    #[serde(default)]
    exp: Option<i64>,
    #[serde(default)]
    iss: Option<String>,
}

/// HS256 token verifier backed by `jsonwebtoken`.
///
/// Issuer/audience allow-lists and expiry leeway come from
/// [`TokenValidationConfig`]; an empty list accepts any value, matching
/// the identity provider's own defaults.
pub struct JwtVerifier {
    decoding_key: DecodingKey,
    validation: Validation,
}

// DecodingKey carries the secret and has no Debug impl; show only the
// validation settings.
impl std::fmt::Debug for JwtVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtVerifier")
            .field("validation", &self.validation)
            .finish_non_exhaustive()
    }
}

impl JwtVerifier {
    /// Build a verifier from the token validation config.
    ///
    /// # Errors
    ///
    /// [`AuthError::Misconfigured`] if no signing secret is configured.
    pub fn from_config(config: &TokenValidationConfig) -> Result<Self, AuthError> {
        let secret = config
            .hs256_secret
            .as_ref()
            .ok_or_else(|| AuthError::Misconfigured("token signing secret not configured".into()))?;
        Ok(Self::hs256(secret, config))
    }

    /// Build an HS256 verifier with an explicit secret.
    #[must_use]
    pub fn hs256(secret: &SecretString, config: &TokenValidationConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = config.leeway_seconds;
        if !config.allowed_issuers.is_empty() {
            validation.set_issuer(&config.allowed_issuers);
        }
        if config.allowed_audiences.is_empty() {
            validation.validate_aud = false;
        } else {
            validation.set_audience(&config.allowed_audiences);
        }

        Self {
            decoding_key: DecodingKey::from_secret(secret.expose().as_bytes()),
            validation,
        }
    }
}

#[async_trait]
impl TokenVerifier for JwtVerifier {
    async fn verify(&self, token: &str) -> Result<TokenClaims, AuthError> {
        let data = decode::<RawClaims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| {
                tracing::debug!(error = %e, "token verification failed");
                AuthError::InvalidToken(e.to_string())
            })?;

        let expires_at = data
            .claims
            .exp
            .and_then(|exp| OffsetDateTime::from_unix_timestamp(exp).ok());

        Ok(TokenClaims {
            subject: data.claims.sub,
            issuer: data.claims.iss,
            expires_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{EncodingKey, Header, encode};
    use serde_json::json;

    fn sign(secret: &str, claims: &serde_json::Value) -> String {
        encode(
            &Header::new(Algorithm::HS256),
            claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    fn config(secret: &str) -> TokenValidationConfig {
        TokenValidationConfig {
            hs256_secret: Some(SecretString::new(secret)),
            ..TokenValidationConfig::default()
        }
    }

    #[tokio::test]
    async fn valid_token_round_trip() {
        let cfg = config("signing-key");
        let verifier = JwtVerifier::from_config(&cfg).unwrap();

        let exp = OffsetDateTime::now_utc().unix_timestamp() + 3600;
        let token = sign("signing-key", &json!({ "sub": "u-1", "exp": exp }));

        let claims = verifier.verify(&token).await.unwrap();
        assert_eq!(claims.subject, "u-1");
        assert!(claims.expires_at.is_some());
    }

    #[tokio::test]
    async fn wrong_signature_rejected() {
        let verifier = JwtVerifier::from_config(&config("right-key")).unwrap();
        let exp = OffsetDateTime::now_utc().unix_timestamp() + 3600;
        let token = sign("wrong-key", &json!({ "sub": "u-1", "exp": exp }));

        let err = verifier.verify(&token).await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidToken(_)));
    }

    #[tokio::test]
    async fn expired_token_rejected() {
        let verifier = JwtVerifier::from_config(&config("signing-key")).unwrap();
        let exp = OffsetDateTime::now_utc().unix_timestamp() - 3600;
        let token = sign("signing-key", &json!({ "sub": "u-1", "exp": exp }));

        let err = verifier.verify(&token).await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidToken(_)));
    }

    #[tokio::test]
    async fn issuer_allow_list_enforced() {
        let cfg = TokenValidationConfig {
            allowed_issuers: vec!["https://id.example.com".into()],
            ..config("signing-key")
        };
        let verifier = JwtVerifier::from_config(&cfg).unwrap();
        let exp = OffsetDateTime::now_utc().unix_timestamp() + 3600;

        let good = sign(
            "signing-key",
            &json!({ "sub": "u-1", "exp": exp, "iss": "https://id.example.com" }),
        );
        assert!(verifier.verify(&good).await.is_ok());

        let bad = sign(
            "signing-key",
            &json!({ "sub": "u-1", "exp": exp, "iss": "https://evil.example.com" }),
        );
        assert!(verifier.verify(&bad).await.is_err());
    }

    #[tokio::test]
    async fn audience_allow_list_enforced() {
        let cfg = TokenValidationConfig {
            allowed_audiences: vec!["gatekit-app".into()],
            ..config("signing-key")
        };
        let verifier = JwtVerifier::from_config(&cfg).unwrap();
        let exp = OffsetDateTime::now_utc().unix_timestamp() + 3600;

        let good = sign(
            "signing-key",
            &json!({ "sub": "u-1", "exp": exp, "aud": "gatekit-app" }),
        );
        assert!(verifier.verify(&good).await.is_ok());

        let wrong = sign(
            "signing-key",
            &json!({ "sub": "u-1", "exp": exp, "aud": "other-app" }),
        );
        assert!(verifier.verify(&wrong).await.is_err());

        let absent = sign("signing-key", &json!({ "sub": "u-1", "exp": exp }));
        assert!(verifier.verify(&absent).await.is_err());
    }

    #[test]
    fn debug_omits_the_secret() {
        let verifier = JwtVerifier::from_config(&config("signing-key")).unwrap();
        let out = format!("{verifier:?}");
        assert!(!out.contains("signing-key"));
    }

    #[test]
    fn missing_secret_is_misconfiguration() {
        let cfg = TokenValidationConfig::default();
        let err = JwtVerifier::from_config(&cfg).unwrap_err();
        assert!(matches!(err, AuthError::Misconfigured(_)));
    }
}
