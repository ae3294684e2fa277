use crate::secret::SecretString;
use serde::Deserialize;
use std::time::Duration;

fn default_leeway_seconds() -> u64 {
    60
}

fn default_verify_timeout_secs() -> u64 {
    5
}

/// Validation settings for identity tokens.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenValidationConfig {
    /// Allowed issuers; empty accepts any issuer.
    #[serde(default)]
    pub allowed_issuers: Vec<String>,

    /// Allowed audiences; empty accepts any audience.
    #[serde(default)]
    pub allowed_audiences: Vec<String>,

    /// Leeway in seconds for time-based checks (exp).
    #[serde(default = "default_leeway_seconds")]
    pub leeway_seconds: u64,

    /// HS256 signing secret shared with the identity provider.
    #[serde(default)]
    pub hs256_secret: Option<SecretString>,
}

impl Default for TokenValidationConfig {
    fn default() -> Self {
        Self {
            allowed_issuers: Vec::new(),
            allowed_audiences: Vec::new(),
            leeway_seconds: default_leeway_seconds(),
            hs256_secret: None,
        }
    }
}

/// Authentication configuration, built once at process start and passed to
/// the authenticators by reference — never read from ambient globals at
/// request time.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// Shared-secret API key. Absence means API-key auth is misconfigured
    /// and every API-key attempt fails with a server error, never an
    /// accidental allow.
    #[serde(default)]
    pub api_key: Option<SecretString>,

    #[serde(default)]
    pub token: TokenValidationConfig,

    /// Upper bound for token verification and user lookup, in seconds.
    /// A slow identity provider fails the request instead of pinning a
    /// worker.
    #[serde(default = "default_verify_timeout_secs")]
    pub verify_timeout_secs: u64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            token: TokenValidationConfig::default(),
            verify_timeout_secs: default_verify_timeout_secs(),
        }
    }
}

impl AuthConfig {
    #[must_use]
    pub fn verify_timeout(&self) -> Duration {
        Duration::from_secs(self.verify_timeout_secs)
    }
}
