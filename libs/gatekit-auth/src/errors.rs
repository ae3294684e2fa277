use thiserror::Error;

/// Typed authentication/authorization failure.
///
/// Every rejection carries one of three externally visible classes:
/// unauthenticated (401), forbidden (403), or server error (500). Internal
/// detail such as which secret mismatched never reaches the client body.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Authentication required: missing or invalid credentials")]
    Unauthenticated,

    #[error(
        "Authentication required. Provide an X-API-Key header, an api_key query parameter, or an Authorization bearer token"
    )]
    MissingCredentials,

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Forbidden: insufficient permissions")]
    Forbidden,

    #[error("Server configuration error: {0}")]
    Misconfigured(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Whether this failure maps to the unauthenticated (401) class.
    #[must_use]
    pub fn is_unauthenticated(&self) -> bool {
        matches!(
            self,
            AuthError::Unauthenticated | AuthError::MissingCredentials | AuthError::InvalidToken(_)
        )
    }
}

#[cfg(feature = "axum-ext")]
impl axum::response::IntoResponse for AuthError {
    fn into_response(self) -> axum::response::Response {
        use axum::http::StatusCode;
        use axum::response::Json;
        use serde_json::json;

        let (status, message) = match &self {
            AuthError::Unauthenticated
            | AuthError::MissingCredentials
            | AuthError::InvalidToken(_) => (StatusCode::UNAUTHORIZED, self.to_string()),
            AuthError::Forbidden => (StatusCode::FORBIDDEN, self.to_string()),
            // Misconfiguration detail stays in the logs, not the body.
            AuthError::Misconfigured(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Server configuration error".to_owned(),
            ),
            AuthError::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal error".to_owned(),
            ),
        };

        let body = Json(json!({
            "error": message,
            "status": status.as_u16(),
        }));

        (status, body).into_response()
    }
}
