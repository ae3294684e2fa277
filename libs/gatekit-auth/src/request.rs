use http::{HeaderMap, Method, header};
use std::borrow::Cow;

/// Borrowed, read-only view of the parts of a request the authenticators
/// care about: method, path, query string, and headers.
///
/// The guard operates on this type instead of a framework request so the
/// whole decision machine is testable without an HTTP stack; the axum
/// layer adapts `http::request::Parts` into it.
#[derive(Debug, Clone, Copy)]
pub struct RequestContext<'a> {
    pub method: &'a Method,
    pub path: &'a str,
    pub query: Option<&'a str>,
    pub headers: &'a HeaderMap,
}

impl<'a> RequestContext<'a> {
    #[must_use]
    pub fn new(
        method: &'a Method,
        path: &'a str,
        query: Option<&'a str>,
        headers: &'a HeaderMap,
    ) -> Self {
        Self {
            method,
            path,
            query,
            headers,
        }
    }

    #[must_use]
    pub fn from_parts(parts: &'a http::request::Parts) -> Self {
        Self {
            method: &parts.method,
            path: parts.uri.path(),
            query: parts.uri.query(),
            headers: &parts.headers,
        }
    }

    /// Header value as UTF-8, if present and valid.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&'a str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// First query parameter with the given name, percent-decoded.
    #[must_use]
    pub fn query_param(&self, name: &str) -> Option<Cow<'a, str>> {
        let query = self.query?;
        url::form_urlencoded::parse(query.as_bytes())
            .find(|(k, _)| k == name)
            .map(|(_, v)| v)
    }

    /// The raw value of `Authorization: Bearer <value>`, if present.
    #[must_use]
    pub fn bearer_token(&self) -> Option<&'a str> {
        self.headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.strip_prefix("Bearer "))
            .map(str::trim)
    }
}

/// Heuristic for telling structured identity tokens apart from plain API
/// keys: a structured token is three dot-separated, non-empty segments.
#[must_use]
pub fn is_structured_token(value: &str) -> bool {
    let mut count = 0;
    for segment in value.split('.') {
        if segment.is_empty() {
            return false;
        }
        count += 1;
    }
    count == 3
}
