use crate::{
    error::AccessError,
    role::{Action, Resource},
};
use http::Method;
use std::collections::HashMap;

/// Static declaration of which (resource, action) a route requires.
///
/// `path` is a template in `{param}` placeholder syntax, e.g.
/// `/v1/notifications/{notification_id}/status`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteAction {
    pub method: Method,
    pub path: String,
    pub action: Action,
    pub resource: Resource,
}

impl RouteAction {
    #[must_use]
    pub fn new(method: Method, path: impl Into<String>, action: Action, resource: Resource) -> Self {
        Self {
            method,
            path: path.into(),
            action,
            resource,
        }
    }
}

/// Result of matching a concrete request against the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteMatch {
    pub resource: Resource,
    pub action: Action,
}

/// Immutable registry mapping (method, path template) to the required
/// (resource, action) pair.
///
/// One `matchit` router per HTTP method, so `GET /x` and `POST /x` are
/// independent entries. Ambiguous or duplicate templates are refused at
/// construction; matching never has to tie-break at runtime.
pub struct RouteRegistry {
    matchers: HashMap<Method, matchit::Router<RouteMatch>>,
}

// matchit::Router has no Debug impl; report the method buckets only.
impl std::fmt::Debug for RouteRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RouteRegistry")
            .field("methods", &self.matchers.keys().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

impl RouteRegistry {
    /// Build the registry from a route-action table.
    ///
    /// # Errors
    ///
    /// Returns [`AccessError::RouteConflict`] if two descriptors share a
    /// (method, template) pair or their templates cannot coexist.
    pub fn new(routes: impl IntoIterator<Item = RouteAction>) -> Result<Self, AccessError> {
        let mut matchers: HashMap<Method, matchit::Router<RouteMatch>> = HashMap::new();

        for route in routes {
            let matcher = matchers
                .entry(route.method.clone())
                .or_insert_with(matchit::Router::new);
            matcher
                .insert(
                    &route.path,
                    RouteMatch {
                        resource: route.resource,
                        action: route.action,
                    },
                )
                .map_err(|e| AccessError::RouteConflict {
                    method: route.method.clone(),
                    path: route.path.clone(),
                    reason: e.to_string(),
                })?;
        }

        Ok(Self { matchers })
    }

    /// Look up the requirement for a concrete (method, path) pair.
    ///
    /// Method comparison is exact on the normalized `http::Method`; path
    /// matching is parameter-aware, so `/v1/users/{user_id}` matches
    /// `/v1/users/u123` but not `/v1/users/u123/avatar`.
    #[must_use]
    pub fn match_route(&self, method: &Method, path: &str) -> Option<RouteMatch> {
        self.matchers
            .get(method)
            .and_then(|m| m.at(path).ok())
            .map(|m| *m.value)
    }

    /// Number of registered method buckets (diagnostics only).
    #[must_use]
    pub fn method_count(&self) -> usize {
        self.matchers.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> RouteRegistry {
        RouteRegistry::new([
            RouteAction::new(
                Method::GET,
                "/v1/notifications",
                Action::Read,
                Resource::Notification,
            ),
            RouteAction::new(
                Method::PATCH,
                "/notifications/{notification_id}/status",
                Action::Update,
                Resource::Notification,
            ),
            RouteAction::new(Method::PATCH, "/v1/users/{user_id}", Action::Update, Resource::User),
        ])
        .unwrap()
    }

    #[test]
    fn template_matches_concrete_path() {
        let reg = registry();
        let matched = reg
            .match_route(&Method::PATCH, "/notifications/abc123/status")
            .unwrap();
        assert_eq!(matched.resource, Resource::Notification);
        assert_eq!(matched.action, Action::Update);
    }

    #[test]
    fn missing_suffix_does_not_match() {
        let reg = registry();
        assert!(reg.match_route(&Method::PATCH, "/notifications/abc123").is_none());
    }

    #[test]
    fn method_mismatch_does_not_match() {
        let reg = registry();
        assert!(reg
            .match_route(&Method::GET, "/notifications/abc123/status")
            .is_none());
    }

    #[test]
    fn literal_paths_match_exactly() {
        let reg = registry();
        let matched = reg.match_route(&Method::GET, "/v1/notifications").unwrap();
        assert_eq!(matched.action, Action::Read);
        assert!(reg.match_route(&Method::GET, "/v1/notifications/x").is_none());
    }

    #[test]
    fn debug_lists_method_buckets() {
        let reg = registry();
        let out = format!("{reg:?}");
        assert!(out.contains("GET"));
        assert!(out.contains("PATCH"));
    }

    #[test]
    fn duplicate_template_is_a_construction_error() {
        let err = RouteRegistry::new([
            RouteAction::new(Method::GET, "/v1/users", Action::Read, Resource::User),
            RouteAction::new(Method::GET, "/v1/users", Action::Delete, Resource::User),
        ])
        .unwrap_err();
        assert!(matches!(err, AccessError::RouteConflict { .. }));
    }

    #[test]
    fn same_template_different_methods_coexist() {
        let reg = RouteRegistry::new([
            RouteAction::new(Method::GET, "/v1/users", Action::Read, Resource::User),
            RouteAction::new(Method::POST, "/v1/users", Action::Create, Resource::User),
        ])
        .unwrap();
        assert_eq!(
            reg.match_route(&Method::POST, "/v1/users").unwrap().action,
            Action::Create
        );
    }
}
