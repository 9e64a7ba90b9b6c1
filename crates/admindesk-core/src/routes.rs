//! Console routes and the navigation guard that runs before each transition.
//!
//! Routes carry a `requires_auth` marker, but the guard does not enforce it:
//! every transition is allowed except re-entering the login route from
//! itself.

use std::sync::RwLock;

use tracing::debug;

use crate::api::ApiClient;
use crate::auth::{Navigator, LOGIN_ROUTE};

pub const HOME_ROUTE: &str = "/";
pub const LOGOUT_ROUTE: &str = "/logout";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RouteMeta {
    pub requires_auth: bool,
    /// Rendered without the console chrome (sidebar, header).
    pub blank_layout: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Route {
    pub pattern: &'static str,
    pub name: Option<&'static str>,
    pub meta: RouteMeta,
}

const fn route(pattern: &'static str, name: Option<&'static str>, requires_auth: bool) -> Route {
    Route {
        pattern,
        name,
        meta: RouteMeta {
            requires_auth,
            blank_layout: false,
        },
    }
}

pub const ROUTES: &[Route] = &[
    Route {
        pattern: "/login",
        name: Some("login"),
        meta: RouteMeta {
            requires_auth: false,
            blank_layout: true,
        },
    },
    route("/", Some("home"), false),
    route("/about", None, false),
    route("/analytics", None, false),
    route("/articles/news", None, true),
    route("/articles/events", None, true),
    route("/articles/:category/create", None, true),
    route("/articles/:category/edit/:slug", None, true),
    route("/roles", Some("roles"), false),
    route("/reports", Some("reports"), false),
    route("/transactions", Some("transactions"), false),
    route("/users", None, true),
    route("/users/create", Some("user-create"), true),
    route("/logout", Some("logout"), false),
];

/// Unmatched paths render the home view and keep their own URL.
pub const FALLBACK_ROUTE: Route = route("/*", None, false);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMatch {
    pub route: Route,
    pub path: String,
    pub params: Vec<(String, String)>,
}

impl RouteMatch {
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    Proceed,
    Cancel,
}

fn segments(path: &str) -> Vec<&str> {
    path.split('/').filter(|s| !s.is_empty()).collect()
}

fn normalize(path: &str) -> String {
    let path = path.split(['?', '#']).next().unwrap_or_default();
    let joined = segments(path).join("/");
    format!("/{}", joined)
}

fn match_pattern(pattern: &str, path: &str) -> Option<Vec<(String, String)>> {
    let pattern_segments = segments(pattern);
    let path_segments = segments(path);

    if pattern_segments.len() != path_segments.len() {
        return None;
    }

    let mut params = Vec::new();
    for (expected, actual) in pattern_segments.iter().zip(&path_segments) {
        if let Some(name) = expected.strip_prefix(':') {
            params.push((name.to_string(), actual.to_string()));
        } else if expected != actual {
            return None;
        }
    }
    Some(params)
}

/// Find the first route matching `path`, or the fallback route. Query
/// strings and fragments are ignored.
pub fn resolve(path: &str) -> RouteMatch {
    let path = normalize(path);
    let (route, params) = ROUTES
        .iter()
        .find_map(|route| match_pattern(route.pattern, &path).map(|params| (*route, params)))
        .unwrap_or((FALLBACK_ROUTE, Vec::new()));
    RouteMatch {
        route,
        path,
        params,
    }
}

/// Auth check for a destination. Always proceeds: `requires_auth` is a
/// marker only and is not enforced.
pub fn auth_guard(_to: &RouteMatch) -> GuardDecision {
    GuardDecision::Proceed
}

/// Global guard run before every transition.
pub fn before_each(from: &str, to: &str) -> GuardDecision {
    let (from, to) = (normalize(from), normalize(to));
    if from == LOGIN_ROUTE && to == LOGIN_ROUTE {
        return GuardDecision::Cancel;
    }
    auth_guard(&resolve(&to))
}

/// Tracks the current route and applies the guard to every transition.
#[derive(Debug)]
pub struct Router {
    current: RwLock<String>,
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}

impl Router {
    pub fn new() -> Self {
        Self {
            current: RwLock::new(HOME_ROUTE.to_string()),
        }
    }

    pub fn current(&self) -> String {
        self.current
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    fn set_current(&self, path: &str) {
        *self
            .current
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = normalize(path);
    }

    /// Apply the guard and move to `to` when allowed. Returns whether the
    /// current route changed.
    pub fn push(&self, to: &str) -> bool {
        let from = self.current();
        match before_each(&from, to) {
            GuardDecision::Proceed => {
                debug!(from = %from, to, "Navigating");
                self.set_current(to);
                true
            }
            GuardDecision::Cancel => {
                debug!(from = %from, to, "Navigation cancelled");
                false
            }
        }
    }

    /// Navigate to `path`, running route side effects. Visiting `/logout`
    /// logs out and lands on the login route even when logout reports an
    /// error.
    pub async fn visit(&self, path: &str, client: &ApiClient) -> anyhow::Result<String> {
        if normalize(path) == LOGOUT_ROUTE {
            let result = client.logout().await;
            self.set_current(LOGIN_ROUTE);
            result?;
        } else {
            self.push(path);
        }
        Ok(self.current())
    }
}

impl Navigator for Router {
    fn navigate(&self, path: &str) {
        self.push(path);
    }
}
