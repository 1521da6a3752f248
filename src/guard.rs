//! Route Guard
//!
//! Maps the session state and a requested route to what should be shown.
//! Protected content is never rendered until the startup check resolves.

use std::fmt;

use crate::session::AuthState;

/// Application routes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Dashboard,
    Stats,
    Profile,
    Login,
    Register,
}

impl Route {
    pub const ALL: [Route; 5] = [
        Route::Dashboard,
        Route::Stats,
        Route::Profile,
        Route::Login,
        Route::Register,
    ];

    pub fn path(&self) -> &'static str {
        match self {
            Route::Dashboard => "/",
            Route::Stats => "/stats",
            Route::Profile => "/profile",
            Route::Login => "/login",
            Route::Register => "/register",
        }
    }

    /// Resolve a path; anything unknown falls back to the dashboard
    pub fn from_path(path: &str) -> Route {
        let trimmed = path.trim().trim_end_matches('/');
        let normalized = if trimmed.is_empty() { "/" } else { trimmed };

        Route::ALL
            .into_iter()
            .find(|route| route.path() == normalized)
            .unwrap_or(Route::Dashboard)
    }

    /// Whether the route requires a signed-in user
    pub fn is_protected(&self) -> bool {
        matches!(self, Route::Dashboard | Route::Stats | Route::Profile)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// What to show for a navigation request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteDecision {
    /// Session still unknown: show only a loading placeholder
    Loading,
    /// Navigate elsewhere instead
    Redirect(Route),
    /// Show the requested route
    Render(Route),
}

/// Decide what to render for `route` given the session state
pub fn guard(state: &AuthState, route: Route) -> RouteDecision {
    if !route.is_protected() {
        return RouteDecision::Render(route);
    }

    match state {
        AuthState::Unknown => RouteDecision::Loading,
        AuthState::Unauthenticated => RouteDecision::Redirect(Route::Login),
        AuthState::Authenticated(_) => RouteDecision::Render(route),
    }
}
