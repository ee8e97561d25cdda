//! Route-guard decisions
//!
//! Pure functions of session state: the guard holds no state of its own.
//! [`evaluate_route`] gates a protected view once the session store exists;
//! [`preflight`] is the cheaper path gate run before the store is built,
//! using only the presence of the guard hint.

use dentnotion_domain::types::user::DEFAULT_ROLE;

use super::store::{SessionPhase, SessionSnapshot};

/// Role that passes every role requirement
const ADMIN_ROLE: &str = "admin";

/// Paths reachable without authentication
pub const PUBLIC_PATHS: &[&str] = &["/auth/login", "/auth/signup", "/auth/forgot-password", "/health"];

/// Login entry point used by redirect decisions
pub const LOGIN_PATH: &str = "/auth/login";

/// Landing page for authenticated users
pub const DASHBOARD_PATH: &str = "/dashboard";

/// Destination for role mismatches
pub const UNAUTHORIZED_PATH: &str = "/unauthorized";

/// What to render for a protected route
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteDecision {
    /// Session not yet resolved: render a neutral loading state, no
    /// redirect, no content
    Loading,
    /// Render the requested content
    Allow,
    /// Anonymous: redirect to the login entry point and render nothing
    RedirectToLogin,
    /// Role mismatch: redirect to the unauthorized destination
    RedirectToUnauthorized,
}

/// Decide what a protected route should render for the given session view
///
/// An optional `required_role` is compared against the user's role; a
/// missing role counts as `"user"` and `"admin"` always passes.
#[must_use]
pub fn evaluate_route(snapshot: &SessionSnapshot, required_role: Option<&str>) -> RouteDecision {
    if snapshot.phase == SessionPhase::Unknown || snapshot.is_loading {
        return RouteDecision::Loading;
    }

    if !snapshot.is_authenticated() {
        return RouteDecision::RedirectToLogin;
    }

    if let Some(required) = required_role {
        let role = snapshot
            .user
            .as_ref()
            .map(|user| user.role_or_default().to_string())
            .unwrap_or_else(|| DEFAULT_ROLE.to_string());
        if role != required && role != ADMIN_ROLE {
            return RouteDecision::RedirectToUnauthorized;
        }
    }

    RouteDecision::Allow
}

/// Navigation decided before the session store exists
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreflightAction {
    /// Continue to the requested path
    Proceed,
    /// Already signed in: send auth pages and the root to the dashboard
    RedirectToDashboard,
    /// Not signed in: send protected paths and the root to login
    RedirectToLogin,
}

/// Gate a navigation using only the guard hint (the pre-mount token copy)
///
/// Mirrors the route dispatch done before any session state is available:
/// signed-in users are bounced off the auth pages, anonymous users are
/// bounced off everything that is not public, and the root dispatches by
/// hint presence.
#[must_use]
pub fn preflight(path: &str, has_guard_hint: bool) -> PreflightAction {
    if has_guard_hint && path.starts_with("/auth/") {
        return PreflightAction::RedirectToDashboard;
    }

    if path == "/" {
        return if has_guard_hint {
            PreflightAction::RedirectToDashboard
        } else {
            PreflightAction::RedirectToLogin
        };
    }

    let is_public = PUBLIC_PATHS.iter().any(|public| path.starts_with(public));
    if !has_guard_hint && !is_public {
        return PreflightAction::RedirectToLogin;
    }

    PreflightAction::Proceed
}
