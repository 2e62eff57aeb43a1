use serde::Serialize;

use crate::{ClaimsBag, Role, Session, SessionState, role_of};

/// What a protected route should do for the current visitor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GuardOutcome {
    Render,
    /// Sign-in is still in flight; show a placeholder rather than redirect.
    Pending,
    RedirectToLogin,
    RedirectHome,
}

impl GuardOutcome {
    /// Redirect target, if any.
    pub fn location(self) -> Option<&'static str> {
        match self {
            GuardOutcome::RedirectToLogin => Some("/login"),
            GuardOutcome::RedirectHome => Some("/"),
            GuardOutcome::Render | GuardOutcome::Pending => None,
        }
    }
}

/// Anonymous visitors go to the login page; signed-in visitors without the
/// required role go home.
pub fn guard_claims(claims: Option<&ClaimsBag>, required: Role) -> GuardOutcome {
    match role_of(claims) {
        None => GuardOutcome::RedirectToLogin,
        Some(role) if role.satisfies(required) => GuardOutcome::Render,
        Some(_) => GuardOutcome::RedirectHome,
    }
}

pub fn guard_session(session: &Session, required: Role) -> GuardOutcome {
    match session.state() {
        SessionState::Anonymous => GuardOutcome::RedirectToLogin,
        SessionState::Authenticating => GuardOutcome::Pending,
        SessionState::Authenticated(_) | SessionState::StaleRole(_) => {
            if session.can_access(required) {
                GuardOutcome::Render
            } else {
                GuardOutcome::RedirectHome
            }
        }
    }
}

/// A route's requirement, checked on every render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteGuard {
    pub required: Role,
}

impl RouteGuard {
    pub const SIGNED_IN: RouteGuard = RouteGuard { required: Role::User };
    pub const ADMIN: RouteGuard = RouteGuard { required: Role::Admin };

    pub fn check(&self, session: &Session) -> GuardOutcome {
        guard_session(session, self.required)
    }

    pub fn check_claims(&self, claims: Option<&ClaimsBag>) -> GuardOutcome {
        guard_claims(claims, self.required)
    }
}
