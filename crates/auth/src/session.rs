//! Client session lifecycle.
//!
//! ```text
//! Anonymous --begin_login--> Authenticating --complete_login--> Authenticated(role)
//! Authenticated(role) --mark_stale--> StaleRole(role) --refreshed--> Authenticated(new)
//! any --logout--> Anonymous
//! ```
//!
//! A refresh that comes back without claims lands in `Anonymous`.

use serde::Serialize;
use thiserror::Error;

use crate::{ClaimsBag, Role, role_of};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(tag = "state", content = "role", rename_all = "snake_case")]
pub enum SessionState {
    #[default]
    Anonymous,
    Authenticating,
    Authenticated(Role),
    /// The role changed server-side and the cached claims no longer reflect it.
    StaleRole(Role),
}

impl SessionState {
    pub fn name(self) -> &'static str {
        match self {
            SessionState::Anonymous => "anonymous",
            SessionState::Authenticating => "authenticating",
            SessionState::Authenticated(_) => "authenticated",
            SessionState::StaleRole(_) => "stale_role",
        }
    }
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("cannot {action} while {state}")]
pub struct TransitionError {
    pub action: &'static str,
    pub state: &'static str,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Session {
    state: SessionState,
    claims: Option<ClaimsBag>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Role currently held, stale or not.
    pub fn role(&self) -> Option<Role> {
        match self.state {
            SessionState::Authenticated(role) | SessionState::StaleRole(role) => Some(role),
            SessionState::Anonymous | SessionState::Authenticating => None,
        }
    }

    pub fn claims(&self) -> Option<&ClaimsBag> {
        self.claims.as_ref()
    }

    pub fn is_signed_in(&self) -> bool {
        self.role().is_some()
    }

    pub fn begin_login(&mut self) -> Result<(), TransitionError> {
        match self.state {
            SessionState::Anonymous => {
                self.state = SessionState::Authenticating;
                Ok(())
            }
            other => Err(self.invalid("begin login", other)),
        }
    }

    /// Finish a login with freshly fetched claims. The role is computed once
    /// here and cached until the next refresh.
    pub fn complete_login(&mut self, claims: ClaimsBag) -> Result<Role, TransitionError> {
        match self.state {
            SessionState::Authenticating => Ok(self.adopt(claims)),
            other => Err(self.invalid("complete login", other)),
        }
    }

    pub fn fail_login(&mut self) {
        if self.state == SessionState::Authenticating {
            self.clear();
        }
    }

    pub fn mark_stale(&mut self) -> Result<(), TransitionError> {
        match self.state {
            SessionState::Authenticated(role) => {
                self.state = SessionState::StaleRole(role);
                Ok(())
            }
            SessionState::StaleRole(_) => Ok(()),
            other => Err(self.invalid("mark role stale", other)),
        }
    }

    /// Apply the outcome of a forced claims refresh. `None` (refresh failed
    /// or the session was revoked) signs the session out.
    pub fn refreshed(&mut self, claims: Option<ClaimsBag>) -> Result<Option<Role>, TransitionError> {
        match self.state {
            SessionState::Authenticated(_) | SessionState::StaleRole(_) => match claims {
                Some(claims) => Ok(Some(self.adopt(claims))),
                None => {
                    self.clear();
                    Ok(None)
                }
            },
            other => Err(self.invalid("refresh", other)),
        }
    }

    pub fn logout(&mut self) {
        self.clear();
    }

    /// Admission against the cached role. A stale role keeps user-level
    /// access but loses admin access until refreshed.
    pub fn can_access(&self, required: Role) -> bool {
        match self.state {
            SessionState::Authenticated(role) => role.satisfies(required),
            SessionState::StaleRole(_) => required == Role::User,
            SessionState::Anonymous | SessionState::Authenticating => false,
        }
    }

    fn adopt(&mut self, claims: ClaimsBag) -> Role {
        // Claims are present, so role_of always yields a role.
        let role = role_of(Some(&claims)).unwrap_or(Role::User);
        self.claims = Some(claims);
        self.state = SessionState::Authenticated(role);
        role
    }

    fn clear(&mut self) {
        self.claims = None;
        self.state = SessionState::Anonymous;
    }

    fn invalid(&self, action: &'static str, state: SessionState) -> TransitionError {
        TransitionError {
            action,
            state: state.name(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn admin_claims() -> ClaimsBag {
        ClaimsBag::new().with("role", "admin")
    }

    fn signed_in(claims: ClaimsBag) -> Session {
        let mut s = Session::new();
        s.begin_login().unwrap();
        s.complete_login(claims).unwrap();
        s
    }

    #[test]
    fn starts_anonymous_and_denies() {
        let s = Session::new();
        assert_eq!(s.state(), SessionState::Anonymous);
        assert!(!s.can_access(Role::User));
    }

    #[test]
    fn login_computes_role_once() {
        let s = signed_in(admin_claims());
        assert_eq!(s.state(), SessionState::Authenticated(Role::Admin));
        assert!(s.can_access(Role::Admin));
    }

    #[test]
    fn authenticating_admits_nothing() {
        let mut s = Session::new();
        s.begin_login().unwrap();
        assert!(!s.can_access(Role::User));
        s.fail_login();
        assert_eq!(s.state(), SessionState::Anonymous);
    }

    #[test]
    fn stale_role_keeps_user_access_only() {
        let mut s = signed_in(admin_claims());
        s.mark_stale().unwrap();
        assert_eq!(s.state(), SessionState::StaleRole(Role::Admin));
        assert!(s.can_access(Role::User));
        assert!(!s.can_access(Role::Admin));

        assert_eq!(s.refreshed(Some(ClaimsBag::new())).unwrap(), Some(Role::User));
        assert_eq!(s.state(), SessionState::Authenticated(Role::User));
    }

    #[test]
    fn failed_refresh_signs_out() {
        let mut s = signed_in(admin_claims());
        s.mark_stale().unwrap();
        assert_eq!(s.refreshed(None).unwrap(), None);
        assert_eq!(s.state(), SessionState::Anonymous);
        assert!(s.claims().is_none());
    }

    #[test]
    fn illegal_transitions_are_reported() {
        let mut s = Session::new();
        let err = s.mark_stale().unwrap_err();
        assert_eq!(err.to_string(), "cannot mark role stale while anonymous");

        assert!(s.refreshed(Some(ClaimsBag::new())).is_err());
        assert!(s.complete_login(ClaimsBag::new()).is_err());

        let mut s = signed_in(ClaimsBag::new());
        assert!(s.begin_login().is_err());
    }

    #[test]
    fn logout_from_anywhere() {
        let mut s = signed_in(admin_claims());
        s.mark_stale().unwrap();
        s.logout();
        assert_eq!(s.state(), SessionState::Anonymous);
        assert_eq!(s.role(), None);
    }
}
