use serde_json::json;
use thiserror::Error;

use irmaozinho_core::UserId;
use irmaozinho_validation::ValidationEngine;

use crate::{ClaimsBag, ClaimsError, Role, Session, TransitionError};

#[derive(Debug, Error)]
pub enum AuthError {
    /// The credentials never reached the provider.
    #[error("invalid credentials: {}", .0.join("; "))]
    InvalidCredentials(Vec<String>),

    #[error("sign-in rejected: {0}")]
    Rejected(String),

    #[error("identity provider error: {0}")]
    Provider(String),

    #[error("unknown user: {0}")]
    UnknownUser(String),

    #[error(transparent)]
    Claims(#[from] ClaimsError),

    #[error(transparent)]
    Transition(#[from] TransitionError),
}

/// Seam to the hosted identity service.
///
/// `get_claims` with `force_refresh = true` must bypass any cached token so a
/// role granted server-side is visible immediately.
pub trait IdentityProvider {
    type Identity;

    fn sign_in(&self, email: &str, password: &str) -> Result<Self::Identity, AuthError>;

    /// Create the account and sign it in. New accounts carry no role claim.
    fn sign_up(&self, email: &str, password: &str) -> Result<Self::Identity, AuthError>;

    /// Stable provider uid of a signed-in identity.
    fn user_id(&self, identity: &Self::Identity) -> UserId;

    fn sign_out(&self) -> Result<(), AuthError>;

    fn get_claims(
        &self,
        identity: &Self::Identity,
        force_refresh: bool,
    ) -> Result<ClaimsBag, ClaimsError>;
}

/// Owns the client session and drives it through the provider.
pub struct SessionManager<P: IdentityProvider> {
    provider: P,
    engine: ValidationEngine,
    session: Session,
    identity: Option<P::Identity>,
}

impl<P: IdentityProvider> SessionManager<P> {
    pub fn new(provider: P) -> Self {
        Self::with_engine(provider, ValidationEngine::default())
    }

    pub fn with_engine(provider: P, engine: ValidationEngine) -> Self {
        Self {
            provider,
            engine,
            session: Session::new(),
            identity: None,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn identity(&self) -> Option<&P::Identity> {
        self.identity.as_ref()
    }

    pub fn user_id(&self) -> Option<UserId> {
        self.identity.as_ref().map(|identity| self.provider.user_id(identity))
    }

    pub fn can_access(&self, required: Role) -> bool {
        self.session.can_access(required)
    }

    /// Validate the credential shape, sign in, then force a claims refresh
    /// and compute the role once.
    pub fn login(&mut self, email: &str, password: &str) -> Result<Role, AuthError> {
        let raw = json!({ "email": email, "password": password });
        let credentials = self
            .engine
            .credentials(&raw)
            .map_err(|report| AuthError::InvalidCredentials(report.errors))?;

        self.session.begin_login()?;

        let identity = match self.provider.sign_in(&credentials.email, &credentials.password) {
            Ok(identity) => identity,
            Err(err) => {
                self.session.fail_login();
                tracing::warn!(email = %credentials.email, error = %err, "sign-in failed");
                return Err(err);
            }
        };

        self.establish(identity)
    }

    /// Same as [`login`](Self::login) for a new account; the password must be
    /// confirmed.
    pub fn sign_up(&mut self, email: &str, password: &str, confirm: &str) -> Result<Role, AuthError> {
        let raw = json!({ "email": email, "password": password, "confirmPassword": confirm });
        let credentials = self
            .engine
            .credentials(&raw)
            .map_err(|report| AuthError::InvalidCredentials(report.errors))?;

        self.session.begin_login()?;

        let identity = match self.provider.sign_up(&credentials.email, &credentials.password) {
            Ok(identity) => identity,
            Err(err) => {
                self.session.fail_login();
                tracing::warn!(email = %credentials.email, error = %err, "sign-up failed");
                return Err(err);
            }
        };

        self.establish(identity)
    }

    fn establish(&mut self, identity: P::Identity) -> Result<Role, AuthError> {
        let claims = match self.provider.get_claims(&identity, true) {
            Ok(claims) => claims,
            Err(err) => {
                self.session.fail_login();
                tracing::warn!(error = %err, "claims unavailable after sign-in; staying signed out");
                return Err(err.into());
            }
        };

        let role = self.session.complete_login(claims)?;
        self.identity = Some(identity);
        tracing::info!(role = %role, "signed in");
        Ok(role)
    }

    /// Force-refresh claims (e.g. after a role change). A failed refresh
    /// signs the session out and returns the error.
    pub fn reload(&mut self) -> Result<Option<Role>, AuthError> {
        let Some(identity) = self.identity.as_ref() else {
            return Ok(None);
        };

        match self.provider.get_claims(identity, true) {
            Ok(claims) => Ok(self.session.refreshed(Some(claims))?),
            Err(err) => {
                tracing::warn!(error = %err, "claims refresh failed; signing out");
                self.session.refreshed(None)?;
                self.identity = None;
                Err(err.into())
            }
        }
    }

    /// Record that the role changed server-side; admin access is suspended
    /// until [`reload`](Self::reload).
    pub fn mark_role_changed(&mut self) -> Result<(), AuthError> {
        Ok(self.session.mark_stale()?)
    }

    /// Clears local state first, so a provider failure still leaves the
    /// client signed out.
    pub fn logout(&mut self) -> Result<(), AuthError> {
        self.session.logout();
        if self.identity.take().is_none() {
            return Ok(());
        }
        self.provider.sign_out().inspect_err(|err| {
            tracing::warn!(error = %err, "provider sign-out failed");
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[derive(Debug, Default)]
    struct CountingProvider {
        sign_ins: Cell<u32>,
    }

    impl IdentityProvider for CountingProvider {
        type Identity = String;

        fn sign_in(&self, email: &str, _password: &str) -> Result<String, AuthError> {
            self.sign_ins.set(self.sign_ins.get() + 1);
            Ok(email.to_string())
        }

        fn sign_up(&self, email: &str, password: &str) -> Result<String, AuthError> {
            self.sign_in(email, password)
        }

        fn user_id(&self, identity: &String) -> UserId {
            UserId::new(identity.clone()).unwrap()
        }

        fn sign_out(&self) -> Result<(), AuthError> {
            Ok(())
        }

        fn get_claims(&self, _identity: &String, _force: bool) -> Result<ClaimsBag, ClaimsError> {
            Ok(ClaimsBag::new())
        }
    }

    #[test]
    fn malformed_credentials_never_reach_the_provider() {
        let mut manager = SessionManager::new(CountingProvider::default());
        let err = manager.login("not-an-email", "123").unwrap_err();

        match err {
            AuthError::InvalidCredentials(errors) => {
                assert!(errors.iter().any(|e| e.contains("email")));
                assert!(errors.iter().any(|e| e.contains("password")));
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(manager.provider().sign_ins.get(), 0);
        assert!(!manager.session().is_signed_in());
    }

    #[test]
    fn email_is_normalized_before_sign_in() {
        let mut manager = SessionManager::new(CountingProvider::default());
        assert_eq!(manager.login("  Ana@Example.COM ", "secret1").unwrap(), Role::User);
        assert_eq!(manager.identity().map(String::as_str), Some("ana@example.com"));
    }

    #[test]
    fn sign_up_requires_a_matching_confirmation() {
        let mut manager = SessionManager::new(CountingProvider::default());
        let err = manager.sign_up("ana@example.com", "secret1", "secret2").unwrap_err();

        match err {
            AuthError::InvalidCredentials(errors) => {
                assert_eq!(errors, vec!["confirmPassword must match password"]);
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(manager.provider().sign_ins.get(), 0);

        assert_eq!(manager.sign_up("ana@example.com", "secret1", "secret1").unwrap(), Role::User);
        assert_eq!(manager.user_id().unwrap().as_str(), "ana@example.com");
    }

    #[test]
    fn reload_without_identity_is_a_no_op() {
        let mut manager = SessionManager::new(CountingProvider::default());
        assert_eq!(manager.reload().unwrap(), None);
        manager.logout().unwrap();
    }
}
