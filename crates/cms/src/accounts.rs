//! Account lifecycle on top of the session: sign-up creates the user's
//! profile, login stamps it, and both login and logout are audited.

use chrono::Utc;
use serde_json::json;
use thiserror::Error;

use irmaozinho_auth::{AuthError, IdentityProvider, Role, SessionManager};

use crate::audit::{AuditAction, AuditLog};
use crate::store::{DocumentStore, StoreError};
use crate::users::{ProfileDetails, UserDirectory, UserProfile};

#[derive(Debug, Error)]
pub enum AccountError {
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// The account exists but its profile could not be written.
    #[error("profile not saved: {0}")]
    Profile(#[from] StoreError),
}

pub struct Accounts<P: IdentityProvider, S> {
    session: SessionManager<P>,
    users: UserDirectory<S>,
    audit: AuditLog<S>,
}

impl<P: IdentityProvider, S: DocumentStore + Clone> Accounts<P, S> {
    pub fn new(session: SessionManager<P>, store: S) -> Self {
        Self {
            users: UserDirectory::new(store.clone()),
            audit: AuditLog::new(store),
            session,
        }
    }
}

impl<P: IdentityProvider, S: DocumentStore> Accounts<P, S> {
    pub fn session(&self) -> &SessionManager<P> {
        &self.session
    }

    /// For role reloads and other session-only operations.
    pub fn session_mut(&mut self) -> &mut SessionManager<P> {
        &mut self.session
    }

    pub fn users(&self) -> &UserDirectory<S> {
        &self.users
    }

    pub fn sign_up(
        &mut self,
        email: &str,
        password: &str,
        confirm: &str,
        details: ProfileDetails,
    ) -> Result<Role, AccountError> {
        let role = self.session.sign_up(email, password, confirm)?;
        let uid = self
            .session
            .user_id()
            .ok_or_else(|| AuthError::Provider("no identity after sign-up".to_string()))?;

        let profile = UserProfile::new(uid, email, details, Utc::now());
        self.users.create_profile(&profile)?;
        Ok(role)
    }

    pub fn login(&mut self, email: &str, password: &str) -> Result<Role, AuthError> {
        let role = self.session.login(email, password)?;
        if let Some(uid) = self.session.user_id() {
            self.users.record_login(&uid, Utc::now());
            self.audit
                .record(AuditAction::UserLogin, Some(&uid), None, json!({ "role": role.as_str() }));
        }
        Ok(role)
    }

    pub fn logout(&mut self) -> Result<(), AuthError> {
        let uid = self.session.user_id();
        let result = self.session.logout();
        if let Some(uid) = uid {
            self.audit.record(AuditAction::UserLogout, Some(&uid), None, json!({}));
        }
        result
    }
}
