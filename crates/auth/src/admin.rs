//! Operator-side role management.
//!
//! Roles live in the identity provider's custom claims, so promoting a user
//! is a claims write. The signed-in client keeps its old role until it
//! force-refreshes (see [`SessionManager::mark_role_changed`]).
//!
//! [`SessionManager::mark_role_changed`]: crate::SessionManager::mark_role_changed

use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

use serde::Serialize;

use irmaozinho_core::UserId;

use crate::{AuthError, ClaimsBag, ROLE_CLAIM, Role, role_of};

/// Admin access to per-user custom claims.
pub trait RoleDirectory {
    /// `Ok(None)` when the uid is unknown to the provider.
    fn claims_of(&self, uid: &UserId) -> Result<Option<ClaimsBag>, AuthError>;

    /// Replace the user's custom claims.
    fn set_claims(&self, uid: &UserId, claims: ClaimsBag) -> Result<(), AuthError>;
}

impl<D: RoleDirectory + ?Sized> RoleDirectory for Arc<D> {
    fn claims_of(&self, uid: &UserId) -> Result<Option<ClaimsBag>, AuthError> {
        (**self).claims_of(uid)
    }

    fn set_claims(&self, uid: &UserId, claims: ClaimsBag) -> Result<(), AuthError> {
        (**self).set_claims(uid, claims)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum RoleChange {
    Unchanged { role: Role },
    Changed { from: Role, to: Role },
}

/// Set `uid`'s role claim, keeping its other claims.
pub fn set_role<D: RoleDirectory + ?Sized>(
    directory: &D,
    uid: &UserId,
    role: Role,
) -> Result<RoleChange, AuthError> {
    let mut claims = directory
        .claims_of(uid)?
        .ok_or_else(|| AuthError::UnknownUser(uid.to_string()))?;

    let from = role_of(Some(&claims)).unwrap_or(Role::User);
    if from == role && claims.get(ROLE_CLAIM).is_some() {
        return Ok(RoleChange::Unchanged { role });
    }

    claims.insert(ROLE_CLAIM, role.as_str());
    directory.set_claims(uid, claims)?;
    tracing::info!(uid = %uid, from = %from, to = %role, "role claim updated");

    if from == role {
        Ok(RoleChange::Unchanged { role })
    } else {
        Ok(RoleChange::Changed { from, to: role })
    }
}

/// Claims keyed by uid, persisted as a JSON object.
#[derive(Debug, Default)]
pub struct InMemoryRoleDirectory {
    users: RwLock<BTreeMap<String, ClaimsBag>>,
}

impl InMemoryRoleDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a user with the given claims, replacing any existing entry.
    pub fn register(&self, uid: &UserId, claims: ClaimsBag) -> Result<(), AuthError> {
        self.users
            .write()
            .map_err(poisoned)?
            .insert(uid.as_str().to_string(), claims);
        Ok(())
    }

    pub fn from_json(raw: &str) -> Result<Self, AuthError> {
        let users: BTreeMap<String, ClaimsBag> = serde_json::from_str(raw)
            .map_err(|e| AuthError::Provider(format!("role directory: {e}")))?;
        Ok(Self {
            users: RwLock::new(users),
        })
    }

    pub fn to_json(&self) -> Result<String, AuthError> {
        let users = self.users.read().map_err(poisoned)?;
        serde_json::to_string_pretty(&*users)
            .map_err(|e| AuthError::Provider(format!("role directory: {e}")))
    }
}

impl RoleDirectory for InMemoryRoleDirectory {
    fn claims_of(&self, uid: &UserId) -> Result<Option<ClaimsBag>, AuthError> {
        Ok(self.users.read().map_err(poisoned)?.get(uid.as_str()).cloned())
    }

    fn set_claims(&self, uid: &UserId, claims: ClaimsBag) -> Result<(), AuthError> {
        let mut users = self.users.write().map_err(poisoned)?;
        match users.get_mut(uid.as_str()) {
            Some(slot) => {
                *slot = claims;
                Ok(())
            }
            None => Err(AuthError::UnknownUser(uid.to_string())),
        }
    }
}

fn poisoned<T>(_: std::sync::PoisonError<T>) -> AuthError {
    AuthError::Provider("role directory lock poisoned".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn uid(s: &str) -> UserId {
        UserId::new(s).unwrap()
    }

    #[test]
    fn promotion_keeps_other_claims() {
        let directory = InMemoryRoleDirectory::new();
        directory
            .register(&uid("u1"), ClaimsBag::new().with("email", "ana@example.com"))
            .unwrap();

        let change = set_role(&directory, &uid("u1"), Role::Admin).unwrap();
        assert_eq!(change, RoleChange::Changed { from: Role::User, to: Role::Admin });

        let claims = directory.claims_of(&uid("u1")).unwrap().unwrap();
        assert_eq!(claims.get("role"), Some(&json!("admin")));
        assert_eq!(claims.get("email"), Some(&json!("ana@example.com")));
    }

    #[test]
    fn repeating_a_role_is_unchanged() {
        let directory = InMemoryRoleDirectory::new();
        directory
            .register(&uid("u1"), ClaimsBag::new().with("role", "admin"))
            .unwrap();

        assert_eq!(
            set_role(&directory, &uid("u1"), Role::Admin).unwrap(),
            RoleChange::Unchanged { role: Role::Admin }
        );
        assert_eq!(
            set_role(&directory, &uid("u1"), Role::User).unwrap(),
            RoleChange::Changed { from: Role::Admin, to: Role::User }
        );
    }

    #[test]
    fn unknown_users_are_rejected() {
        let directory = InMemoryRoleDirectory::new();
        let err = set_role(&directory, &uid("ghost"), Role::Admin).unwrap_err();
        assert!(matches!(err, AuthError::UnknownUser(ref u) if u == "ghost"));
    }

    #[test]
    fn survives_a_json_round_trip() {
        let directory = InMemoryRoleDirectory::from_json(r#"{"u1":{},"u2":{"role":"admin"}}"#).unwrap();
        set_role(&directory, &uid("u1"), Role::Admin).unwrap();

        let reloaded = InMemoryRoleDirectory::from_json(&directory.to_json().unwrap()).unwrap();
        let claims = reloaded.claims_of(&uid("u1")).unwrap().unwrap();
        assert_eq!(role_of(Some(&claims)), Some(Role::Admin));

        assert!(InMemoryRoleDirectory::from_json("[]").is_err());
    }
}
