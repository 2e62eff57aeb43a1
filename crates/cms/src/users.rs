//! Per-user profiles in [`Collection::Users`].
//!
//! Profiles are keyed by the provider uid (stored in the `uid` field). The
//! `role` field is informational; admission always reads the token claims.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use irmaozinho_auth::Role;
use irmaozinho_core::{Collection, UserId};

use crate::store::{DocumentStore, Filter, StoreError, StoredDocument};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preferences {
    pub newsletter: bool,
    pub email_notifications: bool,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            newsletter: false,
            email_notifications: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileStats {
    pub articles_read: u64,
    pub comments_count: u64,
    pub last_activity_at: DateTime<Utc>,
}

/// Optional details collected by the sign-up form.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileDetails {
    pub display_name: String,
    pub photo_url: String,
    pub email_verified: bool,
    pub preferences: Preferences,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub uid: UserId,
    pub email: String,
    pub email_verified: bool,
    pub display_name: String,
    #[serde(rename = "photoURL")]
    pub photo_url: String,
    pub role: Role,
    pub preferences: Preferences,
    pub stats: ProfileStats,
    pub last_login_at: DateTime<Utc>,
}

impl UserProfile {
    /// Fresh profile: always role `user`, zeroed stats, logged in `now`.
    pub fn new(uid: UserId, email: &str, details: ProfileDetails, now: DateTime<Utc>) -> Self {
        Self {
            uid,
            email: email.trim().to_lowercase(),
            email_verified: details.email_verified,
            display_name: details.display_name.trim().to_string(),
            photo_url: details.photo_url.trim().to_string(),
            role: Role::User,
            preferences: details.preferences,
            stats: ProfileStats {
                articles_read: 0,
                comments_count: 0,
                last_activity_at: now,
            },
            last_login_at: now,
        }
    }

    fn from_document(doc: &StoredDocument) -> Result<Self, StoreError> {
        serde_json::from_value(serde_json::Value::Object(doc.data.clone()))
            .map_err(|e| StoreError::Corrupt(format!("{}/{}: {e}", doc.collection, doc.id)))
    }
}

#[derive(Debug, Clone)]
pub struct UserDirectory<S> {
    store: S,
}

impl<S: DocumentStore> UserDirectory<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Write `profile`, overwriting any existing profile for the same uid.
    pub fn create_profile(&self, profile: &UserProfile) -> Result<StoredDocument, StoreError> {
        let data = serde_json::to_value(profile).map_err(|e| StoreError::Corrupt(e.to_string()))?;
        let doc = match self.find(&profile.uid)? {
            Some(existing) => self.store.replace(Collection::Users, existing.id, data)?,
            None => self.store.create(Collection::Users, data)?,
        };
        tracing::info!(uid = %profile.uid, "user profile created");
        Ok(doc)
    }

    pub fn profile(&self, uid: &UserId) -> Result<Option<UserProfile>, StoreError> {
        self.find(uid)?
            .as_ref()
            .map(UserProfile::from_document)
            .transpose()
    }

    /// Stamp the last login and activity times. Never fails the caller: a
    /// missing profile or store error is logged and `false` returned.
    pub fn record_login(&self, uid: &UserId, now: DateTime<Utc>) -> bool {
        let result = self.find(uid).and_then(|doc| {
            let Some(doc) = doc else {
                return Ok(false);
            };
            let mut profile = UserProfile::from_document(&doc)?;
            profile.last_login_at = now;
            profile.stats.last_activity_at = now;
            let data =
                serde_json::to_value(&profile).map_err(|e| StoreError::Corrupt(e.to_string()))?;
            self.store.replace(Collection::Users, doc.id, data)?;
            Ok(true)
        });

        match result {
            Ok(true) => true,
            Ok(false) => {
                tracing::warn!(uid = %uid, "no profile to stamp login on");
                false
            }
            Err(err) => {
                tracing::warn!(uid = %uid, error = %err, "failed to record last login");
                false
            }
        }
    }

    fn find(&self, uid: &UserId) -> Result<Option<StoredDocument>, StoreError> {
        let mut docs = self
            .store
            .query(Collection::Users, &Filter::eq("uid", uid.as_str()))?;
        Ok(if docs.is_empty() { None } else { Some(docs.swap_remove(0)) })
    }
}
