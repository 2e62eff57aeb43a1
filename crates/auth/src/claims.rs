use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::{Role, can_access};

/// Claims asserted by the identity provider about the current session.
///
/// A plain key/value bag: nothing here depends on a particular provider's
/// token format or SDK types.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClaimsBag(BTreeMap<String, Value>);

impl ClaimsBag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Parse a claims payload (e.g. a decoded token body). Must be a JSON object.
    pub fn from_json(raw: &str) -> Result<Self, ClaimsError> {
        serde_json::from_str(raw).map_err(|e| ClaimsError::Malformed(e.to_string()))
    }
}

impl FromIterator<(String, Value)> for ClaimsBag {
    fn from_iter<T: IntoIterator<Item = (String, Value)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ClaimsError {
    /// The provider could not be reached or timed out.
    #[error("claims unavailable: {0}")]
    Unavailable(String),

    /// The session was revoked or has expired.
    #[error("session revoked")]
    Revoked,

    #[error("malformed claims: {0}")]
    Malformed(String),
}

/// Anything that can hand out the current session's claims.
///
/// `Ok(None)` means nobody is signed in. Implementations own token refresh;
/// `force_refresh` asks them to bypass any cached token.
pub trait ClaimsSource {
    fn claims(&self, force_refresh: bool) -> Result<Option<ClaimsBag>, ClaimsError>;
}

impl<S: ClaimsSource + ?Sized> ClaimsSource for &S {
    fn claims(&self, force_refresh: bool) -> Result<Option<ClaimsBag>, ClaimsError> {
        (**self).claims(force_refresh)
    }
}

/// Fixed claims, for tests and for callers that already hold a decoded token.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StaticClaims(pub Option<ClaimsBag>);

impl ClaimsSource for StaticClaims {
    fn claims(&self, _force_refresh: bool) -> Result<Option<ClaimsBag>, ClaimsError> {
        Ok(self.0.clone())
    }
}

/// Admission check that fetches claims first and fails closed: a source
/// error is treated exactly like "not signed in".
pub fn access_for<S: ClaimsSource>(source: &S, required: Role, force_refresh: bool) -> bool {
    match source.claims(force_refresh) {
        Ok(claims) => can_access(claims.as_ref(), required),
        Err(err) => {
            tracing::warn!(error = %err, required = %required, "claims unavailable; denying access");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct Failing;

    impl ClaimsSource for Failing {
        fn claims(&self, _force_refresh: bool) -> Result<Option<ClaimsBag>, ClaimsError> {
            Err(ClaimsError::Unavailable("network down".into()))
        }
    }

    #[test]
    fn parses_object_payloads_only() {
        let bag = ClaimsBag::from_json(r#"{"role":"admin","email":"a@b.co"}"#).unwrap();
        assert_eq!(bag.get("role"), Some(&json!("admin")));

        assert!(matches!(ClaimsBag::from_json("[1,2]"), Err(ClaimsError::Malformed(_))));
        assert!(matches!(ClaimsBag::from_json("not json"), Err(ClaimsError::Malformed(_))));
    }

    #[test]
    fn source_failure_denies_even_user_routes() {
        assert!(!access_for(&Failing, Role::User, true));
        assert!(!access_for(&Failing, Role::Admin, false));
    }

    #[test]
    fn static_source_is_consulted() {
        let admin = StaticClaims(Some(ClaimsBag::new().with("role", "admin")));
        assert!(access_for(&admin, Role::Admin, false));

        let anonymous = StaticClaims(None);
        assert!(!access_for(&anonymous, Role::User, false));
    }
}
