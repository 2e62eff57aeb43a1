//! Entity kinds and the collections they persist into.

use core::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// The four record shapes accepted from forms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Article,
    Product,
    Supplier,
    Credentials,
}

impl EntityKind {
    pub const ALL: [EntityKind; 4] = [
        EntityKind::Article,
        EntityKind::Product,
        EntityKind::Supplier,
        EntityKind::Credentials,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            EntityKind::Article => "article",
            EntityKind::Product => "product",
            EntityKind::Supplier => "supplier",
            EntityKind::Credentials => "credentials",
        }
    }

    /// Collection the normalized record is persisted into.
    ///
    /// Credentials are handed to the identity provider and never stored.
    pub fn collection(self) -> Option<Collection> {
        match self {
            EntityKind::Article => Some(Collection::Articles),
            EntityKind::Product => Some(Collection::Products),
            EntityKind::Supplier => Some(Collection::Suppliers),
            EntityKind::Credentials => None,
        }
    }
}

impl core::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EntityKind::ALL
            .into_iter()
            .find(|k| k.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| DomainError::unknown_kind(s))
    }
}

/// Document-store collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Collection {
    Articles,
    Products,
    Suppliers,
    AuditLogs,
    Users,
}

impl Collection {
    pub fn as_str(self) -> &'static str {
        match self {
            Collection::Articles => "articles",
            Collection::Products => "products",
            Collection::Suppliers => "suppliers",
            Collection::AuditLogs => "audit_logs",
            Collection::Users => "users",
        }
    }
}

impl core::fmt::Display for Collection {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Collection {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "articles" => Ok(Collection::Articles),
            "products" => Ok(Collection::Products),
            "suppliers" => Ok(Collection::Suppliers),
            "audit_logs" => Ok(Collection::AuditLogs),
            "users" => Ok(Collection::Users),
            other => Err(DomainError::UnknownCollection(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_parses_case_insensitively() {
        assert_eq!("Article".parse::<EntityKind>().unwrap(), EntityKind::Article);
        assert_eq!(" supplier ".parse::<EntityKind>().unwrap(), EntityKind::Supplier);
    }

    #[test]
    fn unknown_kind_is_a_programmer_error() {
        let err = "widget".parse::<EntityKind>().unwrap_err();
        assert_eq!(err, DomainError::UnknownKind("widget".into()));
    }

    #[test]
    fn credentials_have_no_collection() {
        assert_eq!(EntityKind::Credentials.collection(), None);
        assert_eq!(EntityKind::Supplier.collection(), Some(Collection::Suppliers));
    }

    #[test]
    fn collection_names_parse_back() {
        assert_eq!("users".parse::<Collection>().unwrap(), Collection::Users);
        assert_eq!(Collection::AuditLogs.to_string(), "audit_logs");
    }
}
