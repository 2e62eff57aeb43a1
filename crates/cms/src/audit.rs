//! Append-only audit trail.
//!
//! Recording never fails the caller: a missing actor is skipped with a
//! warning, and a store failure is logged and swallowed.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use irmaozinho_core::{Collection, DocumentId, EntityKind, UserId};

use crate::store::{DocumentStore, Filter, StoreError, StoredDocument};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    ArticleCreated,
    ArticleUpdated,
    ArticleDeleted,
    ProductCreated,
    ProductUpdated,
    ProductDeleted,
    SupplierCreated,
    SupplierUpdated,
    SupplierDeleted,
    UserLogin,
    UserLogout,
    OrderCreated,
    OrderUpdated,
}

impl AuditAction {
    pub fn as_str(self) -> &'static str {
        match self {
            AuditAction::ArticleCreated => "article_created",
            AuditAction::ArticleUpdated => "article_updated",
            AuditAction::ArticleDeleted => "article_deleted",
            AuditAction::ProductCreated => "product_created",
            AuditAction::ProductUpdated => "product_updated",
            AuditAction::ProductDeleted => "product_deleted",
            AuditAction::SupplierCreated => "supplier_created",
            AuditAction::SupplierUpdated => "supplier_updated",
            AuditAction::SupplierDeleted => "supplier_deleted",
            AuditAction::UserLogin => "user_login",
            AuditAction::UserLogout => "user_logout",
            AuditAction::OrderCreated => "order_created",
            AuditAction::OrderUpdated => "order_updated",
        }
    }

    pub fn created(kind: EntityKind) -> Option<Self> {
        match kind {
            EntityKind::Article => Some(AuditAction::ArticleCreated),
            EntityKind::Product => Some(AuditAction::ProductCreated),
            EntityKind::Supplier => Some(AuditAction::SupplierCreated),
            EntityKind::Credentials => None,
        }
    }

    pub fn updated(kind: EntityKind) -> Option<Self> {
        match kind {
            EntityKind::Article => Some(AuditAction::ArticleUpdated),
            EntityKind::Product => Some(AuditAction::ProductUpdated),
            EntityKind::Supplier => Some(AuditAction::SupplierUpdated),
            EntityKind::Credentials => None,
        }
    }

    pub fn deleted(kind: EntityKind) -> Option<Self> {
        match kind {
            EntityKind::Article => Some(AuditAction::ArticleDeleted),
            EntityKind::Product => Some(AuditAction::ProductDeleted),
            EntityKind::Supplier => Some(AuditAction::SupplierDeleted),
            EntityKind::Credentials => None,
        }
    }
}

impl core::fmt::Display for AuditAction {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One audit record as written to [`Collection::AuditLogs`]. The store's
/// `created_at` is the event timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditEntry {
    pub action: AuditAction,
    pub user_id: UserId,
    pub target_id: Option<String>,
    pub metadata: Map<String, Value>,
    pub ip: Option<String>,
    pub user_agent: Option<String>,
}

impl AuditEntry {
    pub fn new(
        action: AuditAction,
        user_id: UserId,
        target_id: Option<String>,
        metadata: Map<String, Value>,
    ) -> Self {
        let meta_str = |key: &str| metadata.get(key).and_then(Value::as_str).map(str::to_string);
        let ip = meta_str("ip");
        let user_agent = meta_str("userAgent");
        Self {
            action,
            user_id,
            target_id,
            metadata,
            ip,
            user_agent,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AuditLog<S> {
    store: S,
}

impl<S: DocumentStore> AuditLog<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Append an entry. Returns the new entry's id, or `None` when nothing
    /// was written.
    pub fn record(
        &self,
        action: AuditAction,
        user_id: Option<&UserId>,
        target_id: Option<&str>,
        metadata: Value,
    ) -> Option<DocumentId> {
        let Some(user_id) = user_id else {
            tracing::warn!(action = %action, "audit entry without a user; skipped");
            return None;
        };

        let metadata = match metadata {
            Value::Object(map) => map,
            Value::Null => Map::new(),
            other => Map::from_iter([("value".to_string(), other)]),
        };
        let entry = AuditEntry::new(
            action,
            user_id.clone(),
            target_id.map(str::to_string),
            metadata,
        );

        let data = match serde_json::to_value(&entry) {
            Ok(data) => data,
            Err(err) => {
                tracing::error!(action = %action, error = %err, "audit entry not serializable");
                return None;
            }
        };

        match self.store.create(Collection::AuditLogs, data) {
            Ok(doc) => {
                tracing::debug!(action = %action, user = %user_id, "audit entry recorded");
                Some(doc.id)
            }
            Err(err) => {
                tracing::error!(action = %action, error = %err, "failed to record audit entry");
                None
            }
        }
    }

    /// Like [`record`](Self::record), tagging the metadata with the resource type.
    pub fn record_resource(
        &self,
        action: AuditAction,
        kind: EntityKind,
        user_id: Option<&UserId>,
        target_id: DocumentId,
        mut metadata: Map<String, Value>,
    ) -> Option<DocumentId> {
        metadata.insert("resourceType".into(), Value::String(kind.as_str().to_string()));
        let target = target_id.to_string();
        self.record(action, user_id, Some(target.as_str()), Value::Object(metadata))
    }

    /// Entries newest first, optionally narrowed to one action.
    pub fn entries(&self, action: Option<AuditAction>) -> Result<Vec<StoredDocument>, StoreError> {
        let filter = match action {
            Some(action) => Filter::eq("action", action.as_str()),
            None => Filter::all(),
        };
        self.store.query(Collection::AuditLogs, &filter)
    }
}
