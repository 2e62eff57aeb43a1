use serde_json::{Map, Value, json};
use thiserror::Error;

use irmaozinho_auth::{ClaimsBag, Role, explain_access};
use irmaozinho_core::{Collection, DocumentId, EntityKind, UserId};
use irmaozinho_validation::{Record, ValidationEngine};

use crate::audit::{AuditAction, AuditLog};
use crate::store::{DocumentStore, Filter, StoreError, StoredDocument};

/// Who is submitting: the signed-in user's id and their current claims.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Actor {
    pub user_id: Option<UserId>,
    pub claims: Option<ClaimsBag>,
}

impl Actor {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn signed_in(user_id: UserId, claims: ClaimsBag) -> Self {
        Self {
            user_id: Some(user_id),
            claims: Some(claims),
        }
    }
}

#[derive(Debug, Error)]
pub enum SubmissionError {
    #[error("access denied: {0}")]
    Forbidden(String),

    /// Verbatim validation messages, for display next to the form.
    #[error("validation failed: {}", .0.join("; "))]
    Invalid(Vec<String>),

    #[error("{0} records are not stored")]
    NotStorable(EntityKind),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Admin submission handlers: admit, validate, normalize, persist, audit.
#[derive(Debug, Clone)]
pub struct ContentService<S> {
    store: S,
    engine: ValidationEngine,
    audit: AuditLog<S>,
}

impl<S: DocumentStore + Clone> ContentService<S> {
    pub fn new(store: S, engine: ValidationEngine) -> Self {
        Self {
            audit: AuditLog::new(store.clone()),
            store,
            engine,
        }
    }
}

impl<S: DocumentStore> ContentService<S> {
    pub fn audit(&self) -> &AuditLog<S> {
        &self.audit
    }

    pub fn engine(&self) -> &ValidationEngine {
        &self.engine
    }

    pub fn submit(
        &self,
        actor: &Actor,
        kind: EntityKind,
        raw: &Value,
    ) -> Result<StoredDocument, SubmissionError> {
        self.admit(actor, kind, "create")?;
        let collection = collection_of(kind)?;
        let record = self.check(kind, raw)?;

        let doc = self.store.create(collection, record.to_value())?;
        tracing::info!(kind = %kind, id = %doc.id, "record created");

        if let Some(action) = AuditAction::created(kind) {
            self.audit
                .record_resource(action, kind, actor.user_id.as_ref(), doc.id, summary(&record));
        }
        Ok(doc)
    }

    /// Replace a record's fields with a freshly validated submission.
    pub fn update(
        &self,
        actor: &Actor,
        kind: EntityKind,
        id: DocumentId,
        raw: &Value,
    ) -> Result<StoredDocument, SubmissionError> {
        self.admit(actor, kind, "update")?;
        let collection = collection_of(kind)?;
        let record = self.check(kind, raw)?;

        let doc = self.store.replace(collection, id, record.to_value())?;
        tracing::info!(kind = %kind, id = %doc.id, "record updated");

        if let Some(action) = AuditAction::updated(kind) {
            self.audit
                .record_resource(action, kind, actor.user_id.as_ref(), doc.id, summary(&record));
        }
        Ok(doc)
    }

    /// Suppliers are deactivated rather than removed so that products keep
    /// their reference.
    pub fn delete(
        &self,
        actor: &Actor,
        kind: EntityKind,
        id: DocumentId,
    ) -> Result<(), SubmissionError> {
        self.admit(actor, kind, "delete")?;
        let collection = collection_of(kind)?;

        match kind {
            EntityKind::Supplier => {
                self.store.update(collection, id, json!({ "active": false }))?;
            }
            _ => self.store.delete(collection, id)?,
        }
        tracing::info!(kind = %kind, id = %id, "record deleted");

        if let Some(action) = AuditAction::deleted(kind) {
            self.audit
                .record_resource(action, kind, actor.user_id.as_ref(), id, Map::new());
        }
        Ok(())
    }

    pub fn get(&self, kind: EntityKind, id: DocumentId) -> Result<Option<StoredDocument>, SubmissionError> {
        Ok(self.store.get(collection_of(kind)?, id)?)
    }

    /// Public listing, newest first.
    pub fn list(&self, kind: EntityKind, filter: &Filter) -> Result<Vec<StoredDocument>, SubmissionError> {
        Ok(self.store.query(collection_of(kind)?, filter)?)
    }

    pub fn list_suppliers(&self, active_only: bool) -> Result<Vec<StoredDocument>, SubmissionError> {
        let filter = if active_only {
            Filter::eq("active", true)
        } else {
            Filter::all()
        };
        Ok(self.store.query(Collection::Suppliers, &filter)?)
    }

    fn admit(&self, actor: &Actor, kind: EntityKind, op: &str) -> Result<(), SubmissionError> {
        let decision = explain_access(actor.claims.as_ref(), Role::Admin);
        if decision.granted {
            return Ok(());
        }
        tracing::warn!(kind = %kind, op, reason = %decision.reason, "submission denied");
        Err(SubmissionError::Forbidden(decision.reason))
    }

    fn check(&self, kind: EntityKind, raw: &Value) -> Result<Record, SubmissionError> {
        self.engine.check(kind, raw).map_err(|report| {
            tracing::warn!(kind = %kind, violations = report.errors.len(), "submission rejected");
            SubmissionError::Invalid(report.errors)
        })
    }
}

fn collection_of(kind: EntityKind) -> Result<Collection, SubmissionError> {
    kind.collection().ok_or(SubmissionError::NotStorable(kind))
}

/// Short human label for the audit trail.
fn summary(record: &Record) -> Map<String, Value> {
    let label = match record {
        Record::Article(a) => a.title.clone(),
        Record::Product(p) => p.name.clone(),
        Record::Supplier(s) => s.name.clone(),
        Record::Credentials(_) => return Map::new(),
    };
    Map::from_iter([("label".to_string(), Value::String(label))])
}
