//! Entry point used by form handlers: `validate`, then `normalize`.

use std::sync::Arc;

use serde_json::Value;

use irmaozinho_core::EntityKind;

use crate::config::ValidationConfig;
use crate::credentials::Credentials;
use crate::fields::fields_of;
use crate::record::Record;
use crate::report::ValidationReport;
use crate::sanitize::{AllowListSanitizer, Sanitizer};
use crate::{article, credentials, product, supplier};

/// Validation and normalization for every entity kind.
///
/// Holds only immutable configuration, so one engine can be shared freely
/// between concurrent form submissions.
#[derive(Clone)]
pub struct ValidationEngine {
    config: ValidationConfig,
    sanitizer: Arc<dyn Sanitizer>,
}

impl core::fmt::Debug for ValidationEngine {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ValidationEngine")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Default for ValidationEngine {
    fn default() -> Self {
        Self::with_config(ValidationConfig::default())
    }
}

impl ValidationEngine {
    pub fn new(config: ValidationConfig, sanitizer: impl Sanitizer + 'static) -> Self {
        Self {
            config,
            sanitizer: Arc::new(sanitizer),
        }
    }

    /// Engine with the allow-list sanitizer.
    pub fn with_config(config: ValidationConfig) -> Self {
        Self::new(config, AllowListSanitizer)
    }

    pub fn config(&self) -> &ValidationConfig {
        &self.config
    }

    /// Check `raw` against every rule for `kind`.
    ///
    /// Never panics: missing fields, wrong types and non-object input all
    /// become messages. All violations are collected, not just the first.
    pub fn validate(&self, kind: EntityKind, raw: &Value) -> ValidationReport {
        let fields = fields_of(raw);
        let mut errors = Vec::new();

        match kind {
            EntityKind::Article => article::validate(fields, &self.config, &mut errors),
            EntityKind::Product => product::validate(fields, &self.config, &mut errors),
            EntityKind::Supplier => supplier::validate(fields, &self.config, &mut errors),
            EntityKind::Credentials => credentials::validate(fields, &self.config, &mut errors),
        }

        tracing::debug!(kind = %kind, violations = errors.len(), "record validated");
        ValidationReport::from_errors(errors)
    }

    /// Canonical form of `raw`: trimmed, defaulted, coerced and sanitized.
    ///
    /// Idempotent on its own output. Timestamps are left to the store.
    pub fn normalize(&self, kind: EntityKind, raw: &Value) -> Record {
        let fields = fields_of(raw);
        let sanitizer = self.sanitizer.as_ref();

        match kind {
            EntityKind::Article => article::normalize(fields, &self.config, sanitizer).into(),
            EntityKind::Product => product::normalize(fields, &self.config, sanitizer).into(),
            EntityKind::Supplier => supplier::normalize(fields, &self.config).into(),
            EntityKind::Credentials => credentials::normalize(fields).into(),
        }
    }

    /// `validate`, `normalize`, then `validate` again on the normalized
    /// record. Sanitizing can empty or shorten an HTML field that was valid
    /// as submitted (a script-only body), and that must not be persisted.
    pub fn check(&self, kind: EntityKind, raw: &Value) -> Result<Record, ValidationReport> {
        let report = self.validate(kind, raw);
        if !report.is_valid() {
            return Err(report);
        }

        let record = self.normalize(kind, raw);
        self.revalidate(kind, &record.to_value())?;
        Ok(record)
    }

    /// Typed shortcut for login and sign-up forms.
    pub fn credentials(&self, raw: &Value) -> Result<Credentials, ValidationReport> {
        let report = self.validate(EntityKind::Credentials, raw);
        if !report.is_valid() {
            return Err(report);
        }

        let normalized = credentials::normalize(fields_of(raw));
        let mut value = serde_json::to_value(&normalized).unwrap_or(Value::Null);
        // The confirmation is not part of the normalized record.
        if let (Value::Object(map), Some(confirm)) = (&mut value, raw.get("confirmPassword")) {
            map.insert("confirmPassword".to_string(), confirm.clone());
        }
        self.revalidate(EntityKind::Credentials, &value)?;
        Ok(normalized)
    }

    fn revalidate(&self, kind: EntityKind, normalized: &Value) -> Result<(), ValidationReport> {
        let report = self.validate(kind, normalized);
        if report.is_valid() {
            return Ok(());
        }
        tracing::debug!(kind = %kind, violations = report.errors.len(), "normalized record failed validation");
        Err(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sanitize::StripAllSanitizer;
    use serde_json::json;

    #[test]
    fn empty_records_report_every_required_field() {
        let engine = ValidationEngine::default();
        let expected_minimum = [
            (EntityKind::Article, 3),
            (EntityKind::Product, 2),
            (EntityKind::Supplier, 4),
            (EntityKind::Credentials, 2),
        ];

        for (kind, min) in expected_minimum {
            let report = engine.validate(kind, &json!({}));
            assert!(!report.valid, "{kind} should be invalid");
            assert!(report.errors.len() >= min, "{kind}: {:?}", report.errors);
        }
    }

    #[test]
    fn non_object_input_is_an_empty_record() {
        let engine = ValidationEngine::default();
        for raw in [json!(null), json!(42), json!("title"), json!([{"title": "x"}])] {
            let report = engine.validate(EntityKind::Article, &raw);
            assert_eq!(report, engine.validate(EntityKind::Article, &json!({})));
        }
    }

    #[test]
    fn check_returns_normalized_record_on_success() {
        let engine = ValidationEngine::default();
        let record = engine
            .check(EntityKind::Product, &json!({"name": " Caneca ", "price": "19.90"}))
            .unwrap();

        assert_eq!(record.kind(), EntityKind::Product);
        assert_eq!(
            record.to_value(),
            json!({
                "name": "Caneca",
                "description": "",
                "price": 19.9,
                "stock": 0,
                "active": true,
                "category": "Other",
                "imageUrl": "",
            })
        );
    }

    #[test]
    fn check_returns_report_on_failure() {
        let engine = ValidationEngine::default();
        let report = engine.check(EntityKind::Product, &json!({"name": "x"})).unwrap_err();
        assert!(report.mentions("price"));
    }

    #[test]
    fn sanitizer_is_injected() {
        let engine = ValidationEngine::new(ValidationConfig::default(), StripAllSanitizer);
        let record = engine.normalize(
            EntityKind::Article,
            &json!({"title": "Title", "body": "<b>bold</b> text", "category": "Articles"}),
        );
        match record {
            Record::Article(a) => assert_eq!(a.body, "bold text"),
            other => panic!("expected article, got {other:?}"),
        }
    }

    #[test]
    fn check_rejects_bodies_that_sanitize_to_nothing() {
        let engine = ValidationEngine::default();
        let raw = json!({"title": "Valid title", "body": "<script>alert(1)</script>", "category": "Articles"});

        assert!(engine.validate(EntityKind::Article, &raw).is_valid());
        let report = engine.check(EntityKind::Article, &raw).unwrap_err();
        assert_eq!(report.errors, vec!["body is required".to_string()]);
    }

    #[test]
    fn check_rejects_bodies_that_sanitize_below_minimum() {
        let engine = ValidationEngine::default();
        let raw = json!({"title": "Valid title", "body": "<img src=x>hey", "category": "Articles"});

        let report = engine.check(EntityKind::Article, &raw).unwrap_err();
        assert_eq!(report.errors, vec!["body must be at least 10 characters".to_string()]);
    }

    #[test]
    fn credentials_keep_the_confirmation_check() {
        let engine = ValidationEngine::default();
        let creds = engine
            .credentials(&json!({"email": " Ana@Example.com ", "password": "secret1", "confirmPassword": "secret1"}))
            .unwrap();
        assert_eq!(creds.email, "ana@example.com");

        let report = engine
            .credentials(&json!({"email": "ana@example.com", "password": "secret1", "confirmPassword": "secret2"}))
            .unwrap_err();
        assert!(report.mentions("confirmPassword"));
    }
}
