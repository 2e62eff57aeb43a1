//! `irmaozinho-validation`: validation and normalization of user-submitted records.
//!
//! Pure functions over untrusted `serde_json::Value` input:
//! - `validate` collects every violated rule as a human-readable message
//! - `normalize` produces the canonical record handed to persistence
//!
//! No IO, no shared mutable state. HTML sanitization is injected through the
//! [`Sanitizer`] trait.

pub mod article;
pub mod config;
pub mod credentials;
pub mod email;
pub mod engine;
mod fields;
pub mod links;
pub mod product;
pub mod record;
pub mod report;
pub mod sanitize;
pub mod supplier;

pub use article::Article;
pub use config::{ConfigError, ValidationConfig};
pub use credentials::{Credentials, check_password};
pub use email::is_valid_email;
pub use engine::ValidationEngine;
pub use links::{is_valid_url, is_valid_url_value};
pub use product::Product;
pub use record::Record;
pub use report::ValidationReport;
pub use sanitize::{AllowListSanitizer, Sanitizer, StripAllSanitizer};
pub use supplier::Supplier;

pub use irmaozinho_core::EntityKind;
