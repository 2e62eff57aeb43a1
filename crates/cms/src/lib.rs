//! `irmaozinho-cms`: admin form submission over a document-store seam.
//!
//! Every write goes through the same pipeline: admit (admin only), validate,
//! normalize, persist, audit. Reads and search are public. [`Accounts`] keeps
//! user profiles in step with sign-up and login.

pub mod accounts;
pub mod audit;
pub mod search;
pub mod service;
pub mod store;
pub mod users;

pub use accounts::{AccountError, Accounts};
pub use audit::{AuditAction, AuditEntry, AuditLog};
pub use search::{Searchable, filter_by_category, search};
pub use service::{Actor, ContentService, SubmissionError};
pub use store::{DocumentStore, Filter, InMemoryDocumentStore, StoreError, StoredDocument};
pub use users::{Preferences, ProfileDetails, ProfileStats, UserDirectory, UserProfile};
