//! `irmaozinho-core`: shared building blocks for the content core.
//!
//! Identifiers, entity kinds and the domain error model. No IO.

pub mod error;
pub mod id;
pub mod kind;

pub use error::{DomainError, DomainResult};
pub use id::{DocumentId, UserId};
pub use kind::{Collection, EntityKind};
