//! `irmaozinho-auth`: role derivation and admission decisions (fail closed).
//!
//! Admission decisions are pure functions of a claims bag. The identity
//! service is reached only through the [`IdentityProvider`] trait, which
//! [`SessionManager`] drives. Operators change roles through a
//! [`RoleDirectory`].

pub mod access;
pub mod admin;
pub mod claims;
pub mod guard;
pub mod provider;
pub mod roles;
pub mod session;

pub use access::{AccessDecision, DenialKind, ROLE_CLAIM, can_access, explain_access, role_of};
pub use admin::{InMemoryRoleDirectory, RoleChange, RoleDirectory, set_role};
pub use claims::{ClaimsBag, ClaimsError, ClaimsSource, StaticClaims, access_for};
pub use guard::{GuardOutcome, RouteGuard, guard_claims, guard_session};
pub use provider::{AuthError, IdentityProvider, SessionManager};
pub use roles::Role;
pub use session::{Session, SessionState, TransitionError};
