use serde::Serialize;
use serde_json::Value;

use crate::{ClaimsBag, Role};

/// Custom-claim key carrying the role. Only the exact string `"admin"` elevates.
pub const ROLE_CLAIM: &str = "role";

/// Derive the role for a session.
///
/// `None` claims means no session. An authenticated session whose `role`
/// claim is anything other than the exact string `"admin"` (absent, a
/// different string, a non-string) is a plain `User`.
pub fn role_of(claims: Option<&ClaimsBag>) -> Option<Role> {
    let claims = claims?;
    match claims.get(ROLE_CLAIM).and_then(Value::as_str) {
        Some("admin") => Some(Role::Admin),
        _ => Some(Role::User),
    }
}

/// Admission check. Total, pure, and fail-closed on `None` claims.
pub fn can_access(claims: Option<&ClaimsBag>, required: Role) -> bool {
    role_of(claims).is_some_and(|role| role.satisfies(required))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DenialKind {
    Unauthenticated,
    InsufficientRole,
}

/// Same decision as [`can_access`], with enough context to log or audit it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccessDecision {
    pub granted: bool,
    pub required: Role,
    pub actual: Option<Role>,
    pub denial: Option<DenialKind>,
    pub reason: String,
}

pub fn explain_access(claims: Option<&ClaimsBag>, required: Role) -> AccessDecision {
    let actual = role_of(claims);
    let (granted, denial, reason) = match actual {
        None => (
            false,
            Some(DenialKind::Unauthenticated),
            format!("no session; {required} access requires sign-in"),
        ),
        Some(role) if role.satisfies(required) => {
            (true, None, format!("role {role} satisfies {required}"))
        }
        Some(role) => (
            false,
            Some(DenialKind::InsufficientRole),
            format!("role {role} does not satisfy {required}"),
        ),
    };

    tracing::trace!(granted, required = %required, reason = %reason, "access decision");

    AccessDecision {
        granted,
        required,
        actual,
        denial,
        reason,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    fn bag(role: Value) -> ClaimsBag {
        ClaimsBag::new().with(ROLE_CLAIM, role)
    }

    #[test]
    fn role_of_follows_the_exact_admin_string() {
        assert_eq!(role_of(None), None);
        assert_eq!(role_of(Some(&ClaimsBag::new())), Some(Role::User));
        assert_eq!(role_of(Some(&bag(json!("admin")))), Some(Role::Admin));
        assert_eq!(role_of(Some(&bag(json!("superuser")))), Some(Role::User));
        assert_eq!(role_of(Some(&bag(json!("Admin")))), Some(Role::User));
        assert_eq!(role_of(Some(&bag(json!(" admin")))), Some(Role::User));
        assert_eq!(role_of(Some(&bag(json!(true)))), Some(Role::User));
        assert_eq!(role_of(Some(&bag(json!(["admin"])))), Some(Role::User));
        assert_eq!(role_of(Some(&bag(Value::Null))), Some(Role::User));
    }

    #[test]
    fn can_access_matrix() {
        let admin = bag(json!("admin"));
        let user = ClaimsBag::new();

        assert!(!can_access(None, Role::User));
        assert!(!can_access(None, Role::Admin));
        assert!(can_access(Some(&user), Role::User));
        assert!(!can_access(Some(&user), Role::Admin));
        assert!(can_access(Some(&admin), Role::User));
        assert!(can_access(Some(&admin), Role::Admin));
    }

    #[test]
    fn explanation_agrees_with_can_access() {
        let d = explain_access(None, Role::User);
        assert!(!d.granted);
        assert_eq!(d.denial, Some(DenialKind::Unauthenticated));

        let d = explain_access(Some(&ClaimsBag::new()), Role::Admin);
        assert!(!d.granted);
        assert_eq!(d.actual, Some(Role::User));
        assert_eq!(d.denial, Some(DenialKind::InsufficientRole));
        assert!(d.reason.contains("user"));

        let d = explain_access(Some(&bag(json!("admin"))), Role::Admin);
        assert!(d.granted);
        assert_eq!(d.denial, None);
    }

    proptest! {
        #![proptest_config(ProptestConfig { cases: 256, ..ProptestConfig::default() })]

        /// Property: no role value other than the exact string "admin" yields Admin.
        #[test]
        fn only_exact_admin_elevates(s in "\\PC{0,12}") {
            prop_assume!(s != "admin");
            prop_assert_eq!(role_of(Some(&bag(json!(s)))), Some(Role::User));
        }

        /// Property: the explanation never disagrees with the plain check.
        #[test]
        fn explain_matches_can_access(
            s in "(admin|user|\\PC{0,6})",
            signed_in in any::<bool>(),
            admin_required in any::<bool>(),
        ) {
            let required = if admin_required { Role::Admin } else { Role::User };
            let claims = bag(json!(s));
            let claims = signed_in.then_some(&claims);
            prop_assert_eq!(explain_access(claims, required).granted, can_access(claims, required));
        }
    }
}
