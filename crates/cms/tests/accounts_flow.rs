//! Sign-up → profile, login → last-login stamp and audit trail.

use std::cell::RefCell;
use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;

use irmaozinho_auth::{AuthError, ClaimsBag, ClaimsError, IdentityProvider, Role, SessionManager};
use irmaozinho_cms::{
    AccountError, Accounts, AuditAction, AuditLog, InMemoryDocumentStore, ProfileDetails,
};
use irmaozinho_core::{Collection, UserId};

#[derive(Default)]
struct Provider {
    accounts: RefCell<HashMap<String, String>>,
}

impl IdentityProvider for Provider {
    type Identity = String;

    fn sign_in(&self, email: &str, password: &str) -> Result<String, AuthError> {
        match self.accounts.borrow().get(email) {
            Some(expected) if expected == password => Ok(format!("uid:{email}")),
            _ => Err(AuthError::Rejected("wrong email or password".into())),
        }
    }

    fn sign_up(&self, email: &str, password: &str) -> Result<String, AuthError> {
        self.accounts
            .borrow_mut()
            .insert(email.to_string(), password.to_string());
        Ok(format!("uid:{email}"))
    }

    fn user_id(&self, identity: &String) -> UserId {
        UserId::new(identity.clone()).unwrap()
    }

    fn sign_out(&self) -> Result<(), AuthError> {
        Ok(())
    }

    fn get_claims(&self, _identity: &String, _force: bool) -> Result<ClaimsBag, ClaimsError> {
        Ok(ClaimsBag::new())
    }
}

fn setup() -> (Arc<InMemoryDocumentStore>, Accounts<Provider, Arc<InMemoryDocumentStore>>) {
    let store = Arc::new(InMemoryDocumentStore::new());
    let accounts = Accounts::new(SessionManager::new(Provider::default()), store.clone());
    (store, accounts)
}

fn uid() -> UserId {
    UserId::new("uid:maria@irmaozinho.org").unwrap()
}

#[test]
fn sign_up_creates_a_user_profile() {
    let (store, mut accounts) = setup();
    let details = ProfileDetails {
        display_name: "Maria".into(),
        ..ProfileDetails::default()
    };

    let role = accounts
        .sign_up(" Maria@Irmaozinho.org ", "segredo1", "segredo1", details)
        .unwrap();

    assert_eq!(role, Role::User);
    assert_eq!(store.len(Collection::Users), 1);
    let profile = accounts.users().profile(&uid()).unwrap().unwrap();
    assert_eq!(profile.email, "maria@irmaozinho.org");
    assert_eq!(profile.display_name, "Maria");
    assert_eq!(profile.role, Role::User);
    assert!(profile.preferences.email_notifications);
    assert!(!profile.preferences.newsletter);
}

#[test]
fn rejected_sign_up_writes_no_profile() {
    let (store, mut accounts) = setup();
    let err = accounts
        .sign_up("maria@irmaozinho.org", "segredo1", "outro", ProfileDetails::default())
        .unwrap_err();

    assert!(matches!(err, AccountError::Auth(AuthError::InvalidCredentials(_))));
    assert_eq!(store.len(Collection::Users), 0);
}

#[test]
fn login_stamps_the_profile_and_audits() {
    let (store, mut accounts) = setup();
    accounts
        .sign_up("maria@irmaozinho.org", "segredo1", "segredo1", ProfileDetails::default())
        .unwrap();
    let created = accounts.users().profile(&uid()).unwrap().unwrap().last_login_at;
    accounts.logout().unwrap();

    let before = Utc::now();
    accounts.login("maria@irmaozinho.org", "segredo1").unwrap();

    let profile = accounts.users().profile(&uid()).unwrap().unwrap();
    assert!(profile.last_login_at >= before);
    assert!(profile.last_login_at >= created);
    assert_eq!(profile.stats.last_activity_at, profile.last_login_at);

    accounts.logout().unwrap();
    let audit = AuditLog::new(store);
    let logins = audit.entries(Some(AuditAction::UserLogin)).unwrap();
    assert_eq!(logins.len(), 1);
    assert_eq!(logins[0].str_field("userId"), Some(uid().as_str()));
    assert_eq!(audit.entries(Some(AuditAction::UserLogout)).unwrap().len(), 2);
}

#[test]
fn failed_login_leaves_the_profile_alone() {
    let (store, mut accounts) = setup();
    accounts
        .sign_up("maria@irmaozinho.org", "segredo1", "segredo1", ProfileDetails::default())
        .unwrap();
    accounts.logout().unwrap();
    let stamped = accounts.users().profile(&uid()).unwrap().unwrap().last_login_at;

    assert!(accounts.login("maria@irmaozinho.org", "errada12").is_err());

    assert_eq!(accounts.users().profile(&uid()).unwrap().unwrap().last_login_at, stamped);
    assert!(AuditLog::new(store).entries(Some(AuditAction::UserLogin)).unwrap().is_empty());
}
