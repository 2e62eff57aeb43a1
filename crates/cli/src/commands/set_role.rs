use std::path::Path;
use std::process::ExitCode;

use anyhow::Context;

use irmaozinho_auth::{InMemoryRoleDirectory, Role, RoleChange, set_role};
use irmaozinho_core::UserId;

/// Set a user's role claim in a role-directory file (uid → claims object).
///
/// The user must sign out and back in, or reload their session, before the
/// new role takes effect.
pub fn run(directory: &Path, uid: &str, role: Role) -> anyhow::Result<ExitCode> {
    let uid = UserId::new(uid)?;
    let raw = std::fs::read_to_string(directory)
        .with_context(|| format!("reading {}", directory.display()))?;
    let roles = InMemoryRoleDirectory::from_json(&raw)?;

    match set_role(&roles, &uid, role)? {
        RoleChange::Unchanged { role } => println!("{uid} already has role {role}"),
        RoleChange::Changed { from, to } => println!("{uid}: {from} -> {to}"),
    }

    std::fs::write(directory, roles.to_json()?)
        .with_context(|| format!("writing {}", directory.display()))?;
    println!("the user must reload their session for the change to apply");
    Ok(ExitCode::SUCCESS)
}
