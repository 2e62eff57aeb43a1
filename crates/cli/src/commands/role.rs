use std::path::Path;
use std::process::ExitCode;

use irmaozinho_auth::{ClaimsBag, Role, explain_access, role_of};

use crate::input::read_json;

pub fn run(file: &Path, require: Option<Role>) -> anyhow::Result<ExitCode> {
    let claims = if file.as_os_str() == "none" {
        None
    } else {
        let value = read_json(file)?;
        Some(serde_json::from_value::<ClaimsBag>(value)?)
    };

    match role_of(claims.as_ref()) {
        Some(role) => println!("role: {role}"),
        None => println!("role: none (no session)"),
    }

    let Some(required) = require else {
        return Ok(ExitCode::SUCCESS);
    };

    let decision = explain_access(claims.as_ref(), required);
    println!("{}: {}", if decision.granted { "granted" } else { "denied" }, decision.reason);
    Ok(if decision.granted {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
