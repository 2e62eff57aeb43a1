use std::process::ExitCode;

use irmaozinho_validation::ValidationConfig;

pub fn run() -> anyhow::Result<ExitCode> {
    let config = ValidationConfig::from_env()?;
    println!("{}", serde_json::to_string_pretty(&config)?);
    Ok(ExitCode::SUCCESS)
}
