use std::path::Path;
use std::process::ExitCode;

use irmaozinho_core::EntityKind;
use irmaozinho_validation::{ValidationConfig, ValidationEngine};

use crate::input::read_json;

pub fn run(kind: EntityKind, file: &Path, normalize: bool) -> anyhow::Result<ExitCode> {
    let engine = ValidationEngine::with_config(ValidationConfig::from_env()?);
    let raw = read_json(file)?;

    match engine.check(kind, &raw) {
        Ok(record) => {
            if normalize {
                println!("{}", serde_json::to_string_pretty(&record.to_value())?);
            } else {
                println!("{kind}: valid");
            }
            Ok(ExitCode::SUCCESS)
        }
        Err(report) => {
            println!("{kind}: {} problem(s)", report.errors.len());
            for error in &report.errors {
                println!("  - {error}");
            }
            Ok(ExitCode::FAILURE)
        }
    }
}
