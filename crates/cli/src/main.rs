//! Developer CLI for the content core.
//!
//! ```bash
//! # Validate a form payload (exit code 1 when invalid)
//! irmaozinho validate article draft.json
//!
//! # Validate and print the normalized record
//! cat product.json | irmaozinho validate product - --normalize
//!
//! # Which role does a decoded token grant, and may it enter the admin area?
//! irmaozinho role claims.json --require admin
//!
//! # Promote a user in a role-directory file (uid -> custom claims)
//! irmaozinho set-role roles.json abc123 admin
//!
//! # Print the effective validation config (defaults + IRMAOZINHO_* overrides)
//! irmaozinho config
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};

use irmaozinho_auth::Role;
use irmaozinho_core::EntityKind;
use irmaozinho_observability::LogConfig;

mod commands;
mod input;

#[derive(Parser)]
#[command(name = "irmaozinho")]
#[command(version, about = "O Irmãozinho content tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a JSON record of the given kind
    Validate {
        /// article, product, supplier or credentials
        kind: EntityKind,

        /// JSON file, or `-` for stdin
        #[arg(default_value = "-")]
        file: PathBuf,

        /// Print the normalized record when valid
        #[arg(short, long)]
        normalize: bool,
    },
    /// Derive the role granted by a claims payload
    Role {
        /// JSON file, or `-` for stdin; the literal `none` means no session
        file: PathBuf,

        /// Also decide admission for this role
        #[arg(short, long, value_enum)]
        require: Option<RequiredRole>,
    },
    /// Set a user's role claim in a role-directory file
    SetRole {
        /// JSON object mapping uid to custom claims; rewritten in place
        directory: PathBuf,

        /// Provider uid of the user
        uid: String,

        #[arg(value_enum)]
        role: RequiredRole,
    },
    /// Print the effective validation configuration
    Config,
}

/// Role argument shared by `role --require` and `set-role`.
#[derive(Clone, Copy, ValueEnum)]
enum RequiredRole {
    User,
    Admin,
}

impl From<RequiredRole> for Role {
    fn from(value: RequiredRole) -> Self {
        match value {
            RequiredRole::User => Role::User,
            RequiredRole::Admin => Role::Admin,
        }
    }
}

fn main() -> ExitCode {
    match LogConfig::from_env() {
        Ok(config) => irmaozinho_observability::init_with(&config),
        Err(err) => {
            irmaozinho_observability::init();
            tracing::warn!(error = %err, "ignoring log configuration");
        }
    }

    match run(Cli::parse()) {
        Ok(code) => code,
        Err(err) => {
            tracing::error!("command failed: {err:#}");
            eprintln!("error: {err:#}");
            ExitCode::from(2)
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    match cli.command {
        Commands::Validate {
            kind,
            file,
            normalize,
        } => commands::validate::run(kind, &file, normalize),
        Commands::Role { file, require } => commands::role::run(&file, require.map(Role::from)),
        Commands::SetRole {
            directory,
            uid,
            role,
        } => commands::set_role::run(&directory, &uid, role.into()),
        Commands::Config => commands::config::run(),
    }
}
