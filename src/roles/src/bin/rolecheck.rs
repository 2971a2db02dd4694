//! rolecheck - answer role and permission questions against a role config
//!
//! ```text
//! rolecheck --config roles.toml roles
//! rolecheck --config roles.toml actions editor
//! rolecheck --config roles.toml can editor post:delete
//! ```
//!
//! `can` exits with status 1 when the action is denied. Errors (unreadable
//! config, unknown role) exit with status 2.

use anyhow::{Context, Result};
use authorize_roles::{PrincipalOptions, RegistryConfig, RoleMixin, RoleRegistry};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{debug, info};

/// Role registry inspection CLI
#[derive(Parser)]
#[command(name = "rolecheck")]
#[command(about = "Inspect role declarations and check permissions")]
#[command(version)]
struct Cli {
    /// Path to a .toml or .json role configuration
    #[arg(short, long, default_value = "roles.toml", env = "ROLECHECK_CONFIG")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List every role with its effective actions
    Roles,

    /// Show the effective actions of one role
    Actions {
        role: String,
    },

    /// Check whether a role may perform an action
    Can {
        role: String,
        action: String,
    },
}

/// Exit status for configuration and lookup failures
const EXIT_ERROR: u8 = 2;

fn main() -> ExitCode {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("{},authorize_roles={}", log_level, log_level).into()),
        )
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    match run(cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {:#}", err);
            ExitCode::from(EXIT_ERROR)
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode> {
    let config = RegistryConfig::load(&cli.config)
        .with_context(|| format!("Failed to load role configuration from {:?}", cli.config))?;
    let registry = config.build().context("Invalid role configuration")?;
    info!("Loaded {} roles from {:?}", registry.len(), cli.config);

    match cli.command {
        Command::Roles => {
            for role in registry.roles() {
                println!("{}: {}", role, format_actions(&registry, &role)?);
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::Actions { role } => {
            println!("{}", format_actions(&registry, &role)?);
            Ok(ExitCode::SUCCESS)
        }
        Command::Can { role, action } => {
            let roles = RoleMixin::new(registry);
            let principal = roles
                .build_principal("cli", PrincipalOptions::with_role(role))
                .context("Cannot check permissions for this role")?;
            let decision = roles.authorize(&principal, &action)?;
            debug!(reason = %decision.reason, "decision");

            if decision.allowed {
                println!("allow");
                Ok(ExitCode::SUCCESS)
            } else {
                println!("deny: {}", decision.reason);
                Ok(ExitCode::from(1))
            }
        }
    }
}

fn format_actions(registry: &RoleRegistry, role: &str) -> Result<String> {
    let actions = registry
        .actions_for(role)
        .with_context(|| format!("Cannot list actions for '{}'", role))?;
    Ok(actions
        .iter()
        .map(|a| a.as_str())
        .collect::<Vec<_>>()
        .join(", "))
}
