mod cli;
mod config;
mod db;
mod menu;
mod validate;

use crate::cli::onboard::run_onboarding;
use crate::cli::{Cli, Commands};
use crate::config::Config;
use crate::db::SqliteStore;
use crate::menu::Controller;
use crate::menu::console::Console;
use anyhow::Result;
use clap::Parser;
use std::io;
use std::path::PathBuf;
use std::process;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .with_target(false)
        .compact()
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Onboard) => {
            let _ = run_onboarding()?;
            Ok(())
        }
        None => run_menu(),
    }
}

fn run_menu() -> Result<()> {
    let database_path = resolve_database_path();
    info!(path = %database_path.display(), "HabitLogger started");

    let store = SqliteStore::new(database_path);
    let console = Console::new(io::stdin().lock(), io::stdout().lock());

    Controller::new(store, console).run()
}

/// Exits with status 1 when no usable connection string is configured.
fn resolve_database_path() -> PathBuf {
    let settings_path = Config::settings_path();

    match Config::load_from(&settings_path).and_then(|config| config.database_path()) {
        Ok(path) => path,
        Err(error) => {
            warn!(error = %error, "startup settings unusable");
            println!(
                "Connection string not found in {}",
                settings_path.display()
            );
            println!("{error:#}");
            println!("Run `HabitLogger onboard` to create the settings file.");
            println!("Exiting...");
            process::exit(1);
        }
    }
}
