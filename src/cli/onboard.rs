use crate::config::{Config, parse_connection_string};
use crate::db::{SqliteStore, Store};
use anyhow::{Context, Result};
use dialoguer::{Confirm, Input, theme::ColorfulTheme};

pub fn run_onboarding() -> Result<Config> {
    println!("──────────────────────────────────────────");
    println!("  Welcome to HabitLogger setup.");
    println!("──────────────────────────────────────────");

    let theme = ColorfulTheme::default();
    let settings_path = Config::settings_path();

    if settings_path.exists() {
        let overwrite = Confirm::with_theme(&theme)
            .with_prompt(format!(
                "  {} already exists. Overwrite it?",
                settings_path.display()
            ))
            .default(false)
            .interact()
            .context("Failed to read overwrite confirmation")?;

        if !overwrite {
            println!("  ! Keeping existing settings");
            return Config::load_from(&settings_path);
        }
    }

    println!("\n[1/2] Database location");
    let connection_string: String = Input::with_theme(&theme)
        .with_prompt("  Connection string or SQLite file path")
        .default(Config::default_connection_string())
        .validate_with(|input: &String| -> std::result::Result<(), String> {
            parse_connection_string(input)
                .map(|_| ())
                .map_err(|error| error.to_string())
        })
        .interact_text()
        .context("Failed to read connection string")?;

    let config = Config { connection_string };
    config.save_to(&settings_path)?;
    println!("  ✓ Settings saved to {}", settings_path.display());

    println!("\n[2/2] Checking the database");
    let store = SqliteStore::new(config.database_path()?);
    let habits = store
        .list_tables()
        .with_context(|| format!("Failed to open database: {}", store.path().display()))?;
    println!(
        "  ✓ {} reachable, {} habit(s) found",
        store.path().display(),
        habits.len()
    );

    println!("\n──────────────────────────────────────────");
    println!("  Setup complete! Run HabitLogger to start logging.");
    println!("──────────────────────────────────────────");

    Ok(config)
}
