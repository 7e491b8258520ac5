pub mod onboard;

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "HabitLogger", about = "Console habit tracking backed by SQLite")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Write the settings file interactively
    Onboard,
}
