//! Command-line interface for the City Explorer backend.

use clap::{Parser, Subcommand};

/// City Explorer - location, weather, events, movies and businesses
/// aggregated behind one cached HTTP API
#[derive(Parser)]
#[command(name = "city-explorer")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Run the HTTP server (default)
    #[command(alias = "daemon")]
    Serve,

    /// Create default config file
    Init,

    /// Load and validate the configuration, then check the database connection
    #[command(alias = "check")]
    CheckConfig,
}

impl Cli {
    /// The command to run, `serve` when none was given.
    #[must_use]
    pub fn command(&self) -> &Commands {
        self.command.as_ref().unwrap_or(&Commands::Serve)
    }
}
