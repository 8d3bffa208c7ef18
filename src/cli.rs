//! Command-line interface definitions using clap
//!
//! This module defines the CLI structure for sessionlinker using clap's derive macros.

use clap::{Parser, Subcommand};

/// Sessionlinker - A session-scoped URL shortener
#[derive(Parser, Debug)]
#[command(name = "sessionlinker")]
#[command(version)]
#[command(about = "A session-scoped URL shortener", long_about = None)]
pub struct Cli {
    /// Configuration file (default: config.toml)
    #[arg(long, short = 'c', global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Start the HTTP server (default)
    Serve,

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },
}

/// Configuration management commands
#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum ConfigCommands {
    /// Generate example configuration file
    Generate {
        /// Output path (default: config.example.toml)
        output_path: Option<String>,

        /// Overwrite without asking
        #[arg(long)]
        force: bool,
    },
}
