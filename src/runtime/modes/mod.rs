//! Mode routing
//!
//! Entry points for the two execution modes:
//! - Server mode (HTTP server, the default)
//! - CLI mode (configuration subcommands)

pub mod cli;
pub mod server;

pub use cli::run_config_command;
pub use server::run_server;
