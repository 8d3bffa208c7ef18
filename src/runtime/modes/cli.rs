//! CLI mode
//!
//! Subcommands that run without starting the HTTP server.

use std::io::{self, BufRead, Write};
use std::path::Path;

use colored::Colorize;

use crate::cli::ConfigCommands;
use crate::config::StaticConfig;
use crate::errors::Result;

/// Run a `config` subcommand
pub fn run_config_command(action: ConfigCommands) -> Result<()> {
    match action {
        ConfigCommands::Generate { output_path, force } => config_generate(output_path, force),
    }
}

/// Generate example configuration file
pub fn config_generate(output_path: Option<String>, force: bool) -> Result<()> {
    let path = output_path.unwrap_or_else(|| "config.example.toml".to_string());

    // 检查文件是否存在，非 --force 模式下交互确认
    if !force && Path::new(&path).exists() {
        print!(
            "{} {} {}",
            "File already exists:".yellow(),
            path.blue(),
            "Overwrite? [y/N] ".yellow()
        );
        io::stdout().flush()?;

        let mut input = String::new();
        io::stdin().lock().read_line(&mut input)?;
        if !input.trim().eq_ignore_ascii_case("y") {
            println!("{}", "Aborted.".red());
            return Ok(());
        }
    }

    println!(
        "{} {}",
        "Generating configuration file...".yellow(),
        path.blue()
    );

    StaticConfig::default().save_to_file(&path)?;

    println!(
        "  {} {}",
        "Configuration file generated successfully".green(),
        path.blue()
    );
    println!(
        "  {}",
        "Edit it, then start the server with `sessionlinker -c <file>`".yellow()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_writes_loadable_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let path_str = path.to_string_lossy().to_string();

        config_generate(Some(path_str.clone()), true).unwrap();
        assert!(path.exists());

        let loaded = StaticConfig::load(Some(&path_str));
        assert_eq!(loaded.server.port, StaticConfig::default().server.port);
    }
}
