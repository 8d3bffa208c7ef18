use clap::Parser;
use colored::Colorize;

use sessionlinker::cli::{Cli, Commands};
use sessionlinker::config::{get_config, init_config};
use sessionlinker::runtime::modes::{run_config_command, run_server};
use sessionlinker::system::init_logging;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Config { action }) => {
            if let Err(e) = run_config_command(action) {
                eprintln!("{}", e.format_colored());
                std::process::exit(1);
            }
            Ok(())
        }
        Some(Commands::Serve) | None => {
            init_config(cli.config.as_deref());
            let config = get_config();

            // guard 必须存活到进程结束，否则缓冲中的日志会丢失
            let _guard = match init_logging(&config.logging) {
                Ok(guard) => guard,
                Err(e) => {
                    eprintln!("{}", e.format_colored());
                    std::process::exit(1);
                }
            };

            if let Err(e) = run_server().await {
                eprintln!("{} {:#}", "Server error:".red().bold(), e);
                std::process::exit(1);
            }
            Ok(())
        }
    }
}
