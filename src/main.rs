use clap::Parser;
use jirawatch::cli::commands::{Cli, Commands};
use jirawatch::cli::handlers;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let config_dir = cli.config_dir.clone();

    match cli.command {
        None => {
            // No subcommand → launch TUI
            if let Err(e) = jirawatch::tui::run(config_dir.as_deref()).await {
                eprintln!("error: {}", e);
                std::process::exit(1);
            }
        }
        Some(Commands::Init) => {
            if let Err(e) = handlers::cmd_init(config_dir.as_deref()) {
                eprintln!("error: {}", e);
                std::process::exit(1);
            }
        }
        Some(Commands::Check) => {
            if let Err(e) = handlers::cmd_check(config_dir.as_deref()).await {
                eprintln!("error: {}", e);
                std::process::exit(1);
            }
        }
    }
}
