use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "jw", about = concat!("[\u{25cf}] jirawatch v", env!("CARGO_PKG_VERSION"), " - your queries, one terminal"), version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Run against a different config directory
    #[arg(short = 'C', long = "config-dir", global = true)]
    pub config_dir: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create a config file interactively
    Init,
    /// Validate the configured queries against the server and exit
    Check,
}
