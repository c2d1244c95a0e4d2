//! bookwire - integration harness for the book service WebSocket API
//!
//! Exits 0 when the conversation completes as expected and 1 on any
//! failure, after printing the cause.

use clap::Parser;

use bookwire::commands::Commands;
use bookwire::common::config::Config;
use bookwire::common::logging;
use bookwire::{cli, FaultKind};

#[derive(Parser)]
#[command(name = "bookwire", about = "Integration harness for the book service WebSocket API")]
#[command(version, long_about = None)]
struct Cli {
    /// WebSocket endpoint of the book service (overrides the config file)
    #[arg(long, global = true)]
    url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() {
    logging::init_cli();

    let cli = Cli::parse();

    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    let url = cli.url.unwrap_or(config.server.url);

    if let Err(e) = cli::dispatch(&url, &config.timeouts, cli.command).await {
        match e.kind() {
            FaultKind::Connectivity => eprintln!("Connection error: {e}"),
            FaultKind::Contract => eprintln!("Test failed: {e}"),
            FaultKind::Other => eprintln!("Error: {e}"),
        }
        std::process::exit(1);
    }
}
