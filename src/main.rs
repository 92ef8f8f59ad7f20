mod aggregator;
mod api;
mod cli;
mod error;
mod models;
mod seasons;
mod stats;

use clap::Parser;
use cli::{App, Cli};
use colored::Colorize;
use error::Result;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    info!("Initializing agro-weather CLI...");

    let cli = Cli::parse();
    let app = App::new();

    if let Err(e) = app.run(cli).await {
        error!("Command execution failed: {:?}", e);
        println!("{} {}", "Error:".red().bold(), e.to_string().red());
        return Err(e);
    }

    Ok(())
}
