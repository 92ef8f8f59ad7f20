//! Command definitions and the delivery wrapper around the aggregator.
//!
//! This layer is deliberately thin: parse and validate the coordinate, invoke
//! one aggregator operation, and pretty-print the structured result as JSON.

use crate::aggregator::AgroDataAggregator;
use crate::api::ApiConfig;
use crate::error::Result;
use crate::models::Coordinate;
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use serde::Serialize;

/// CLI tool for agricultural weather aggregation and seasonal analysis.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Current weather conditions for a coordinate
    Current(LocationArgs),

    /// Current soil profile with derived moisture indicators
    Soil(LocationArgs),

    /// Seasonal historical analysis with anomaly detection
    Historical(LocationArgs),
}

#[derive(Args, Debug)]
pub struct LocationArgs {
    /// Latitude in decimal degrees, -90 to 90
    #[arg(long, allow_hyphen_values = true)]
    pub lat: f64,

    /// Longitude in decimal degrees, -180 to 180
    #[arg(long, allow_hyphen_values = true)]
    pub lon: f64,
}

impl LocationArgs {
    /// Range-validates the pair before any network activity can happen.
    pub fn coordinate(&self) -> Result<Coordinate> {
        Coordinate::new(self.lat, self.lon)
    }
}

/// CLI application holding the one long-lived aggregator.
pub struct App {
    aggregator: AgroDataAggregator,
}

impl App {
    /// Creates the application: loads `.env` if present and builds the
    /// aggregator from environment configuration.
    pub fn new() -> Self {
        dotenv::dotenv().ok();
        Self {
            aggregator: AgroDataAggregator::new(ApiConfig::from_env()),
        }
    }

    /// Dispatches a parsed command to the matching aggregator operation.
    pub async fn run(&self, cli: Cli) -> Result<()> {
        match cli.command {
            Commands::Current(args) => {
                let snapshot = self.aggregator.current_snapshot(args.coordinate()?).await?;
                print_report("Current Conditions", &snapshot)?;
            },
            Commands::Soil(args) => {
                let snapshot = self.aggregator.soil_snapshot(args.coordinate()?).await?;
                print_report("Soil Analysis", &snapshot)?;
            },
            Commands::Historical(args) => {
                let dataset = self
                    .aggregator
                    .historical_analysis(args.coordinate()?)
                    .await?;
                print_report("Historical Seasonal Analysis", &dataset)?;
            },
        }

        Ok(())
    }
}

fn print_report<T: Serialize>(heading: &str, report: &T) -> Result<()> {
    println!("{}", format!("=== {} ===", heading).cyan().bold());
    println!("{}", serde_json::to_string_pretty(report)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;

    #[test]
    fn location_args_validate_before_dispatch() {
        let valid = LocationArgs {
            lat: 28.6139,
            lon: 77.209,
        };
        assert!(valid.coordinate().is_ok());

        let invalid = LocationArgs {
            lat: -91.0,
            lon: 0.0,
        };
        assert!(matches!(
            invalid.coordinate(),
            Err(AppError::InvalidCoordinate(_))
        ));
    }

    #[test]
    fn cli_parses_subcommands_with_negative_coordinates() {
        let cli = Cli::try_parse_from([
            "agro-weather",
            "historical",
            "--lat",
            "-33.87",
            "--lon",
            "151.21",
        ])
        .unwrap();
        match cli.command {
            Commands::Historical(args) => {
                assert_eq!(args.lat, -33.87);
                assert_eq!(args.lon, 151.21);
            },
            other => panic!("unexpected command: {:?}", other),
        }
    }
}
