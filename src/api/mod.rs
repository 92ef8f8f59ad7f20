//! Provides clients and utilities for interacting with external APIs.
//!
//! Includes:
//! - `open_meteo`: client and configuration for the Open-Meteo weather provider.

mod open_meteo;


pub use open_meteo::*;
