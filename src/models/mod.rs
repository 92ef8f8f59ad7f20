//! Defines the data structures and models used throughout the application.
//!
//! This includes structures for deserializing Open-Meteo API responses and
//! the report structures the aggregator assembles for its callers.

mod open_meteo;
mod report;

pub use open_meteo::*;
pub use report::*;
