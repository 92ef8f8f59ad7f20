//! Handles Command Line Interface (CLI) related functionalities.
//!
//! Defines the commands and their coordinate arguments, and the `App` runner
//! that wires parsed arguments through the aggregator and serializes results.

mod commands;

pub use commands::*;
