//! Application configuration and constants.
//!
//! This module provides:
//! - Configuration constants (limits, timeouts, well-known clusters)
//! - Search option types
//! - Deployment settings
//! - Command-line interface

mod cli;
mod constants;
mod types;

// Re-export all constants
pub use constants::*;
pub use cli::{Cli, Command, SearchArgs};
pub use types::{GroupBy, LogFormat, LogLevel, SearchOptions, Settings, Source};
