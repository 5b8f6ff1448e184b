//! Command-line interface for series-minder.
//!
//! This module provides CLI commands for aggregating series ASINs,
//! listing libraries, and managing the lookup cache.

mod commands;

pub use commands::{Cli, Commands, ServerArgs, run_command};
