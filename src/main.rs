//! series-minder - fills in missing Audible ASINs for Audiobookshelf series.
//!
//! Walks every series in the selected libraries, looks up books that lack an
//! ASIN on the Audible search page, writes matches back to the server and
//! prints two reports: the first book of each series and every book with its
//! series position.

pub mod cli;
pub mod config;
pub mod enrichment;
pub mod error;
pub mod library;
pub mod model;
pub mod series;
#[cfg(test)]
pub mod test_utils;

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

fn main() -> anyhow::Result<()> {
    // A missing .env file is fine
    dotenvy::dotenv().ok();

    let args = cli::Cli::parse();

    // Initialize logging (stderr, so stdout stays machine-readable)
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env().add_directive("series_minder=info".parse()?))
        .init();

    cli::run_command(&args)
}
