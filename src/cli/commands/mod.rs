//! CLI command definitions and dispatch.
//!
//! This module provides the command-line interface for series-minder.
//! Each subcommand is implemented in its own submodule for maintainability:
//! - `series`: ASIN aggregation over one or more libraries
//! - `libraries`: List the server's audiobook libraries
//! - `resolve`: One-off ASIN lookup
//! - `cache`: Inspect or clear the lookup cache
//! - `config`: Show or save the effective configuration

mod cache;
mod config;
mod libraries;
mod resolve;
mod series;

use clap::{Args, Parser, Subcommand};
use serde_json::json;
use std::path::PathBuf;
use tokio::runtime::Runtime;

use crate::config::Config;
use crate::enrichment::{AsinCache, AsinResolver, AudibleClient, AudibleRegion};
use crate::error::{Error, Result, ResultExt};
use crate::library::AbsClient;

pub use cache::cmd_cache;
pub use config::cmd_config;
pub use libraries::cmd_libraries;
pub use resolve::cmd_resolve;
pub use series::cmd_series;

/// series-minder CLI
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub server: ServerArgs,

    #[command(subcommand)]
    pub command: Commands,
}

/// Connection settings shared by every subcommand; each overrides the
/// config file.
#[derive(Args, Debug, Clone, Default)]
pub struct ServerArgs {
    /// Audiobookshelf server URL
    #[arg(long, env = "ABS_URI", global = true)]
    pub url: Option<String>,

    /// API key (skips login)
    #[arg(long, env = "ABS_TOKEN", global = true, hide_env_values = true)]
    pub token: Option<String>,

    /// Username for password login
    #[arg(long, env = "ABS_USERNAME", global = true)]
    pub username: Option<String>,

    /// Password for password login
    #[arg(long, env = "ABS_PASSWORD", global = true, hide_env_values = true)]
    pub password: Option<String>,

    /// Audible marketplace: de, us, uk, ca, au, fr, it, es, jp, in
    #[arg(long, env = "ABS_REGION", global = true)]
    pub region: Option<String>,

    /// ASIN cache file
    #[arg(long, global = true)]
    pub cache: Option<PathBuf>,
}

/// Available subcommands
#[derive(Subcommand)]
pub enum Commands {
    /// Fill in missing ASINs and print the series reports
    Series {
        /// Library to aggregate (repeatable; default: every audiobook library)
        #[arg(short, long = "library")]
        libraries: Vec<String>,
        /// Write the report to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// List the server's audiobook libraries
    Libraries,
    /// Look up the ASIN for a single title
    Resolve {
        /// Book title
        title: String,
        /// Author name
        #[arg(short, long, default_value = "")]
        author: String,
    },
    /// Show or clear the ASIN lookup cache
    Cache {
        /// Remove every cached lookup
        #[arg(long)]
        clear: bool,
    },
    /// Show the public configuration
    Config {
        /// Write the effective settings (without password) to the config file
        #[arg(long)]
        save: bool,
    },
}

/// Run the specified CLI command.
pub fn run_command(cli: &Cli) -> anyhow::Result<()> {
    let config = apply_overrides(crate::config::load(), &cli.server);
    let rt = Runtime::new()?;

    match &cli.command {
        Commands::Series { libraries, output } => {
            cmd_series(&rt, &config, &cli.server, libraries, output.as_deref())
        }
        Commands::Libraries => cmd_libraries(&rt, &config, &cli.server),
        Commands::Resolve { title, author } => cmd_resolve(&rt, &config, title, author),
        Commands::Cache { clear } => cmd_cache(&config, *clear),
        Commands::Config { save } => cmd_config(&config, *save),
    }
}

// ============================================================================
// Shared helper functions
// ============================================================================

/// Layer command-line/environment values over the config file.
pub(crate) fn apply_overrides(mut config: Config, args: &ServerArgs) -> Config {
    let given = |value: &Option<String>| value.clone().filter(|v| !v.trim().is_empty());

    if let Some(url) = given(&args.url) {
        config.server.url = Some(url);
    }
    if let Some(token) = given(&args.token) {
        config.server.api_token = Some(token);
    }
    if let Some(username) = given(&args.username) {
        config.server.username = Some(username);
    }
    if let Some(region) = given(&args.region) {
        config.server.region = region;
    }
    if let Some(cache) = &args.cache {
        config.enrichment.cache_path = Some(cache.clone());
    }
    config
}

/// Connect to the server: API token if configured, otherwise password login.
pub(crate) async fn authenticate(config: &Config, args: &ServerArgs) -> Result<AbsClient> {
    let url = config
        .server
        .url
        .as_deref()
        .map(|url| url.trim_end_matches('/'))
        .filter(|url| !url.is_empty())
        .ok_or_else(|| Error::invalid_input("Missing required field: url (use --url or ABS_URI)"))?;

    let client = AbsClient::new(url)?;

    if let Some(token) = config.server.api_token.as_deref().filter(|t| !t.is_empty()) {
        return Ok(client.with_token(token));
    }

    let username = config.server.username.as_deref().unwrap_or_default().trim();
    let password = args.password.as_deref().unwrap_or_default().trim();
    if username.is_empty() || password.is_empty() {
        return Err(Error::invalid_input("Missing username or password"));
    }

    tracing::info!("Logging in to {} as {}", url, username);
    let token = client
        .login(username, password)
        .await
        .with_context("Login failed")?;
    Ok(client.with_token(token))
}

/// Build the ASIN resolver from the enrichment settings.
pub(crate) fn build_resolver(config: &Config) -> Result<AsinResolver<AudibleClient>> {
    let settings = &config.enrichment;
    let timeout = settings.lookup_timeout();

    let client = match settings.search_base_url.as_deref().filter(|u| !u.is_empty()) {
        Some(base_url) => AudibleClient::with_base_url(base_url, timeout)?,
        None => {
            let region: AudibleRegion = config.server.region.parse()?;
            AudibleClient::new(region, timeout)?
        }
    };
    let cache = AsinCache::load(settings.cache_path());

    Ok(AsinResolver::new(client, cache).with_delay(settings.lookup_delay()))
}

/// JSON body printed when a command fails.
pub(crate) fn error_envelope(err: &Error) -> serde_json::Value {
    let mut envelope = json!({
        "status": "error",
        "message": err.to_string(),
    });
    if let Some(status) = upstream_status(err) {
        envelope["details"] = json!(format!("HTTP {status}"));
    }
    envelope
}

fn upstream_status(err: &Error) -> Option<u16> {
    match err {
        Error::Library(e) => e.status(),
        Error::Aggregation(e) => e.status(),
        Error::WithContext { source, .. } => upstream_status(source),
        _ => None,
    }
}

/// Print the error envelope to stdout and exit with a failure code
pub(crate) fn exit_with_error(err: &Error) -> ! {
    tracing::error!("{}", err);
    println!("{}", error_envelope(err));
    std::process::exit(1);
}
