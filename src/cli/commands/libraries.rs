//! Library listing command.

use serde::Serialize;
use tokio::runtime::Runtime;

use super::{ServerArgs, authenticate, exit_with_error};
use crate::config::Config;
use crate::error::{Result, ResultExt};
use crate::model::LibrarySummary;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct LibrariesResponse {
    status: &'static str,
    /// Token to reuse with `--token` for later runs
    auth_token: String,
    libraries_list: Vec<LibrarySummary>,
}

/// Log in if needed and print the server's audiobook libraries
pub fn cmd_libraries(rt: &Runtime, config: &Config, args: &ServerArgs) -> anyhow::Result<()> {
    let response = match rt.block_on(run(config, args)) {
        Ok(response) => response,
        Err(e) => exit_with_error(&e),
    };

    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}

async fn run(config: &Config, args: &ServerArgs) -> Result<LibrariesResponse> {
    let client = authenticate(config, args).await?;
    let libraries = client
        .list_libraries()
        .await
        .with_context("Failed to fetch libraries")?;

    tracing::info!("Found {} audiobook libraries", libraries.len());
    for library in &libraries {
        tracing::debug!("Library {} ({})", library.name, library.id);
    }

    Ok(LibrariesResponse {
        status: "success",
        auth_token: client.token().unwrap_or_default().to_string(),
        libraries_list: libraries,
    })
}
