//! Series ASIN aggregation command.

use serde::Serialize;
use std::path::Path;
use tokio::runtime::Runtime;

use super::{ServerArgs, authenticate, build_resolver, exit_with_error};
use crate::config::Config;
use crate::error::{Result, ResultExt};
use crate::model::{LibraryRef, SeriesReport};
use crate::series::{AggregationRequest, aggregate_series};

/// Success body: the report plus a status marker.
#[derive(Serialize)]
struct SeriesResponse<'a> {
    status: &'static str,
    #[serde(flatten)]
    report: &'a SeriesReport,
}

/// Aggregate series reports and print (or write) them as JSON
pub fn cmd_series(
    rt: &Runtime,
    config: &Config,
    args: &ServerArgs,
    library_ids: &[String],
    output: Option<&Path>,
) -> anyhow::Result<()> {
    let report = match rt.block_on(run(config, args, library_ids)) {
        Ok(report) => report,
        Err(e) => exit_with_error(&e),
    };

    let json = serde_json::to_string_pretty(&SeriesResponse {
        status: "success",
        report: &report,
    })?;

    match output {
        Some(path) => {
            std::fs::write(path, &json)
                .with_context(format!("Failed to write report to {}", path.display()))?;
            eprintln!(
                "Wrote {} series ({} books) to {}",
                report.series_first.len(),
                report.series_all.len(),
                path.display()
            );
        }
        None => println!("{}", json),
    }
    Ok(())
}

async fn run(config: &Config, args: &ServerArgs, library_ids: &[String]) -> Result<SeriesReport> {
    let client = authenticate(config, args).await?;

    let libraries: Vec<LibraryRef> = if library_ids.is_empty() {
        let found = client
            .list_libraries()
            .await
            .with_context("Failed to fetch libraries")?;
        tracing::info!("Using all {} audiobook libraries", found.len());
        found.into_iter().map(|lib| LibraryRef::new(lib.id)).collect()
    } else {
        library_ids.iter().map(LibraryRef::new).collect()
    };

    let request = AggregationRequest::new(
        client.base_url(),
        client.token().unwrap_or_default(),
        libraries,
    );
    let mut resolver = build_resolver(config)?;
    let report = aggregate_series(&request, &mut resolver).await?;

    let stats = resolver.cache().stats();
    tracing::info!(
        "ASIN cache now holds {} found / {} not found",
        stats.found,
        stats.not_found
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::SeriesFirstEntry;

    #[test]
    fn test_response_flattens_report() {
        let report = SeriesReport {
            series_first: vec![SeriesFirstEntry {
                series: "Mystery".to_string(),
                title: "The Case".to_string(),
                asin: "B0ABCDEFGH".to_string(),
            }],
            series_all: vec![],
        };

        let json = serde_json::to_value(SeriesResponse {
            status: "success",
            report: &report,
        })
        .unwrap();

        assert_eq!(json["status"], "success");
        assert_eq!(json["seriesFirstASIN"][0]["title"], "The Case");
        assert_eq!(json["seriesAllASIN"], serde_json::json!([]));
    }
}
