//! Sync command implementation.
//!
//! Wires the synchronizer to the real catalog client, runs one pass per
//! target sheet on a tokio runtime, and renders counts plus a per-row error
//! table. Row failures make the command exit non-zero after every sheet has
//! been processed.

use std::path::Path;

use colored::Colorize;
use serde::Serialize;

use crate::client::CatalogClient;
use crate::config;
use crate::error::{Error, Result};
use crate::report::{ConsoleReporter, Reporter, SilentReporter};
use crate::sheet::Workbook;
use crate::sync::{ParamsSynchronizer, SheetFlavor, SyncOutcome};

#[derive(Serialize)]
struct SheetOutput<'a> {
    sheet: &'a str,
    #[serde(flatten)]
    outcome: &'a SyncOutcome,
}

/// Execute the sync command.
///
/// # Errors
///
/// Source and config errors abort before any row is processed. After a
/// completed run, [`Error::RowFailures`] reports rows that failed; the
/// outcome itself is always rendered first.
pub fn execute(
    workbook: &Path,
    sheet: Option<&str>,
    endpoint: Option<String>,
    api_key: Option<String>,
    silent: bool,
    json: bool,
) -> Result<()> {
    let config = config::resolve(endpoint, api_key)?;
    let client = CatalogClient::new(config.endpoint, config.api_key);
    let reporter: Box<dyn Reporter> = if silent || json {
        Box::new(SilentReporter)
    } else {
        Box::new(ConsoleReporter)
    };
    let mut synchronizer = ParamsSynchronizer::new(client, reporter);

    let targets = target_sheets(workbook, sheet)?;

    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| Error::Other(format!("Failed to create async runtime: {e}")))?;

    let mut results: Vec<(String, SyncOutcome)> = Vec::new();
    for name in targets {
        synchronizer.open(workbook, &name)?;
        let outcome = rt.block_on(synchronizer.sync())?;
        results.push((name, outcome));
    }

    if json {
        let payload: Vec<SheetOutput> = results
            .iter()
            .map(|(name, outcome)| SheetOutput {
                sheet: name,
                outcome,
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&payload)?);
    } else {
        for (name, outcome) in &results {
            render_outcome(name, outcome);
        }
    }

    let failed: usize = results.iter().map(|(_, o)| o.failed_rows()).sum();
    if failed > 0 {
        return Err(Error::RowFailures { rows: failed });
    }
    Ok(())
}

/// The named sheet, or every known parameter sheet present in the workbook
/// (Ordering, Fulfillment, Configuration, in that order).
fn target_sheets(workbook: &Path, sheet: Option<&str>) -> Result<Vec<String>> {
    if let Some(name) = sheet {
        return Ok(vec![name.to_string()]);
    }

    let workbook_dir = Workbook::open(workbook)?;
    let present: Vec<String> = SheetFlavor::ALL
        .iter()
        .map(|flavor| flavor.sheet_name().to_string())
        .filter(|name| workbook_dir.has_sheet(name))
        .collect();

    if present.is_empty() {
        return Err(Error::SheetNotFound {
            workbook: workbook.to_path_buf(),
            sheet: "any parameter sheet".to_string(),
        });
    }
    Ok(present)
}

fn render_outcome(sheet: &str, outcome: &SyncOutcome) {
    println!();
    println!("{}", sheet.bold());
    println!(
        "  skipped: {}  created: {}  updated: {}  deleted: {}  errors: {}",
        outcome.skipped,
        outcome.created,
        outcome.updated,
        outcome.deleted,
        if outcome.has_errors() {
            outcome.failed_rows().to_string().red().to_string()
        } else {
            "0".to_string()
        }
    );
    if outcome.has_errors() {
        println!("  {}", "Errors".red().bold());
        for (row, messages) in &outcome.errors {
            for message in messages {
                println!("    row {row}: {message}");
            }
        }
    }
}
