//! Run narration sinks.
//!
//! The synchronizer reports progress through a [`Reporter`] so the silent
//! flag never reaches business logic: the CLI injects a [`ConsoleReporter`]
//! or a [`SilentReporter`] and the engine stays unaware of the difference.
//! Counts and errors are identical with either sink.

use colored::Colorize;

use crate::sync::SyncOutcome;

/// Narration sink for one synchronization pass.
pub trait Reporter {
    /// Called once after the sheet is opened, before the first row.
    fn pass_started(&self, _sheet: &str, _product_id: &str, _rows: usize) {}

    /// Called after each row with a short disposition label
    /// (`skipped`, `created`, `updated`, `deleted`, `failed`).
    fn row_processed(&self, _row: u32, _disposition: &str) {}

    /// Called once after the last row.
    fn pass_finished(&self, _sheet: &str, _outcome: &SyncOutcome) {}
}

/// No-op sink for `--silent` and machine-readable output.
pub struct SilentReporter;

impl Reporter for SilentReporter {}

/// Narrates row progress to stdout.
pub struct ConsoleReporter;

impl Reporter for ConsoleReporter {
    fn pass_started(&self, sheet: &str, product_id: &str, rows: usize) {
        println!(
            "Synchronizing {} for {product_id} ({rows} rows)",
            sheet.bold()
        );
    }

    fn row_processed(&self, row: u32, disposition: &str) {
        let label = match disposition {
            "failed" => disposition.red().to_string(),
            "skipped" => disposition.dimmed().to_string(),
            _ => disposition.green().to_string(),
        };
        println!("  row {row}: {label}");
    }

    fn pass_finished(&self, sheet: &str, outcome: &SyncOutcome) {
        println!(
            "{} done: {} skipped, {} created, {} updated, {} deleted, {} failed",
            sheet.bold(),
            outcome.skipped,
            outcome.created,
            outcome.updated,
            outcome.deleted,
            outcome.failed_rows()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_silent_reporter_is_a_no_op() {
        // Uses every default method; nothing to observe beyond not panicking.
        let reporter = SilentReporter;
        reporter.pass_started("Ordering Parameters", "PRD-1", 3);
        reporter.row_processed(2, "created");
        reporter.pass_finished("Ordering Parameters", &SyncOutcome::default());
    }
}
