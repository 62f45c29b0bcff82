//! Parameter synchronization engine.
//!
//! One pass over a parameter sheet: each row is classified, validated
//! (locally first, then against the remote record for updates) and executed
//! against the catalog API. Rows are independent; a failing row is recorded
//! in the outcome and never stops the pass.
//!
//! Processing is sequential on purpose: the error map must follow source row
//! order, and the catalog side rate-limits uncoordinated writes. Each remote
//! call blocks the pass until it returns.

mod types;
mod validate;

pub use types::{Action, Resolution, SheetFlavor, SyncOutcome, PARAM_TYPES};
pub use validate::{immutability_violations, validate_and_classify};

use std::path::Path;

use crate::client::CatalogApi;
use crate::error::{Error, Result};
use crate::report::Reporter;
use crate::sheet::{Sheet, Workbook};

/// Field of the General Information sheet naming the product to reconcile.
const PRODUCT_ID_FIELD: &str = "Product ID";

/// Reconciles one parameter sheet against the remote catalog.
///
/// Call [`open`](Self::open) to load a workbook and sheet, then
/// [`sync`](Self::sync) to run the pass. The reporter only narrates
/// progress; counts and errors are identical with a silent sink.
pub struct ParamsSynchronizer<A: CatalogApi> {
    api: A,
    reporter: Box<dyn Reporter>,
    state: Option<OpenState>,
}

struct OpenState {
    product_id: String,
    flavor: SheetFlavor,
    sheet: Sheet,
}

impl<A: CatalogApi> ParamsSynchronizer<A> {
    #[must_use]
    pub fn new(api: A, reporter: Box<dyn Reporter>) -> Self {
        Self {
            api,
            reporter,
            state: None,
        }
    }

    /// Open a workbook and load the named parameter sheet.
    ///
    /// Reads the `Product ID` field from the General Information sheet; the
    /// whole run is aborted here if the workbook, that field, or the sheet
    /// cannot be read.
    ///
    /// # Errors
    ///
    /// Any source error: missing workbook, unknown sheet name, unreadable
    /// sheet, or a General Information sheet without a product id.
    pub fn open(&mut self, path: impl AsRef<Path>, sheet_name: &str) -> Result<()> {
        let flavor = SheetFlavor::for_sheet(sheet_name).ok_or_else(|| Error::UnsupportedSheet {
            sheet: sheet_name.to_string(),
        })?;
        let workbook = Workbook::open(path)?;
        let product_id = workbook.general_field(PRODUCT_ID_FIELD)?;
        let sheet = workbook.sheet(sheet_name)?;
        tracing::debug!(
            product_id,
            sheet = sheet_name,
            rows = sheet.len(),
            "sheet opened"
        );
        self.state = Some(OpenState {
            product_id,
            flavor,
            sheet,
        });
        Ok(())
    }

    /// The product id read from the open workbook.
    #[must_use]
    pub fn product_id(&self) -> Option<&str> {
        self.state.as_ref().map(|s| s.product_id.as_str())
    }

    /// Run one full pass over the open sheet.
    ///
    /// Every row is processed regardless of earlier failures; the returned
    /// outcome covers all of them.
    ///
    /// # Errors
    ///
    /// Only if no sheet is open. Row-level failures never surface here.
    pub async fn sync(&mut self) -> Result<SyncOutcome> {
        let state = self
            .state
            .as_ref()
            .ok_or_else(|| Error::Other("no sheet open; call open() first".to_string()))?;

        let mut outcome = SyncOutcome::default();
        self.reporter
            .pass_started(state.sheet.name(), &state.product_id, state.sheet.len());

        for (row_number, row) in state.sheet.rows() {
            let disposition = match validate_and_classify(row, state.flavor) {
                Resolution::Skip => {
                    outcome.skipped += 1;
                    "skipped"
                }
                Resolution::Invalid(messages) => {
                    tracing::debug!(row = row_number, ?messages, "row failed validation");
                    outcome.record_errors(row_number, messages);
                    "failed"
                }
                Resolution::Action(Action::Create(payload)) => {
                    match self.api.create_parameter(&state.product_id, &payload).await {
                        Ok(created) => {
                            tracing::debug!(row = row_number, id = %created.id, "parameter created");
                            outcome.created += 1;
                            "created"
                        }
                        Err(e) => {
                            outcome.record_error(row_number, e.to_string());
                            "failed"
                        }
                    }
                }
                Resolution::Action(Action::Update {
                    resource_id,
                    payload,
                }) => match self.api.get_parameter(&state.product_id, &resource_id).await {
                    Err(e) => {
                        outcome.record_error(row_number, e.to_string());
                        "failed"
                    }
                    Ok(remote) => {
                        let violations = immutability_violations(row, &remote);
                        if violations.is_empty() {
                            match self
                                .api
                                .update_parameter(&state.product_id, &resource_id, &payload)
                                .await
                            {
                                Ok(_) => {
                                    outcome.updated += 1;
                                    "updated"
                                }
                                Err(e) => {
                                    outcome.record_error(row_number, e.to_string());
                                    "failed"
                                }
                            }
                        } else {
                            outcome.record_errors(row_number, violations);
                            "failed"
                        }
                    }
                },
                Resolution::Action(Action::Delete { resource_id }) => {
                    match self.api.delete_parameter(&state.product_id, &resource_id).await {
                        Ok(()) => {
                            outcome.deleted += 1;
                            "deleted"
                        }
                        // Already absent: deletion is idempotent.
                        Err(e) if e.is_not_found() => {
                            outcome.deleted += 1;
                            "deleted"
                        }
                        Err(e) => {
                            outcome.record_error(row_number, e.to_string());
                            "failed"
                        }
                    }
                }
            };
            self.reporter.row_processed(row_number, disposition);
        }

        self.reporter.pass_finished(state.sheet.name(), &outcome);
        Ok(outcome)
    }
}
