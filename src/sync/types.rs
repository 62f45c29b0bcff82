//! Core types of the synchronization engine.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::model::ParamPayload;

/// Parameter types accepted by the catalog, in reporting order.
pub const PARAM_TYPES: [&str; 12] = [
    "email",
    "address",
    "checkbox",
    "choice",
    "domain",
    "subdomain",
    "url",
    "dropdown",
    "object",
    "password",
    "phone",
    "text",
];

const PHASED_SCOPES: [&str; 3] = ["asset", "tier1", "tier2"];
const CONFIG_SCOPES: [&str; 4] = ["item", "item_marketplace", "marketplace", "product"];

/// The three supported parameter sheets.
///
/// The flavor is fixed for one pass and selects the phase constraint, the
/// allowed scope set, and the wording of the scope/phase error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SheetFlavor {
    Ordering,
    Fulfillment,
    Configuration,
}

impl SheetFlavor {
    /// Every flavor, in the order the `sync` command processes them.
    pub const ALL: [Self; 3] = [Self::Ordering, Self::Fulfillment, Self::Configuration];

    /// Resolve a flavor from its sheet name.
    #[must_use]
    pub fn for_sheet(name: &str) -> Option<Self> {
        match name {
            "Ordering Parameters" => Some(Self::Ordering),
            "Fulfillment Parameters" => Some(Self::Fulfillment),
            "Configuration Parameters" => Some(Self::Configuration),
            _ => None,
        }
    }

    /// The sheet name this flavor governs.
    #[must_use]
    pub const fn sheet_name(self) -> &'static str {
        match self {
            Self::Ordering => "Ordering Parameters",
            Self::Fulfillment => "Fulfillment Parameters",
            Self::Configuration => "Configuration Parameters",
        }
    }

    /// The phase every row of this sheet must declare, if constrained.
    #[must_use]
    pub const fn phase(self) -> Option<&'static str> {
        match self {
            Self::Ordering => Some("ordering"),
            Self::Fulfillment => Some("fulfillment"),
            Self::Configuration => None,
        }
    }

    /// Scopes accepted on this sheet.
    #[must_use]
    pub const fn scopes(self) -> &'static [&'static str] {
        match self {
            Self::Ordering | Self::Fulfillment => &PHASED_SCOPES,
            Self::Configuration => &CONFIG_SCOPES,
        }
    }

    /// Error message for a scope outside the allowed set.
    #[must_use]
    pub fn scope_error(self) -> String {
        match self {
            Self::Ordering | Self::Fulfillment => format!(
                "Only asset, tier1 and tier2 scopes are supported for {}",
                self.sheet_name()
            ),
            Self::Configuration => {
                "Only item, item_marketplace, marketplace and product scopes are supported for \
                 Configuration Parameters"
                    .to_string()
            }
        }
    }
}

/// A concrete action resolved from a valid row.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Create(ParamPayload),
    Update {
        resource_id: String,
        payload: ParamPayload,
    },
    Delete {
        resource_id: String,
    },
}

/// Outcome of classifying and validating one row.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    /// Empty action cell; the row is counted but nothing is executed.
    Skip,
    /// The row passed every local rule and resolves to an action.
    Action(Action),
    /// One or more rule violations; all of them, not just the first.
    Invalid(Vec<String>),
}

/// Aggregate of one synchronization pass.
///
/// Invariant: every processed row increments exactly one counter or appears
/// as a key in `errors`, never both.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SyncOutcome {
    pub skipped: u32,
    pub created: u32,
    pub updated: u32,
    pub deleted: u32,
    /// Row number → error messages, in source row order.
    pub errors: BTreeMap<u32, Vec<String>>,
}

impl SyncOutcome {
    /// Record one error message against a row.
    pub fn record_error(&mut self, row: u32, message: impl Into<String>) {
        self.errors.entry(row).or_default().push(message.into());
    }

    /// Record a batch of messages against a row.
    pub fn record_errors(&mut self, row: u32, messages: Vec<String>) {
        self.errors.entry(row).or_default().extend(messages);
    }

    /// Whether any row failed.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Number of rows that failed.
    #[must_use]
    pub fn failed_rows(&self) -> usize {
        self.errors.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flavor_from_sheet_name() {
        assert_eq!(
            SheetFlavor::for_sheet("Ordering Parameters"),
            Some(SheetFlavor::Ordering)
        );
        assert_eq!(
            SheetFlavor::for_sheet("Configuration Parameters"),
            Some(SheetFlavor::Configuration)
        );
        assert_eq!(SheetFlavor::for_sheet("Items"), None);
    }

    #[test]
    fn test_flavor_scope_sets() {
        assert!(SheetFlavor::Ordering.scopes().contains(&"tier2"));
        assert!(!SheetFlavor::Ordering.scopes().contains(&"marketplace"));
        assert!(SheetFlavor::Configuration.scopes().contains(&"marketplace"));
        assert!(SheetFlavor::Configuration.phase().is_none());
        assert_eq!(SheetFlavor::Fulfillment.phase(), Some("fulfillment"));
    }

    #[test]
    fn test_scope_error_names_the_sheet() {
        assert_eq!(
            SheetFlavor::Fulfillment.scope_error(),
            "Only asset, tier1 and tier2 scopes are supported for Fulfillment Parameters"
        );
    }

    #[test]
    fn test_outcome_error_accumulation() {
        let mut outcome = SyncOutcome::default();
        outcome.record_error(2, "first");
        outcome.record_errors(2, vec!["second".to_string()]);
        outcome.record_error(5, "other row");
        assert_eq!(outcome.failed_rows(), 2);
        assert_eq!(outcome.errors[&2], vec!["first", "second"]);
    }

    #[test]
    fn test_outcome_serializes_errors_keyed_by_row() {
        let mut outcome = SyncOutcome::default();
        outcome.skipped = 1;
        outcome.record_error(2, "boom");
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["skipped"], 1);
        assert_eq!(json["errors"]["2"][0], "boom");
    }
}
