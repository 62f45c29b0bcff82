//! Error types for paramsync.
//!
//! Provides structured error handling with:
//! - Machine-readable error codes (`ErrorCode`)
//! - Category-based exit codes (2=source, 3=config, 4=remote, etc.)
//! - Context-aware recovery hints
//! - Structured JSON output for piped / non-TTY consumers
//!
//! Only run-fatal conditions surface here. Row-scoped failures (validation
//! and per-row remote errors) are collected into the sync outcome and never
//! abort the process; see [`crate::sync`].

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for paramsync operations.
pub type Result<T> = std::result::Result<T, Error>;

// ── Error Code ────────────────────────────────────────────────

/// Machine-readable error codes grouped by category.
///
/// Each code maps to a SCREAMING_SNAKE string and a category-based
/// exit code. Agents match on the string; shell scripts on the exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    // Source (exit 2)
    WorkbookNotFound,
    SheetNotFound,
    SourceError,

    // Sync completed with row failures (exit 4)
    SyncFailed,

    // Config (exit 3)
    MissingEndpoint,
    MissingApiKey,
    ConfigError,

    // Remote (exit 4)
    RemoteError,

    // I/O (exit 5)
    IoError,

    // JSON (exit 6)
    JsonError,

    // Internal (exit 1)
    InternalError,
}

impl ErrorCode {
    /// Machine-readable SCREAMING_SNAKE code string.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        match self {
            Self::WorkbookNotFound => "WORKBOOK_NOT_FOUND",
            Self::SheetNotFound => "SHEET_NOT_FOUND",
            Self::SourceError => "SOURCE_ERROR",
            Self::SyncFailed => "SYNC_FAILED",
            Self::MissingEndpoint => "MISSING_ENDPOINT",
            Self::MissingApiKey => "MISSING_API_KEY",
            Self::ConfigError => "CONFIG_ERROR",
            Self::RemoteError => "REMOTE_ERROR",
            Self::IoError => "IO_ERROR",
            Self::JsonError => "JSON_ERROR",
            Self::InternalError => "INTERNAL_ERROR",
        }
    }

    /// Category-based exit code (1-6).
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::InternalError => 1,
            Self::WorkbookNotFound | Self::SheetNotFound | Self::SourceError => 2,
            Self::MissingEndpoint | Self::MissingApiKey | Self::ConfigError => 3,
            Self::RemoteError | Self::SyncFailed => 4,
            Self::IoError => 5,
            Self::JsonError => 6,
        }
    }
}

// ── Error Enum ────────────────────────────────────────────────

/// Errors that abort a paramsync run.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Workbook not found: {path}")]
    WorkbookNotFound { path: PathBuf },

    #[error("Sheet not found in {workbook}: {sheet}")]
    SheetNotFound { workbook: PathBuf, sheet: String },

    #[error("Cannot read sheet {sheet}: {message}")]
    SheetUnreadable { sheet: String, message: String },

    #[error("{sheet} is not a parameter sheet")]
    UnsupportedSheet { sheet: String },

    #[error("Synchronization failed for {rows} row(s)")]
    RowFailures { rows: usize },

    #[error("Missing field in General Information sheet: {field}")]
    MissingGeneralField { field: String },

    #[error("Catalog API endpoint is not configured")]
    MissingEndpoint,

    #[error("Catalog API key is not configured")]
    MissingApiKey,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Catalog API error: {0}")]
    Remote(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Map this error to its structured `ErrorCode`.
    #[must_use]
    pub const fn error_code(&self) -> ErrorCode {
        match self {
            Self::WorkbookNotFound { .. } => ErrorCode::WorkbookNotFound,
            Self::SheetNotFound { .. } => ErrorCode::SheetNotFound,
            Self::SheetUnreadable { .. }
            | Self::UnsupportedSheet { .. }
            | Self::MissingGeneralField { .. } => ErrorCode::SourceError,
            Self::RowFailures { .. } => ErrorCode::SyncFailed,
            Self::MissingEndpoint => ErrorCode::MissingEndpoint,
            Self::MissingApiKey => ErrorCode::MissingApiKey,
            Self::Config(_) => ErrorCode::ConfigError,
            Self::Remote(_) => ErrorCode::RemoteError,
            Self::Io(_) => ErrorCode::IoError,
            Self::Json(_) => ErrorCode::JsonError,
            Self::Other(_) => ErrorCode::InternalError,
        }
    }

    /// Category-based exit code, delegating to the `ErrorCode`.
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        self.error_code().exit_code()
    }

    /// Context-aware recovery hint for agents and humans.
    ///
    /// Returns `None` if no actionable suggestion exists.
    #[must_use]
    pub fn hint(&self) -> Option<String> {
        match self {
            Self::WorkbookNotFound { path } => Some(format!(
                "No workbook directory at {}. Pass the directory that holds the parameter sheets.",
                path.display()
            )),

            Self::SheetNotFound { workbook, sheet } => Some(format!(
                "Expected {}/{sheet}.csv. Check the sheet name or list the workbook contents.",
                workbook.display()
            )),

            Self::MissingGeneralField { field } => Some(format!(
                "Add a `{field}` row to the General Information sheet."
            )),

            Self::UnsupportedSheet { .. } => Some(
                "Parameter sheets are Ordering Parameters, Fulfillment Parameters and \
                 Configuration Parameters."
                    .to_string(),
            ),

            Self::RowFailures { .. } => Some(
                "Inspect the per-row error table, fix the workbook rows and re-run.".to_string(),
            ),

            Self::MissingEndpoint => Some(
                "Set --endpoint, PARAMSYNC_ENDPOINT, or `endpoint` in ~/.paramsync/config.json"
                    .to_string(),
            ),

            Self::MissingApiKey => Some(
                "Set --api-key, PARAMSYNC_API_KEY, or `api_key` in ~/.paramsync/config.json"
                    .to_string(),
            ),

            Self::SheetUnreadable { .. }
            | Self::Config(_)
            | Self::Remote(_)
            | Self::Io(_)
            | Self::Json(_)
            | Self::Other(_) => None,
        }
    }

    /// Structured JSON representation for machine consumption.
    ///
    /// Includes error code, message, exit code, and optional recovery hint.
    #[must_use]
    pub fn to_structured_json(&self) -> serde_json::Value {
        let code = self.error_code();
        let mut obj = serde_json::json!({
            "error": {
                "code": code.as_str(),
                "message": self.to_string(),
                "exit_code": code.exit_code(),
            }
        });

        if let Some(hint) = self.hint() {
            obj["error"]["hint"] = serde_json::Value::String(hint);
        }

        obj
    }
}
