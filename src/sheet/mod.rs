//! Tabular workbook reader.
//!
//! A workbook is a directory holding one CSV file per sheet
//! (`<Sheet Name>.csv`). Row 1 of every sheet is the header; data rows are
//! numbered from 2, matching what a spreadsheet user sees, and that number
//! is the stable key for error reporting.
//!
//! The reader maps fixed column positions into a typed [`Row`] once; nothing
//! downstream ever touches raw cell coordinates. Rows whose every cell is
//! blank are dropped here (they keep their row number but are never handed
//! to the validator).

use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Column order of a parameter sheet. Position is significant; the header
/// text is only written for humans.
pub const PARAM_COLUMNS: [&str; 12] = [
    "Verbose ID",
    "ID",
    "Action",
    "Title",
    "Description",
    "Phase",
    "Scope",
    "Type",
    "Required",
    "Unique",
    "Hidden",
    "JSON Properties",
];

/// Sheet holding per-product metadata as (field, value) pairs.
pub const GENERAL_INFO_SHEET: &str = "General Information";

/// One data row of a parameter sheet, keyed by column role.
///
/// Every cell is stored trimmed; an empty string means the cell was blank.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Row {
    /// Remote identifier (`PRM-…`); required for update/delete.
    pub resource_id: String,
    /// Local slug identifier; required for create/update.
    pub local_key: String,
    /// `create` | `update` | `delete` | empty (= skip).
    pub action: String,
    pub title: String,
    pub description: String,
    /// `ordering` | `fulfillment`; only constrained on phased sheets.
    pub phase: String,
    pub scope: String,
    pub param_type: String,
    /// Tri-state cell: `True`, `-`, or blank.
    pub required: String,
    /// Tri-state cell: `True`, `-`, or blank.
    pub unique: String,
    /// Tri-state cell: `True`, `-`, or blank.
    pub hidden: String,
    /// Optional JSON object with extra constraints.
    pub constraints: String,
}

impl Row {
    /// Build a row from raw cells in column order. Missing trailing cells
    /// read as empty.
    fn from_record(record: &csv::StringRecord) -> Self {
        let cell = |i: usize| record.get(i).unwrap_or("").trim().to_string();
        Self {
            resource_id: cell(0),
            local_key: cell(1),
            action: cell(2),
            title: cell(3),
            description: cell(4),
            phase: cell(5),
            scope: cell(6),
            param_type: cell(7),
            required: cell(8),
            unique: cell(9),
            hidden: cell(10),
            constraints: cell(11),
        }
    }

    /// True when every cell is blank; such rows are skipped silently.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.resource_id.is_empty()
            && self.local_key.is_empty()
            && self.action.is_empty()
            && self.title.is_empty()
            && self.description.is_empty()
            && self.phase.is_empty()
            && self.scope.is_empty()
            && self.param_type.is_empty()
            && self.required.is_empty()
            && self.unique.is_empty()
            && self.hidden.is_empty()
            && self.constraints.is_empty()
    }
}

/// A workbook directory.
#[derive(Debug, Clone)]
pub struct Workbook {
    path: PathBuf,
}

impl Workbook {
    /// Open a workbook directory.
    ///
    /// # Errors
    ///
    /// Returns [`Error::WorkbookNotFound`] if `path` does not exist or is
    /// not a directory.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.is_dir() {
            return Err(Error::WorkbookNotFound {
                path: path.to_path_buf(),
            });
        }
        Ok(Self {
            path: path.to_path_buf(),
        })
    }

    /// The workbook directory.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the named sheet exists in this workbook.
    #[must_use]
    pub fn has_sheet(&self, name: &str) -> bool {
        self.sheet_path(name).is_file()
    }

    /// Load a named parameter sheet.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SheetNotFound`] if `<name>.csv` is missing, or
    /// [`Error::SheetUnreadable`] if the CSV cannot be parsed.
    pub fn sheet(&self, name: &str) -> Result<Sheet> {
        let path = self.sheet_path(name);
        if !path.is_file() {
            return Err(Error::SheetNotFound {
                workbook: self.path.clone(),
                sheet: name.to_string(),
            });
        }

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_path(&path)
            .map_err(|e| Error::SheetUnreadable {
                sheet: name.to_string(),
                message: e.to_string(),
            })?;

        let mut rows = Vec::new();
        for (index, record) in reader.records().enumerate() {
            let record = record.map_err(|e| Error::SheetUnreadable {
                sheet: name.to_string(),
                message: e.to_string(),
            })?;

            // Row 1 is the header.
            if index == 0 {
                continue;
            }

            let row_number = u32::try_from(index).unwrap_or(u32::MAX).saturating_add(1);
            let row = Row::from_record(&record);
            if row.is_blank() {
                tracing::debug!(row = row_number, "skipping blank row");
                continue;
            }
            rows.push((row_number, row));
        }

        Ok(Sheet {
            name: name.to_string(),
            rows,
        })
    }

    /// Read one field value from the General Information sheet.
    ///
    /// The sheet holds (field, value) pairs, one per row; lookup is by
    /// exact field name.
    ///
    /// # Errors
    ///
    /// Returns a source error if the sheet is missing or the field is not
    /// present.
    pub fn general_field(&self, field: &str) -> Result<String> {
        let path = self.sheet_path(GENERAL_INFO_SHEET);
        if !path.is_file() {
            return Err(Error::SheetNotFound {
                workbook: self.path.clone(),
                sheet: GENERAL_INFO_SHEET.to_string(),
            });
        }

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_path(&path)
            .map_err(|e| Error::SheetUnreadable {
                sheet: GENERAL_INFO_SHEET.to_string(),
                message: e.to_string(),
            })?;

        for record in reader.records() {
            let record = record.map_err(|e| Error::SheetUnreadable {
                sheet: GENERAL_INFO_SHEET.to_string(),
                message: e.to_string(),
            })?;
            let key = record.get(0).unwrap_or("").trim();
            if key == field {
                let value = record.get(1).unwrap_or("").trim();
                if !value.is_empty() {
                    return Ok(value.to_string());
                }
            }
        }

        Err(Error::MissingGeneralField {
            field: field.to_string(),
        })
    }

    fn sheet_path(&self, name: &str) -> PathBuf {
        self.path.join(format!("{name}.csv"))
    }
}

/// A loaded sheet: ordered `(row_number, Row)` pairs starting at row 2.
#[derive(Debug, Clone)]
pub struct Sheet {
    name: String,
    rows: Vec<(u32, Row)>,
}

impl Sheet {
    /// Sheet name (without the `.csv` suffix).
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Iterate data rows in ascending row-number order.
    ///
    /// The iteration is restartable; the sheet is fully loaded at open time.
    pub fn rows(&self) -> impl Iterator<Item = (u32, &Row)> {
        self.rows.iter().map(|(n, row)| (*n, row))
    }

    /// Number of non-blank data rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// True when the sheet has no data rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_sheet(dir: &Path, name: &str, lines: &[&str]) {
        let mut content = PARAM_COLUMNS.join(",");
        content.push('\n');
        for line in lines {
            content.push_str(line);
            content.push('\n');
        }
        fs::write(dir.join(format!("{name}.csv")), content).unwrap();
    }

    #[test]
    fn test_open_missing_workbook() {
        let err = Workbook::open("/definitely/not/here").unwrap_err();
        assert!(matches!(err, Error::WorkbookNotFound { .. }));
    }

    #[test]
    fn test_missing_sheet() {
        let dir = TempDir::new().unwrap();
        let wb = Workbook::open(dir.path()).unwrap();
        let err = wb.sheet("Ordering Parameters").unwrap_err();
        assert!(matches!(err, Error::SheetNotFound { .. }));
    }

    #[test]
    fn test_rows_numbered_from_two() {
        let dir = TempDir::new().unwrap();
        write_sheet(
            dir.path(),
            "Ordering Parameters",
            &[
                "PRM-1,color,update,Color,Pick one,ordering,asset,text,True,-,-,",
                "PRM-2,size,delete,Size,,ordering,asset,text,-,-,-,",
            ],
        );

        let wb = Workbook::open(dir.path()).unwrap();
        let sheet = wb.sheet("Ordering Parameters").unwrap();
        let rows: Vec<_> = sheet.rows().collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].0, 2);
        assert_eq!(rows[0].1.local_key, "color");
        assert_eq!(rows[1].0, 3);
        assert_eq!(rows[1].1.action, "delete");
    }

    #[test]
    fn test_blank_rows_are_dropped_but_keep_numbering() {
        let dir = TempDir::new().unwrap();
        write_sheet(
            dir.path(),
            "Ordering Parameters",
            &[
                ",,,,,,,,,,,",
                "PRM-9,tier,create,Tier,,ordering,tier1,text,-,-,-,",
            ],
        );

        let wb = Workbook::open(dir.path()).unwrap();
        let sheet = wb.sheet("Ordering Parameters").unwrap();
        let rows: Vec<_> = sheet.rows().collect();
        // Row 2 was blank; the surviving row is still row 3.
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].0, 3);
    }

    #[test]
    fn test_short_records_read_as_empty_cells() {
        let dir = TempDir::new().unwrap();
        write_sheet(dir.path(), "Ordering Parameters", &["PRM-1,color,update"]);

        let wb = Workbook::open(dir.path()).unwrap();
        let sheet = wb.sheet("Ordering Parameters").unwrap();
        let (_, row) = sheet.rows().next().unwrap();
        assert_eq!(row.action, "update");
        assert_eq!(row.constraints, "");
    }

    #[test]
    fn test_rows_iteration_is_restartable() {
        let dir = TempDir::new().unwrap();
        write_sheet(
            dir.path(),
            "Ordering Parameters",
            &["PRM-1,color,update,,,,,,,,,"],
        );

        let wb = Workbook::open(dir.path()).unwrap();
        let sheet = wb.sheet("Ordering Parameters").unwrap();
        assert_eq!(sheet.rows().count(), 1);
        assert_eq!(sheet.rows().count(), 1);
    }

    #[test]
    fn test_general_field() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("General Information.csv"),
            "Field,Value\nProduct Name,Widgets\nProduct ID,PRD-276-377-545\n",
        )
        .unwrap();

        let wb = Workbook::open(dir.path()).unwrap();
        assert_eq!(
            wb.general_field("Product ID").unwrap(),
            "PRD-276-377-545"
        );
        let err = wb.general_field("Account ID").unwrap_err();
        assert!(matches!(err, Error::MissingGeneralField { .. }));
    }
}
