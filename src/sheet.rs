//! Spreadsheet access for the agenda importer.
//!
//! The workbook's first sheet holds the agenda in a fixed column layout,
//! with header rows above a configurable data offset. [`SheetSource`] is
//! the seam between the importer and calamine, so tests can drive the
//! importer from in-memory rows.

use std::path::Path;

use calamine::{open_workbook_auto, Data, Range, Reader};
use thiserror::Error;

/// Fixed column layout of the agenda sheet.
pub const COL_DATE: usize = 0;
pub const COL_TIME_START: usize = 1;
pub const COL_TIME_END: usize = 2;
pub const COL_SESSION_TYPE: usize = 3;
pub const COL_TITLE: usize = 4;
pub const COL_LOCATION: usize = 5;
pub const COL_DESCRIPTION: usize = 6;
pub const COL_SPEAKERS: usize = 7;

/// Number of columns the importer reads per row.
pub const COLUMN_COUNT: usize = 8;

/// First data row (0-based) unless overridden; everything above it is
/// header material.
pub const DEFAULT_SKIP_ROWS: usize = 15;

/// Errors that can occur while opening or reading a workbook.
#[derive(Debug, Error)]
pub enum SheetError {
    #[error("Failed to open workbook: {0}")]
    Open(#[from] calamine::Error),

    #[error("Workbook has no sheets")]
    NoSheet,

    #[error("Agenda sheet has {found} columns, expected at least 8")]
    TooFewColumns { found: usize },
}

/// Row/column cell access over an agenda sheet.
pub trait SheetSource {
    /// Total number of rows, header rows included.
    fn row_count(&self) -> usize;

    /// Cell value at (row, col). Empty or absent cells read as `""`.
    fn cell(&self, row: usize, col: usize) -> String;
}

/// The first worksheet of an agenda workbook.
pub struct AgendaSheet {
    range: Range<Data>,
}

impl AgendaSheet {
    /// Open `path` and bind to its first sheet. Fails if the workbook is
    /// unreadable, has no sheets, or is narrower than the agenda layout.
    pub fn open(path: &Path) -> Result<Self, SheetError> {
        let mut workbook = open_workbook_auto(path)?;
        let first_sheet = workbook
            .sheet_names()
            .first()
            .cloned()
            .ok_or(SheetError::NoSheet)?;
        let range = workbook.worksheet_range(&first_sheet)?;

        let found = range.end().map_or(0, |(_, col)| col as usize + 1);
        if found < COLUMN_COUNT {
            return Err(SheetError::TooFewColumns { found });
        }

        Ok(Self { range })
    }
}

impl SheetSource for AgendaSheet {
    fn row_count(&self) -> usize {
        self.range.end().map_or(0, |(row, _)| row as usize + 1)
    }

    fn cell(&self, row: usize, col: usize) -> String {
        self.range
            .get_value((row as u32, col as u32))
            .map_or_else(String::new, cell_to_string)
    }
}

fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Int(n) => n.to_string(),
        Data::Float(f) => format!("{}", f),
        Data::Bool(b) => b.to_string(),
        Data::Error(e) => format!("#ERR({:?})", e),
        Data::DateTime(dt) => format!("{}", dt),
        Data::DateTimeIso(s) => s.clone(),
        Data::DurationIso(s) => s.clone(),
    }
}
