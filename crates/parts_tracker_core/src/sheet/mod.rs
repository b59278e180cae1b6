//! Spreadsheet mapping between projects and a flat table.
//!
//! # Responsibility
//! - Model workbooks as plain rows of cells, independent of the binary format.
//! - Map a supplier's projects to the status report layout and back.
//!
//! # Invariants
//! - Only the first sheet of an imported workbook is read; row 0 is the header.
//! - Header texts and their synonyms are a compatibility surface with files
//!   exported earlier and must not change.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

use crate::model::count::parse_int_prefix;

pub mod export;
pub mod import;

/// Name of the single sheet written by exports.
pub const STATUS_SHEET_NAME: &str = "Status";

/// One spreadsheet cell value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Cell {
    #[default]
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
}

impl Cell {
    /// Text rendering used for code/name columns and header matching.
    pub fn as_text(&self) -> String {
        match self {
            Self::Empty => String::new(),
            Self::Text(text) => text.clone(),
            Self::Number(number) => format_number(*number),
            Self::Bool(flag) => flag.to_string(),
        }
    }

    /// Leading integer of the cell, if any.
    ///
    /// Numbers are truncated toward zero; text is read up to the first
    /// non-digit; empty and boolean cells have no integer value.
    pub fn parse_int(&self) -> Option<i64> {
        match self {
            Self::Text(text) => parse_int_prefix(text),
            Self::Number(number) if number.is_finite() => Some(number.trunc() as i64),
            _ => None,
        }
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for Cell {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<u32> for Cell {
    fn from(value: u32) -> Self {
        Self::Number(f64::from(value))
    }
}

fn format_number(number: f64) -> String {
    if number.is_finite() && number.fract() == 0.0 && number.abs() < 1e15 {
        format!("{}", number as i64)
    } else {
        number.to_string()
    }
}

/// Named grid of cells. Rows may have different lengths.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Sheet {
    pub name: String,
    pub rows: Vec<Vec<Cell>>,
}

impl Sheet {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rows: Vec::new(),
        }
    }

    pub fn push_row(&mut self, row: impl IntoIterator<Item = Cell>) {
        self.rows.push(row.into_iter().collect());
    }
}

/// Ordered collection of sheets.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Workbook {
    pub sheets: Vec<Sheet>,
}

impl Workbook {
    pub fn with_sheet(sheet: Sheet) -> Self {
        Self {
            sheets: vec![sheet],
        }
    }

    pub fn first_sheet(&self) -> Option<&Sheet> {
        self.sheets.first()
    }
}

/// Converts binary workbook files to and from `Workbook`.
///
/// The binary container format lives outside this crate; embedders plug in
/// their own reader/writer.
pub trait WorkbookCodec {
    fn decode(&self, bytes: &[u8]) -> Result<Workbook, SheetError>;
    fn encode(&self, workbook: &Workbook) -> Result<Vec<u8>, SheetError>;
}

/// Structural spreadsheet problems reported to the user. Nothing is imported
/// when one of these occurs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SheetError {
    /// Workbook has no sheets.
    EmptyWorkbook,
    /// First sheet has no rows.
    EmptySheet,
    /// Header row lacks the project code and/or project name column.
    MissingColumns {
        project_code: bool,
        project_name: bool,
    },
    /// Bytes could not be decoded into a workbook.
    Unreadable(String),
    /// Workbook could not be encoded.
    Encode(String),
}

impl Display for SheetError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyWorkbook | Self::EmptySheet => write!(f, "spreadsheet is empty"),
            Self::MissingColumns { .. } => write!(
                f,
                "spreadsheet must have \"Project code\" and \"Project name\" columns"
            ),
            Self::Unreadable(message) => write!(f, "could not read spreadsheet: {message}"),
            Self::Encode(message) => write!(f, "could not write spreadsheet: {message}"),
        }
    }
}

impl Error for SheetError {}

#[cfg(test)]
mod tests {
    use super::Cell;

    #[test]
    fn numbers_render_without_trailing_fraction() {
        assert_eq!(Cell::Number(42.0).as_text(), "42");
        assert_eq!(Cell::Number(2.5).as_text(), "2.5");
        assert_eq!(Cell::Bool(true).as_text(), "true");
        assert_eq!(Cell::Empty.as_text(), "");
    }

    #[test]
    fn parse_int_truncates_numbers_and_reads_text_prefix() {
        assert_eq!(Cell::Number(3.9).parse_int(), Some(3));
        assert_eq!(Cell::from("10 pcs").parse_int(), Some(10));
        assert_eq!(Cell::from("n/a").parse_int(), None);
        assert_eq!(Cell::Empty.parse_int(), None);
        assert_eq!(Cell::Bool(true).parse_int(), None);
    }
}
