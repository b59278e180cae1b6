//! Status report import.
//!
//! # Responsibility
//! - Locate the code/name/count columns in a header row.
//! - Turn data rows into project drafts without touching tracker state.
//!
//! # Invariants
//! - A sheet without code and name columns is rejected as a whole.
//! - Every draft satisfies `received <= total_line_items`.
//! - A total is reconstructed from `received + pending` only when the total
//!   cell is not numeric and a pending column exists.

use crate::model::count::{Count, LenientCount};
use crate::sheet::{Cell, Sheet, SheetError, Workbook};
use once_cell::sync::Lazy;
use regex::Regex;

/// Substituted for a blank code or name in an otherwise populated row.
pub const IMPORT_PLACEHOLDER: &str = "Imported";

static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid ws regex"));

const CODE_HEADERS: [&str; 2] = ["project code", "projectcode"];
const NAME_HEADERS: [&str; 2] = ["project name", "projectname"];
const TOTAL_HEADERS: [&str; 3] = ["no. of line items", "no of line items", "line items"];
const RECEIVED_HEADER: &str = "received";
const PENDING_HEADER: &str = "pending";

/// Project fields read from one data row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectDraft {
    pub project_code: String,
    pub project_name: String,
    pub total_line_items: Count,
    pub received: Count,
}

/// Validated import, ready to replace a supplier's projects.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportPlan {
    pub drafts: Vec<ProjectDraft>,
    /// Data rows with neither code nor name.
    pub skipped_rows: usize,
}

/// Column positions resolved from the header row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ColumnMap {
    code: usize,
    name: usize,
    total: Option<usize>,
    received: Option<usize>,
    pending: Option<usize>,
}

impl ColumnMap {
    fn resolve(header_row: &[Cell]) -> Result<Self, SheetError> {
        let headers: Vec<String> = header_row
            .iter()
            .map(|cell| cell.as_text().to_lowercase().trim().to_string())
            .collect();

        let code = find_any_column(&headers, &CODE_HEADERS);
        let name = find_any_column(&headers, &NAME_HEADERS);
        let (Some(code), Some(name)) = (code, name) else {
            return Err(SheetError::MissingColumns {
                project_code: code.is_none(),
                project_name: name.is_none(),
            });
        };

        Ok(Self {
            code,
            name,
            total: find_any_column(&headers, &TOTAL_HEADERS),
            received: find_column(&headers, RECEIVED_HEADER),
            pending: find_column(&headers, PENDING_HEADER),
        })
    }

    fn draft(&self, row: &[Cell]) -> Option<ProjectDraft> {
        let code = cell_at(row, Some(self.code)).as_text().trim().to_string();
        let name = cell_at(row, Some(self.name)).as_text().trim().to_string();
        if code.is_empty() && name.is_empty() {
            return None;
        }

        let received = cell_at(row, self.received).parse_int().unwrap_or(0);
        let mut total = cell_at(row, self.total).parse_int();
        if total.is_none() && self.pending.is_some() {
            total = cell_at(row, self.pending)
                .parse_int()
                .map(|pending| received.saturating_add(pending));
        }

        let total_line_items = total.unwrap_or(0).to_count();
        Some(ProjectDraft {
            project_code: or_placeholder(code),
            project_name: or_placeholder(name),
            total_line_items,
            received: received.to_count().min(total_line_items),
        })
    }
}

/// Reads the first sheet of `workbook` into an import plan.
pub fn plan_import(workbook: &Workbook) -> Result<ImportPlan, SheetError> {
    let sheet = workbook.first_sheet().ok_or(SheetError::EmptyWorkbook)?;
    plan_sheet_import(sheet)
}

/// Reads one sheet (row 0 is the header) into an import plan.
pub fn plan_sheet_import(sheet: &Sheet) -> Result<ImportPlan, SheetError> {
    let (header, data) = sheet.rows.split_first().ok_or(SheetError::EmptySheet)?;
    let columns = ColumnMap::resolve(header)?;

    let mut plan = ImportPlan::default();
    for row in data {
        match columns.draft(row) {
            Some(draft) => plan.drafts.push(draft),
            None => plan.skipped_rows += 1,
        }
    }
    Ok(plan)
}

/// Finds the first matching column for any of `names`, tried in order.
fn find_any_column(headers: &[String], names: &[&str]) -> Option<usize> {
    names.iter().find_map(|name| find_column(headers, name))
}

/// Exact header match first, then the first header containing the name with
/// dots dropped and whitespace collapsed.
fn find_column(headers: &[String], name: &str) -> Option<usize> {
    if let Some(index) = headers.iter().position(|header| header == name) {
        return Some(index);
    }
    let loose = collapse_whitespace(&name.replace('.', ""));
    headers
        .iter()
        .position(|header| collapse_whitespace(header).contains(&loose))
}

fn collapse_whitespace(text: &str) -> String {
    WHITESPACE_RE.replace_all(text, " ").into_owned()
}

fn cell_at(row: &[Cell], index: Option<usize>) -> &Cell {
    static EMPTY: Cell = Cell::Empty;
    index.and_then(|index| row.get(index)).unwrap_or(&EMPTY)
}

fn or_placeholder(value: String) -> String {
    if value.is_empty() {
        IMPORT_PLACEHOLDER.to_string()
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::{find_column, plan_sheet_import, ProjectDraft};
    use crate::sheet::{Cell, Sheet, SheetError};

    fn sheet(rows: &[&[&str]]) -> Sheet {
        let mut sheet = Sheet::new("Sheet1");
        for row in rows {
            sheet.push_row(row.iter().map(|value| Cell::from(*value)));
        }
        sheet
    }

    fn draft(code: &str, name: &str, total: u32, received: u32) -> ProjectDraft {
        ProjectDraft {
            project_code: code.to_string(),
            project_name: name.to_string(),
            total_line_items: total,
            received,
        }
    }

    #[test]
    fn header_lookup_prefers_exact_match_then_loose_contains() {
        let headers: Vec<String> = ["project code", "no  of   line items", "received qty"]
            .iter()
            .map(|h| h.to_string())
            .collect();
        assert_eq!(find_column(&headers, "project code"), Some(0));
        assert_eq!(find_column(&headers, "no. of line items"), Some(1));
        assert_eq!(find_column(&headers, "received"), Some(2));
        assert_eq!(find_column(&headers, "pending"), None);
    }

    #[test]
    fn headers_are_case_and_space_insensitive() {
        let plan = plan_sheet_import(&sheet(&[
            &["  PROJECT CODE ", "Project   Name", "Line Items", "RECEIVED"],
            &["P1", "Widget", "8", "2"],
        ]))
        .unwrap();
        assert_eq!(plan.drafts, vec![draft("P1", "Widget", 8, 2)]);
    }

    #[test]
    fn missing_name_column_is_rejected() {
        let err = plan_sheet_import(&sheet(&[&["Project Code", "Received"], &["P1", "1"]]))
            .unwrap_err();
        assert_eq!(
            err,
            SheetError::MissingColumns {
                project_code: false,
                project_name: true
            }
        );
    }

    #[test]
    fn empty_sheet_is_rejected() {
        assert_eq!(
            plan_sheet_import(&Sheet::new("Sheet1")).unwrap_err(),
            SheetError::EmptySheet
        );
    }

    #[test]
    fn total_is_rebuilt_from_pending_when_not_numeric() {
        let plan = plan_sheet_import(&sheet(&[
            &["Project Code", "Project Name", "No. of Line items", "Received", "Pending"],
            &["P1", "Widget", "", "3", "4"],
            &["P2", "Gadget", "n/a", "1", ""],
        ]))
        .unwrap();
        assert_eq!(
            plan.drafts,
            vec![draft("P1", "Widget", 7, 3), draft("P2", "Gadget", 0, 0)]
        );
    }

    #[test]
    fn total_without_received_or_pending_defaults_received_to_zero() {
        let plan = plan_sheet_import(&sheet(&[
            &["Project Code", "Project Name", "No. of Line items"],
            &["P1", "Widget", "6"],
        ]))
        .unwrap();
        assert_eq!(plan.drafts, vec![draft("P1", "Widget", 6, 0)]);
    }

    #[test]
    fn blank_rows_are_skipped_and_partial_rows_get_placeholders() {
        let plan = plan_sheet_import(&sheet(&[
            &["Project Code", "Project Name", "No. of Line items", "Received"],
            &["", " ", "5", "1"],
            &["P1", "", "5", "9"],
            &["", "Gadget"],
        ]))
        .unwrap();
        assert_eq!(plan.skipped_rows, 1);
        assert_eq!(
            plan.drafts,
            vec![draft("P1", "Imported", 5, 5), draft("Imported", "Gadget", 0, 0)]
        );
    }

    #[test]
    fn numeric_cells_are_read_as_numbers_and_text() {
        let mut sheet = sheet(&[&["Project Code", "Project Name", "No. of Line items", "Received"]]);
        sheet.push_row([
            Cell::Number(1001.0),
            Cell::from("Bolt"),
            Cell::Number(12.0),
            Cell::Number(-4.0),
        ]);
        let plan = plan_sheet_import(&sheet).unwrap();
        assert_eq!(plan.drafts, vec![draft("1001", "Bolt", 12, 0)]);
    }
}
