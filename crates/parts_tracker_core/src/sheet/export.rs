//! Status report export.

use crate::model::project::Project;
use crate::sheet::{Cell, Sheet, Workbook, STATUS_SHEET_NAME};
use once_cell::sync::Lazy;
use regex::Regex;

/// Header row written by exports, in column order.
pub const EXPORT_HEADERS: [&str; 5] = [
    "Project Code",
    "Project Name",
    "No. of Line items",
    "Received",
    "Pending",
];

const FALLBACK_FILE_STEM: &str = "Supplier";
const FILE_SUFFIX: &str = "_status.xlsx";

static UNSAFE_FILE_CHARS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^A-Za-z0-9_\s-]").expect("valid file name regex"));

/// Exported report ready to be handed to a workbook codec.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportFile {
    pub file_name: String,
    pub workbook: Workbook,
}

/// Builds the status report for one supplier's projects, keeping their order.
pub fn export_projects<'a>(
    supplier_name: &str,
    projects: impl IntoIterator<Item = &'a Project>,
) -> ExportFile {
    let mut sheet = Sheet::new(STATUS_SHEET_NAME);
    sheet.push_row(EXPORT_HEADERS.iter().copied().map(Cell::from));
    for project in projects {
        sheet.push_row([
            Cell::from(project.project_code.as_str()),
            Cell::from(project.project_name.as_str()),
            Cell::from(project.total_line_items()),
            Cell::from(project.received()),
            Cell::from(project.pending()),
        ]);
    }

    ExportFile {
        file_name: export_file_name(supplier_name),
        workbook: Workbook::with_sheet(sheet),
    }
}

/// `<supplier name>_status.xlsx`, with characters outside letters, digits,
/// `_`, `-` and whitespace removed from the name.
pub fn export_file_name(supplier_name: &str) -> String {
    let stem = UNSAFE_FILE_CHARS_RE.replace_all(supplier_name, "");
    let stem = if stem.is_empty() {
        FALLBACK_FILE_STEM
    } else {
        stem.as_ref()
    };
    format!("{stem}{FILE_SUFFIX}")
}

#[cfg(test)]
mod tests {
    use super::{export_file_name, export_projects, EXPORT_HEADERS};
    use crate::model::project::Project;
    use crate::sheet::Cell;

    #[test]
    fn file_name_strips_unsafe_characters() {
        assert_eq!(export_file_name("Acme & Sons, Ltd."), "Acme  Sons Ltd_status.xlsx");
        assert_eq!(export_file_name("north_east-2"), "north_east-2_status.xlsx");
    }

    #[test]
    fn file_name_falls_back_when_nothing_remains() {
        assert_eq!(export_file_name("&&&"), "Supplier_status.xlsx");
        assert_eq!(export_file_name(""), "Supplier_status.xlsx");
    }

    #[test]
    fn export_writes_header_and_pending_column() {
        let projects = [
            Project::with_counts("a", "s", "P1", "Widget", 10, 3),
            Project::with_counts("b", "s", "P2", "Gadget", 2, 2),
        ];
        let file = export_projects("Acme", &projects);

        let sheet = file.workbook.first_sheet().unwrap();
        assert_eq!(sheet.name, "Status");
        assert_eq!(sheet.rows.len(), 3);
        let header: Vec<String> = sheet.rows[0].iter().map(Cell::as_text).collect();
        assert_eq!(header, EXPORT_HEADERS);
        assert_eq!(
            sheet.rows[1],
            vec![
                Cell::from("P1"),
                Cell::from("Widget"),
                Cell::Number(10.0),
                Cell::Number(3.0),
                Cell::Number(7.0),
            ]
        );
        assert_eq!(sheet.rows[2][4], Cell::Number(0.0));
    }
}
