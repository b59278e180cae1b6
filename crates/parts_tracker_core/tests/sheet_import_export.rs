use parts_tracker_core::sheet::export::EXPORT_HEADERS;
use parts_tracker_core::{
    Cell, Confirmation, GateOutcome, ImportError, MemoryKvStore, Sheet, SheetError,
    TrackerController, TrackerService, Workbook, WorkbookCodec,
};

fn sheet(rows: &[&[&str]]) -> Workbook {
    let mut sheet = Sheet::new("Sheet1");
    for row in rows {
        sheet.push_row(row.iter().map(|value| Cell::from(*value)));
    }
    Workbook::with_sheet(sheet)
}

type Controller<'a> = TrackerController<&'a MemoryKvStore, fn(&Confirmation) -> bool>;

fn confirm_all(_: &Confirmation) -> bool {
    true
}

fn tracker_with_projects(store: &MemoryKvStore) -> Controller<'_> {
    let mut service = TrackerService::open(store).unwrap();
    let old = service
        .create_project("supplier1", "OLD-1", "Legacy part")
        .unwrap()
        .unwrap();
    service.set_project_total(&old, 2).unwrap();
    TrackerController::new(service, confirm_all as fn(&Confirmation) -> bool)
}

fn tuples(controller: &Controller<'_>) -> Vec<(String, String, u32, u32)> {
    controller
        .service()
        .projects_for_supplier("supplier1")
        .into_iter()
        .map(|p| {
            (
                p.project_code.clone(),
                p.project_name.clone(),
                p.total_line_items(),
                p.received(),
            )
        })
        .collect()
}

#[test]
fn import_replaces_existing_projects() {
    let store = MemoryKvStore::new();
    let mut controller = tracker_with_projects(&store);

    let outcome = controller
        .import_workbook(
            "supplier1",
            &sheet(&[
                &["Project Code", "Project Name", "No. of Line items", "Received"],
                &["P1", "Widget", "10", "3"],
            ]),
        )
        .unwrap();

    assert_eq!(outcome, GateOutcome::Applied(1));
    assert_eq!(
        tuples(&controller),
        vec![("P1".to_string(), "Widget".to_string(), 10, 3)]
    );
}

#[test]
fn import_leaves_other_suppliers_alone() {
    let store = MemoryKvStore::new();
    let mut controller = tracker_with_projects(&store);
    let other = controller
        .service_mut()
        .create_supplier("Other")
        .unwrap()
        .unwrap();
    controller
        .service_mut()
        .create_project(&other, "X1", "Keep me")
        .unwrap();

    controller
        .import_workbook(
            "supplier1",
            &sheet(&[&["Project Code", "Project Name"], &["P1", "Widget"]]),
        )
        .unwrap();

    let kept = controller.service().projects_for_supplier(&other);
    assert_eq!(kept.len(), 1);
    assert_eq!(kept[0].project_code, "X1");
}

#[test]
fn import_without_name_column_is_rejected_and_changes_nothing() {
    let store = MemoryKvStore::new();
    let mut controller = tracker_with_projects(&store);
    let before = tuples(&controller);

    let err = controller
        .import_workbook(
            "supplier1",
            &sheet(&[
                &["Project Code", "No. of Line items", "Received"],
                &["P1", "10", "3"],
            ]),
        )
        .unwrap_err();

    assert!(matches!(
        err,
        ImportError::Sheet(SheetError::MissingColumns {
            project_name: true,
            ..
        })
    ));
    assert_eq!(tuples(&controller), before);
}

#[test]
fn empty_workbook_and_unknown_supplier_are_rejected() {
    let store = MemoryKvStore::new();
    let mut controller = tracker_with_projects(&store);

    let err = controller
        .import_workbook("supplier1", &Workbook::default())
        .unwrap_err();
    assert!(matches!(err, ImportError::Sheet(SheetError::EmptyWorkbook)));

    let err = controller
        .import_workbook("missing", &sheet(&[&["Project Code", "Project Name"]]))
        .unwrap_err();
    assert!(matches!(err, ImportError::SupplierNotFound(id) if id == "missing"));
}

#[test]
fn only_first_sheet_is_imported() {
    let store = MemoryKvStore::new();
    let mut controller = tracker_with_projects(&store);
    let mut workbook = sheet(&[&["Project Code", "Project Name"], &["P1", "First"]]);
    let mut second = Sheet::new("Sheet2");
    second.push_row([Cell::from("Project Code"), Cell::from("Project Name")]);
    second.push_row([Cell::from("P2"), Cell::from("Second")]);
    workbook.sheets.push(second);

    controller.import_workbook("supplier1", &workbook).unwrap();

    let codes: Vec<String> = tuples(&controller).into_iter().map(|t| t.0).collect();
    assert_eq!(codes, vec!["P1"]);
}

#[test]
fn export_then_import_round_trips_project_counts() {
    let store = MemoryKvStore::new();
    let mut controller = tracker_with_projects(&store);
    {
        let service = controller.service_mut();
        let a = service.create_project("supplier1", "A-1", "Alpha").unwrap().unwrap();
        let b = service.create_project("supplier1", "B-2", "Beta").unwrap().unwrap();
        service.set_project_total(&a, 12).unwrap();
        service.set_project_received(&a, 5).unwrap();
        service.set_project_total(&b, 3).unwrap();
        service.set_project_received(&b, 3).unwrap();
    }
    let before = tuples(&controller);

    let export = controller.export_workbook("supplier1").unwrap();
    assert_eq!(export.file_name, "Supplier 1_status.xlsx");
    let header: Vec<String> = export.workbook.sheets[0].rows[0]
        .iter()
        .map(Cell::as_text)
        .collect();
    assert_eq!(header, EXPORT_HEADERS);

    let outcome = controller
        .import_workbook("supplier1", &export.workbook)
        .unwrap();

    assert_eq!(outcome, GateOutcome::Applied(3));
    assert_eq!(tuples(&controller), before);
}

#[test]
fn export_for_unknown_supplier_is_none() {
    let store = MemoryKvStore::new();
    let controller = tracker_with_projects(&store);
    assert!(controller.export_workbook("missing").is_none());
}

/// Codec that stores workbooks as JSON, standing in for a binary format.
struct JsonCodec;

impl WorkbookCodec for JsonCodec {
    fn decode(&self, bytes: &[u8]) -> Result<Workbook, SheetError> {
        serde_json::from_slice(bytes).map_err(|err| SheetError::Unreadable(err.to_string()))
    }

    fn encode(&self, workbook: &Workbook) -> Result<Vec<u8>, SheetError> {
        serde_json::to_vec(workbook).map_err(|err| SheetError::Encode(err.to_string()))
    }
}

#[test]
fn bytes_round_trip_through_codec() {
    let store = MemoryKvStore::new();
    let mut controller = tracker_with_projects(&store);
    let before = tuples(&controller);

    let (file_name, bytes) = controller
        .export_bytes("supplier1", &JsonCodec)
        .unwrap()
        .unwrap();
    assert_eq!(file_name, "Supplier 1_status.xlsx");

    let outcome = controller
        .import_bytes("supplier1", &JsonCodec, &bytes)
        .unwrap();
    assert_eq!(outcome, GateOutcome::Applied(1));
    assert_eq!(tuples(&controller), before);
}

#[test]
fn unreadable_bytes_are_rejected() {
    let store = MemoryKvStore::new();
    let mut controller = tracker_with_projects(&store);
    let before = tuples(&controller);

    let err = controller
        .import_bytes("supplier1", &JsonCodec, b"\x00\x01 not a workbook")
        .unwrap_err();

    assert!(matches!(err, ImportError::Sheet(SheetError::Unreadable(_))));
    assert_eq!(tuples(&controller), before);
}
