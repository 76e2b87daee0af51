//! Integration tests for timeline export.

use accordion_core::export::{
    Cell, CsvTableWriter, DEFAULT_DATE_FORMAT, DEFAULT_EXPORT_FILE, ExportError, HEADER,
    SHEET_NAME, XlsxTableWriter, export_timeline,
};
use accordion_test_utils::{
    MemoryTableWriter, date, full_page, homepage_takeover, store,
};

#[test]
fn row_count_matches_scheduled_tasks() {
    let mut store = store();
    let a = store.add_asset(full_page());
    let b = store.add_asset(homepage_takeover());
    store.add_asset(full_page());
    store.set_anchor_date(a, Some(date(2026, 10, 19)));
    store.set_anchor_date(b, Some(date(2026, 10, 26)));
    let state = store.generate_schedule();

    let mut writer = MemoryTableWriter::default();
    let rows = export_timeline(&state.selected_assets, DEFAULT_DATE_FORMAT, &mut writer).unwrap();
    assert_eq!(rows, state.task_count());
    assert_eq!(rows, 8);

    let (sheet, table) = writer.only();
    assert_eq!(sheet, SHEET_NAME);
    assert_eq!(table.header, HEADER);
    assert_eq!(table.row_count(), 9);
    assert_eq!(table.rows[4][0], Cell::from("Homepage Takeover"));
    assert_eq!(table.rows[4][1], Cell::from("MailOnline"));
}

#[test]
fn empty_campaign_exports_header_only() {
    let mut writer = MemoryTableWriter::default();
    let rows = export_timeline(&[], DEFAULT_DATE_FORMAT, &mut writer).unwrap();
    assert_eq!(rows, 0);
    assert_eq!(writer.only().1.row_count(), 1);
}

#[test]
fn invalid_date_format_writes_nothing() {
    let mut writer = MemoryTableWriter::default();
    let err = export_timeline(&[], "%Q", &mut writer).unwrap_err();
    assert!(matches!(err, ExportError::InvalidDateFormat(_)), "got: {err}");
    assert!(writer.written.is_empty());
}

#[test]
fn xlsx_file_is_written() {
    let mut store = store();
    let a = store.add_asset(full_page());
    store.set_anchor_date(a, Some(date(2026, 10, 19)));
    store.generate_schedule();

    let tmp = tempfile::TempDir::new().unwrap();
    let path = tmp.path().join(DEFAULT_EXPORT_FILE);
    let mut writer = XlsxTableWriter::new(&path);
    let rows = export_timeline(&store.state().selected_assets, DEFAULT_DATE_FORMAT, &mut writer)
        .unwrap();

    assert_eq!(rows, 4);
    let bytes = std::fs::read(&path).unwrap();
    assert!(bytes.starts_with(b"PK"));
}

#[test]
fn csv_output_uses_short_dates() {
    let mut store = store();
    let a = store.add_asset(full_page());
    store.set_anchor_date(a, Some(date(2026, 10, 19)));
    store.generate_schedule();

    let mut writer = CsvTableWriter::new(Vec::new());
    export_timeline(&store.state().selected_assets, DEFAULT_DATE_FORMAT, &mut writer).unwrap();

    let out = String::from_utf8(writer.into_inner()).unwrap();
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines.len(), 5);
    assert_eq!(
        lines[1],
        "Full Page,Daily Mail,Brief & Asset Approval,Client,10/19/2026,10/21/2026,3"
    );
    assert_eq!(
        lines[4],
        "Full Page,Daily Mail,Publishing & Go-Live,MMM,10/29/2026,10/29/2026,1"
    );
}
