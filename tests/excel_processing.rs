#![cfg(feature = "excel_test_writer")]

use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use warehouse_ingest::mapping::MappingRegistry;
use warehouse_ingest::processor::FileProcessor;
use warehouse_ingest::report::FileStatus;
use warehouse_ingest::sink::DryRunSink;
use warehouse_ingest::reader::excel::read_excel_rows;

fn tmp_file(name: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    std::env::temp_dir().join(format!("warehouse-ingest-{name}-{nanos}.xlsx"))
}

fn write_contacts_xlsx(path: &PathBuf) {
    use rust_xlsxwriter::Workbook;

    let mut wb = Workbook::new();
    let ws = wb.add_worksheet();
    ws.set_name("Sheet1").unwrap();

    ws.write_string(0, 0, "fname").unwrap();
    ws.write_string(0, 1, "postcode").unwrap();
    ws.write_string(0, 2, "tier").unwrap();

    ws.write_string(1, 0, "Amy").unwrap();
    ws.write_number(1, 1, 2000.0).unwrap();
    ws.write_string(1, 2, "Gold").unwrap();

    ws.write_string(2, 0, "Rory").unwrap();
    ws.write_number(2, 1, 2010.0).unwrap();
    // tier left empty

    wb.save(path).unwrap();
}

#[test]
fn workbook_rows_read_as_string_coerced_maps() {
    let path = tmp_file("read");
    write_contacts_xlsx(&path);

    let rows = read_excel_rows(&path).unwrap();
    assert_eq!(rows.len(), 2);

    let (number, first) = rows[0].as_ref().unwrap();
    assert_eq!(*number, 2);
    assert_eq!(first.get("fname").map(String::as_str), Some("Amy"));
    // Integral floats come back without a trailing `.0`.
    assert_eq!(first.get("postcode").map(String::as_str), Some("2000"));

    let (_, second) = rows[1].as_ref().unwrap();
    assert!(!second.contains_key("tier"));

    std::fs::remove_file(&path).ok();
}

#[test]
fn workbook_processes_like_a_csv() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("contacts.xlsx");
    write_contacts_xlsx(&path);

    let yaml = "contacts.xlsx:\n  columns:\n    fname: FirstName\n    postcode: PostCode\n  attributes:\n    tier: Tier\n  data_source: workbook\n";
    let mapping_path = dir.path().join("mappings.yaml");
    std::fs::write(&mapping_path, yaml).unwrap();
    let registry = MappingRegistry::from_path(&mapping_path).unwrap();

    let processor = FileProcessor::new(&registry, &DryRunSink);
    let outcome = processor.process(&path, "contacts.xlsx");

    assert_eq!(outcome.status, FileStatus::Success);
    assert_eq!(outcome.total_rows, 2);
    assert_eq!(outcome.processed_rows, 2);
}
