use warehouse_ingest::reader::csv::{read_csv_rows, read_csv_rows_from_reader};

#[test]
fn read_csv_from_path_happy_path() {
    let rows = read_csv_rows("tests/fixtures/contacts.csv").unwrap();
    assert_eq!(rows.len(), 3);

    let (number, first) = rows[0].as_ref().unwrap();
    assert_eq!(*number, 2);
    assert_eq!(first.get("fname").map(String::as_str), Some("Amy"));
    assert_eq!(first.get("region").map(String::as_str), Some("APAC"));
}

#[test]
fn headers_are_trimmed() {
    let input = " id , name \n1,Ada\n";
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(input.as_bytes());

    let rows = read_csv_rows_from_reader(&mut rdr).unwrap();
    let (_, row) = rows[0].as_ref().unwrap();
    assert_eq!(row.get("id").map(String::as_str), Some("1"));
    assert_eq!(row.get("name").map(String::as_str), Some("Ada"));
}

#[test]
fn rows_carry_their_source_row_numbers() {
    let input = "id,email\n1,a@example.com\n2,b@example.com\n";
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(input.as_bytes());

    let rows = read_csv_rows_from_reader(&mut rdr).unwrap();
    let numbers: Vec<usize> = rows
        .iter()
        .map(|r| r.as_ref().unwrap().0)
        .collect();
    // The header is row 1, so data starts at row 2.
    assert_eq!(numbers, vec![2, 3]);
}

#[test]
fn ragged_records_become_row_errors_and_reading_continues() {
    let input = "id,email\n1,a@example.com\n2\n3,c@example.com\n";
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(input.as_bytes());

    let rows = read_csv_rows_from_reader(&mut rdr).unwrap();
    assert_eq!(rows.len(), 3);
    assert!(rows[0].is_ok());
    let err = rows[1].as_ref().unwrap_err();
    assert_eq!(err.row, 3);
    // The row after the bad one keeps its own number.
    assert_eq!(rows[2].as_ref().unwrap().0, 4);
}

#[test]
fn missing_file_is_a_file_level_error() {
    let err = read_csv_rows("tests/fixtures/does_not_exist.csv").unwrap_err();
    assert!(err.to_string().contains("csv error") || err.to_string().contains("io error"));
}
