//! Filesystem-backed tests for the CSV workbook source.

use std::fs;

use tempfile::TempDir;

use rowsync_ingest::CsvWorkbookSource;
use rowsync_model::{RangeRef, SourceError, TableSource};

fn workbook(files: &[(&str, &str)]) -> (TempDir, CsvWorkbookSource) {
    let dir = TempDir::new().unwrap();
    for (name, contents) in files {
        fs::write(dir.path().join(format!("{name}.csv")), contents).unwrap();
    }
    let source = CsvWorkbookSource::new(dir.path());
    (dir, source)
}

const EXPENSE_SHEET: &str = "\
Date,Cat,Amount
01/03/2022,Food,12.50
11/04/2022,Travel,80.00
01/01/2022,Food,7.25
";

#[test]
fn reads_a_whole_sheet_with_the_first_row_as_header() {
    let (_dir, source) = workbook(&[("Expense", EXPENSE_SHEET)]);
    let table = source.read_range(&RangeRef::sheet("Expense")).unwrap();
    assert_eq!(table.headers(), ["Date", "Cat", "Amount"]);
    assert_eq!(table.row_count(), 3);
    let record = table.record(1).unwrap();
    assert_eq!(record.get("Cat"), Some("Travel"));
}

#[test]
fn reads_a_column_bounded_range() {
    let (_dir, source) = workbook(&[("Expense", EXPENSE_SHEET)]);
    let range: RangeRef = "Expense!A:B".parse().unwrap();
    let table = source.read_range(&range).unwrap();
    assert_eq!(table.headers(), ["Date", "Cat"]);
    assert_eq!(table.record(0).unwrap().get("Amount"), None);
}

#[test]
fn reads_a_row_bounded_range_whose_first_row_is_the_header() {
    let (_dir, source) = workbook(&[("Expense", EXPENSE_SHEET)]);
    // Rows 2-3 of the sheet: the range's header is the first data row.
    let range: RangeRef = "Expense!A2:C3".parse().unwrap();
    let table = source.read_range(&range).unwrap();
    assert_eq!(table.headers(), ["01/03/2022", "Food", "12.50"]);
    assert_eq!(table.row_count(), 1);
}

#[test]
fn missing_sheet_is_its_own_error() {
    let (_dir, source) = workbook(&[("Expense", EXPENSE_SHEET)]);
    let error = source.read_range(&RangeRef::sheet("Nope")).unwrap_err();
    assert!(matches!(error, SourceError::SheetNotFound { .. }));
}

#[test]
fn an_empty_file_reads_as_an_empty_range() {
    let (_dir, source) = workbook(&[("Blank", "")]);
    let error = source.read_range(&RangeRef::sheet("Blank")).unwrap_err();
    assert!(error.is_empty_range());
}

#[test]
fn a_range_past_the_last_row_is_empty_too() {
    let (_dir, source) = workbook(&[("Expense", EXPENSE_SHEET)]);
    let range: RangeRef = "Expense!A100:C200".parse().unwrap();
    let error = source.read_range(&range).unwrap_err();
    assert!(error.is_empty_range());
}

#[test]
fn quoted_cells_keep_their_commas() {
    let (_dir, source) = workbook(&[("Notes", "Note\n\"has, comma\"\n")]);
    let table = source.read_range(&RangeRef::sheet("Notes")).unwrap();
    assert_eq!(table.record(0).unwrap().get("Note"), Some("has, comma"));
}

#[test]
fn ragged_rows_surface_as_short_records() {
    let (_dir, source) = workbook(&[("Ragged", "A,B,C\n1,2,3\n4,5\n")]);
    let table = source.read_range(&RangeRef::sheet("Ragged")).unwrap();
    let record = table.record(1).unwrap();
    assert_eq!(record.get("B"), Some("5"));
    assert_eq!(record.get("C"), None);
}

#[test]
fn a_leading_bom_is_stripped_from_the_first_header_cell() {
    let (_dir, source) = workbook(&[("Bom", "\u{feff}Date,Cat\n01/03/2022,Food\n")]);
    let table = source.read_range(&RangeRef::sheet("Bom")).unwrap();
    assert_eq!(table.headers(), ["Date", "Cat"]);
}

#[test]
fn append_adds_a_row_after_the_last_occupied_one() {
    let (_dir, mut source) = workbook(&[("Expense", EXPENSE_SHEET)]);
    let range = RangeRef::sheet("Expense");
    source
        .append_row(
            &range,
            &[
                "12/05/2022".to_string(),
                "Rent".to_string(),
                "900".to_string(),
            ],
        )
        .unwrap();
    let table = source.read_range(&range).unwrap();
    assert_eq!(table.row_count(), 4);
    assert_eq!(table.record(3).unwrap().get("Cat"), Some("Rent"));
}

#[test]
fn delete_rows_removes_the_addressed_span() {
    let (_dir, mut source) = workbook(&[("Expense", EXPENSE_SHEET)]);
    // Source rows 2 and 3 are the first two data rows.
    source.delete_rows("Expense", 2, 4).unwrap();
    let table = source.read_range(&RangeRef::sheet("Expense")).unwrap();
    assert_eq!(table.row_count(), 1);
    assert_eq!(table.record(0).unwrap().get("Date"), Some("01/01/2022"));
}

#[test]
fn delete_rows_with_an_empty_span_is_a_no_op() {
    let (_dir, mut source) = workbook(&[("Expense", EXPENSE_SHEET)]);
    source.delete_rows("Expense", 3, 3).unwrap();
    source.delete_rows("Expense", 0, 2).unwrap();
    let table = source.read_range(&RangeRef::sheet("Expense")).unwrap();
    assert_eq!(table.row_count(), 3);
}

#[test]
fn delete_rows_clamps_past_the_end_of_the_sheet() {
    let (_dir, mut source) = workbook(&[("Expense", EXPENSE_SHEET)]);
    source.delete_rows("Expense", 4, 99).unwrap();
    let table = source.read_range(&RangeRef::sheet("Expense")).unwrap();
    assert_eq!(table.row_count(), 2);
}
