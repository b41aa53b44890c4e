//! End-to-end tests over the command functions: CSV workbook in, SQLite
//! rows out.

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use rowsync_cli::cli::{ImportArgs, ParseFailureArg, PruneArgs, RowsArgs};
use rowsync_cli::commands::{run_import, run_prune, run_rows};

const EXPENSE_SHEET: &str = "\
Date,Cat,Amount
01/03/2022,Food,12.50
11/04/2022,Travel,80.00
01/01/2022,Food,
";

fn workbook(files: &[(&str, &str)]) -> TempDir {
    let dir = TempDir::new().unwrap();
    for (name, contents) in files {
        fs::write(dir.path().join(format!("{name}.csv")), contents).unwrap();
    }
    dir
}

fn import_args(source: &Path, db: Option<PathBuf>) -> ImportArgs {
    ImportArgs {
        source: source.to_path_buf(),
        db,
        range: Some("Expense!A:C".to_string()),
        table: None,
        reformat_date: Vec::new(),
        jobs: None,
        atomic: false,
        on_parse_failure: ParseFailureArg::Null,
        dry_run: false,
    }
}

fn query_all(db: &Path) -> Vec<(Option<String>, Option<String>, Option<String>)> {
    let conn = rusqlite::Connection::open(db).unwrap();
    let mut statement = conn
        .prepare("SELECT \"Date\", \"Cat\", \"Amount\" FROM \"Expense\" ORDER BY rowid")
        .unwrap();
    let rows = statement
        .query_map([], |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)))
        .unwrap();
    rows.map(Result::unwrap).collect()
}

#[test]
fn import_lands_every_row_in_sqlite() {
    let dir = workbook(&[("Expense", EXPENSE_SHEET)]);
    let db = dir.path().join("out.sqlite");
    let args = import_args(dir.path(), Some(db.clone()));

    let outcomes = run_import(&args).unwrap();

    assert_eq!(outcomes.len(), 1);
    assert!(outcomes[0].is_success(), "{:?}", outcomes[0].error);
    let report = outcomes[0].report.as_ref().unwrap();
    assert_eq!(report.rows_read, 3);
    assert_eq!(report.rows_inserted, 3);

    let rows = query_all(&db);
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0].1.as_deref(), Some("Food"));
    // The empty Amount cell landed as NULL, not "".
    assert_eq!(rows[2].2, None);
}

#[test]
fn import_reformats_date_columns() {
    let dir = workbook(&[("Expense", EXPENSE_SHEET)]);
    let db = dir.path().join("out.sqlite");
    let mut args = import_args(dir.path(), Some(db.clone()));
    args.reformat_date = vec!["Date,%d/%m/%Y,%Y-%m-%d".to_string()];

    let outcomes = run_import(&args).unwrap();

    assert!(outcomes[0].is_success(), "{:?}", outcomes[0].error);
    let rows = query_all(&db);
    assert_eq!(rows[0].0.as_deref(), Some("2022-03-01"));
    assert_eq!(rows[1].0.as_deref(), Some("2022-04-11"));
}

#[test]
fn unparseable_dates_become_null_without_aborting() {
    let dir = workbook(&[(
        "Expense",
        "Date,Cat\n01/03/2022,Food\nnot a date,Travel\n",
    )]);
    let db = dir.path().join("out.sqlite");
    let mut args = import_args(dir.path(), Some(db.clone()));
    args.range = Some("Expense!A:B".to_string());
    args.reformat_date = vec!["Date,%d/%m/%Y,%Y-%m-%d".to_string()];

    let outcomes = run_import(&args).unwrap();

    assert!(outcomes[0].is_success(), "{:?}", outcomes[0].error);
    let report = outcomes[0].report.as_ref().unwrap();
    assert_eq!(report.rows_inserted, 2);
    assert_eq!(report.transform_failures, 1);

    let conn = rusqlite::Connection::open(&db).unwrap();
    let bad_date: Option<String> = conn
        .query_row(
            "SELECT \"Date\" FROM \"Expense\" WHERE \"Cat\" = 'Travel'",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(bad_date, None);
}

#[test]
fn import_truncates_what_was_there_before() {
    let dir = workbook(&[("Expense", EXPENSE_SHEET)]);
    let db = dir.path().join("out.sqlite");
    let args = import_args(dir.path(), Some(db.clone()));

    run_import(&args).unwrap();
    run_import(&args).unwrap();

    // Two imports of three rows leave three rows, not six.
    assert_eq!(query_all(&db).len(), 3);
}

#[test]
fn a_jobs_file_runs_several_imports() {
    let dir = workbook(&[
        ("Expense", EXPENSE_SHEET),
        ("Income", "Date,Amount\n02/03/2022,100\n"),
    ]);
    let db = dir.path().join("out.sqlite");
    let jobs_path = dir.path().join("jobs.json");
    fs::write(
        &jobs_path,
        r#"[
            { "range": "Expense!A:C" },
            {
                "range": "Income!A:B",
                "table": "income",
                "date_columns": { "Date": { "from": "%d/%m/%Y", "to": "%Y-%m-%d" } }
            }
        ]"#,
    )
    .unwrap();
    let mut args = import_args(dir.path(), Some(db.clone()));
    args.range = None;
    args.jobs = Some(jobs_path);

    let outcomes = run_import(&args).unwrap();

    assert_eq!(outcomes.len(), 2);
    assert!(outcomes.iter().all(|outcome| outcome.is_success()));
    let conn = rusqlite::Connection::open(&db).unwrap();
    let income_date: String = conn
        .query_row("SELECT \"Date\" FROM \"income\"", [], |row| row.get(0))
        .unwrap();
    assert_eq!(income_date, "2022-03-02");
}

#[test]
fn a_failing_job_does_not_stop_the_others() {
    let dir = workbook(&[("Expense", EXPENSE_SHEET)]);
    let db = dir.path().join("out.sqlite");
    let jobs_path = dir.path().join("jobs.json");
    fs::write(
        &jobs_path,
        r#"[
            { "range": "Missing!A:C" },
            { "range": "Expense!A:C" }
        ]"#,
    )
    .unwrap();
    let mut args = import_args(dir.path(), Some(db.clone()));
    args.range = None;
    args.jobs = Some(jobs_path);

    let outcomes = run_import(&args).unwrap();

    assert_eq!(outcomes.len(), 2);
    assert!(!outcomes[0].is_success());
    assert!(outcomes[1].is_success(), "{:?}", outcomes[1].error);
    assert_eq!(query_all(&db).len(), 3);
}

#[test]
fn dry_run_writes_nothing() {
    let dir = workbook(&[("Expense", EXPENSE_SHEET)]);
    let db = dir.path().join("out.sqlite");
    let mut args = import_args(dir.path(), None);
    args.dry_run = true;

    let outcomes = run_import(&args).unwrap();

    assert!(outcomes[0].is_success());
    assert_eq!(outcomes[0].report.as_ref().unwrap().rows_inserted, 3);
    assert!(!db.exists());
}

#[test]
fn rows_filters_with_or_within_a_column() {
    let dir = workbook(&[("Expense", EXPENSE_SHEET)]);
    let args = RowsArgs {
        source: dir.path().to_path_buf(),
        range: "Expense!A:C".to_string(),
        conditions: vec![
            "Date=01/03/2022".to_string(),
            "Date=11/04/2022".to_string(),
        ],
        numbers: false,
        json: false,
    };

    let output = run_rows(&args).unwrap();

    assert_eq!(output.records.len(), 2);
    assert_eq!(output.row_numbers, vec![2, 3]);
}

#[test]
fn rows_filters_with_and_across_columns() {
    let dir = workbook(&[("Expense", EXPENSE_SHEET)]);
    let args = RowsArgs {
        source: dir.path().to_path_buf(),
        range: "Expense!A:C".to_string(),
        conditions: vec![
            "Date=01/03/2022".to_string(),
            "Date=11/04/2022".to_string(),
            "Cat=Food".to_string(),
        ],
        numbers: false,
        json: false,
    };

    let output = run_rows(&args).unwrap();

    assert_eq!(output.records.len(), 1);
    assert_eq!(output.records[0].get("Date"), Some("01/03/2022"));
    assert_eq!(output.row_numbers, vec![2]);
}

#[test]
fn rows_on_an_empty_sheet_returns_nothing() {
    let dir = workbook(&[("Blank", "")]);
    let args = RowsArgs {
        source: dir.path().to_path_buf(),
        range: "Blank".to_string(),
        conditions: Vec::new(),
        numbers: true,
        json: false,
    };

    let output = run_rows(&args).unwrap();

    assert!(output.records.is_empty());
    assert!(output.row_numbers.is_empty());
}

#[test]
fn prune_deletes_matching_rows_from_the_sheet() {
    let dir = workbook(&[("Expense", EXPENSE_SHEET)]);
    let args = PruneArgs {
        source: dir.path().to_path_buf(),
        range: "Expense!A:C".to_string(),
        conditions: vec!["Cat=Food".to_string()],
        dry_run: false,
    };

    let outcome = run_prune(&args).unwrap();

    assert_eq!(outcome.matched_rows, vec![2, 4]);
    let remaining = fs::read_to_string(dir.path().join("Expense.csv")).unwrap();
    assert!(remaining.contains("Travel"));
    assert!(!remaining.contains("Food"));
    // The header row survives.
    assert!(remaining.starts_with("Date,Cat,Amount"));
}

#[test]
fn prune_dry_run_reports_but_keeps_the_rows() {
    let dir = workbook(&[("Expense", EXPENSE_SHEET)]);
    let args = PruneArgs {
        source: dir.path().to_path_buf(),
        range: "Expense!A:C".to_string(),
        conditions: vec!["Cat=Food".to_string()],
        dry_run: true,
    };

    let outcome = run_prune(&args).unwrap();

    assert_eq!(outcome.matched_rows, vec![2, 4]);
    let untouched = fs::read_to_string(dir.path().join("Expense.csv")).unwrap();
    assert_eq!(untouched, EXPENSE_SHEET);
}

#[test]
fn prune_without_conditions_is_refused() {
    let dir = workbook(&[("Expense", EXPENSE_SHEET)]);
    let args = PruneArgs {
        source: dir.path().to_path_buf(),
        range: "Expense!A:C".to_string(),
        conditions: Vec::new(),
        dry_run: false,
    };

    assert!(run_prune(&args).is_err());
}
