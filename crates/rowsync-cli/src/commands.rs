//! Command implementations over the library crates.

use std::collections::BTreeMap;
use std::fs;

use anyhow::{Context, Result, bail};
use tracing::{debug, info, info_span};

use rowsync_engine::{
    ColumnFilters, DateReformat, FailurePolicy, ImportJob, ImportOptions, TableTransforms,
    conditions, import, row_number_runs, select, select_row_numbers,
};
use rowsync_ingest::CsvWorkbookSource;
use rowsync_model::{RangeRef, SinkError, TableSink, TableSource};
use rowsync_sink::SqliteSink;

use crate::cli::{ImportArgs, ParseFailureArg, PruneArgs, RowsArgs};
use crate::types::{DateColumnSpec, ImportOutcome, JobSpec, PruneOutcome, RowsOutput};

/// Runs every configured import job, collecting per-job outcomes instead of
/// stopping at the first failed job.
pub fn run_import(args: &ImportArgs) -> Result<Vec<ImportOutcome>> {
    let jobs = load_jobs(args)?;
    let source = CsvWorkbookSource::new(&args.source);
    let mut sqlite = match (&args.db, args.dry_run) {
        (_, true) => None,
        (Some(db), false) => Some(SqliteSink::open(db).context("open sink database")?),
        (None, false) => bail!("--db is required unless --dry-run is set"),
    };
    let mut dry = DryRunSink;

    let mut outcomes = Vec::with_capacity(jobs.len());
    for spec in &jobs {
        let outcome = match prepare_job(spec, args) {
            Ok((job, options)) => {
                let result = match sqlite.as_mut() {
                    Some(sink) => ensure_target_table(&source, sink, &job)
                        .and_then(|()| import(&source, sink, &job, &options).map_err(Into::into)),
                    None => import(&source, &mut dry, &job, &options).map_err(Into::into),
                };
                match result {
                    Ok(report) => ImportOutcome {
                        table: job.table,
                        range: job.range.to_string(),
                        report: Some(report),
                        error: None,
                    },
                    Err(error) => ImportOutcome {
                        table: job.table,
                        range: job.range.to_string(),
                        report: None,
                        error: Some(format!("{error:#}")),
                    },
                }
            }
            Err(error) => ImportOutcome {
                table: spec.table.clone().unwrap_or_default(),
                range: spec.range.clone(),
                report: None,
                error: Some(format!("{error:#}")),
            },
        };
        outcomes.push(outcome);
    }
    Ok(outcomes)
}

/// Selects rows from a source range.
pub fn run_rows(args: &RowsArgs) -> Result<RowsOutput> {
    let source = CsvWorkbookSource::new(&args.source);
    let range: RangeRef = args
        .range
        .parse()
        .with_context(|| format!("parse range {:?}", args.range))?;
    let filters = build_filters(&args.conditions)?;
    let span = info_span!("rows", range = %range);
    let _guard = span.enter();

    let table = match source.read_range(&range) {
        Ok(table) => table,
        Err(error) if error.is_empty_range() => {
            info!("source range is empty; zero matches");
            return Ok(RowsOutput {
                headers: Vec::new(),
                records: Vec::new(),
                row_numbers: Vec::new(),
            });
        }
        Err(error) => {
            return Err(error).with_context(|| format!("read source range {range}"));
        }
    };
    let records = select(&table, &filters);
    let row_numbers = select_row_numbers(&table, &filters);
    debug!(
        rows_scanned = table.row_count(),
        rows_matched = records.len(),
        "selection complete"
    );
    Ok(RowsOutput {
        headers: table.headers().to_vec(),
        records,
        row_numbers,
    })
}

/// Deletes matching rows from the source sheet, bottom-up by consecutive
/// runs so earlier deletions never shift the rows still to delete.
pub fn run_prune(args: &PruneArgs) -> Result<PruneOutcome> {
    let mut source = CsvWorkbookSource::new(&args.source);
    let range: RangeRef = args
        .range
        .parse()
        .with_context(|| format!("parse range {:?}", args.range))?;
    let filters = build_filters(&args.conditions)?;
    if filters.is_empty() {
        bail!("refusing to prune without at least one --where condition");
    }
    let span = info_span!("prune", range = %range);
    let _guard = span.enter();

    let table = match source.read_range(&range) {
        Ok(table) => table,
        Err(error) if error.is_empty_range() => {
            info!("source range is empty; nothing to prune");
            return Ok(PruneOutcome {
                matched_rows: Vec::new(),
                dry_run: args.dry_run,
            });
        }
        Err(error) => {
            return Err(error).with_context(|| format!("read source range {range}"));
        }
    };

    // Selection numbers rows relative to the range; shift them by the
    // range's own starting row to address the sheet.
    let base = range.start_row.unwrap_or(1) as usize - 1;
    let matched_rows: Vec<usize> = select_row_numbers(&table, &filters)
        .into_iter()
        .map(|row| row + base)
        .collect();

    if !args.dry_run {
        for (start, end) in row_number_runs(&matched_rows).iter().rev() {
            source
                .delete_rows(&range.sheet, *start, *end)
                .with_context(|| {
                    format!("delete rows {start}..{end} from sheet {}", range.sheet)
                })?;
        }
        info!(rows_deleted = matched_rows.len(), "prune complete");
    }
    Ok(PruneOutcome {
        matched_rows,
        dry_run: args.dry_run,
    })
}

/// The job list for an import run: either the `--jobs` file or one ad-hoc
/// job assembled from flags.
fn load_jobs(args: &ImportArgs) -> Result<Vec<JobSpec>> {
    if let Some(path) = &args.jobs {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("read jobs file {}", path.display()))?;
        let jobs: Vec<JobSpec> = serde_json::from_str(&contents)
            .with_context(|| format!("parse jobs file {}", path.display()))?;
        if jobs.is_empty() {
            bail!("jobs file {} lists no jobs", path.display());
        }
        return Ok(jobs);
    }
    let range = args
        .range
        .clone()
        .context("--range is required without --jobs")?;
    let mut date_columns = BTreeMap::new();
    for spec in &args.reformat_date {
        let parts: Vec<&str> = spec.splitn(3, ',').collect();
        let [column, from, to] = parts[..] else {
            bail!("malformed --reformat-date {spec:?} (expected COLUMN,FROM,TO)");
        };
        date_columns.insert(
            column.to_string(),
            DateColumnSpec {
                from: from.to_string(),
                to: to.to_string(),
            },
        );
    }
    Ok(vec![JobSpec {
        range,
        table: args.table.clone(),
        date_columns,
    }])
}

/// Resolves one job spec into the engine's job + options pair.
fn prepare_job(spec: &JobSpec, args: &ImportArgs) -> Result<(ImportJob, ImportOptions)> {
    let range: RangeRef = spec
        .range
        .parse()
        .with_context(|| format!("parse range {:?}", spec.range))?;
    let table = spec.table.clone().unwrap_or_else(|| range.sheet.clone());

    let mut transforms = TableTransforms::new();
    for (column, date) in &spec.date_columns {
        transforms = transforms.with_column(column.clone(), DateReformat::new(&date.from, &date.to));
    }
    let options = ImportOptions {
        transforms: if transforms.is_empty() {
            None
        } else {
            Some(transforms)
        },
        on_transform_failure: match args.on_parse_failure {
            ParseFailureArg::Null => FailurePolicy::NullOnFailure,
            ParseFailureArg::Abort => FailurePolicy::Abort,
        },
        atomic: args.atomic,
    };
    Ok((ImportJob::new(table, range), options))
}

/// Creates the sink table (all TEXT columns from the range header) when it
/// does not exist yet, so a first import against a fresh database works.
fn ensure_target_table(
    source: &CsvWorkbookSource,
    sink: &SqliteSink,
    job: &ImportJob,
) -> Result<()> {
    match source.read_range(&job.range) {
        Ok(table) => {
            sink.ensure_table(&job.table, table.headers())
                .context("create sink table")?;
            Ok(())
        }
        // An empty range imports zero rows; the table, if any, is enough.
        Err(error) if error.is_empty_range() => Ok(()),
        Err(error) => Err(error).with_context(|| format!("read source range {}", job.range)),
    }
}

/// Builds the filter set for the repeated `--where COLUMN=VALUE` clauses:
/// clauses naming the same column OR together, different columns AND
/// together.
fn build_filters(clauses: &[String]) -> Result<ColumnFilters> {
    let mut by_column: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for clause in clauses {
        let Some((column, value)) = clause.split_once('=') else {
            bail!("malformed --where clause {clause:?} (expected COLUMN=VALUE)");
        };
        by_column
            .entry(column.to_string())
            .or_default()
            .push(value.to_string());
    }
    let mut filters = ColumnFilters::new();
    for (column, values) in by_column {
        let mut values = values.into_iter();
        let Some(first) = values.next() else {
            continue;
        };
        let predicate = values.fold(conditions::equals(first), |predicate, value| {
            predicate.or(conditions::equals(value))
        });
        filters = filters.on_column(column).condition(predicate);
    }
    Ok(filters)
}

/// A sink that accepts writes without touching any database, for `--dry-run`.
struct DryRunSink;

impl TableSink for DryRunSink {
    fn truncate(&mut self, _table: &str) -> Result<(), SinkError> {
        Ok(())
    }

    fn insert(
        &mut self,
        _table: &str,
        _columns: &[String],
        _values: &[Option<String>],
    ) -> Result<u64, SinkError> {
        Ok(1)
    }

    fn delete_rows(
        &mut self,
        _table: &str,
        _start_row: usize,
        _end_row: usize,
    ) -> Result<(), SinkError> {
        Ok(())
    }

    fn begin(&mut self) -> Result<(), SinkError> {
        Ok(())
    }

    fn commit(&mut self) -> Result<(), SinkError> {
        Ok(())
    }

    fn rollback(&mut self) -> Result<(), SinkError> {
        Ok(())
    }
}
