//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "rowsync",
    version,
    about = "Sync spreadsheet-style CSV workbooks into SQLite",
    long_about = "Filter, transform, and import tabular data.\n\n\
                  A workbook is a directory of CSV files (sheet S is the file S.csv).\n\
                  Rows can be queried with per-column conditions, imported into a\n\
                  SQLite table, or pruned from the source sheet."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for silence).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for humans, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Import one or more source ranges into SQLite tables.
    Import(ImportArgs),

    /// Select rows from a source range and print them.
    Rows(RowsArgs),

    /// Delete matching rows from the source sheet.
    Prune(PruneArgs),
}

#[derive(Parser)]
pub struct ImportArgs {
    /// Workbook directory (sheet S is the file S.csv).
    #[arg(long = "source", value_name = "DIR")]
    pub source: PathBuf,

    /// SQLite database file to import into (created when missing).
    #[arg(long = "db", value_name = "FILE", required_unless_present = "dry_run")]
    pub db: Option<PathBuf>,

    /// Range to import, e.g. "Expense!A:F".
    #[arg(
        long = "range",
        value_name = "RANGE",
        required_unless_present = "jobs",
        conflicts_with = "jobs"
    )]
    pub range: Option<String>,

    /// Sink table name (defaults to the range's sheet name).
    #[arg(long = "table", value_name = "NAME", requires = "range")]
    pub table: Option<String>,

    /// Reformat a date column before insert: COLUMN,FROM,TO (chrono
    /// patterns, e.g. "Date,%d/%m/%Y,%Y-%m-%d"). Repeatable.
    #[arg(long = "reformat-date", value_name = "SPEC", requires = "range")]
    pub reformat_date: Vec<String>,

    /// JSON file listing several import jobs.
    #[arg(long = "jobs", value_name = "FILE")]
    pub jobs: Option<PathBuf>,

    /// Run each job's inserts inside one transaction (all-or-nothing).
    #[arg(long = "atomic")]
    pub atomic: bool,

    /// What to do when a transformer rejects a value.
    #[arg(long = "on-parse-failure", value_enum, default_value = "null")]
    pub on_parse_failure: ParseFailureArg,

    /// Read and transform without writing to the database.
    #[arg(long = "dry-run")]
    pub dry_run: bool,
}

#[derive(Parser)]
pub struct RowsArgs {
    /// Workbook directory (sheet S is the file S.csv).
    #[arg(long = "source", value_name = "DIR")]
    pub source: PathBuf,

    /// Range to query, e.g. "Expense!A:F".
    #[arg(long = "range", value_name = "RANGE")]
    pub range: String,

    /// Filter clause COLUMN=VALUE. Repeatable: clauses on the same column
    /// OR together, clauses on different columns AND together.
    #[arg(long = "where", value_name = "COLUMN=VALUE")]
    pub conditions: Vec<String>,

    /// Print matching source row numbers instead of row contents.
    #[arg(long = "numbers")]
    pub numbers: bool,

    /// Emit JSON instead of a table.
    #[arg(long = "json")]
    pub json: bool,
}

#[derive(Parser)]
pub struct PruneArgs {
    /// Workbook directory (sheet S is the file S.csv).
    #[arg(long = "source", value_name = "DIR")]
    pub source: PathBuf,

    /// Range to prune, e.g. "Expense!A:F".
    #[arg(long = "range", value_name = "RANGE")]
    pub range: String,

    /// Filter clause COLUMN=VALUE (required: pruning everything must be
    /// spelled out with an explicit condition). Repeatable, same semantics
    /// as `rows --where`.
    #[arg(long = "where", value_name = "COLUMN=VALUE")]
    pub conditions: Vec<String>,

    /// Report what would be deleted without touching the sheet.
    #[arg(long = "dry-run")]
    pub dry_run: bool,
}

/// CLI transform-failure choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum ParseFailureArg {
    /// Insert NULL for the failed cell and keep going.
    Null,
    /// Abort the import at the first failed cell.
    Abort,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
