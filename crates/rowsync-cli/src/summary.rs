//! Human-readable output for the command results.

use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use crate::types::{ImportOutcome, PruneOutcome, RowsOutput};

pub fn print_import_summary(outcomes: &[ImportOutcome]) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Table"),
        header_cell("Range"),
        header_cell("Read"),
        header_cell("Inserted"),
        header_cell("NULLs"),
        header_cell("Duration"),
        header_cell("Status"),
    ]);
    apply_table_style(&mut table);
    for index in 2..=4 {
        align_column(&mut table, index, CellAlignment::Right);
    }
    for outcome in outcomes {
        match (&outcome.report, &outcome.error) {
            (Some(report), _) => {
                table.add_row(vec![
                    Cell::new(&outcome.table),
                    Cell::new(&outcome.range),
                    Cell::new(report.rows_read),
                    Cell::new(report.rows_inserted),
                    Cell::new(report.transform_failures),
                    Cell::new(format!("{}ms", report.duration.as_millis())),
                    Cell::new("ok").fg(Color::Green),
                ]);
            }
            (None, error) => {
                let message = error.as_deref().unwrap_or("unknown failure");
                table.add_row(vec![
                    Cell::new(&outcome.table),
                    Cell::new(&outcome.range),
                    Cell::new("-"),
                    Cell::new("-"),
                    Cell::new("-"),
                    Cell::new("-"),
                    Cell::new(format!("failed: {message}"))
                        .fg(Color::Red)
                        .add_attribute(Attribute::Bold),
                ]);
            }
        }
    }
    println!("{table}");
}

/// Prints a `rows` result the way the flags asked for it.
pub fn print_rows_output(output: &RowsOutput, numbers: bool, json: bool) -> anyhow::Result<()> {
    if json {
        if numbers {
            println!("{}", serde_json::to_string_pretty(&output.row_numbers)?);
        } else {
            println!("{}", serde_json::to_string_pretty(&output.records)?);
        }
        return Ok(());
    }
    if numbers {
        for row in &output.row_numbers {
            println!("{row}");
        }
        return Ok(());
    }
    let mut table = Table::new();
    table.set_header(output.headers.iter().map(|h| header_cell(h)).collect::<Vec<_>>());
    apply_table_style(&mut table);
    for record in &output.records {
        table.add_row(
            output
                .headers
                .iter()
                .map(|header| Cell::new(record.get(header).unwrap_or("")))
                .collect::<Vec<_>>(),
        );
    }
    println!("{table}");
    println!("{} matching row(s)", output.records.len());
    Ok(())
}

pub fn print_prune_summary(outcome: &PruneOutcome) {
    if outcome.matched_rows.is_empty() {
        println!("No rows matched; nothing to delete.");
        return;
    }
    let rows: Vec<String> = outcome
        .matched_rows
        .iter()
        .map(|row| row.to_string())
        .collect();
    if outcome.dry_run {
        println!(
            "Would delete {} row(s): {}",
            outcome.matched_rows.len(),
            rows.join(", ")
        );
    } else {
        println!(
            "Deleted {} row(s): {}",
            outcome.matched_rows.len(),
            rows.join(", ")
        );
    }
}

fn header_cell(name: &str) -> Cell {
    Cell::new(name).add_attribute(Attribute::Bold)
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
}
