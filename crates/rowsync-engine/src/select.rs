//! Row selection over a table, with source-row addressing.

use rowsync_model::{Record, Table};

use crate::filter::ColumnFilters;

/// Offset from a 0-based data-row index to its source row number: +1 for
/// 1-based addressing, +1 for the header occupying source row 1.
///
/// Data row `i` lives at source row `i + 2`. Downstream row deletion relies
/// on this exact convention.
pub const SHEET_ROW_OFFSET: usize = 2;

/// The records whose columns all pass `filters`, in original order.
pub fn select(table: &Table, filters: &ColumnFilters) -> Vec<Record> {
    table
        .records()
        .filter(|record| filters.matches(record))
        .collect()
}

/// The source row numbers of the matching records, in original order.
pub fn select_row_numbers(table: &Table, filters: &ColumnFilters) -> Vec<usize> {
    table
        .records()
        .enumerate()
        .filter(|(_, record)| filters.matches(record))
        .map(|(index, _)| index + SHEET_ROW_OFFSET)
        .collect()
}

/// Groups ascending row numbers into maximal consecutive `[start, end)`
/// spans, ready for range deletion.
///
/// `[2, 3, 7]` becomes `[(2, 4), (7, 8)]`.
pub fn row_number_runs(row_numbers: &[usize]) -> Vec<(usize, usize)> {
    let mut runs: Vec<(usize, usize)> = Vec::new();
    for &row in row_numbers {
        match runs.last_mut() {
            Some((_, end)) if *end == row => *end += 1,
            _ => runs.push((row, row + 1)),
        }
    }
    runs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn runs_group_consecutive_rows() {
        assert_eq!(row_number_runs(&[]), Vec::new());
        assert_eq!(row_number_runs(&[2, 3]), vec![(2, 4)]);
        assert_eq!(row_number_runs(&[2, 3, 7]), vec![(2, 4), (7, 8)]);
        assert_eq!(row_number_runs(&[5]), vec![(5, 6)]);
        assert_eq!(row_number_runs(&[2, 4, 6]), vec![(2, 3), (4, 5), (6, 7)]);
    }
}
