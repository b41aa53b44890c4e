//! The CSV workbook source.

use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, WriterBuilder};
use tracing::debug;

use rowsync_model::{EmptyTableError, RangeRef, SourceError, Table, TableSource};

/// A directory of CSV files acting as a spreadsheet workbook.
///
/// Sheet `S` is the file `S.csv` under the workbook root. Cells are used
/// raw — no trimming on read, because emptiness predicates are defined over
/// the raw string — except that a UTF-8 BOM on the very first cell of a
/// sheet is stripped.
#[derive(Debug, Clone)]
pub struct CsvWorkbookSource {
    root: PathBuf,
}

impl CsvWorkbookSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn sheet_path(&self, sheet: &str) -> PathBuf {
        self.root.join(format!("{sheet}.csv"))
    }

    /// Reads a whole sheet as a raw grid.
    fn read_sheet(&self, sheet: &str) -> Result<Vec<Vec<String>>, SourceError> {
        let path = self.sheet_path(sheet);
        if !path.is_file() {
            return Err(SourceError::SheetNotFound {
                sheet: sheet.to_string(),
            });
        }
        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_path(&path)
            .map_err(|error| csv_error(sheet, error))?;
        let mut grid: Vec<Vec<String>> = Vec::new();
        for record in reader.records() {
            let record = record.map_err(|error| csv_error(sheet, error))?;
            grid.push(record.iter().map(str::to_string).collect());
        }
        if let Some(first) = grid.first_mut().and_then(|row| row.first_mut()) {
            if let Some(stripped) = first.strip_prefix('\u{feff}') {
                *first = stripped.to_string();
            }
        }
        debug!(sheet, rows = grid.len(), "sheet read");
        Ok(grid)
    }

    /// Rewrites a whole sheet from a grid.
    fn write_sheet(&self, sheet: &str, grid: &[Vec<String>]) -> Result<(), SourceError> {
        let path = self.sheet_path(sheet);
        let mut writer = WriterBuilder::new()
            .flexible(true)
            .from_path(&path)
            .map_err(|error| csv_error(sheet, error))?;
        for row in grid {
            writer
                .write_record(row)
                .map_err(|error| csv_error(sheet, error))?;
        }
        writer.flush().map_err(|source| SourceError::Read {
            sheet: sheet.to_string(),
            source,
        })?;
        Ok(())
    }
}

impl TableSource for CsvWorkbookSource {
    fn read_range(&self, range: &RangeRef) -> Result<Table, SourceError> {
        let grid = self.read_sheet(&range.sheet)?;
        let sliced = slice_range(grid, range);
        if sliced.is_empty() {
            return Err(SourceError::from(EmptyTableError));
        }
        Table::from_grid(sliced).map_err(SourceError::from)
    }

    fn append_row(&mut self, range: &RangeRef, row: &[String]) -> Result<(), SourceError> {
        let mut grid = self.read_sheet(&range.sheet)?;
        grid.push(row.to_vec());
        self.write_sheet(&range.sheet, &grid)?;
        debug!(sheet = %range.sheet, "row appended");
        Ok(())
    }

    fn delete_rows(
        &mut self,
        sheet: &str,
        start_row: usize,
        end_row: usize,
    ) -> Result<(), SourceError> {
        if start_row == 0 || end_row <= start_row {
            return Ok(());
        }
        let mut grid = self.read_sheet(sheet)?;
        // Source row n is line index n - 1.
        let start = (start_row - 1).min(grid.len());
        let end = (end_row - 1).min(grid.len());
        grid.drain(start..end);
        self.write_sheet(sheet, &grid)?;
        debug!(sheet, start_row, end_row, "rows deleted");
        Ok(())
    }
}

/// Cuts the requested rectangle out of a whole-sheet grid. Rows and columns
/// outside the sheet's actual extent are simply absent, never padded.
fn slice_range(grid: Vec<Vec<String>>, range: &RangeRef) -> Vec<Vec<String>> {
    let skip = range
        .start_row
        .map_or(0, |row| (row as usize).saturating_sub(1));
    let take = match (range.start_row, range.end_row) {
        (Some(start), Some(end)) => (end as usize).saturating_sub(start as usize) + 1,
        (None, Some(end)) => end as usize,
        _ => usize::MAX,
    };
    grid.into_iter()
        .skip(skip)
        .take(take)
        .map(|row| {
            let start = range.start_col as usize;
            if start >= row.len() {
                return Vec::new();
            }
            let end = range
                .end_col
                .map_or(row.len(), |col| (col as usize + 1).min(row.len()));
            row[start..end].to_vec()
        })
        .collect()
}

fn csv_error(sheet: &str, error: csv::Error) -> SourceError {
    let message = error.to_string();
    match error.into_kind() {
        csv::ErrorKind::Io(source) => SourceError::Read {
            sheet: sheet.to_string(),
            source,
        },
        _ => SourceError::Parse {
            sheet: sheet.to_string(),
            message,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slicing_clamps_to_the_sheet_extent() {
        let grid = vec![
            vec!["a".to_string(), "b".to_string(), "c".to_string()],
            vec!["d".to_string()],
        ];
        let range: RangeRef = "S!B1:C9".parse().unwrap();
        let sliced = slice_range(grid, &range);
        assert_eq!(sliced, vec![vec!["b".to_string(), "c".to_string()], vec![]]);
    }

    #[test]
    fn open_ended_columns_reach_the_row_end() {
        let grid = vec![vec!["a".to_string(), "b".to_string()]];
        let range = RangeRef {
            sheet: "S".to_string(),
            start_col: 1,
            end_col: None,
            start_row: None,
            end_row: None,
        };
        assert_eq!(slice_range(grid, &range), vec![vec!["b".to_string()]]);
    }
}
