//! Store adapter trait, cell values, and the in-memory sheet.

use std::borrow::Cow;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    persist::{PersistError, PersistResult},
    types::{ColIndex, RowIndex},
};

/// A single cell value.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "t", content = "v")]
pub enum Cell {
    /// No content.
    #[default]
    Empty,
    /// Free text.
    Text(String),
    /// Whole number.
    Int(i64),
    /// Checkbox value.
    Bool(bool),
    /// Point in time.
    Time(DateTime<Utc>),
}

impl Cell {
    /// Builds a text cell, mapping the empty string to [`Cell::Empty`].
    pub fn text(value: impl Into<String>) -> Self {
        let value = value.into();
        if value.is_empty() {
            Self::Empty
        } else {
            Self::Text(value)
        }
    }

    /// True when the cell carries no visible content.
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Empty => true,
            Self::Text(s) => s.is_empty(),
            _ => false,
        }
    }

    /// Display text of the cell.
    pub fn as_text(&self) -> Cow<'_, str> {
        match self {
            Self::Empty => Cow::Borrowed(""),
            Self::Text(s) => Cow::Borrowed(s.as_str()),
            Self::Int(n) => Cow::Owned(n.to_string()),
            Self::Bool(true) => Cow::Borrowed("TRUE"),
            Self::Bool(false) => Cow::Borrowed("FALSE"),
            Self::Time(ts) => Cow::Owned(ts.to_rfc3339()),
        }
    }
}

/// Row-oriented access to one named tabular store.
///
/// Rows past the last non-blank row are never reported by [`Sheet::read_all`];
/// writing past the end grows the sheet.
pub trait Sheet: Send {
    /// Store name shown to the host.
    fn name(&self) -> &str;

    /// All rows up to the last non-blank row.
    fn read_all(&self) -> PersistResult<Vec<Vec<Cell>>>;

    /// `height` cells of column `col` starting at `row`. Missing cells are empty.
    fn read_range(&self, row: RowIndex, col: ColIndex, height: usize) -> PersistResult<Vec<Cell>> {
        let rows = self.read_all()?;
        Ok((row..row + height)
            .map(|r| {
                rows.get(r)
                    .and_then(|cells| cells.get(col))
                    .cloned()
                    .unwrap_or_default()
            })
            .collect())
    }

    /// Replaces the contents of `row`.
    fn write_row(&mut self, row: RowIndex, cells: &[Cell]) -> PersistResult<()>;

    /// Replaces a single cell.
    fn write_cell(&mut self, row: RowIndex, col: ColIndex, cell: Cell) -> PersistResult<()>;

    /// Inserts a blank row directly below `row`, shifting later rows down.
    fn insert_row_after(&mut self, row: RowIndex) -> PersistResult<()>;

    /// Blanks rows in `start..end`.
    fn clear_range(&mut self, start: RowIndex, end: RowIndex) -> PersistResult<()>;

    /// Pushes buffered writes to durable storage.
    fn flush(&mut self) -> PersistResult<()> {
        Ok(())
    }
}

/// Volatile [`Sheet`] backed by a `Vec` of rows.
#[derive(Debug, Clone, Default)]
pub struct MemorySheet {
    name: String,
    rows: Vec<Vec<Cell>>,
    fail_writes: bool,
}

impl MemorySheet {
    /// Creates an empty sheet.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Creates a sheet pre-filled with `rows`.
    pub fn with_rows(name: impl Into<String>, rows: Vec<Vec<Cell>>) -> Self {
        let mut sheet = Self::new(name);
        sheet.rows = rows;
        sheet
    }

    /// Makes every subsequent mutation fail with [`PersistError::Unavailable`].
    pub fn set_fail_writes(&mut self, fail: bool) {
        self.fail_writes = fail;
    }

    fn check_writable(&self) -> PersistResult<()> {
        if self.fail_writes {
            return Err(PersistError::Unavailable(format!("sheet '{}' rejected write", self.name)));
        }
        Ok(())
    }

    fn ensure_row(&mut self, row: RowIndex) -> &mut Vec<Cell> {
        if self.rows.len() <= row {
            self.rows.resize_with(row + 1, Vec::new);
        }
        &mut self.rows[row]
    }
}

impl Sheet for MemorySheet {
    fn name(&self) -> &str {
        &self.name
    }

    fn read_all(&self) -> PersistResult<Vec<Vec<Cell>>> {
        let end = last_content_len(&self.rows);
        Ok(self.rows[..end].to_vec())
    }

    fn write_row(&mut self, row: RowIndex, cells: &[Cell]) -> PersistResult<()> {
        self.check_writable()?;
        *self.ensure_row(row) = cells.to_vec();
        Ok(())
    }

    fn write_cell(&mut self, row: RowIndex, col: ColIndex, cell: Cell) -> PersistResult<()> {
        self.check_writable()?;
        let cells = self.ensure_row(row);
        if cells.len() <= col {
            cells.resize_with(col + 1, Cell::default);
        }
        cells[col] = cell;
        Ok(())
    }

    fn insert_row_after(&mut self, row: RowIndex) -> PersistResult<()> {
        self.check_writable()?;
        self.ensure_row(row);
        self.rows.insert(row + 1, Vec::new());
        Ok(())
    }

    fn clear_range(&mut self, start: RowIndex, end: RowIndex) -> PersistResult<()> {
        self.check_writable()?;
        let end = end.min(self.rows.len());
        for cells in self.rows.iter_mut().take(end).skip(start) {
            cells.clear();
        }
        Ok(())
    }
}

/// Number of leading rows that end with the last non-blank row.
pub(crate) fn last_content_len(rows: &[Vec<Cell>]) -> usize {
    rows.iter()
        .rposition(|cells| cells.iter().any(|c| !c.is_blank()))
        .map_or(0, |idx| idx + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(values: &[&str]) -> Vec<Cell> {
        values.iter().map(|v| Cell::text(*v)).collect()
    }

    #[test]
    fn insert_after_shifts_rows_down() {
        let mut sheet = MemorySheet::with_rows("s", vec![row(&["h"]), row(&["c"]), row(&["a"])]);
        sheet.insert_row_after(1).unwrap();
        sheet.write_row(2, &row(&["b"])).unwrap();

        let rows = sheet.read_all().unwrap();
        assert_eq!(rows[2], row(&["b"]));
        assert_eq!(rows[3], row(&["a"]));
    }

    #[test]
    fn cleared_tail_is_not_reported() {
        let mut sheet = MemorySheet::with_rows("s", vec![row(&["h"]), row(&["c"]), row(&["a"]), row(&["b"])]);
        sheet.clear_range(2, 10).unwrap();
        assert_eq!(sheet.read_all().unwrap().len(), 2);
    }

    #[test]
    fn read_range_pads_missing_cells() {
        let sheet = MemorySheet::with_rows("s", vec![row(&["h", "x"]), row(&["c"])]);
        let cells = sheet.read_range(0, 1, 3).unwrap();
        assert_eq!(cells, vec![Cell::text("x"), Cell::Empty, Cell::Empty]);
    }

    #[test]
    fn failing_sheet_rejects_mutation() {
        let mut sheet = MemorySheet::new("s");
        sheet.set_fail_writes(true);
        assert!(matches!(
            sheet.write_cell(0, 0, Cell::Bool(true)),
            Err(PersistError::Unavailable(_))
        ));
    }
}
