//! SQLite-backed [`Sheet`] adapter.
//!
//! Every store lives in one `sheet_rows` table keyed by sheet name and row
//! position. A row is stored as a JSON array of [`Cell`]s.

use std::path::Path;

use rusqlite::{Connection, OptionalExtension, params};

use crate::{
    config::RsvpConfig,
    core::{
        sheet::{Cell, Sheet, last_content_len},
        workbook::Workbook,
    },
    types::{ColIndex, RowIndex},
};

use super::PersistResult;

/// One named store in a SQLite database.
pub struct SqliteSheet {
    conn: Connection,
    name: String,
}

impl SqliteSheet {
    /// Opens or creates the sheet `name` in the database at `path`.
    ///
    /// Enables WAL mode and sets `synchronous=NORMAL`.
    pub fn open(path: impl AsRef<Path>, name: impl Into<String>) -> PersistResult<Self> {
        let conn = Connection::open(path)?;
        Self::init_connection(conn, name.into())
    }

    /// Opens the sheet `name` in a private in-memory database.
    pub fn open_in_memory(name: impl Into<String>) -> PersistResult<Self> {
        let conn = Connection::open_in_memory()?;
        Self::init_connection(conn, name.into())
    }

    fn init_connection(conn: Connection, name: String) -> PersistResult<Self> {
        conn.execute_batch(include_str!("schema.sql"))?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "synchronous", "NORMAL")?;
        Ok(Self { conn, name })
    }

    fn load_row(&self, row: RowIndex) -> PersistResult<Vec<Cell>> {
        let payload: Option<String> = self
            .conn
            .query_row(
                "SELECT cells FROM sheet_rows WHERE sheet = ?1 AND pos = ?2",
                params![self.name, row as i64],
                |r| r.get(0),
            )
            .optional()?;
        match payload {
            Some(json) => Ok(serde_json::from_str(&json)?),
            None => Ok(Vec::new()),
        }
    }

    fn store_row(&mut self, row: RowIndex, cells: &[Cell]) -> PersistResult<()> {
        let payload = serde_json::to_string(cells)?;
        self.conn.execute(
            "INSERT INTO sheet_rows(sheet, pos, cells) VALUES (?1, ?2, ?3)
             ON CONFLICT(sheet, pos) DO UPDATE SET cells = excluded.cells",
            params![self.name, row as i64, payload],
        )?;
        Ok(())
    }
}

impl Sheet for SqliteSheet {
    fn name(&self) -> &str {
        &self.name
    }

    fn read_all(&self) -> PersistResult<Vec<Vec<Cell>>> {
        let mut stmt = self
            .conn
            .prepare("SELECT pos, cells FROM sheet_rows WHERE sheet = ?1 ORDER BY pos ASC")?;
        let stored = stmt.query_map(params![self.name], |r| {
            let pos: i64 = r.get(0)?;
            let cells: String = r.get(1)?;
            Ok((pos as usize, cells))
        })?;

        let mut rows: Vec<Vec<Cell>> = Vec::new();
        for entry in stored {
            let (pos, json) = entry?;
            if rows.len() <= pos {
                rows.resize_with(pos + 1, Vec::new);
            }
            rows[pos] = serde_json::from_str(&json)?;
        }
        rows.truncate(last_content_len(&rows));
        Ok(rows)
    }

    fn read_range(&self, row: RowIndex, col: ColIndex, height: usize) -> PersistResult<Vec<Cell>> {
        let mut out = Vec::with_capacity(height);
        for r in row..row + height {
            out.push(self.load_row(r)?.get(col).cloned().unwrap_or_default());
        }
        Ok(out)
    }

    fn write_row(&mut self, row: RowIndex, cells: &[Cell]) -> PersistResult<()> {
        self.store_row(row, cells)
    }

    fn write_cell(&mut self, row: RowIndex, col: ColIndex, cell: Cell) -> PersistResult<()> {
        let mut cells = self.load_row(row)?;
        if cells.len() <= col {
            cells.resize_with(col + 1, Cell::default);
        }
        cells[col] = cell;
        self.store_row(row, &cells)
    }

    fn insert_row_after(&mut self, row: RowIndex) -> PersistResult<()> {
        // Two passes keep (sheet, pos) unique while rows move.
        let tx = self.conn.transaction()?;
        tx.execute(
            "UPDATE sheet_rows SET pos = -(pos + 1) WHERE sheet = ?1 AND pos > ?2",
            params![self.name, row as i64],
        )?;
        tx.execute(
            "UPDATE sheet_rows SET pos = -pos WHERE sheet = ?1 AND pos < 0",
            params![self.name],
        )?;
        tx.commit()?;
        Ok(())
    }

    fn clear_range(&mut self, start: RowIndex, end: RowIndex) -> PersistResult<()> {
        self.conn.execute(
            "DELETE FROM sheet_rows WHERE sheet = ?1 AND pos >= ?2 AND pos < ?3",
            params![self.name, start as i64, end as i64],
        )?;
        Ok(())
    }

    fn flush(&mut self) -> PersistResult<()> {
        self.conn.execute_batch("PRAGMA wal_checkpoint(PASSIVE);")?;
        Ok(())
    }
}

/// Opens the three stores named in `config` from one database file.
pub fn open_workbook(path: impl AsRef<Path>, config: &RsvpConfig) -> PersistResult<Workbook> {
    let path = path.as_ref();
    Ok(Workbook::new(
        Box::new(SqliteSheet::open(path, config.primary_log.name.as_str())?),
        Box::new(SqliteSheet::open(path, config.guest_roster.name.as_str())?),
        Box::new(SqliteSheet::open(path, config.dietary_roster.name.as_str())?),
    ))
}
