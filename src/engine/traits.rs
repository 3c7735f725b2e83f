//! Roster projections over primary log rows.

use chrono::{DateTime, Utc};

use crate::{
    core::{
        schema::{self, Columns},
        sheet::Cell,
    },
    rsvp::{guest_count_from_cell, DietaryRow, GuestRow},
    types::{Attendance, RegenTarget, Status},
};

/// Read-only view of one primary log data row.
#[derive(Debug, Clone, Copy)]
pub struct SourceRow<'a> {
    /// Raw cells of the row.
    pub cells: &'a [Cell],
    /// Primary log column positions.
    pub cols: &'a Columns,
}

impl SourceRow<'_> {
    /// Display text under `header`.
    pub fn text(&self, header: &str) -> String {
        self.cols.text(self.cells, header)
    }

    /// Participant name.
    pub fn name(&self) -> String {
        self.text(schema::NAME)
    }

    /// Parsed attendance answer.
    pub fn attendance(&self) -> Attendance {
        Attendance::parse_lenient(&self.text(schema::ATTENDING))
    }

    /// Exact stored status, when it is a known label.
    pub fn status(&self) -> Option<Status> {
        Status::from_label(&self.text(schema::STATUS))
    }

    /// Guest count, coerced to at least 1.
    pub fn guest_count(&self) -> u32 {
        guest_count_from_cell(self.cols.cell(self.cells, schema::GUESTS))
    }
}

/// Derivation of one roster from the primary log.
pub trait Projection {
    /// Typed roster row.
    type Row;

    /// Roster this projection rebuilds.
    fn target(&self) -> RegenTarget;
    /// Primary log headers the projection reads.
    fn source_columns(&self) -> &'static [&'static str];
    /// Roster row for `source`, or `None` when the record is excluded.
    fn project(&self, source: &SourceRow<'_>, now: DateTime<Utc>) -> Option<Self::Row>;
    /// Lays `row` out under the roster's headers.
    fn to_cells(&self, row: &Self::Row, cols: &Columns) -> Vec<Cell>;
}

/// Attending records plus anyone with a terminal Confirmed/Cancelled status.
#[derive(Debug, Clone, Copy, Default)]
pub struct GuestRosterProjection;

impl Projection for GuestRosterProjection {
    type Row = GuestRow;

    fn target(&self) -> RegenTarget {
        RegenTarget::GuestRoster
    }

    fn source_columns(&self) -> &'static [&'static str] {
        &[schema::NAME, schema::ATTENDING, schema::STATUS]
    }

    fn project(&self, source: &SourceRow<'_>, now: DateTime<Utc>) -> Option<GuestRow> {
        let name = source.name();
        if name.is_empty() {
            return None;
        }
        let status = source.text(schema::STATUS);
        let status = if status.is_empty() { Status::Pending.label().to_string() } else { status };
        let terminal = matches!(
            Status::from_label(&status),
            Some(Status::Confirmed | Status::Cancelled)
        );
        if !(source.attendance().is_attending() || terminal) {
            return None;
        }
        Some(GuestRow {
            name,
            email: source.text(schema::EMAIL),
            phone: source.text(schema::PHONE),
            attending: source.text(schema::ATTENDING),
            guest_count: source.guest_count(),
            guest_names: source.text(schema::GUEST_NAMES),
            status,
            rsvp_date: now,
        })
    }

    fn to_cells(&self, row: &GuestRow, cols: &Columns) -> Vec<Cell> {
        row.to_cells(cols)
    }
}

/// Attending or confirmed records with non-empty dietary text.
#[derive(Debug, Clone, Copy, Default)]
pub struct DietaryRosterProjection;

impl Projection for DietaryRosterProjection {
    type Row = DietaryRow;

    fn target(&self) -> RegenTarget {
        RegenTarget::DietaryRoster
    }

    fn source_columns(&self) -> &'static [&'static str] {
        &[schema::NAME, schema::DIETARY]
    }

    fn project(&self, source: &SourceRow<'_>, now: DateTime<Utc>) -> Option<DietaryRow> {
        let name = source.name();
        let dietary = source.text(schema::DIETARY);
        if name.is_empty() || dietary.trim().is_empty() {
            return None;
        }
        if !(source.attendance().is_attending() || source.status() == Some(Status::Confirmed)) {
            return None;
        }
        Some(DietaryRow {
            name,
            dietary,
            guest_count: source.guest_count(),
            last_updated: now,
        })
    }

    fn to_cells(&self, row: &DietaryRow, cols: &Columns) -> Vec<Cell> {
        row.to_cells(cols)
    }
}
