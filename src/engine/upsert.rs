//! Applies one submission to the primary log and both rosters.

use chrono::{DateTime, Utc};
use tracing::{debug, error, info};

use crate::{
    config::RsvpConfig,
    core::{
        matcher,
        schema::{self, Columns},
        sheet::Cell,
        workbook::Workbook,
    },
    error::{RsvpError, RsvpResult},
    rsvp::{DietaryRow, GuestRow, LogRecord, Submission},
    types::{Attendance, RowIndex, Status, StoreKind},
};

use super::{
    outcome::{RowChange, SkipReason, StepOutcome, UpsertOutcome},
    status::{resolve, StatusContext},
};

/// Rejects a submission with a blank name.
pub fn validate(sub: &Submission) -> RsvpResult<()> {
    if sub.name.trim().is_empty() {
        return Err(RsvpError::Validation("Name is required".to_string()));
    }
    Ok(())
}

/// Records `sub` at `now`.
///
/// The primary log write is the only step that can fail the call. Guest and
/// dietary roster failures are logged and reported in the outcome.
pub fn upsert(
    book: &mut Workbook,
    config: &RsvpConfig,
    sub: &Submission,
    now: DateTime<Utc>,
) -> RsvpResult<UpsertOutcome> {
    validate(sub)?;
    let attendance = sub.attendance();

    let (primary_log, primary_status) = write_primary_log(book, config, sub, now)?;
    info!(
        name = %sub.name,
        row = primary_log.row(),
        status = %primary_status,
        "primary log updated"
    );

    let (guest_roster, guest_status) = match write_guest_roster(book, config, sub, attendance, now) {
        Ok(done) => done,
        Err(err) => {
            error!(name = %sub.name, error = %err, "guest roster update failed");
            (StepOutcome::Failed(err.to_string()), None)
        }
    };

    let dietary_roster = match sub.dietary_text() {
        None => StepOutcome::Skipped(SkipReason::NoDietaryText),
        Some(_) if !(attendance.is_attending() || primary_status == Status::Confirmed) => {
            StepOutcome::Skipped(SkipReason::NotQualified)
        }
        Some(text) => match write_dietary_roster(book, config, sub, text, now) {
            Ok(change) => StepOutcome::Applied(change),
            Err(err) => {
                error!(name = %sub.name, error = %err, "dietary roster update failed");
                StepOutcome::Failed(err.to_string())
            }
        },
    };

    Ok(UpsertOutcome {
        name: sub.name.clone(),
        primary_log,
        primary_status,
        guest_roster,
        guest_status,
        dietary_roster,
    })
}

fn prior_status(rows: &[Vec<Cell>], cols: &Columns, row: Option<RowIndex>) -> Option<Status> {
    row.and_then(|r| rows.get(r))
        .and_then(|cells| Status::from_label(&cols.text(cells, schema::STATUS)))
}

/// Writes `cells` over `existing`, or inserts them directly below the caption row.
fn write_at_top(
    book: &mut Workbook,
    config: &RsvpConfig,
    kind: StoreKind,
    existing: Option<RowIndex>,
    cells: &[Cell],
) -> RsvpResult<RowChange> {
    let sheet = book.sheet_mut(kind);
    match existing {
        Some(row) => {
            sheet.write_row(row, cells)?;
            Ok(RowChange::Updated(row))
        }
        None => {
            sheet.insert_row_after(config.caption_row)?;
            let row = config.data_start_row();
            sheet.write_row(row, cells)?;
            Ok(RowChange::Inserted(row))
        }
    }
}

fn write_primary_log(
    book: &mut Workbook,
    config: &RsvpConfig,
    sub: &Submission,
    now: DateTime<Utc>,
) -> RsvpResult<(RowChange, Status)> {
    let (rows, cols) = book.load(StoreKind::PrimaryLog, config)?;
    let name_col = cols.require(schema::NAME)?;
    cols.require(schema::STATUS)?;

    let existing = matcher::find(&rows, name_col, config.data_start_row(), &sub.name);
    let previous = prior_status(&rows, &cols, existing);
    let status = resolve(previous, sub.attendance(), StatusContext::PrimaryLog);
    debug!(name = %sub.name, ?existing, ?previous, %status, "resolved primary log status");

    let mut record = LogRecord::from_submission(sub, status, now);
    if let Some(cells) = existing.and_then(|r| rows.get(r)) {
        if let Some(Cell::Time(first)) = cols.cell(cells, schema::TIMESTAMP) {
            record.submitted_at = *first;
        }
        if let Some(Cell::Bool(sent)) = cols.cell(cells, schema::FOLLOW_UP) {
            record.follow_up_sent = *sent;
        }
    }

    let change = write_at_top(book, config, StoreKind::PrimaryLog, existing, &record.to_cells(&cols))?;
    Ok((change, status))
}

fn write_guest_roster(
    book: &mut Workbook,
    config: &RsvpConfig,
    sub: &Submission,
    attendance: Attendance,
    now: DateTime<Utc>,
) -> RsvpResult<(StepOutcome, Option<Status>)> {
    let (rows, cols) = book.load(StoreKind::GuestRoster, config)?;
    let name_col = cols.require(schema::NAME)?;
    let status_col = cols.require(schema::STATUS)?;
    let attending_col = cols.require(schema::ATTENDING)?;

    let existing = matcher::find(&rows, name_col, config.data_start_row(), &sub.name);
    let previous = prior_status(&rows, &cols, existing);
    let status = resolve(previous, attendance, StatusContext::GuestRoster);
    debug!(name = %sub.name, ?existing, ?previous, %status, "resolved guest roster status");

    if !attendance.is_attending() {
        let Some(row) = existing else {
            return Ok((StepOutcome::Skipped(SkipReason::NotAttending), None));
        };
        let sheet = book.sheet_mut(StoreKind::GuestRoster);
        sheet.write_cell(row, attending_col, Cell::text(attendance.label()))?;
        sheet.write_cell(row, status_col, Cell::text(status.label()))?;
        if let Some(date_col) = cols.get(schema::RSVP_DATE) {
            sheet.write_cell(row, date_col, Cell::Time(now))?;
        }
        return Ok((StepOutcome::Applied(RowChange::Updated(row)), Some(status)));
    }

    let guest = GuestRow {
        name: sub.name.clone(),
        email: sub.email.clone().unwrap_or_default(),
        phone: sub.phone.clone().unwrap_or_default(),
        attending: attendance.label().to_string(),
        guest_count: sub.guest_count(),
        guest_names: sub.guest_names.clone().unwrap_or_default(),
        status: status.label().to_string(),
        rsvp_date: now,
    };
    let change = write_at_top(book, config, StoreKind::GuestRoster, existing, &guest.to_cells(&cols))?;
    Ok((StepOutcome::Applied(change), Some(status)))
}

fn write_dietary_roster(
    book: &mut Workbook,
    config: &RsvpConfig,
    sub: &Submission,
    dietary: &str,
    now: DateTime<Utc>,
) -> RsvpResult<RowChange> {
    let (rows, cols) = book.load(StoreKind::DietaryRoster, config)?;
    let name_col = cols.require(schema::NAME)?;

    let existing = matcher::find(&rows, name_col, config.data_start_row(), &sub.name);
    let cells = DietaryRow {
        name: sub.name.clone(),
        dietary: dietary.to_string(),
        guest_count: sub.guest_count(),
        last_updated: now,
    }
    .to_cells(&cols);

    let sheet = book.sheet_mut(StoreKind::DietaryRoster);
    match existing {
        Some(row) => {
            sheet.write_row(row, &cells)?;
            Ok(RowChange::Updated(row))
        }
        None => {
            let row = rows.len().max(config.data_start_row());
            sheet.insert_row_after(row - 1)?;
            sheet.write_row(row, &cells)?;
            Ok(RowChange::Inserted(row))
        }
    }
}
