//! Explicit host confirmation of selected rows.

use hashbrown::HashSet;
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use crate::{
    config::RsvpConfig,
    core::{
        matcher, schema,
        sheet::Cell,
        workbook::Workbook,
    },
    error::{RsvpError, RsvpResult},
    types::{Attendance, RowIndex, Status, StoreKind},
};

use super::outcome::{ConfirmOutcome, Propagation, PropagationResult};

/// A contiguous block of selected rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowRange {
    /// First selected row.
    pub start: RowIndex,
    /// Number of selected rows.
    pub rows: usize,
}

impl RowRange {
    /// Range of `rows` rows starting at `start`.
    pub fn new(start: RowIndex, rows: usize) -> Self {
        Self { start, rows }
    }

    /// Single-row range.
    pub fn single(row: RowIndex) -> Self {
        Self::new(row, 1)
    }
}

/// Sets every attending row in `ranges` of `store` to `Confirmed`, then copies
/// the confirmation to the peer store by name.
///
/// Header and caption rows are clipped out of the selection. Rows with a blank
/// name or a non-attending answer are skipped, and rows past the end of the
/// store are ignored. A row selected twice is confirmed once; names that repeat
/// within the selection are propagated once.
pub fn confirm_selection(
    book: &mut Workbook,
    config: &RsvpConfig,
    store: StoreKind,
    ranges: &[RowRange],
) -> RsvpResult<ConfirmOutcome> {
    let Some(peer) = store.confirmation_peer() else {
        return Err(RsvpError::Validation(format!(
            "Please select RSVPs on either the '{}' or '{}' sheet.",
            config.primary_log.name, config.guest_roster.name
        )));
    };
    if ranges.iter().all(|r| r.rows == 0) {
        return Err(RsvpError::Validation("Please select some rows to confirm.".to_string()));
    }

    let (rows, cols) = book.load(store, config)?;
    cols.require_all(&[schema::NAME, schema::ATTENDING])?;
    let status_col = cols.require(schema::STATUS)?;

    let sheet = book.sheet_mut(store);
    let mut seen: HashSet<RowIndex> = HashSet::new();
    let mut confirmed_names = Vec::new();

    for range in ranges {
        // Clip to the data rows that exist; hosts may send whole-column selections.
        let start = range.start.max(config.data_start_row());
        let end = range.start.saturating_add(range.rows).min(rows.len());
        if start >= end {
            continue;
        }

        for (offset, cells) in rows[start..end].iter().enumerate() {
            let row = start + offset;
            let name = cols.text(cells, schema::NAME);
            if name.is_empty() || !seen.insert(row) {
                continue;
            }
            if !Attendance::parse_lenient(&cols.text(cells, schema::ATTENDING)).is_attending() {
                continue;
            }
            sheet.write_cell(row, status_col, Cell::text(Status::Confirmed.label()))?;
            confirmed_names.push(name);
        }
    }

    info!(store = %store, confirmed = confirmed_names.len(), "selection confirmed");
    let mut propagated = HashSet::new();
    let unique: Vec<String> = confirmed_names
        .iter()
        .filter(|name| propagated.insert(matcher::normalize(name)))
        .cloned()
        .collect();
    let propagation = propagate(book, config, peer, &unique);
    Ok(ConfirmOutcome {
        store,
        confirmed_count: confirmed_names.len(),
        confirmed_names,
        propagation,
    })
}

/// Confirms one primary log row and copies the confirmation to the guest roster.
/// The row's attendance is not checked.
pub fn confirm_by_row(book: &mut Workbook, config: &RsvpConfig, row: RowIndex) -> RsvpResult<ConfirmOutcome> {
    let (rows, cols) = book.load(StoreKind::PrimaryLog, config)?;
    let status_col = cols.require(schema::STATUS)?;
    cols.require(schema::NAME)?;

    let name = rows
        .get(row)
        .filter(|_| row >= config.data_start_row())
        .map(|cells| cols.text(cells, schema::NAME))
        .filter(|name| !name.is_empty())
        .ok_or_else(|| RsvpError::NotFound(format!("RSVP row {row}")))?;

    book.sheet_mut(StoreKind::PrimaryLog)
        .write_cell(row, status_col, Cell::text(Status::Confirmed.label()))?;
    info!(%name, row, "row confirmed");

    let propagation = propagate(book, config, StoreKind::GuestRoster, std::slice::from_ref(&name));
    Ok(ConfirmOutcome {
        store: StoreKind::PrimaryLog,
        confirmed_count: 1,
        confirmed_names: vec![name],
        propagation,
    })
}

/// Best-effort copy of `Confirmed` to the first row matching each name in `peer`.
fn propagate(book: &mut Workbook, config: &RsvpConfig, peer: StoreKind, names: &[String]) -> Vec<Propagation> {
    if names.is_empty() {
        return Vec::new();
    }
    let failed_all = |reason: String| -> Vec<Propagation> {
        names
            .iter()
            .map(|name| Propagation {
                name: name.clone(),
                store: peer,
                result: PropagationResult::Failed(reason.clone()),
            })
            .collect()
    };

    let (rows, cols) = match book.load(peer, config) {
        Ok(loaded) => loaded,
        Err(err) => {
            error!(store = %peer, error = %err, "confirmation propagation failed");
            return failed_all(err.to_string());
        }
    };
    let (name_col, status_col) = match (cols.require(schema::NAME), cols.require(schema::STATUS)) {
        (Ok(n), Ok(s)) => (n, s),
        (Err(err), _) | (_, Err(err)) => {
            error!(store = %peer, error = %err, "confirmation propagation failed");
            return failed_all(err.to_string());
        }
    };

    let sheet = book.sheet_mut(peer);
    names
        .iter()
        .map(|name| {
            let result = match matcher::find(&rows, name_col, config.data_start_row(), name) {
                None => {
                    warn!(store = %peer, %name, "no matching row to propagate confirmation");
                    PropagationResult::NotFound
                }
                Some(row) => match sheet.write_cell(row, status_col, Cell::text(Status::Confirmed.label())) {
                    Ok(()) => PropagationResult::Propagated(row),
                    Err(err) => {
                        error!(store = %peer, %name, error = %err, "confirmation propagation failed");
                        PropagationResult::Failed(err.to_string())
                    }
                },
            };
            Propagation {
                name: name.clone(),
                store: peer,
                result,
            }
        })
        .collect()
}
