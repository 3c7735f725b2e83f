//! Rebuilds a roster from the primary log.

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::{
    config::RsvpConfig,
    core::workbook::Workbook,
    error::RsvpResult,
    types::StoreKind,
};

use super::{
    outcome::RegenerateOutcome,
    traits::{Projection, SourceRow},
};

/// Rows `projection` would derive from the current primary log, in log order.
pub fn derive<P: Projection>(
    book: &Workbook,
    config: &RsvpConfig,
    projection: &P,
    now: DateTime<Utc>,
) -> RsvpResult<Vec<P::Row>> {
    let (rows, cols) = book.load(StoreKind::PrimaryLog, config)?;
    cols.require_all(projection.source_columns())?;

    Ok(rows
        .iter()
        .skip(config.data_start_row())
        .filter_map(|cells| projection.project(&SourceRow { cells, cols: &cols }, now))
        .collect())
}

/// Replaces every data row of the projection's target with rows derived from the
/// primary log. Every written row is stamped with `now`.
pub fn regenerate<P: Projection>(
    book: &mut Workbook,
    config: &RsvpConfig,
    projection: &P,
    now: DateTime<Utc>,
) -> RsvpResult<RegenerateOutcome> {
    let target = projection.target();
    let derived = derive(book, config, projection, now)?;

    let (existing, cols) = book.load(StoreKind::from(target), config)?;
    cols.require(crate::core::schema::NAME)?;

    let data_start = config.data_start_row();
    let sheet = book.sheet_mut(StoreKind::from(target));
    if existing.len() > data_start {
        sheet.clear_range(data_start, existing.len())?;
        debug!(sheet = sheet.name(), cleared = existing.len() - data_start, "cleared roster rows");
    }
    for (offset, row) in derived.iter().enumerate() {
        sheet.write_row(data_start + offset, &projection.to_cells(row, &cols))?;
    }

    info!(target = ?target, rows = derived.len(), "roster regenerated");
    Ok(RegenerateOutcome {
        target,
        rows_written: derived.len(),
    })
}
