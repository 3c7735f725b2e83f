//! Read-only views over the primary log.

use crate::{
    config::RsvpConfig,
    core::{
        schema::{self, Columns},
        sheet::Cell,
        workbook::Workbook,
    },
    error::RsvpResult,
    rsvp::{guest_count_from_cell, RecordSummary, Stats},
    types::{status_text_is_cancelled, Attendance, RowIndex, Status, StatusFilter, StoreKind},
};

fn named_rows<'a>(
    rows: &'a [Vec<Cell>],
    cols: &'a Columns,
    config: &RsvpConfig,
) -> impl Iterator<Item = (RowIndex, &'a [Cell])> + 'a {
    rows.iter()
        .enumerate()
        .skip(config.data_start_row())
        .filter(move |(_, cells)| !cols.text(cells, schema::NAME).is_empty())
        .map(|(idx, cells)| (idx, cells.as_slice()))
}

fn is_maybe(cols: &Columns, cells: &[Cell]) -> bool {
    Attendance::parse_lenient(&cols.text(cells, schema::ATTENDING)) == Attendance::Maybe
}

/// Counts over every named primary log row.
pub fn stats(book: &Workbook, config: &RsvpConfig) -> RsvpResult<Stats> {
    let (rows, cols) = book.load(StoreKind::PrimaryLog, config)?;
    cols.require_all(&[schema::NAME, schema::ATTENDING, schema::STATUS, schema::GUESTS])?;

    let mut stats = Stats::default();
    for (_, cells) in named_rows(&rows, &cols, config) {
        stats.total += 1;
        let status = cols.text(cells, schema::STATUS);
        match Status::from_label(&status) {
            Some(Status::Confirmed) => {
                stats.confirmed += 1;
                stats.total_guests += u64::from(guest_count_from_cell(cols.cell(cells, schema::GUESTS)));
            }
            Some(Status::Pending) => stats.pending += 1,
            _ if status_text_is_cancelled(&status) => stats.cancelled += 1,
            _ => {}
        }
        if is_maybe(&cols, cells) {
            stats.maybe += 1;
        }
    }
    Ok(stats)
}

/// Named primary log rows matching `filter`, in log order.
pub fn by_status(book: &Workbook, config: &RsvpConfig, filter: StatusFilter) -> RsvpResult<Vec<RecordSummary>> {
    let (rows, cols) = book.load(StoreKind::PrimaryLog, config)?;
    cols.require_all(&[schema::NAME, schema::ATTENDING, schema::STATUS])?;

    Ok(named_rows(&rows, &cols, config)
        .filter(|(_, cells)| {
            let status = cols.text(cells, schema::STATUS);
            match filter {
                StatusFilter::All => true,
                StatusFilter::Pending => status == Status::Pending.label(),
                StatusFilter::Confirmed => status == Status::Confirmed.label(),
                StatusFilter::Cancelled => status_text_is_cancelled(&status),
                StatusFilter::Maybe => is_maybe(&cols, cells),
            }
        })
        .map(|(row, cells)| RecordSummary {
            name: cols.text(cells, schema::NAME),
            attending: cols.text(cells, schema::ATTENDING),
            status: cols.text(cells, schema::STATUS),
            guests: guest_count_from_cell(cols.cell(cells, schema::GUESTS)),
            row,
        })
        .collect())
}

/// Names of confirmed primary log rows, in log order.
pub fn confirmed_names(book: &Workbook, config: &RsvpConfig) -> RsvpResult<Vec<String>> {
    Ok(by_status(book, config, StatusFilter::Confirmed)?
        .into_iter()
        .map(|summary| summary.name)
        .collect())
}
