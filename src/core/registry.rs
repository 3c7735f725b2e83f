//! The synchronous facade over the three stores.

use std::sync::Arc;

use chrono::Utc;
use tracing::{error, info};

use crate::{
    config::{EventDetails, RsvpConfig},
    core::workbook::Workbook,
    engine::{
        confirm::{self, RowRange},
        outcome::{ConfirmOutcome, RegenerateOutcome, UpsertOutcome},
        projector,
        query,
        traits::{DietaryRosterProjection, GuestRosterProjection},
        upsert,
    },
    error::{Response, RsvpResult},
    rsvp::{RecordSummary, Stats, Submission},
    types::{RegenTarget, RowIndex, StatusFilter, StoreKind},
};

/// Owner of the workbook and configuration. Every host entry point goes
/// through here.
pub struct RsvpRegistry {
    config: Arc<RsvpConfig>,
    book: Workbook,
}

impl RsvpRegistry {
    /// Registry over an already opened workbook. The layout is not checked.
    pub fn new(config: RsvpConfig, book: Workbook) -> Self {
        Self {
            config: Arc::new(config),
            book,
        }
    }

    /// Registry over three fresh in-memory sheets with their layout written.
    pub fn in_memory(config: RsvpConfig) -> RsvpResult<Self> {
        let book = Workbook::in_memory(&config);
        let mut registry = Self::new(config, book);
        registry.ensure_layout()?;
        Ok(registry)
    }

    /// Active configuration.
    pub fn config(&self) -> &RsvpConfig {
        &self.config
    }

    /// The three stores.
    pub fn workbook(&self) -> &Workbook {
        &self.book
    }

    /// Direct store access for host edits.
    pub fn workbook_mut(&mut self) -> &mut Workbook {
        &mut self.book
    }

    /// Writes the header and caption rows of any store that lacks them.
    /// Returns the stores that were laid out.
    pub fn ensure_layout(&mut self) -> RsvpResult<Vec<StoreKind>> {
        self.book.ensure_layout(&self.config)
    }

    /// Records a submission across all three stores.
    pub fn upsert(&mut self, sub: &Submission) -> RsvpResult<UpsertOutcome> {
        upsert::validate(sub)?;
        self.ensure_layout()?;
        upsert::upsert(&mut self.book, &self.config, sub, Utc::now())
    }

    /// [`RsvpRegistry::upsert`] folded into the host reply shape.
    pub fn submit(&mut self, sub: &Submission) -> Response {
        match self.upsert(sub) {
            Ok(outcome) => outcome.response(),
            Err(err) => {
                error!(name = %sub.name, error = %err, "error saving RSVP");
                Response::from(&err)
            }
        }
    }

    /// Rebuilds one roster from the primary log.
    pub fn regenerate(&mut self, target: RegenTarget) -> RsvpResult<RegenerateOutcome> {
        self.ensure_layout()?;
        let now = Utc::now();
        match target {
            RegenTarget::GuestRoster => {
                projector::regenerate(&mut self.book, &self.config, &GuestRosterProjection, now)
            }
            RegenTarget::DietaryRoster => {
                projector::regenerate(&mut self.book, &self.config, &DietaryRosterProjection, now)
            }
        }
    }

    /// Rebuilds the guest roster, then the dietary roster.
    pub fn regenerate_all(&mut self) -> RsvpResult<Vec<RegenerateOutcome>> {
        let outcomes = vec![
            self.regenerate(RegenTarget::GuestRoster)?,
            self.regenerate(RegenTarget::DietaryRoster)?,
        ];
        info!("all rosters regenerated");
        Ok(outcomes)
    }

    /// Confirms the attending rows inside `ranges` of `store`.
    pub fn confirm_selection(&mut self, store: StoreKind, ranges: &[RowRange]) -> RsvpResult<ConfirmOutcome> {
        confirm::confirm_selection(&mut self.book, &self.config, store, ranges)
    }

    /// Confirms primary log row `row` regardless of its answer.
    pub fn confirm_by_row(&mut self, row: RowIndex) -> RsvpResult<ConfirmOutcome> {
        confirm::confirm_by_row(&mut self.book, &self.config, row)
    }

    /// Counts over the primary log.
    pub fn stats(&self) -> RsvpResult<Stats> {
        query::stats(&self.book, &self.config)
    }

    /// Named primary log rows matching `filter`.
    pub fn by_status(&self, filter: StatusFilter) -> RsvpResult<Vec<RecordSummary>> {
        query::by_status(&self.book, &self.config, filter)
    }

    /// Every named primary log row.
    pub fn existing_rsvps(&self) -> RsvpResult<Vec<RecordSummary>> {
        self.by_status(StatusFilter::All)
    }

    /// Names with a `Confirmed` primary log status.
    pub fn confirmed_names(&self) -> RsvpResult<Vec<String>> {
        let names = query::confirmed_names(&self.book, &self.config)?;
        info!(count = names.len(), "confirmed RSVPs listed");
        Ok(names)
    }

    /// Display details for the event.
    pub fn event_details(&self) -> &EventDetails {
        &self.config.event
    }

    /// Flushes every store to durable storage.
    pub fn flush(&mut self) -> RsvpResult<()> {
        self.book.flush()
    }
}
