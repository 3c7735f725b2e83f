//! Per-store outcomes of engine operations.

use serde::{Deserialize, Serialize};

use crate::{
    error::Response,
    types::{RegenTarget, RowIndex, Status, StoreKind},
};

/// How a row was written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RowChange {
    /// A new row was inserted at this position.
    Inserted(RowIndex),
    /// The existing row at this position was updated.
    Updated(RowIndex),
}

impl RowChange {
    /// Row that was written.
    pub fn row(self) -> RowIndex {
        match self {
            Self::Inserted(row) | Self::Updated(row) => row,
        }
    }
}

/// Why a non-critical step did nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SkipReason {
    /// First-time non-attendee; no roster entry is created.
    NotAttending,
    /// Submission carried no dietary text.
    NoDietaryText,
    /// Attendance and status do not qualify for the dietary roster.
    NotQualified,
}

/// Result of a best-effort step on a derived store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum StepOutcome {
    /// The step wrote a row.
    Applied(RowChange),
    /// The step had nothing to do.
    Skipped(SkipReason),
    /// The step failed; the primary log write stands.
    Failed(String),
}

impl StepOutcome {
    /// True for [`StepOutcome::Failed`].
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}

/// Everything a single upsert did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpsertOutcome {
    /// Submitted name.
    pub name: String,
    /// Primary log row write.
    pub primary_log: RowChange,
    /// Status stored in the primary log.
    pub primary_status: Status,
    /// Guest roster step.
    pub guest_roster: StepOutcome,
    /// Status stored in the guest roster, when a row was written.
    pub guest_status: Option<Status>,
    /// Dietary roster step.
    pub dietary_roster: StepOutcome,
}

impl UpsertOutcome {
    /// True when no derived-store step failed.
    pub fn is_complete(&self) -> bool {
        !self.guest_roster.is_failed() && !self.dietary_roster.is_failed()
    }

    /// Host-facing reply. Derived-store failures do not turn the reply into an
    /// error because the submission itself was recorded.
    pub fn response(&self) -> Response {
        Response::success("Thank you! Your RSVP has been recorded.")
    }
}

/// Rows produced by one regeneration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegenerateOutcome {
    /// Rebuilt store.
    pub target: RegenTarget,
    /// Number of data rows written.
    pub rows_written: usize,
}

/// Result of propagating one confirmation to the peer store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PropagationResult {
    /// Peer row updated.
    Propagated(RowIndex),
    /// Name absent from the peer store.
    NotFound,
    /// Peer write failed.
    Failed(String),
}

/// Propagation of one confirmed name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Propagation {
    /// Confirmed name as read from the acting store.
    pub name: String,
    /// Store the confirmation was copied to.
    pub store: StoreKind,
    /// What happened.
    pub result: PropagationResult,
}

/// Everything a batch confirmation did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfirmOutcome {
    /// Store the selection was made in.
    pub store: StoreKind,
    /// Rows set to `Confirmed` in the acting store.
    pub confirmed_count: usize,
    /// Names of the confirmed rows, in selection order.
    pub confirmed_names: Vec<String>,
    /// Per-name propagation to the peer store.
    pub propagation: Vec<Propagation>,
}

impl ConfirmOutcome {
    /// Host-facing reply.
    pub fn response(&self) -> Response {
        Response::success(format!("Successfully confirmed {} RSVPs.", self.confirmed_count))
    }
}
