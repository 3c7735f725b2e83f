//! Status state machine.

use crate::types::{Attendance, Status};

/// Store whose status machine is being advanced. The two stores label a
/// withdrawal after confirmation differently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusContext {
    /// Primary log: withdrawal after confirmation is plain `Cancelled`.
    PrimaryLog,
    /// Guest roster: withdrawal after confirmation keeps its provenance.
    GuestRoster,
}

/// Next status for a record given its previous status in the same store and the
/// newly submitted attendance.
///
/// `Confirmed` survives any attending re-submission, so a confirmed guest can edit
/// details without losing confirmation. It never falls back to `Pending`.
pub fn resolve(previous: Option<Status>, attendance: Attendance, context: StatusContext) -> Status {
    match (previous, context) {
        (Some(Status::Confirmed), _) if attendance.is_attending() => Status::Confirmed,
        (Some(Status::Confirmed), StatusContext::PrimaryLog) => match attendance {
            Attendance::No => Status::Cancelled,
            _ => Status::Confirmed,
        },
        (Some(Status::Confirmed), StatusContext::GuestRoster) => Status::CancelledPreviouslyConfirmed,
        _ if attendance.is_attending() => Status::Pending,
        _ => Status::Cancelled,
    }
}
