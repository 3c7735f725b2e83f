//! RSVP domain records, submissions and query summaries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    core::{
        schema::{self, Columns},
        sheet::Cell,
    },
    types::{Attendance, RowIndex, Status},
};

/// Raw submission received from the public form.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Submission {
    /// Participant name; required.
    pub name: String,
    /// Contact email.
    pub email: Option<String>,
    /// Contact phone.
    pub phone: Option<String>,
    /// Attendance answer text (`Y`, `N`, `Maybe`).
    #[serde(alias = "attendance")]
    pub attending: Option<String>,
    /// Guest count text.
    pub guests: Option<String>,
    /// Names of accompanying guests.
    pub guest_names: Option<String>,
    /// Dietary restrictions.
    pub dietary: Option<String>,
    /// Free-form comments.
    pub comments: Option<String>,
}

impl Submission {
    /// Submission with only a name set.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Parsed attendance; absent text is [`Attendance::NoResponse`].
    pub fn attendance(&self) -> Attendance {
        self.attending
            .as_deref()
            .map_or(Attendance::NoResponse, Attendance::parse_lenient)
    }

    /// Guest count coerced to a positive integer.
    pub fn guest_count(&self) -> u32 {
        self.guests.as_deref().map_or(1, coerce_guest_count)
    }

    /// Dietary text when it has visible content.
    pub fn dietary_text(&self) -> Option<&str> {
        self.dietary.as_deref().filter(|d| !d.trim().is_empty())
    }
}

/// Parses the leading digits of `text`; anything that does not yield a positive
/// count becomes 1.
pub fn coerce_guest_count(text: &str) -> u32 {
    let digits: String = text
        .trim()
        .chars()
        .take_while(char::is_ascii_digit)
        .collect();
    match digits.parse::<u32>() {
        Ok(n) if n >= 1 => n,
        _ => 1,
    }
}

/// Guest count stored in a cell, coerced the same way as submitted text.
pub fn guest_count_from_cell(cell: Option<&Cell>) -> u32 {
    match cell {
        Some(Cell::Int(n)) if *n >= 1 => u32::try_from(*n).unwrap_or(u32::MAX),
        Some(Cell::Int(_)) | None => 1,
        Some(other) => coerce_guest_count(&other.as_text()),
    }
}

/// Full record as written to the primary log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogRecord {
    /// Submission time.
    pub submitted_at: DateTime<Utc>,
    /// Participant name.
    pub name: String,
    /// Contact email.
    pub email: String,
    /// Contact phone.
    pub phone: String,
    /// Attendance answer.
    pub attendance: Attendance,
    /// Positive guest count.
    pub guest_count: u32,
    /// Accompanying guests.
    pub guest_names: String,
    /// Dietary restrictions.
    pub dietary: String,
    /// Comments.
    pub comments: String,
    /// Time of the latest RSVP.
    pub last_rsvp_at: DateTime<Utc>,
    /// Whether a follow-up was sent. Tracked only.
    pub follow_up_sent: bool,
    /// Resolved status.
    pub status: Status,
}

impl LogRecord {
    /// Record built from `sub` at `now` with the given resolved status.
    pub fn from_submission(sub: &Submission, status: Status, now: DateTime<Utc>) -> Self {
        Self {
            submitted_at: now,
            name: sub.name.clone(),
            email: sub.email.clone().unwrap_or_default(),
            phone: sub.phone.clone().unwrap_or_default(),
            attendance: sub.attendance(),
            guest_count: sub.guest_count(),
            guest_names: sub.guest_names.clone().unwrap_or_default(),
            dietary: sub.dietary.clone().unwrap_or_default(),
            comments: sub.comments.clone().unwrap_or_default(),
            last_rsvp_at: now,
            follow_up_sent: false,
            status,
        }
    }

    /// Row laid out by `cols`.
    pub fn to_cells(&self, cols: &Columns) -> Vec<Cell> {
        cols.build_row(vec![
            (schema::TIMESTAMP, Cell::Time(self.submitted_at)),
            (schema::NAME, Cell::text(self.name.as_str())),
            (schema::EMAIL, Cell::text(self.email.as_str())),
            (schema::PHONE, Cell::text(self.phone.as_str())),
            (schema::ATTENDING, Cell::text(self.attendance.label())),
            (schema::GUESTS, Cell::Int(i64::from(self.guest_count))),
            (schema::GUEST_NAMES, Cell::text(self.guest_names.as_str())),
            (schema::DIETARY, Cell::text(self.dietary.as_str())),
            (schema::COMMENTS, Cell::text(self.comments.as_str())),
            (schema::RSVP_DATE, Cell::Time(self.last_rsvp_at)),
            (schema::FOLLOW_UP, Cell::Bool(self.follow_up_sent)),
            (schema::STATUS, Cell::text(self.status.label())),
        ])
    }
}

/// Guest roster projection of a record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuestRow {
    /// Participant name.
    pub name: String,
    /// Contact email.
    pub email: String,
    /// Contact phone.
    pub phone: String,
    /// Attendance label as stored.
    pub attending: String,
    /// Positive guest count.
    pub guest_count: u32,
    /// Accompanying guests.
    pub guest_names: String,
    /// Status label as stored.
    pub status: String,
    /// Time of the latest RSVP or rebuild.
    pub rsvp_date: DateTime<Utc>,
}

impl GuestRow {
    /// Row laid out by `cols`.
    pub fn to_cells(&self, cols: &Columns) -> Vec<Cell> {
        cols.build_row(vec![
            (schema::NAME, Cell::text(self.name.as_str())),
            (schema::EMAIL, Cell::text(self.email.as_str())),
            (schema::PHONE, Cell::text(self.phone.as_str())),
            (schema::ATTENDING, Cell::text(self.attending.as_str())),
            (schema::GUESTS, Cell::Int(i64::from(self.guest_count))),
            (schema::GUEST_NAMES, Cell::text(self.guest_names.as_str())),
            (schema::STATUS, Cell::text(self.status.as_str())),
            (schema::RSVP_DATE, Cell::Time(self.rsvp_date)),
        ])
    }
}

/// Dietary roster projection of a record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DietaryRow {
    /// Participant name.
    pub name: String,
    /// Dietary restrictions.
    pub dietary: String,
    /// Positive guest count.
    pub guest_count: u32,
    /// Time of the latest update or rebuild.
    pub last_updated: DateTime<Utc>,
}

impl DietaryRow {
    /// Row laid out by `cols`.
    pub fn to_cells(&self, cols: &Columns) -> Vec<Cell> {
        cols.build_row(vec![
            (schema::NAME, Cell::text(self.name.as_str())),
            (schema::DIETARY, Cell::text(self.dietary.as_str())),
            (schema::GUESTS, Cell::Int(i64::from(self.guest_count))),
            (schema::LAST_UPDATED, Cell::Time(self.last_updated)),
        ])
    }
}

/// One primary log row as returned by queries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordSummary {
    /// Participant name.
    pub name: String,
    /// Attendance text as stored.
    pub attending: String,
    /// Status text as stored.
    pub status: String,
    /// Guest count.
    pub guests: u32,
    /// Row in the primary log.
    pub row: RowIndex,
}

/// Aggregate counts over the primary log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    /// Rows with a non-empty name.
    pub total: usize,
    /// Status `Confirmed`.
    pub confirmed: usize,
    /// Status `Pending`.
    pub pending: usize,
    /// Attendance `Maybe`, independent of status.
    pub maybe: usize,
    /// Any cancelled status.
    pub cancelled: usize,
    /// Sum of guest counts over confirmed rows.
    pub total_guests: u64,
}
