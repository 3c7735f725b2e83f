//! Shared primitive types and RSVP enums.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Zero-based row position inside a sheet (row 0 is the header row).
pub type RowIndex = usize;
/// Zero-based column position inside a sheet.
pub type ColIndex = usize;

/// Attendance answer given by a participant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Attendance {
    /// Attending (`Y`).
    Yes,
    /// Not attending (`N`).
    No,
    /// Undecided (`Maybe`).
    Maybe,
    /// No usable answer was given.
    NoResponse,
}

impl Attendance {
    /// Label written into the `Attending` column.
    pub fn label(self) -> &'static str {
        match self {
            Self::Yes => "Y",
            Self::No => "N",
            Self::Maybe => "Maybe",
            Self::NoResponse => "No Response",
        }
    }

    /// Parses submitted or stored attendance text. Blank and unknown text map to
    /// [`Attendance::NoResponse`].
    pub fn parse_lenient(text: &str) -> Self {
        match text.trim().to_ascii_lowercase().as_str() {
            "y" | "yes" => Self::Yes,
            "n" | "no" => Self::No,
            "maybe" => Self::Maybe,
            _ => Self::NoResponse,
        }
    }

    /// True for `Yes` and `Maybe`.
    pub fn is_attending(self) -> bool {
        matches!(self, Self::Yes | Self::Maybe)
    }
}

impl fmt::Display for Attendance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Resolved RSVP status of a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Status {
    /// Awaiting host confirmation.
    Pending,
    /// Confirmed by the host.
    Confirmed,
    /// Withdrawn or never attending.
    Cancelled,
    /// Withdrawn after the host had confirmed (guest roster only).
    CancelledPreviouslyConfirmed,
}

impl Status {
    /// Label written into the `Status` column.
    pub fn label(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Confirmed => "Confirmed",
            Self::Cancelled => "Cancelled",
            Self::CancelledPreviouslyConfirmed => "Cancelled (Previously Confirmed)",
        }
    }

    /// Parses an exact status label; returns `None` for anything else.
    pub fn from_label(text: &str) -> Option<Self> {
        match text {
            "Pending" => Some(Self::Pending),
            "Confirmed" => Some(Self::Confirmed),
            "Cancelled" => Some(Self::Cancelled),
            "Cancelled (Previously Confirmed)" => Some(Self::CancelledPreviouslyConfirmed),
            _ => None,
        }
    }

    /// True for both cancelled variants.
    pub fn is_cancelled(self) -> bool {
        matches!(self, Self::Cancelled | Self::CancelledPreviouslyConfirmed)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// True when free-form status text counts as cancelled (exact `Cancelled` or any
/// text mentioning it).
pub fn status_text_is_cancelled(text: &str) -> bool {
    text.contains("Cancelled")
}

/// One of the three tabular stores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StoreKind {
    /// Source-of-truth submission log.
    PrimaryLog,
    /// Derived roster of relevant attendees.
    GuestRoster,
    /// Derived roster of dietary needs.
    DietaryRoster,
}

impl StoreKind {
    /// All stores in dependency order.
    pub const ALL: [StoreKind; 3] = [Self::PrimaryLog, Self::GuestRoster, Self::DietaryRoster];

    /// The store a batch confirmation propagates to, if any.
    pub fn confirmation_peer(self) -> Option<StoreKind> {
        match self {
            Self::PrimaryLog => Some(Self::GuestRoster),
            Self::GuestRoster => Some(Self::PrimaryLog),
            Self::DietaryRoster => None,
        }
    }
}

impl fmt::Display for StoreKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::PrimaryLog => "primary log",
            Self::GuestRoster => "guest roster",
            Self::DietaryRoster => "dietary roster",
        };
        f.write_str(name)
    }
}

/// Derived store that can be rebuilt from the primary log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RegenTarget {
    /// Rebuild the guest roster.
    GuestRoster,
    /// Rebuild the dietary roster.
    DietaryRoster,
}

impl From<RegenTarget> for StoreKind {
    fn from(value: RegenTarget) -> Self {
        match value {
            RegenTarget::GuestRoster => StoreKind::GuestRoster,
            RegenTarget::DietaryRoster => StoreKind::DietaryRoster,
        }
    }
}

/// Filter accepted by the status query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusFilter {
    /// Every named row.
    All,
    /// Status `Pending`.
    Pending,
    /// Status `Confirmed`.
    Confirmed,
    /// Any cancelled status.
    Cancelled,
    /// Attendance `Maybe`, regardless of status.
    Maybe,
}

impl FromStr for StatusFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(Self::All),
            "pending" => Ok(Self::Pending),
            "confirmed" => Ok(Self::Confirmed),
            "cancelled" => Ok(Self::Cancelled),
            "maybe" => Ok(Self::Maybe),
            other => Err(format!("unknown status filter: {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attendance_parse_is_lenient() {
        assert_eq!(Attendance::parse_lenient("Y"), Attendance::Yes);
        assert_eq!(Attendance::parse_lenient(" yes "), Attendance::Yes);
        assert_eq!(Attendance::parse_lenient("N"), Attendance::No);
        assert_eq!(Attendance::parse_lenient("MAYBE"), Attendance::Maybe);
        assert_eq!(Attendance::parse_lenient(""), Attendance::NoResponse);
        assert_eq!(Attendance::parse_lenient("No Response"), Attendance::NoResponse);
    }

    #[test]
    fn status_labels_round_trip() {
        for status in [
            Status::Pending,
            Status::Confirmed,
            Status::Cancelled,
            Status::CancelledPreviouslyConfirmed,
        ] {
            assert_eq!(Status::from_label(status.label()), Some(status));
        }
        assert_eq!(Status::from_label("confirmed"), None);
    }

    #[test]
    fn cancelled_text_matches_both_variants() {
        assert!(status_text_is_cancelled("Cancelled"));
        assert!(status_text_is_cancelled("Cancelled (Previously Confirmed)"));
        assert!(!status_text_is_cancelled("Pending"));
    }

    #[test]
    fn status_filter_parses() {
        assert_eq!("Maybe".parse::<StatusFilter>(), Ok(StatusFilter::Maybe));
        assert!("unknown".parse::<StatusFilter>().is_err());
    }
}
