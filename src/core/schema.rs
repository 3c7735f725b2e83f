//! Header schemas and header-name column resolution.

use hashbrown::HashMap;

use crate::{
    core::sheet::Cell,
    error::{RsvpError, RsvpResult},
    types::{ColIndex, StoreKind},
};

// Header names, shared across stores where the column means the same thing.

/// First submission time.
pub const TIMESTAMP: &str = "Timestamp";
/// Participant name; the matching key.
pub const NAME: &str = "Name";
/// Contact email.
pub const EMAIL: &str = "Email";
/// Contact phone.
pub const PHONE: &str = "Phone";
/// Attendance answer text.
pub const ATTENDING: &str = "Attending";
/// Party size.
pub const GUESTS: &str = "Number of Guests";
/// Names of accompanying guests.
pub const GUEST_NAMES: &str = "Guest Names";
/// Dietary restriction text.
pub const DIETARY: &str = "Dietary Restrictions";
/// Free-form comments.
pub const COMMENTS: &str = "Comments";
/// Time of the latest submission.
pub const RSVP_DATE: &str = "RSVP Date";
/// Whether a follow-up was sent.
pub const FOLLOW_UP: &str = "Follow-up Sent";
/// Lifecycle status label.
pub const STATUS: &str = "Status";
/// Time the dietary row was written.
pub const LAST_UPDATED: &str = "Last Updated";

/// Primary log header row.
pub const PRIMARY_LOG_HEADERS: [&str; 12] = [
    TIMESTAMP,
    NAME,
    EMAIL,
    PHONE,
    ATTENDING,
    GUESTS,
    GUEST_NAMES,
    DIETARY,
    COMMENTS,
    RSVP_DATE,
    FOLLOW_UP,
    STATUS,
];

/// Guest roster header row.
pub const GUEST_ROSTER_HEADERS: [&str; 8] =
    [NAME, EMAIL, PHONE, ATTENDING, GUESTS, GUEST_NAMES, STATUS, RSVP_DATE];

/// Dietary roster header row.
pub const DIETARY_ROSTER_HEADERS: [&str; 4] = [NAME, DIETARY, GUESTS, LAST_UPDATED];

/// Default header row for `kind`.
pub fn headers_for(kind: StoreKind) -> &'static [&'static str] {
    match kind {
        StoreKind::PrimaryLog => &PRIMARY_LOG_HEADERS,
        StoreKind::GuestRoster => &GUEST_ROSTER_HEADERS,
        StoreKind::DietaryRoster => &DIETARY_ROSTER_HEADERS,
    }
}

/// Column positions resolved from a sheet's header row.
#[derive(Debug, Clone, Default)]
pub struct Columns {
    store: String,
    width: usize,
    by_name: HashMap<String, ColIndex>,
}

impl Columns {
    /// Resolves positions from `header`. The first occurrence of a name wins.
    pub fn resolve(store: &str, header: &[Cell]) -> Self {
        let mut by_name = HashMap::new();
        for (idx, cell) in header.iter().enumerate() {
            let text = cell.as_text();
            if !text.is_empty() {
                by_name.entry(text.into_owned()).or_insert(idx);
            }
        }
        Self {
            store: store.to_string(),
            width: header.len(),
            by_name,
        }
    }

    /// Resolves positions from the first row of `rows`, or an empty header.
    pub fn from_rows(store: &str, rows: &[Vec<Cell>], header_row: usize) -> Self {
        Self::resolve(store, rows.get(header_row).map(Vec::as_slice).unwrap_or(&[]))
    }

    /// Position of `name`, if the header has it.
    pub fn get(&self, name: &str) -> Option<ColIndex> {
        self.by_name.get(name).copied()
    }

    /// Position of `name`, or [`RsvpError::NotFound`].
    pub fn require(&self, name: &str) -> RsvpResult<ColIndex> {
        self.get(name).ok_or_else(|| {
            RsvpError::NotFound(format!("column '{name}' in sheet '{}'", self.store))
        })
    }

    /// Fails unless every name in `names` is present.
    pub fn require_all(&self, names: &[&str]) -> RsvpResult<()> {
        for name in names {
            self.require(name)?;
        }
        Ok(())
    }

    /// Number of header cells.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Cell of `row` under header `name`, or an empty cell.
    pub fn cell<'a>(&self, row: &'a [Cell], name: &str) -> Option<&'a Cell> {
        self.get(name).and_then(|idx| row.get(idx))
    }

    /// Display text of `row` under header `name`.
    pub fn text(&self, row: &[Cell], name: &str) -> String {
        self.cell(row, name)
            .map(|c| c.as_text().into_owned())
            .unwrap_or_default()
    }

    /// Builds a full-width row from `(header, cell)` pairs; unknown headers are
    /// dropped.
    pub fn build_row(&self, values: Vec<(&str, Cell)>) -> Vec<Cell> {
        let mut row = vec![Cell::Empty; self.width];
        for (name, cell) in values {
            if let Some(idx) = self.get(name) {
                row[idx] = cell;
            }
        }
        row
    }
}

/// Header row cells for `kind`.
pub fn header_cells(kind: StoreKind) -> Vec<Cell> {
    headers_for(kind).iter().map(|h| Cell::text(*h)).collect()
}
