//! Runtime event stream payloads.

use crate::types::{RegenTarget, StoreKind};

/// Events emitted from the single-writer runtime loop after a write commits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RsvpEvent {
    /// A submission was recorded.
    Upserted {
        /// Submitted name.
        name: String,
        /// True when a new primary log row was created.
        inserted: bool,
    },
    /// Rows were confirmed in `store`.
    Confirmed {
        /// Store the confirmation was issued against.
        store: StoreKind,
        /// Confirmed names, in row order.
        names: Vec<String>,
    },
    /// A roster was rebuilt from the primary log.
    Regenerated {
        /// Rebuilt roster.
        target: RegenTarget,
        /// Data rows written.
        rows: usize,
    },
}
