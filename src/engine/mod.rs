//! Reconciliation engines over the three stores.

/// Batch and single-row confirmation with cross-store propagation.
pub mod confirm;
/// Per-store outcome types.
pub mod outcome;
/// Roster regeneration from the primary log.
pub mod projector;
/// Read-only stats and filters.
pub mod query;
/// Status state machine.
pub mod status;
/// Roster projection trait and the two roster projections.
pub mod traits;
/// Single-submission upsert across the three stores.
pub mod upsert;
