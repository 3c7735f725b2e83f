//! Store adapters, header schemas and record lookup.

/// Case-insensitive record matcher.
pub mod matcher;
/// Authoritative registry exposing every host entry point.
pub mod registry;
/// Header names and column resolution.
pub mod schema;
/// Store adapter trait and in-memory sheet.
pub mod sheet;
/// The three stores grouped together.
pub mod workbook;
