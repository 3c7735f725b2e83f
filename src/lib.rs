//! RSVP record-keeping over three tabular stores: a primary log of every
//! submission, a guest roster and a dietary roster derived from it.
//!
//! # Examples
//!
//! In-memory usage with [`core::registry::RsvpRegistry`]:
//! ```
//! use rsvplog::{
//!     config::RsvpConfig,
//!     core::registry::RsvpRegistry,
//!     engine::confirm::RowRange,
//!     rsvp::Submission,
//!     types::{Status, StoreKind},
//! };
//!
//! let mut registry = RsvpRegistry::in_memory(RsvpConfig::default()).expect("layout");
//! let outcome = registry.upsert(&Submission {
//!     attending: Some("Y".to_string()),
//!     guests: Some("2".to_string()),
//!     ..Submission::named("Alice")
//! }).expect("upsert");
//! assert_eq!(outcome.primary_status, Status::Pending);
//!
//! let row = outcome.primary_log.row();
//! registry
//!     .confirm_selection(StoreKind::PrimaryLog, &[RowRange::single(row)])
//!     .expect("confirm");
//! assert_eq!(registry.confirmed_names().expect("names"), vec!["Alice".to_string()]);
//! ```
//!
//! Runtime usage with SQLite-backed stores:
//! ```no_run
//! use rsvplog::{
//!     config::RsvpConfig,
//!     core::registry::RsvpRegistry,
//!     persist::sqlite::open_workbook,
//!     rsvp::Submission,
//!     runtime::handle::{spawn_rsvplog, RuntimeConfig},
//! };
//!
//! # #[tokio::main]
//! # async fn main() {
//! let config = RsvpConfig::default();
//! let book = open_workbook("rsvp.db", &config).expect("open sqlite");
//! let handle = spawn_rsvplog(RsvpRegistry::new(config, book), RuntimeConfig::default());
//! let reply = handle.submit(Submission::named("Bob")).await.expect("submit");
//! assert!(reply.is_success());
//! handle.shutdown().await.expect("shutdown");
//! # }
//! ```
#![warn(missing_docs)]

/// Event and layout configuration.
pub mod config;
/// Store adapters, schemas, matcher and the registry.
pub mod core;
/// Upsert, regeneration, confirmation and query engines.
pub mod engine;
/// Engine errors and host replies.
pub mod error;
/// Tracing subscriber setup.
pub mod logging;
/// Store adapter errors and the SQLite adapter.
pub mod persist;
/// RSVP domain records and summaries.
pub mod rsvp;
/// Single-writer runtime handle and events.
pub mod runtime;
/// Shared primitive types and enums.
pub mod types;
