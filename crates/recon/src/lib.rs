//! `roster-recon`: housing roster reconciliation engine.
//!
//! Pure engine crate: receives pre-loaded tables, returns cleaned
//! with-bookings and without-bookings record sets plus drop diagnostics.
//! No CLI or file IO dependencies.

pub mod analytics;
pub mod clean;
pub mod config;
pub mod engine;
pub mod error;
pub mod join;
pub mod model;
pub mod normalize;
pub mod reconcile;

pub use config::{Address2Policy, CleanOptions, DobPolicy, RosterConfig};
pub use engine::run;
pub use error::ReconError;
pub use model::{CleanedRecord, ReconResult, SourceTables, Table};
