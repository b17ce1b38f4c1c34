//! Tuition cost resolution for online program landing pages.
//!
//! The [`pricing`] module owns the static program catalog, partner directory, and the
//! ordered discount rule set. Everything else in this crate is the ambient service plumbing
//! (configuration, telemetry, error mapping) shared with the API binary.

pub mod config;
pub mod error;
pub mod pricing;
pub mod telemetry;
