//! Price gap analytics over enriched real-estate listings.
//!
//! The crate derives government vs. market reference price metrics, scores
//! the divergence together with a data-quality signal, rolls results up per
//! street and produces illustrative tax estimates. Every derived value is
//! either a finite number or `None`; missing data never raises an error.

pub mod analytics;
pub mod config;
pub mod dataset;
pub mod error;
pub mod telemetry;
