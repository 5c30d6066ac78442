//! Metric derivation, scoring, tax estimates and street rollups.
//!
//! All functions here are pure: they read a slice of [`ListingRecord`]s and
//! return values or reports without touching shared state.

pub mod distribution;
pub mod domain;
pub mod map;
pub mod metrics;
pub mod query;
pub mod ranking;
pub mod report;
pub mod scoring;
pub mod tax;

pub use domain::{ListingRecord, RankingSignal, Resolved, RiskLevel, ValueSource};
pub use query::{DashboardQuery, DistrictFilter, QueryError, StreetSelection};
pub use report::{dashboard, price_lookup, tax_report, TaxInputs};
pub use scoring::{RiskWeight, ScoringError};
pub use tax::{TaxEstimate, TaxRates, TransferTax};
