mod insights;
mod summary;
pub mod views;

pub use summary::{dashboard, price_lookup, tax_report, TaxInputs, DEFAULT_AREA_M2};

pub(crate) use insights::{lookup_advisories, tax_advisories};
