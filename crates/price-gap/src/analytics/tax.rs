//! Illustrative tax and fee estimates.
//!
//! Real assessments depend on local thresholds, progressive rates and
//! exemptions; these formulas are a quick reference only. Areas are in m²,
//! unit prices in million VND/m², transfer prices in billion VND and all
//! results in million VND.

use serde::{Deserialize, Serialize};

pub const DEFAULT_REGISTRATION_RATE: f64 = 0.005;
pub const DEFAULT_LAND_USE_RATE: f64 = 0.0003;
pub const DEFAULT_TRANSFER_RATE: f64 = 0.02;
pub const MILLION_PER_BILLION: f64 = 1000.0;

/// Rates applied by the estimators, overridable per deployment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TaxRates {
    pub registration: f64,
    pub land_use: f64,
    pub transfer: f64,
}

impl Default for TaxRates {
    fn default() -> Self {
        Self {
            registration: DEFAULT_REGISTRATION_RATE,
            land_use: DEFAULT_LAND_USE_RATE,
            transfer: DEFAULT_TRANSFER_RATE,
        }
    }
}

fn area_based(area_m2: f64, unit_price: f64, rate: f64) -> Option<f64> {
    let valid = area_m2.is_finite()
        && area_m2 > 0.0
        && unit_price.is_finite()
        && unit_price >= 0.0
        && rate.is_finite();
    valid.then(|| area_m2 * unit_price * rate)
}

/// Land registration fee: `area * unit_price * rate`.
pub fn registration_fee_land(area_m2: f64, unit_price: f64, rate: f64) -> Option<f64> {
    area_based(area_m2, unit_price, rate)
}

/// Simplified annual non-agricultural land use tax: `area * unit_price * rate`.
pub fn non_agri_land_tax_simple(area_m2: f64, unit_price: f64, rate: f64) -> Option<f64> {
    area_based(area_m2, unit_price, rate)
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "status", content = "amount", rename_all = "snake_case")]
pub enum TransferTax {
    Estimated(f64),
    /// No positive transfer price was supplied.
    NotProvided,
}

impl TransferTax {
    pub fn amount(self) -> Option<f64> {
        match self {
            Self::Estimated(amount) => Some(amount),
            Self::NotProvided => None,
        }
    }
}

/// Personal income tax on a real-estate transfer.
pub fn pit_transfer_tax(transfer_price_billion: f64, rate: f64) -> TransferTax {
    if !(transfer_price_billion.is_finite() && transfer_price_billion > 0.0 && rate.is_finite()) {
        return TransferTax::NotProvided;
    }

    TransferTax::Estimated(transfer_price_billion * MILLION_PER_BILLION * rate)
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TaxEstimate {
    pub registration_fee: Option<f64>,
    pub annual_land_use_tax: Option<f64>,
    pub transfer_tax: TransferTax,
}

/// Runs all three estimators; the area-based ones need a unit price.
pub fn estimate_taxes(
    area_m2: f64,
    unit_price: Option<f64>,
    transfer_price_billion: Option<f64>,
    rates: &TaxRates,
) -> TaxEstimate {
    TaxEstimate {
        registration_fee: unit_price
            .and_then(|price| registration_fee_land(area_m2, price, rates.registration)),
        annual_land_use_tax: unit_price
            .and_then(|price| non_agri_land_tax_simple(area_m2, price, rates.land_use)),
        transfer_tax: transfer_price_billion
            .map(|price| pit_transfer_tax(price, rates.transfer))
            .unwrap_or(TransferTax::NotProvided),
    }
}
