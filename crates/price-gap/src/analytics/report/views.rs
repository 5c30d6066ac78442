use super::super::distribution::HistogramBin;
use super::super::domain::{RankingSignal, RiskLevel, ValueSource};
use super::super::map::MapView;
use super::super::metrics::StreetMetrics;
use super::super::query::{DistrictFilter, StreetSelection};
use super::super::ranking::StreetRanking;
use super::super::tax::{TaxEstimate, TaxRates};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AdvisorySeverity {
    Info,
    Warning,
}

impl AdvisorySeverity {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Info => "Info",
            Self::Warning => "Warning",
        }
    }
}

/// A note shown next to a report, e.g. a data-quality caveat.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Advisory {
    pub topic: &'static str,
    pub detail: String,
    pub severity: AdvisorySeverity,
    pub severity_label: &'static str,
}

impl Advisory {
    pub(crate) fn new(severity: AdvisorySeverity, topic: &'static str, detail: String) -> Self {
        Self {
            topic,
            detail,
            severity,
            severity_label: severity.label(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReferenceListingView {
    pub source: Option<String>,
    pub url: Option<String>,
    pub price: Option<f64>,
    pub area: Option<f64>,
    pub unit_price: Option<f64>,
    pub house_type: Option<String>,
    pub road_width: Option<f64>,
    pub floors: Option<f64>,
    pub match_type: Option<String>,
    pub government_price: Option<f64>,
    pub government_price_source: ValueSource,
    pub market_reference_price: Option<f64>,
    pub price_gap: Option<f64>,
    pub price_gap_source: ValueSource,
    pub fake_probability: Option<f64>,
    pub normalized_gap: Option<f64>,
    pub risk_score: Option<f64>,
    pub risk_level: RiskLevel,
    pub risk_level_label: &'static str,
    pub listing_text: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceLookupReport {
    pub selection: StreetSelection,
    pub metrics: StreetMetrics,
    pub normalized_gap: Option<f64>,
    pub weight_fake: f64,
    pub risk_score: Option<f64>,
    pub risk_level: RiskLevel,
    pub risk_level_label: &'static str,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub advisories: Vec<Advisory>,
    pub reference_listings: Vec<ReferenceListingView>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaxReport {
    pub selection: StreetSelection,
    pub area_m2: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transfer_price_billion: Option<f64>,
    /// Median resolved government unit price of the street.
    pub government_price: Option<f64>,
    pub rates: TaxRates,
    pub estimate: TaxEstimate,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub advisories: Vec<Advisory>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskLevelCount {
    pub level: RiskLevel,
    pub level_label: &'static str,
    pub listings: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardReport {
    pub district: DistrictFilter,
    pub signal: RankingSignal,
    pub signal_label: &'static str,
    pub weight_fake: f64,
    pub listings_with_coordinates: usize,
    pub map: MapView,
    pub ranking: Vec<StreetRanking>,
    pub risk_levels: Vec<RiskLevelCount>,
    pub price_gap_histogram: Vec<HistogramBin>,
    pub risk_score_histogram: Vec<HistogramBin>,
}
