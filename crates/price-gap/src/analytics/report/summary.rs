use super::super::distribution::{histogram, DEFAULT_HISTOGRAM_BINS};
use super::super::domain::{ListingRecord, RiskLevel};
use super::super::map::{map_view, with_coordinates};
use super::super::metrics::{
    derive_street_metrics, descending_missing_last, resolve_government_price, resolve_price_gap,
    resolve_risk_score,
};
use super::super::query::{filter_district, select_street, DashboardQuery, QueryError, StreetSelection};
use super::super::ranking::rank_streets;
use super::super::scoring::{normalize_gap, risk_level, risk_score, RiskWeight};
use super::super::tax::{estimate_taxes, TaxRates};
use super::views::{
    DashboardReport, PriceLookupReport, ReferenceListingView, RiskLevelCount, TaxReport,
};
use super::{lookup_advisories, tax_advisories};
use serde::{Deserialize, Serialize};

pub const DEFAULT_AREA_M2: f64 = 80.0;

/// Price lookup for a single street.
pub fn price_lookup(
    records: &[ListingRecord],
    selection: &StreetSelection,
    weight: RiskWeight,
) -> PriceLookupReport {
    let subset = select_street(records, selection);
    let metrics = derive_street_metrics(&subset);

    let normalized_gap = normalize_gap(metrics.gap.value);
    let score = risk_score(metrics.fake_probability, normalized_gap, weight);
    let level = risk_level(score);
    let advisories = lookup_advisories(&metrics);

    let mut reference_listings: Vec<ReferenceListingView> = subset
        .iter()
        .map(|record| reference_view(record, weight))
        .collect();
    reference_listings.sort_by(|a, b| descending_missing_last(a.unit_price, b.unit_price));

    PriceLookupReport {
        selection: selection.clone(),
        metrics,
        normalized_gap,
        weight_fake: weight.value(),
        risk_score: score,
        risk_level: level,
        risk_level_label: level.label(),
        advisories,
        reference_listings,
    }
}

fn reference_view(record: &ListingRecord, weight: RiskWeight) -> ReferenceListingView {
    let government = resolve_government_price(record);
    let gap = resolve_price_gap(record);
    let risk = resolve_risk_score(record, weight);
    let level = risk_level(risk.value);

    ReferenceListingView {
        source: record.source.clone(),
        url: record.url.clone(),
        price: record.price,
        area: record.area,
        unit_price: record.unit_price,
        house_type: record.house_type.clone(),
        road_width: record.road_width,
        floors: record.floors,
        match_type: record.match_type.clone(),
        government_price: government.value,
        government_price_source: government.source,
        market_reference_price: record.market_reference_price,
        price_gap: gap.value,
        price_gap_source: gap.source,
        fake_probability: record.fake_probability,
        normalized_gap: normalize_gap(gap.value),
        risk_score: risk.value,
        risk_level: level,
        risk_level_label: level.label(),
        listing_text: record.listing_text.clone(),
    }
}

/// Inputs a caller supplies for the tax estimate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TaxInputs {
    pub area_m2: f64,
    /// Transfer price in billion VND; `None` or zero means not provided.
    pub transfer_price_billion: Option<f64>,
}

impl Default for TaxInputs {
    fn default() -> Self {
        Self {
            area_m2: DEFAULT_AREA_M2,
            transfer_price_billion: None,
        }
    }
}

/// Tax estimate based on the street's median government price.
pub fn tax_report(
    records: &[ListingRecord],
    selection: &StreetSelection,
    inputs: TaxInputs,
    rates: &TaxRates,
) -> TaxReport {
    let subset = select_street(records, selection);
    let government_price = derive_street_metrics(&subset).government_price;
    let estimate = estimate_taxes(
        inputs.area_m2,
        government_price,
        inputs.transfer_price_billion,
        rates,
    );

    TaxReport {
        selection: selection.clone(),
        area_m2: inputs.area_m2,
        transfer_price_billion: inputs.transfer_price_billion,
        government_price,
        rates: *rates,
        estimate,
        advisories: tax_advisories(government_price, inputs.area_m2),
    }
}

/// Map, ranking table and distributions for the selected district.
///
/// Only listings with coordinates take part, so the ranking table and the
/// map always describe the same rows.
pub fn dashboard(
    records: &[ListingRecord],
    query: &DashboardQuery,
    jitter_seed: Option<u64>,
) -> Result<DashboardReport, QueryError> {
    query.validate()?;

    let located = with_coordinates(filter_district(records, &query.district));
    let weight = query.weight_fake;
    let signal = query.ranking_signal;

    let map = map_view(&located, signal, weight, jitter_seed);
    let ranking = rank_streets(located.iter().copied(), signal, weight, query.top_n);

    let gaps: Vec<Option<f64>> = located
        .iter()
        .map(|record| resolve_price_gap(record).value)
        .collect();
    let risks: Vec<Option<f64>> = located
        .iter()
        .map(|record| resolve_risk_score(record, weight).value)
        .collect();

    let mut risk_levels: Vec<RiskLevelCount> = RiskLevel::ordered()
        .into_iter()
        .chain([RiskLevel::Unavailable])
        .map(|level| RiskLevelCount {
            level,
            level_label: level.label(),
            listings: 0,
        })
        .collect();
    for risk in &risks {
        let level = risk_level(*risk);
        if let Some(entry) = risk_levels.iter_mut().find(|entry| entry.level == level) {
            entry.listings += 1;
        }
    }

    Ok(DashboardReport {
        district: query.district.clone(),
        signal,
        signal_label: signal.label(),
        weight_fake: weight.value(),
        listings_with_coordinates: located.len(),
        map,
        ranking,
        risk_levels,
        price_gap_histogram: histogram(gaps, DEFAULT_HISTOGRAM_BINS),
        risk_score_histogram: histogram(risks, DEFAULT_HISTOGRAM_BINS),
    })
}
