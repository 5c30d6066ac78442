use super::domain::{ListingRecord, RankingSignal};
use super::metrics::{descending_missing_last, mean, median, resolve_price_gap, resolve_risk_score};
use super::scoring::RiskWeight;
use serde::Serialize;
use std::collections::BTreeMap;

/// One row of the street ranking table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StreetRanking {
    pub district: String,
    pub ward: String,
    pub street: String,
    pub listings: usize,
    pub median_price_gap: Option<f64>,
    pub mean_risk_score: Option<f64>,
}

impl StreetRanking {
    pub fn signal_value(&self, signal: RankingSignal) -> Option<f64> {
        match signal {
            RankingSignal::RiskScore => self.mean_risk_score,
            RankingSignal::PriceGap => self.median_price_gap,
        }
    }
}

#[derive(Default)]
struct GroupAccumulator {
    listings: usize,
    gaps: Vec<Option<f64>>,
    risks: Vec<Option<f64>>,
}

/// Groups listings by street and ranks them by `signal`, highest first.
///
/// Rows without a full district/ward/street key are left out. Groups whose
/// aggregated column is entirely missing keep a `None` aggregate and sort
/// after every group with a value; ties keep key order.
pub fn rank_streets<'a, I>(
    records: I,
    signal: RankingSignal,
    weight: RiskWeight,
    top_n: usize,
) -> Vec<StreetRanking>
where
    I: IntoIterator<Item = &'a ListingRecord>,
{
    let mut groups: BTreeMap<(String, String, String), GroupAccumulator> = BTreeMap::new();

    for record in records {
        let Some((district, ward, street)) = record.street_key() else {
            continue;
        };

        let group = groups
            .entry((district.to_string(), ward.to_string(), street.to_string()))
            .or_default();
        group.listings += 1;
        group.gaps.push(resolve_price_gap(record).value);
        group.risks.push(resolve_risk_score(record, weight).value);
    }

    let mut rows: Vec<StreetRanking> = groups
        .into_iter()
        .map(|((district, ward, street), group)| StreetRanking {
            district,
            ward,
            street,
            listings: group.listings,
            median_price_gap: median(group.gaps),
            mean_risk_score: mean(group.risks),
        })
        .collect();

    rows.sort_by(|a, b| descending_missing_last(a.signal_value(signal), b.signal_value(signal)));
    rows.truncate(top_n);
    rows
}
