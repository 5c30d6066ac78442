use super::domain::{ListingRecord, Resolved, ValueSource};
use super::scoring::{normalize_gap, risk_score, RiskWeight};
use serde::Serialize;
use std::cmp::Ordering;

const MISSING_MARKERS: &[&str] = &["n/a", "na", "nan", "none", "null", "-"];

/// Coerces a raw cell into a finite number.
///
/// Blank cells, missing markers such as `N/A`, unparsable text and
/// non-finite values all yield `None`.
pub fn coerce_numeric(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    let lowered = trimmed.to_ascii_lowercase();
    if MISSING_MARKERS.contains(&lowered.as_str()) {
        return None;
    }

    trimmed.parse::<f64>().ok().filter(|value| value.is_finite())
}

fn finite_sorted<I>(values: I) -> Vec<f64>
where
    I: IntoIterator<Item = Option<f64>>,
{
    let mut pool: Vec<f64> = values
        .into_iter()
        .flatten()
        .filter(|value| value.is_finite())
        .collect();
    pool.sort_by(f64::total_cmp);
    pool
}

/// Median of the finite, present values; `None` when nothing is left.
pub fn median<I>(values: I) -> Option<f64>
where
    I: IntoIterator<Item = Option<f64>>,
{
    let pool = finite_sorted(values);
    let len = pool.len();
    match len {
        0 => None,
        _ if len % 2 == 1 => Some(pool[len / 2]),
        _ => Some((pool[len / 2 - 1] + pool[len / 2]) / 2.0),
    }
}

pub fn mean<I>(values: I) -> Option<f64>
where
    I: IntoIterator<Item = Option<f64>>,
{
    let (sum, count) = values
        .into_iter()
        .flatten()
        .filter(|value| value.is_finite())
        .fold((0.0, 0usize), |(sum, count), value| (sum + value, count + 1));

    if count == 0 {
        None
    } else {
        Some(sum / count as f64)
    }
}

/// Quantile with linear interpolation between closest ranks.
pub fn quantile<I>(values: I, q: f64) -> Option<f64>
where
    I: IntoIterator<Item = Option<f64>>,
{
    if !(0.0..=1.0).contains(&q) {
        return None;
    }

    let pool = finite_sorted(values);
    if pool.is_empty() {
        return None;
    }

    let position = q * (pool.len() - 1) as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    let fraction = position - lower as f64;
    Some(pool[lower] + (pool[upper] - pool[lower]) * fraction)
}

/// Orders `Some` values descending and pushes `None` to the end.
pub(crate) fn descending_missing_last(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => b.total_cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Market reference divided by government price.
///
/// Undefined unless both are finite and the government price is positive.
pub fn price_gap(market_reference: Option<f64>, government_price: Option<f64>) -> Option<f64> {
    let market_reference = market_reference.filter(|value| value.is_finite())?;
    let government_price = government_price.filter(|value| value.is_finite() && *value > 0.0)?;
    let gap = market_reference / government_price;
    gap.is_finite().then_some(gap)
}

/// Government price for one row: the corrected column wins when present.
pub fn resolve_government_price(record: &ListingRecord) -> Resolved {
    match record.government_price_corrected {
        Some(value) => Resolved::new(Some(value), ValueSource::Corrected),
        None => Resolved::new(record.government_price, ValueSource::Raw),
    }
}

/// Price gap for one row.
///
/// Prefers the corrected gap, then the exported gap, then a gap recomputed
/// from the row's resolved government price and market reference.
pub fn resolve_price_gap(record: &ListingRecord) -> Resolved {
    if let Some(value) = record.price_gap_corrected {
        return Resolved::new(Some(value), ValueSource::Corrected);
    }

    if let Some(value) = record.price_gap {
        return Resolved::new(Some(value), ValueSource::Raw);
    }

    let government_price = resolve_government_price(record).value;
    Resolved::new(
        price_gap(record.market_reference_price, government_price),
        ValueSource::Derived,
    )
}

/// Risk score for one row: the exported score, or one derived with `weight`.
pub fn resolve_risk_score(record: &ListingRecord, weight: RiskWeight) -> Resolved {
    if let Some(value) = record.risk_score {
        return Resolved::new(Some(value), ValueSource::Raw);
    }

    let normalized = normalize_gap(resolve_price_gap(record).value);
    Resolved::new(
        risk_score(record.fake_probability, normalized, weight),
        ValueSource::Derived,
    )
}

/// Representative prices and gap for a subset of listings, usually one street.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StreetMetrics {
    pub listings: usize,
    pub government_price: Option<f64>,
    /// Rows whose government price came from the corrected column.
    pub corrected_government_rows: usize,
    pub market_reference_price: Option<f64>,
    /// Gap recomputed from the two medians.
    pub computed_gap: Option<f64>,
    /// Median of the corrected gap column.
    pub corrected_gap: Option<f64>,
    /// The gap used for display and scoring.
    pub gap: Resolved,
    pub fake_probability: Option<f64>,
}

pub fn derive_street_metrics(records: &[&ListingRecord]) -> StreetMetrics {
    let resolved_government: Vec<Resolved> = records
        .iter()
        .map(|record| resolve_government_price(record))
        .collect();

    let corrected_government_rows = resolved_government
        .iter()
        .filter(|resolved| resolved.is_corrected())
        .count();
    let government_price = median(resolved_government.iter().map(|resolved| resolved.value));
    let market_reference_price = median(records.iter().map(|record| record.market_reference_price));
    let computed_gap = price_gap(market_reference_price, government_price);
    let corrected_gap = median(records.iter().map(|record| record.price_gap_corrected));

    let gap = match corrected_gap {
        Some(value) => Resolved::new(Some(value), ValueSource::Corrected),
        None => Resolved::new(computed_gap, ValueSource::Derived),
    };

    StreetMetrics {
        listings: records.len(),
        government_price,
        corrected_government_rows,
        market_reference_price,
        computed_gap,
        corrected_gap,
        gap,
        fake_probability: median(records.iter().map(|record| record.fake_probability)),
    }
}
