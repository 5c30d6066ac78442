use super::domain::{ListingRecord, RankingSignal};
use super::metrics::{median, quantile, resolve_price_gap, resolve_risk_score};
use super::scoring::RiskWeight;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use std::f64::consts::TAU;

pub const DEFAULT_JITTER_SEED: u64 = 42;
/// Standard deviation of the jitter, roughly 15 m.
pub const JITTER_SIGMA_DEGREES: f64 = 0.00015;
/// Price gap weights are clipped at this quantile so outliers do not dominate.
pub const GAP_CLIP_QUANTILE: f64 = 0.99;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapPoint {
    pub district: Option<String>,
    pub ward: Option<String>,
    pub street: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    /// Clipped signal value; `None` when the row has no value for the signal.
    pub weight: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapView {
    pub signal: RankingSignal,
    pub center_latitude: Option<f64>,
    pub center_longitude: Option<f64>,
    pub points: Vec<MapPoint>,
}

/// Rows that can be placed on a map.
pub fn with_coordinates<'a, I>(records: I) -> Vec<&'a ListingRecord>
where
    I: IntoIterator<Item = &'a ListingRecord>,
{
    records
        .into_iter()
        .filter(|record| record.coordinates().is_some())
        .collect()
}

fn signal_value(record: &ListingRecord, signal: RankingSignal, weight: RiskWeight) -> Option<f64> {
    match signal {
        RankingSignal::RiskScore => resolve_risk_score(record, weight).value,
        RankingSignal::PriceGap => resolve_price_gap(record).value,
    }
}

/// Builds map points weighted by `signal`.
///
/// Risk weights are clipped to `[0, 1]`; gap weights to `[0, q99]` of the
/// gaps present. With a jitter seed, coordinates get seeded normal noise so
/// listings sharing a position separate; the same seed always yields the
/// same layout.
pub fn map_view(
    records: &[&ListingRecord],
    signal: RankingSignal,
    weight: RiskWeight,
    jitter_seed: Option<u64>,
) -> MapView {
    let raw: Vec<Option<f64>> = records
        .iter()
        .map(|record| signal_value(record, signal, weight))
        .collect();

    let upper = match signal {
        RankingSignal::RiskScore => Some(1.0),
        RankingSignal::PriceGap => quantile(raw.iter().copied(), GAP_CLIP_QUANTILE),
    };

    let mut rng = jitter_seed.map(StdRng::seed_from_u64);
    let mut points = Vec::with_capacity(records.len());

    for (record, value) in records.iter().zip(raw) {
        let Some((latitude, longitude)) = record.coordinates() else {
            continue;
        };

        let (latitude, longitude) = match rng.as_mut() {
            Some(rng) => (
                latitude + gaussian(rng) * JITTER_SIGMA_DEGREES,
                longitude + gaussian(rng) * JITTER_SIGMA_DEGREES,
            ),
            None => (latitude, longitude),
        };

        let clipped = value.map(|value| match upper {
            Some(upper) => value.clamp(0.0, upper.max(0.0)),
            None => value.max(0.0),
        });

        points.push(MapPoint {
            district: record.district.clone(),
            ward: record.ward.clone(),
            street: record.street.clone(),
            latitude,
            longitude,
            weight: clipped,
        });
    }

    MapView {
        signal,
        center_latitude: median(points.iter().map(|point| Some(point.latitude))),
        center_longitude: median(points.iter().map(|point| Some(point.longitude))),
        points,
    }
}

/// Standard normal sample via Box-Muller.
fn gaussian(rng: &mut StdRng) -> f64 {
    let u1: f64 = 1.0 - rng.gen::<f64>();
    let u2: f64 = rng.gen::<f64>();
    (-2.0 * u1.ln()).sqrt() * (TAU * u2).cos()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn located(
        lat: Option<f64>,
        lon: Option<f64>,
        gap: Option<f64>,
        risk: Option<f64>,
    ) -> ListingRecord {
        ListingRecord {
            district: Some("District 5".to_string()),
            ward: Some("Ward 7".to_string()),
            street: Some("Tran Hung Dao".to_string()),
            latitude: lat,
            longitude: lon,
            price_gap: gap,
            risk_score: risk,
            ..ListingRecord::default()
        }
    }

    #[test]
    fn rows_without_coordinates_are_dropped() {
        let records = vec![
            located(Some(10.77), Some(106.70), Some(2.0), Some(0.4)),
            located(None, Some(106.70), Some(2.0), Some(0.4)),
            located(Some(10.77), None, Some(2.0), Some(0.4)),
        ];
        assert_eq!(with_coordinates(&records).len(), 1);
    }

    #[test]
    fn risk_weights_are_clipped_to_unit_interval() {
        let records = vec![
            located(Some(10.0), Some(106.0), None, Some(1.4)),
            located(Some(10.0), Some(106.0), None, Some(-0.2)),
            located(Some(10.0), Some(106.0), None, None),
        ];
        let refs = with_coordinates(&records);

        let view = map_view(&refs, RankingSignal::RiskScore, RiskWeight::default(), None);

        let weights: Vec<Option<f64>> = view.points.iter().map(|point| point.weight).collect();
        assert_eq!(weights, vec![Some(1.0), Some(0.0), None]);
    }

    #[test]
    fn gap_weights_are_clipped_at_upper_quantile() {
        let mut records: Vec<ListingRecord> = (1..=99)
            .map(|gap| located(Some(10.0), Some(106.0), Some(gap as f64 / 10.0), None))
            .collect();
        records.push(located(Some(10.0), Some(106.0), Some(1000.0), None));
        let refs = with_coordinates(&records);

        let view = map_view(&refs, RankingSignal::PriceGap, RiskWeight::default(), None);

        let max_weight = view
            .points
            .iter()
            .filter_map(|point| point.weight)
            .fold(f64::MIN, f64::max);
        assert!(max_weight < 1000.0);
        assert!(max_weight >= 9.9);
    }

    #[test]
    fn jitter_is_deterministic_for_a_seed() {
        let records = vec![
            located(Some(10.7769), Some(106.7009), Some(2.0), Some(0.4)),
            located(Some(10.7769), Some(106.7009), Some(2.0), Some(0.4)),
        ];
        let refs = with_coordinates(&records);

        let seed = Some(DEFAULT_JITTER_SEED);
        let first = map_view(&refs, RankingSignal::RiskScore, RiskWeight::default(), seed);
        let second = map_view(&refs, RankingSignal::RiskScore, RiskWeight::default(), seed);

        assert_eq!(first, second);
        assert_ne!(first.points[0].latitude, first.points[1].latitude);
        assert!((first.points[0].latitude - 10.7769).abs() < 0.01);
    }

    #[test]
    fn view_is_centered_on_median_position() {
        let records = vec![
            located(Some(10.0), Some(106.0), None, None),
            located(Some(11.0), Some(107.0), None, None),
            located(Some(12.0), Some(108.0), None, None),
        ];
        let refs = with_coordinates(&records);

        let view = map_view(&refs, RankingSignal::PriceGap, RiskWeight::default(), None);

        assert_eq!(view.center_latitude, Some(11.0));
        assert_eq!(view.center_longitude, Some(107.0));

        let empty = map_view(&[], RankingSignal::PriceGap, RiskWeight::default(), None);
        assert_eq!(empty.center_latitude, None);
    }
}
