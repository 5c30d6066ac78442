use super::domain::RiskLevel;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Divergence ratio (either direction) at which the normalized gap saturates to 1.
pub const GAP_SATURATION_RATIO: f64 = 4.0;
/// Scores below this are `Low`.
pub const LOW_RISK_CEILING: f64 = 0.33;
/// Scores below this (and at least `LOW_RISK_CEILING`) are `Medium`.
pub const MEDIUM_RISK_CEILING: f64 = 0.66;
pub const DEFAULT_WEIGHT_FAKE: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum ScoringError {
    #[error("weight on fake probability must be within [0, 1], got {0}")]
    WeightOutOfRange(f64),
}

/// Share of the risk score attributed to the fake probability signal.
///
/// The remainder goes to the normalized price gap. Construction rejects
/// anything outside `[0, 1]` instead of clamping it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct RiskWeight(f64);

impl RiskWeight {
    pub fn new(value: f64) -> Result<Self, ScoringError> {
        if value.is_finite() && (0.0..=1.0).contains(&value) {
            Ok(Self(value))
        } else {
            Err(ScoringError::WeightOutOfRange(value))
        }
    }

    pub const fn value(self) -> f64 {
        self.0
    }
}

impl Default for RiskWeight {
    fn default() -> Self {
        Self(DEFAULT_WEIGHT_FAKE)
    }
}

impl TryFrom<f64> for RiskWeight {
    type Error = ScoringError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<RiskWeight> for f64 {
    fn from(weight: RiskWeight) -> Self {
        weight.0
    }
}

/// Maps a price gap onto `[0, 1]`.
///
/// The transform is linear in `|ln gap|` and clipped at
/// [`GAP_SATURATION_RATIO`]: a gap of 1 scores 0, a gap of 2 or 0.5 scores
/// 0.5, and anything at or beyond 4x (or 1/4x) scores 1. A gap of 0 is
/// maximally divergent. Negative or non-finite gaps are undefined.
pub fn normalize_gap(gap: Option<f64>) -> Option<f64> {
    let gap = gap.filter(|value| value.is_finite() && *value >= 0.0)?;
    let distance = gap.ln().abs();
    Some((distance / GAP_SATURATION_RATIO.ln()).min(1.0))
}

fn unit_interval(value: Option<f64>) -> Option<f64> {
    value.filter(|value| value.is_finite() && (0.0..=1.0).contains(value))
}

/// `w * fake + (1 - w) * gap`, undefined if either input is missing or out of `[0, 1]`.
pub fn risk_score(
    fake_probability: Option<f64>,
    normalized_gap: Option<f64>,
    weight: RiskWeight,
) -> Option<f64> {
    let fake = unit_interval(fake_probability)?;
    let gap = unit_interval(normalized_gap)?;
    let w = weight.value();
    Some((w * fake + (1.0 - w) * gap).clamp(0.0, 1.0))
}

/// Buckets a score; a boundary value belongs to the upper bucket.
pub fn risk_level(score: Option<f64>) -> RiskLevel {
    match score.filter(|value| value.is_finite()) {
        None => RiskLevel::Unavailable,
        Some(value) if value < LOW_RISK_CEILING => RiskLevel::Low,
        Some(value) if value < MEDIUM_RISK_CEILING => RiskLevel::Medium,
        Some(_) => RiskLevel::High,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn weight(value: f64) -> RiskWeight {
        RiskWeight::new(value).expect("valid weight")
    }

    fn close(actual: Option<f64>, expected: f64) -> bool {
        actual.is_some_and(|value| (value - expected).abs() < 1e-9)
    }

    #[test]
    fn neutral_gap_normalizes_to_zero() {
        assert_eq!(normalize_gap(Some(1.0)), Some(0.0));
    }

    #[test]
    fn normalization_is_symmetric_in_log_space() {
        assert!(close(normalize_gap(Some(2.0)), 0.5));
        assert!(close(normalize_gap(Some(0.5)), 0.5));
        assert_eq!(normalize_gap(Some(4.0)), Some(1.0));
        assert_eq!(normalize_gap(Some(25.0)), Some(1.0));
        assert_eq!(normalize_gap(Some(0.0)), Some(1.0));
    }

    #[test]
    fn normalization_is_monotonic_and_bounded() {
        let gaps = [1.0, 1.1, 1.5, 2.0, 3.0, 4.0, 8.0, 100.0];
        let mut previous = 0.0;
        for gap in gaps {
            let above = normalize_gap(Some(gap)).expect("defined above one");
            let below = normalize_gap(Some(1.0 / gap)).expect("defined below one");
            assert!(above >= previous);
            assert!((above - below).abs() < 1e-9);
            assert!((0.0..=1.0).contains(&above));
            previous = above;
        }
    }

    #[test]
    fn undefined_or_negative_gap_stays_undefined() {
        assert_eq!(normalize_gap(None), None);
        assert_eq!(normalize_gap(Some(-1.0)), None);
        assert_eq!(normalize_gap(Some(f64::NAN)), None);
    }

    #[test]
    fn risk_score_blends_signals() {
        assert!(close(risk_score(Some(0.8), Some(0.4), weight(0.5)), 0.6));
        assert!(close(risk_score(Some(0.8), Some(0.4), weight(1.0)), 0.8));
        assert!(close(risk_score(Some(0.8), Some(0.4), weight(0.0)), 0.4));
    }

    #[test]
    fn risk_score_is_undefined_without_both_inputs() {
        assert_eq!(risk_score(None, Some(0.4), weight(0.5)), None);
        assert_eq!(risk_score(Some(0.8), None, weight(0.5)), None);
        assert_eq!(risk_score(Some(1.3), Some(0.4), weight(0.5)), None);
    }

    #[test]
    fn weight_outside_unit_interval_is_rejected() {
        assert_eq!(
            RiskWeight::new(1.2),
            Err(ScoringError::WeightOutOfRange(1.2))
        );
        assert!(RiskWeight::new(-0.1).is_err());
        assert!(RiskWeight::new(f64::NAN).is_err());
        assert_eq!(RiskWeight::default().value(), DEFAULT_WEIGHT_FAKE);
    }

    #[test]
    fn weight_deserializes_with_validation() {
        let parsed: RiskWeight = serde_json::from_str("0.25").expect("valid weight");
        assert_eq!(parsed.value(), 0.25);
        assert!(serde_json::from_str::<RiskWeight>("2.0").is_err());
    }

    #[test]
    fn risk_level_boundaries_belong_to_upper_bucket() {
        assert_eq!(risk_level(Some(0.2)), RiskLevel::Low);
        assert_eq!(risk_level(Some(LOW_RISK_CEILING)), RiskLevel::Medium);
        assert_eq!(risk_level(Some(0.5)), RiskLevel::Medium);
        assert_eq!(risk_level(Some(MEDIUM_RISK_CEILING)), RiskLevel::High);
        assert_eq!(risk_level(Some(0.9)), RiskLevel::High);
        assert_eq!(risk_level(None), RiskLevel::Unavailable);
        assert_eq!(risk_level(None).label(), "N/A");
    }

    #[test]
    fn scoring_is_repeatable() {
        let first = risk_score(Some(0.35), normalize_gap(Some(2.7)), weight(0.3));
        let second = risk_score(Some(0.35), normalize_gap(Some(2.7)), weight(0.3));
        assert_eq!(first, second);
    }
}
