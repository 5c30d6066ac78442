use metrics_exporter_prometheus::PrometheusHandle;
use price_gap::analytics::{RankingSignal, RiskWeight, TaxRates};
use price_gap::config::{AppConfig, ScoringConfig};
use price_gap::dataset::{Dataset, DatasetLoader};
use price_gap::error::AppError;
use std::path::PathBuf;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
    pub(crate) dataset: Arc<Dataset>,
    pub(crate) defaults: AnalysisDefaults,
}

/// Values applied when a request leaves a knob unset.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct AnalysisDefaults {
    pub(crate) scoring: ScoringConfig,
    pub(crate) tax: TaxRates,
}

impl AnalysisDefaults {
    pub(crate) fn from_config(config: &AppConfig) -> Self {
        Self {
            scoring: config.scoring,
            tax: config.tax,
        }
    }

    pub(crate) fn weight_or_default(&self, weight: Option<f64>) -> Result<RiskWeight, AppError> {
        match weight {
            Some(value) => Ok(RiskWeight::new(value)?),
            None => Ok(self.scoring.default_weight_fake),
        }
    }
}

/// Loads the listings export once; callers share the returned handle.
pub(crate) fn load_dataset(
    config: &AppConfig,
    override_path: Option<PathBuf>,
) -> Result<Arc<Dataset>, AppError> {
    let path = override_path.unwrap_or_else(|| config.dataset.path.clone());
    info!(path = %path.display(), "loading listings dataset");
    let dataset = DatasetLoader::from_path(&path)?;
    Ok(Arc::new(dataset))
}

pub(crate) fn parse_weight(raw: &str) -> Result<RiskWeight, String> {
    let value = raw
        .trim()
        .parse::<f64>()
        .map_err(|err| format!("failed to parse '{raw}' as a number ({err})"))?;
    RiskWeight::new(value).map_err(|err| err.to_string())
}

pub(crate) fn parse_signal(raw: &str) -> Result<RankingSignal, String> {
    RankingSignal::parse(raw)
        .ok_or_else(|| format!("unknown signal '{raw}', expected 'risk' or 'gap'"))
}
