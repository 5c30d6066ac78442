use crate::infra::AppState;
use axum::extract::Query;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Extension, Json, Router};
use price_gap::analytics::map::DEFAULT_JITTER_SEED;
use price_gap::analytics::query::{streets_in, wards_in};
use price_gap::analytics::report::views::{DashboardReport, PriceLookupReport, TaxReport};
use price_gap::analytics::report::DEFAULT_AREA_M2;
use price_gap::analytics::{
    dashboard, price_lookup, tax_report, DashboardQuery, DistrictFilter, QueryError,
    RankingSignal, StreetSelection, TaxInputs,
};
use price_gap::error::AppError;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::debug;

#[derive(Debug, Deserialize)]
pub(crate) struct StreetRequest {
    #[serde(default)]
    pub(crate) district: String,
    #[serde(default)]
    pub(crate) ward: Option<String>,
    #[serde(default)]
    pub(crate) street: Option<String>,
}

impl StreetRequest {
    fn selection(&self) -> Result<StreetSelection, QueryError> {
        DashboardQuery {
            district: DistrictFilter::parse(&self.district),
            ward: self.ward.clone(),
            street: self.street.clone(),
            ..DashboardQuery::default()
        }
        .street_selection()
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct LookupRequest {
    #[serde(flatten)]
    pub(crate) street: StreetRequest,
    #[serde(default)]
    pub(crate) weight_fake: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TaxRequest {
    #[serde(flatten)]
    pub(crate) street: StreetRequest,
    #[serde(default = "default_area")]
    pub(crate) area_m2: f64,
    #[serde(default)]
    pub(crate) transfer_price_billion: Option<f64>,
}

fn default_area() -> f64 {
    DEFAULT_AREA_M2
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct DashboardRequest {
    #[serde(default)]
    pub(crate) district: DistrictFilter,
    #[serde(default)]
    pub(crate) signal: Option<RankingSignal>,
    #[serde(default)]
    pub(crate) weight_fake: Option<f64>,
    #[serde(default)]
    pub(crate) top_n: Option<usize>,
    #[serde(default)]
    pub(crate) jitter: bool,
    #[serde(default)]
    pub(crate) seed: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SelectorParams {
    #[serde(default)]
    pub(crate) district: Option<String>,
    #[serde(default)]
    pub(crate) ward: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct WardsResponse {
    pub(crate) district: DistrictFilter,
    pub(crate) wards: Vec<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct StreetsResponse {
    pub(crate) district: DistrictFilter,
    pub(crate) ward: String,
    pub(crate) streets: Vec<String>,
}

pub(crate) fn api_routes() -> Router {
    Router::new()
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .route("/api/v1/lookup", post(lookup_endpoint))
        .route("/api/v1/tax", post(tax_endpoint))
        .route("/api/v1/dashboard", post(dashboard_endpoint))
        .route("/api/v1/wards", get(wards_endpoint))
        .route("/api/v1/streets", get(streets_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({
            "status": "ready",
            "dataset": state.dataset.source(),
            "listings": state.dataset.len(),
            "loaded_at": state.dataset.loaded_at().to_rfc3339(),
        })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

pub(crate) async fn lookup_endpoint(
    Extension(state): Extension<AppState>,
    Json(payload): Json<LookupRequest>,
) -> Result<Json<PriceLookupReport>, AppError> {
    let selection = payload.street.selection()?;
    let weight = state.defaults.weight_or_default(payload.weight_fake)?;
    debug!(?selection, weight = weight.value(), "price lookup requested");

    Ok(Json(price_lookup(
        state.dataset.listings(),
        &selection,
        weight,
    )))
}

pub(crate) async fn tax_endpoint(
    Extension(state): Extension<AppState>,
    Json(payload): Json<TaxRequest>,
) -> Result<Json<TaxReport>, AppError> {
    let selection = payload.street.selection()?;
    let inputs = TaxInputs {
        area_m2: payload.area_m2,
        transfer_price_billion: payload.transfer_price_billion,
    };
    debug!(?selection, area_m2 = inputs.area_m2, "tax estimate requested");

    Ok(Json(tax_report(
        state.dataset.listings(),
        &selection,
        inputs,
        &state.defaults.tax,
    )))
}

pub(crate) async fn dashboard_endpoint(
    Extension(state): Extension<AppState>,
    Json(payload): Json<DashboardRequest>,
) -> Result<Json<DashboardReport>, AppError> {
    let query = DashboardQuery {
        district: payload.district,
        weight_fake: state.defaults.weight_or_default(payload.weight_fake)?,
        ranking_signal: payload.signal.unwrap_or_default(),
        top_n: payload
            .top_n
            .unwrap_or(state.defaults.scoring.ranking_top_n),
        ..DashboardQuery::default()
    };
    let seed = payload
        .jitter
        .then(|| payload.seed.unwrap_or(DEFAULT_JITTER_SEED));
    debug!(district = ?query.district, signal = query.ranking_signal.label(), "dashboard requested");

    Ok(Json(dashboard(state.dataset.listings(), &query, seed)?))
}

pub(crate) async fn wards_endpoint(
    Extension(state): Extension<AppState>,
    Query(params): Query<SelectorParams>,
) -> Json<WardsResponse> {
    let district = DistrictFilter::parse(params.district.as_deref().unwrap_or_default());
    let wards = wards_in(state.dataset.listings(), &district);
    Json(WardsResponse { district, wards })
}

pub(crate) async fn streets_endpoint(
    Extension(state): Extension<AppState>,
    Query(params): Query<SelectorParams>,
) -> Result<Json<StreetsResponse>, AppError> {
    let district = DistrictFilter::parse(params.district.as_deref().unwrap_or_default());
    let ward = params
        .ward
        .map(|ward| ward.trim().to_string())
        .filter(|ward| !ward.is_empty())
        .ok_or(QueryError::WardRequired)?;
    let streets = streets_in(state.dataset.listings(), &district, &ward);

    Ok(Json(StreetsResponse {
        district,
        ward,
        streets,
    }))
}
