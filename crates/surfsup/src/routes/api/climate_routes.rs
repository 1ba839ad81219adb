use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use std::{collections::HashMap, sync::Arc};
use utoipa::{IntoParams, ToSchema};

use super::ErrorBody;
use crate::{format_date, AppState, DailyAggregate, QueryError, Reading, Station};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, ToSchema)]
pub struct TemperatureReading {
    #[serde(rename = "Date")]
    pub date: String,
    #[serde(rename = "Temperature")]
    pub temperature: f64,
}

impl From<Reading> for TemperatureReading {
    fn from(value: Reading) -> Self {
        Self {
            date: format_date(value.date),
            temperature: value.value,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, ToSchema)]
pub struct TemperatureSummary {
    #[serde(rename = "Date")]
    pub date: String,
    #[serde(rename = "TMIN")]
    pub min: f64,
    #[serde(rename = "TMAX")]
    pub max: f64,
    #[serde(rename = "TAVG")]
    pub avg: f64,
}

impl From<DailyAggregate> for TemperatureSummary {
    fn from(value: DailyAggregate) -> Self {
        Self {
            date: format_date(value.date),
            min: value.min,
            max: value.max,
            avg: value.avg,
        }
    }
}

#[derive(Deserialize, Debug, Default, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct TobsParams {
    /// Station code to report instead of the configured reference station
    pub station: Option<String>,
}

/// Each entry is a single `{"<date>": <precipitation>}` pair, dates repeat when
/// several stations reported on the same day.
#[utoipa::path(
    get,
    path = "/api/v1.0/precipitation",
    responses(
        (status = OK, description = "Precipitation for the trailing twelve months of the dataset", content_type = "application/json", body = Vec<HashMap<String, f64>>),
        (status = INTERNAL_SERVER_ERROR, description = "Failed to read observations", body = ErrorBody)
    ))]
pub async fn precipitation(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<HashMap<String, f64>>>, QueryError> {
    let readings = state.engine.recent_precipitation().await?;

    Ok(Json(
        readings
            .into_iter()
            .map(|r| HashMap::from([(format_date(r.date), r.value)]))
            .collect(),
    ))
}

#[utoipa::path(
    get,
    path = "/api/v1.0/stations",
    responses(
        (status = OK, description = "Every weather station in the dataset", content_type = "application/json", body = Vec<Station>),
        (status = INTERNAL_SERVER_ERROR, description = "Failed to read stations", body = ErrorBody)
    ))]
pub async fn stations(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Station>>, QueryError> {
    Ok(Json(state.engine.stations().await?))
}

#[utoipa::path(
    get,
    path = "/api/v1.0/tobs",
    params(TobsParams),
    responses(
        (status = OK, description = "Temperatures for the trailing twelve months of one station, or an `Error` body for an unknown station", content_type = "application/json", body = Vec<TemperatureReading>),
        (status = INTERNAL_SERVER_ERROR, description = "Failed to read observations", body = ErrorBody)
    ))]
pub async fn tobs(
    State(state): State<Arc<AppState>>,
    Query(params): Query<TobsParams>,
) -> Result<Json<Vec<TemperatureReading>>, QueryError> {
    let station = params
        .station
        .as_deref()
        .unwrap_or(&state.reference_station);
    let readings = state.engine.recent_temperature(station).await?;

    Ok(Json(readings.into_iter().map(TemperatureReading::from).collect()))
}

#[utoipa::path(
    get,
    path = "/api/v1.0/{start}",
    params(
        ("start" = String, Path, description = "First date to include, YYYY-MM-DD"),
    ),
    responses(
        (status = OK, description = "Daily min/max/avg temperature from the start date onward, or an `Error` body for a malformed date", content_type = "application/json", body = Vec<TemperatureSummary>),
        (status = INTERNAL_SERVER_ERROR, description = "Failed to read observations", body = ErrorBody)
    ))]
pub async fn temperature_from(
    State(state): State<Arc<AppState>>,
    Path(start): Path<String>,
) -> Result<Json<Vec<TemperatureSummary>>, QueryError> {
    let days = state
        .engine
        .temperature_aggregate_from_tokens(&start, None)
        .await?;

    Ok(Json(days.into_iter().map(TemperatureSummary::from).collect()))
}

#[utoipa::path(
    get,
    path = "/api/v1.0/{start}/{end}",
    params(
        ("start" = String, Path, description = "First date to include, YYYY-MM-DD"),
        ("end" = String, Path, description = "Last date to include, YYYY-MM-DD"),
    ),
    responses(
        (status = OK, description = "Daily min/max/avg temperature between both dates inclusive, or an `Error` body for malformed or inverted dates", content_type = "application/json", body = Vec<TemperatureSummary>),
        (status = INTERNAL_SERVER_ERROR, description = "Failed to read observations", body = ErrorBody)
    ))]
pub async fn temperature_between(
    State(state): State<Arc<AppState>>,
    Path((start, end)): Path<(String, String)>,
) -> Result<Json<Vec<TemperatureSummary>>, QueryError> {
    let days = state
        .engine
        .temperature_aggregate_from_tokens(&start, Some(&end))
        .await?;

    Ok(Json(days.into_iter().map(TemperatureSummary::from).collect()))
}
