use axum::{extract::State, http::StatusCode, Json};
use log::error;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

use super::ErrorBody;
use crate::AppState;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, ToSchema)]
pub struct HealthStatus {
    pub status: String,
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = OK, description = "Observation database is reachable", body = HealthStatus),
        (status = SERVICE_UNAVAILABLE, description = "Observation database is not reachable", body = ErrorBody)
    ))]
pub async fn health(
    State(state): State<Arc<AppState>>,
) -> Result<Json<HealthStatus>, (StatusCode, Json<ErrorBody>)> {
    state
        .engine
        .repository()
        .health_check()
        .await
        .map_err(|e| {
            error!("health check failed: {}", e);
            (StatusCode::SERVICE_UNAVAILABLE, Json(ErrorBody::new(e)))
        })?;

    Ok(Json(HealthStatus {
        status: String::from("ok"),
    }))
}
