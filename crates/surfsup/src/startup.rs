use crate::{
    routes, ErrorBody, HealthStatus, LeapDayPolicy, ObservationRepository,
    QueryEngine, SqliteRepository, Station, TemperatureReading, TemperatureSummary,
};
use anyhow::anyhow;
use axum::{
    body::Body,
    extract::Request,
    middleware::{self, Next},
    response::IntoResponse,
    routing::get,
    Router,
};
use hyper::{
    header::{ACCEPT, CONTENT_TYPE},
    Method,
};
use log::info;
use std::sync::Arc;
use surfsup_core::require_file;
use tower_http::cors::{Any, CorsLayer};
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable};

#[derive(Clone)]
pub struct AppState {
    pub remote_url: String,
    pub reference_station: String,
    pub engine: QueryEngine,
}

impl AppState {
    pub fn new(
        remote_url: String,
        reference_station: String,
        repository: Arc<dyn ObservationRepository>,
        leap_day: LeapDayPolicy,
    ) -> Self {
        Self {
            remote_url,
            reference_station,
            engine: QueryEngine::new(repository, leap_day),
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        routes::api::climate_routes::precipitation,
        routes::api::climate_routes::stations,
        routes::api::climate_routes::tobs,
        routes::api::climate_routes::temperature_from,
        routes::api::climate_routes::temperature_between,
        routes::api::health::health,
    ),
    components(
        schemas(
            Station,
            TemperatureReading,
            TemperatureSummary,
            ErrorBody,
            HealthStatus
        )
    ),
    tags(
        (name = "surfsup climate api", description = "a read-only RESTful api over daily precipitation and temperature observations from Hawaii weather stations")
    )
)]
struct ApiDoc;

pub async fn build_app_state(
    remote_url: String,
    database: String,
    reference_station: String,
    leap_day: LeapDayPolicy,
) -> Result<AppState, anyhow::Error> {
    require_file(&database)?;
    let repository = Arc::new(
        SqliteRepository::open(&database)
            .await
            .map_err(|e| anyhow!("error setting up observation database: {:#}", e))?,
    );

    Ok(AppState::new(
        remote_url,
        reference_station,
        repository,
        leap_day,
    ))
}

pub fn app(app_state: AppState) -> Router {
    let api_docs = ApiDoc::openapi();
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([ACCEPT, CONTENT_TYPE])
        .allow_origin(Any);

    Router::new()
        .route("/", get(routes::index_handler))
        .route("/health", get(routes::health))
        // Literal segments win over the date captures below
        .route("/api/v1.0/precipitation", get(routes::precipitation))
        .route("/api/v1.0/stations", get(routes::stations))
        .route("/api/v1.0/tobs", get(routes::tobs))
        .route("/api/v1.0/{start}", get(routes::temperature_from))
        .route("/api/v1.0/{start}/{end}", get(routes::temperature_between))
        .with_state(Arc::new(app_state))
        .layer(middleware::from_fn(log_request))
        .merge(Scalar::with_url("/docs", api_docs))
        .layer(cors)
}

async fn log_request(request: Request<Body>, next: Next) -> impl IntoResponse {
    let now = time::OffsetDateTime::now_utc();
    let path = request
        .uri()
        .path_and_query()
        .map(|p| p.as_str())
        .unwrap_or_default()
        .to_owned();
    info!(target: "http_request", "new request, {} {}", request.method().as_str(), path);

    let response = next.run(request).await;
    let response_time = time::OffsetDateTime::now_utc() - now;
    info!(target: "http_response", "response, code: {}, path: {}, time: {}", response.status().as_str(), path, response_time);

    response
}

