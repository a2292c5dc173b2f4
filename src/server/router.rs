use std::sync::Arc;
use std::time::Instant;

use axum::extract::Request;
use axum::http::StatusCode;
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::{Json, Router, routing::get};

use super::merchant::merchant_router;
use super::response::ApiResponse;
use crate::config::AppConfig;
use crate::forecast::ForecastEngine;
use crate::report::{CoverageRiskScorer, DashboardService};
use crate::store::Store;
use crate::sync::SyncService;
use crate::upstream::Upstream;

pub struct AppState {
    pub store: Arc<dyn Store>,
    pub sync: SyncService,
    pub forecast: ForecastEngine,
    pub dashboard: DashboardService,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>, upstream: Arc<dyn Upstream>, config: &AppConfig) -> Self {
        let scorer = CoverageRiskScorer {
            multiplier: config.forecast.risk_multiplier(),
        };
        Self {
            sync: SyncService::new(store.clone(), upstream, config.sync.clone()),
            forecast: ForecastEngine::new(store.clone(), config.forecast.clone()),
            dashboard: DashboardService::new(store.clone(), Box::new(scorer)),
            store,
        }
    }
}

async fn health() -> &'static str {
    "OK"
}

async fn fallback() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(ApiResponse::<()>::error("Route not found")),
    )
}

async fn log_request(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let start = Instant::now();

    let response = next.run(request).await;

    let latency = start.elapsed();
    let status = response.status();

    tracing::info!(
        "{} {} {} {}ms",
        method,
        uri.path(),
        status.as_u16(),
        latency.as_millis()
    );

    response
}

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .nest("/api/v1", merchant_router())
        .fallback(fallback)
        .layer(middleware::from_fn(log_request))
        .with_state(state)
}
