//! Route definitions for the simulator API.

pub mod assessments;
pub mod health;
pub mod risk_models;
pub mod simulations;

use axum::{
    extract::DefaultBodyLimit,
    http::{HeaderValue, StatusCode},
    routing::{get, post},
    Json, Router,
};
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::errors::ApiResponse;
use crate::AppState;

/// Request bodies are small JSON documents.
const MAX_BODY_BYTES: usize = 64 * 1024;

/// Build the full application router.
pub fn router(state: AppState) -> Router {
    let model_routes = Router::new()
        .route(
            "/models",
            get(risk_models::list).post(risk_models::create),
        )
        .route(
            "/models/{id}",
            get(risk_models::get_by_id)
                .put(risk_models::update)
                .delete(risk_models::delete),
        )
        .route("/models/{id}/simulations", get(risk_models::simulations));

    let simulation_routes = Router::new().route("/simulate", post(simulations::create));

    let assessment_routes = Router::new()
        .route(
            "/assessments",
            get(assessments::list).post(assessments::create),
        )
        .route("/assessments/{id}", get(assessments::get_by_id));

    let middleware = ServiceBuilder::new()
        .layer(TraceLayer::new_for_http())
        .layer(cors(&state.config.frontend_url))
        .layer(CompressionLayer::new())
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES));

    Router::new()
        .route("/", get(health::index))
        .route("/health/live", get(health::live))
        .route("/health/ready", get(health::ready))
        .nest("/api/v1", model_routes)
        .nest("/api/v1", simulation_routes)
        .nest("/api/v1", assessment_routes)
        .fallback(not_found)
        .layer(middleware)
        .with_state(state)
}

fn cors(frontend_url: &str) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    match HeaderValue::from_str(frontend_url) {
        Ok(origin) => layer.allow_origin(origin),
        Err(e) => {
            tracing::warn!(error = %e, frontend_url, "Invalid FRONTEND_URL, CORS origin not set");
            layer
        }
    }
}

async fn not_found() -> (StatusCode, Json<ApiResponse<()>>) {
    (
        StatusCode::NOT_FOUND,
        ApiResponse::error("NOT_FOUND", "Route not found"),
    )
}
