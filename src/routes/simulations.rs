//! Simulation routes.

use axum::{extract::State, http::StatusCode, Json};
use validator::Validate;

use crate::errors::{ApiResponse, AppError};
use crate::models::simulation::{SimulationRequest, SimulationResponse};
use crate::services::simulation as simulation_service;
use crate::AppState;

/// POST /api/v1/simulate — evaluate a stored risk model over a range.
pub async fn create(
    State(state): State<AppState>,
    Json(body): Json<SimulationRequest>,
) -> Result<(StatusCode, Json<ApiResponse<SimulationResponse>>), AppError> {
    body.validate()?;
    let result = simulation_service::run(&state.db, &body).await?;
    Ok((StatusCode::CREATED, ApiResponse::success(result)))
}
