//! Risk model routes: CRUD and per-model simulation history.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::errors::{ApiResponse, AppError};
use crate::models::pagination::{PagedResult, Pagination};
use crate::models::risk_model::{CreateRiskModel, RiskModel, UpdateRiskModel};
use crate::models::simulation::Simulation;
use crate::services::{risk_model as model_service, simulation as simulation_service};
use crate::AppState;

/// GET /api/v1/models — list risk models with pagination.
pub async fn list(
    State(state): State<AppState>,
    Query(pagination): Query<Pagination>,
) -> Result<Json<ApiResponse<PagedResult<RiskModel>>>, AppError> {
    let result = model_service::list(&state.db, &pagination).await?;
    Ok(ApiResponse::success(result))
}

/// POST /api/v1/models — create a new risk model.
pub async fn create(
    State(state): State<AppState>,
    Json(body): Json<CreateRiskModel>,
) -> Result<(StatusCode, Json<ApiResponse<RiskModel>>), AppError> {
    body.validate()?;
    let model = model_service::create(&state.db, &body).await?;
    Ok((StatusCode::CREATED, ApiResponse::success(model)))
}

/// GET /api/v1/models/:id — get risk model by ID.
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<RiskModel>>, AppError> {
    let model = model_service::find_by_id(&state.db, id).await?;
    Ok(ApiResponse::success(model))
}

/// PUT /api/v1/models/:id — update provided fields of a risk model.
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateRiskModel>,
) -> Result<Json<ApiResponse<RiskModel>>, AppError> {
    body.validate()?;
    let model = model_service::update(&state.db, id, &body).await?;
    Ok(ApiResponse::success(model))
}

/// DELETE /api/v1/models/:id — delete a risk model and its simulations.
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    model_service::delete(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/models/:id/simulations — simulation history for a model.
pub async fn simulations(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(pagination): Query<Pagination>,
) -> Result<Json<ApiResponse<PagedResult<Simulation>>>, AppError> {
    let result = simulation_service::list_for_model(&state.db, id, &pagination).await?;
    Ok(ApiResponse::success(result))
}
