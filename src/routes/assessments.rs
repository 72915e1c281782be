//! Assessment routes: score new postures and browse stored results.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::errors::{ApiResponse, AppError};
use crate::models::assessment::{AssessmentOut, AssessmentSummary, CreateAssessment};
use crate::services::assessment as assessment_service;
use crate::AppState;

/// POST /api/v1/assessments — score and store a new assessment.
pub async fn create(
    State(state): State<AppState>,
    Json(body): Json<CreateAssessment>,
) -> Result<(StatusCode, Json<ApiResponse<AssessmentOut>>), AppError> {
    body.validate()?;
    let result =
        assessment_service::create(&state.db, &body, &state.config.simulation).await?;
    Ok((StatusCode::CREATED, ApiResponse::success(result)))
}

/// GET /api/v1/assessments — most recent assessments.
pub async fn list(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<AssessmentSummary>>>, AppError> {
    let result = assessment_service::list_recent(&state.db).await?;
    Ok(ApiResponse::success(result))
}

/// GET /api/v1/assessments/:id — one stored assessment with its risk curve.
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<AssessmentOut>>, AppError> {
    let result =
        assessment_service::find_by_id(&state.db, id, &state.config.simulation).await?;
    Ok(ApiResponse::success(result))
}
