//! Risk model registry: CRUD over stored quadratic coefficients.

use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::pagination::{PagedResult, Pagination};
use crate::models::risk_model::{CreateRiskModel, RiskModel, UpdateRiskModel};

/// Create a new risk model.
pub async fn create(pool: &PgPool, input: &CreateRiskModel) -> Result<RiskModel, AppError> {
    let model = sqlx::query_as::<_, RiskModel>(
        r#"
        INSERT INTO risk_models (name, description, a, b, c)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING *
        "#,
    )
    .bind(&input.name)
    .bind(&input.description)
    .bind(input.a)
    .bind(input.b)
    .bind(input.c)
    .fetch_one(pool)
    .await?;

    tracing::info!(risk_model_id = %model.id, name = %model.name, "Risk model created");
    Ok(model)
}

/// Find risk model by ID.
pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<RiskModel, AppError> {
    sqlx::query_as::<_, RiskModel>("SELECT * FROM risk_models WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Risk model with ID {id} not found")))
}

/// List risk models, oldest first.
pub async fn list(
    pool: &PgPool,
    pagination: &Pagination,
) -> Result<PagedResult<RiskModel>, AppError> {
    let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM risk_models")
        .fetch_one(pool)
        .await?;

    let items = sqlx::query_as::<_, RiskModel>(
        "SELECT * FROM risk_models ORDER BY created_at ASC, id ASC LIMIT $1 OFFSET $2",
    )
    .bind(pagination.limit())
    .bind(pagination.offset())
    .fetch_all(pool)
    .await?;

    Ok(PagedResult::new(items, total, pagination))
}

/// Update a risk model by ID; only provided fields change.
pub async fn update(
    pool: &PgPool,
    id: Uuid,
    input: &UpdateRiskModel,
) -> Result<RiskModel, AppError> {
    let model = sqlx::query_as::<_, RiskModel>(
        r#"
        UPDATE risk_models SET
            name = COALESCE($2, name),
            description = COALESCE($3, description),
            a = COALESCE($4, a),
            b = COALESCE($5, b),
            c = COALESCE($6, c),
            updated_at = NOW()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(&input.name)
    .bind(&input.description)
    .bind(input.a)
    .bind(input.b)
    .bind(input.c)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("Risk model with ID {id} not found")))?;

    tracing::info!(risk_model_id = %id, "Risk model updated");
    Ok(model)
}

/// Delete a risk model and, by cascade, its simulations.
pub async fn delete(pool: &PgPool, id: Uuid) -> Result<(), AppError> {
    let result = sqlx::query("DELETE FROM risk_models WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound(format!("Risk model with ID {id} not found")));
    }

    tracing::info!(risk_model_id = %id, "Risk model deleted");
    Ok(())
}
