//! Simulation runs: evaluate a stored risk model over a range and record the result.

use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::pagination::{PagedResult, Pagination};
use crate::models::simulation::{Simulation, SimulationRequest, SimulationResponse};
use crate::services::risk_function::{
    build_expressions, RiskCoefficients, RiskExpressions, RiskMathError,
};
use crate::services::risk_model;
use crate::services::risk_range::{evaluate_range, unsafe_start, RangeSample};

/// Everything the risk-math half produces for one model and range.
#[derive(Debug, Clone, Serialize)]
pub struct RiskProjection {
    pub expressions: RiskExpressions,
    pub curve: RangeSample,
    pub x_unsafe_start: Option<f64>,
}

/// Build expressions, sample the curve and locate the unsafe zone.
pub fn project(
    coeffs: &RiskCoefficients,
    x_min: f64,
    x_max: f64,
    points: usize,
    threshold: f64,
) -> Result<RiskProjection, RiskMathError> {
    let expressions = build_expressions(coeffs)?;
    let curve = evaluate_range(x_min, x_max, points, coeffs)?;
    let x_unsafe_start = unsafe_start(x_min, x_max, coeffs.a, coeffs.b, threshold)?;

    tracing::debug!(
        r = %expressions.r,
        points = curve.len(),
        threshold,
        x_unsafe_start = ?x_unsafe_start,
        "Risk projection computed"
    );

    Ok(RiskProjection {
        expressions,
        curve,
        x_unsafe_start,
    })
}

/// Run a simulation against a stored risk model and persist it.
pub async fn run(pool: &PgPool, req: &SimulationRequest) -> Result<SimulationResponse, AppError> {
    let model = risk_model::find_by_id(pool, req.risk_model_id).await?;

    let points = usize::try_from(req.points).map_err(|_| {
        AppError::RiskMath(RiskMathError::InvalidRange(format!(
            "point count must be at least 2, got {}",
            req.points
        )))
    })?;
    let projection = project(
        &model.coefficients(),
        req.x_min,
        req.x_max,
        points,
        req.threshold,
    )?;

    let simulation = sqlx::query_as::<_, Simulation>(
        r#"
        INSERT INTO simulations (risk_model_id, x_min, x_max, points, threshold, x_unsafe_start)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING *
        "#,
    )
    .bind(model.id)
    .bind(req.x_min)
    .bind(req.x_max)
    .bind(req.points)
    .bind(req.threshold)
    .bind(projection.x_unsafe_start)
    .fetch_one(pool)
    .await?;

    tracing::info!(
        simulation_id = %simulation.id,
        risk_model_id = %model.id,
        x_unsafe_start = ?simulation.x_unsafe_start,
        "Simulation recorded"
    );

    Ok(SimulationResponse {
        simulation,
        expressions: projection.expressions,
        curve: projection.curve,
    })
}

/// Simulation history for one risk model, newest first.
pub async fn list_for_model(
    pool: &PgPool,
    risk_model_id: Uuid,
    pagination: &Pagination,
) -> Result<PagedResult<Simulation>, AppError> {
    // 404 for unknown models rather than an empty page.
    risk_model::find_by_id(pool, risk_model_id).await?;

    let total = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM simulations WHERE risk_model_id = $1",
    )
    .bind(risk_model_id)
    .fetch_one(pool)
    .await?;

    let items = sqlx::query_as::<_, Simulation>(
        "SELECT * FROM simulations WHERE risk_model_id = $1 \
         ORDER BY created_at DESC LIMIT $2 OFFSET $3",
    )
    .bind(risk_model_id)
    .bind(pagination.limit())
    .bind(pagination.offset())
    .fetch_all(pool)
    .await?;

    Ok(PagedResult::new(items, total, pagination))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn projection_for_reference_model() {
        let k = RiskCoefficients::new(0.015, 0.8, 5.0);
        let p = project(&k, 0.0, 100.0, 200, 3.0).unwrap();
        assert_eq!(p.curve.len(), 200);
        assert_eq!(p.expressions.r_prime, "0.03 x + 0.8");
        let start = p.x_unsafe_start.unwrap();
        assert!((start - 220.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn projection_propagates_range_errors() {
        let k = RiskCoefficients::new(0.015, 0.8, 5.0);
        assert!(matches!(
            project(&k, 10.0, 10.0, 50, 3.0),
            Err(RiskMathError::InvalidRange(_))
        ));
    }

    #[test]
    fn no_unsafe_zone_when_threshold_is_never_reached() {
        let k = RiskCoefficients::new(0.0, 1.0, 0.0);
        let p = project(&k, 0.0, 10.0, 5, 3.0).unwrap();
        assert_eq!(p.x_unsafe_start, None);
        assert_eq!(p.expressions.r, "x");
    }
}
