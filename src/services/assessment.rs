//! Attack surface assessments: run the scoring pipeline, attach the default
//! risk curve, and persist the breakdown.

use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::config::SimulationDefaults;
use crate::errors::AppError;
use crate::models::assessment::{Assessment, AssessmentOut, AssessmentSummary, CreateAssessment};
use crate::services::drivers::{self, DriverItem};
use crate::services::normalizer::{self, NormalizedMetrics, RawMetrics};
use crate::services::recommendations;
use crate::services::scoring::{self, CategoryScores, ScoreBand};
use crate::services::simulation::{self, RiskProjection};

/// Number of assessments returned by the recent-assessments listing.
const RECENT_LIMIT: i64 = 20;

/// Output of the scoring half of the engine for one set of metrics.
#[derive(Debug, Clone, Serialize)]
pub struct ScoreReport {
    pub normalized: NormalizedMetrics,
    pub categories: CategoryScores,
    /// Pre-clamp score on the 0-1 scale.
    pub raw_score: f64,
    pub x_score: f64,
    pub band: ScoreBand,
    pub drivers: Vec<DriverItem>,
    pub recommendations: Vec<&'static str>,
}

/// Run normalizer, aggregator, composer, drivers and recommendations.
pub fn score(metrics: &RawMetrics) -> ScoreReport {
    let normalized = normalizer::normalize(metrics);
    let categories = scoring::aggregate(&normalized);
    let raw_score = scoring::raw_score(&categories);
    let x_score = scoring::compose(&categories);
    let band = scoring::score_to_band(x_score);
    let driver_items = drivers::explain(&normalized);

    tracing::debug!(
        x_score,
        raw_score,
        band = %band,
        driver_points = drivers::total_points(&driver_items),
        rules = ?recommendations::fired_rules(&normalized),
        "Attack surface scored"
    );

    ScoreReport {
        normalized,
        categories,
        raw_score,
        x_score,
        band,
        drivers: driver_items,
        recommendations: recommendations::recommend(&normalized),
    }
}

/// The default risk curve attached to every assessment.
///
/// The defaults come from server configuration, so a failure here is an
/// internal error rather than a bad request.
pub fn default_projection(defaults: &SimulationDefaults) -> Result<RiskProjection, AppError> {
    simulation::project(
        &defaults.coefficients,
        defaults.x_min,
        defaults.x_max,
        defaults.points,
        defaults.threshold,
    )
    .map_err(|e| AppError::Internal(format!("Configured simulation defaults are unusable: {e}")))
}

fn to_out(
    summary: AssessmentSummary,
    defaults: &SimulationDefaults,
    projection: RiskProjection,
) -> AssessmentOut {
    AssessmentOut {
        summary,
        threshold: defaults.threshold,
        x_unsafe_start: projection.x_unsafe_start,
        expressions: projection.expressions,
        curve: projection.curve,
    }
}

/// Score, persist and return a new assessment.
pub async fn create(
    pool: &PgPool,
    input: &CreateAssessment,
    defaults: &SimulationDefaults,
) -> Result<AssessmentOut, AppError> {
    let report = score(&input.metrics);
    // Fail before writing anything if the configured curve is unusable.
    let projection = default_projection(defaults)?;

    let inputs = serde_json::to_value(&input.metrics)
        .map_err(|e| AppError::Internal(format!("Failed to encode inputs: {e}")))?;
    let drivers = serde_json::to_value(&report.drivers)
        .map_err(|e| AppError::Internal(format!("Failed to encode drivers: {e}")))?;
    let recommendations = serde_json::to_value(&report.recommendations)
        .map_err(|e| AppError::Internal(format!("Failed to encode recommendations: {e}")))?;

    let row = sqlx::query_as::<_, Assessment>(
        r#"
        INSERT INTO assessments (name, inputs, x_score, drivers, recommendations)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING *
        "#,
    )
    .bind(&input.name)
    .bind(&inputs)
    .bind(report.x_score)
    .bind(&drivers)
    .bind(&recommendations)
    .fetch_one(pool)
    .await?;

    tracing::info!(
        assessment_id = %row.id,
        x_score = report.x_score,
        band = %report.band,
        recommendations = report.recommendations.len(),
        "Assessment recorded"
    );

    Ok(to_out(AssessmentSummary::try_from(row)?, defaults, projection))
}

/// Most recent assessments, newest first.
pub async fn list_recent(pool: &PgPool) -> Result<Vec<AssessmentSummary>, AppError> {
    let rows = sqlx::query_as::<_, Assessment>(
        "SELECT * FROM assessments ORDER BY created_at DESC LIMIT $1",
    )
    .bind(RECENT_LIMIT)
    .fetch_all(pool)
    .await?;

    rows.into_iter().map(AssessmentSummary::try_from).collect()
}

/// Fetch a stored assessment together with the default risk curve.
pub async fn find_by_id(
    pool: &PgPool,
    id: Uuid,
    defaults: &SimulationDefaults,
) -> Result<AssessmentOut, AppError> {
    let row = sqlx::query_as::<_, Assessment>("SELECT * FROM assessments WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Assessment with ID {id} not found")))?;

    let projection = default_projection(defaults)?;
    Ok(to_out(AssessmentSummary::try_from(row)?, defaults, projection))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::normalizer::tests::quiet_metrics;

    #[test]
    fn quiet_posture_report() {
        let report = score(&quiet_metrics());
        assert_eq!(report.x_score, 0.0);
        assert_eq!(report.band, ScoreBand::Low);
        assert_eq!(report.recommendations.len(), 1);
        assert!(report.recommendations[0].starts_with("Enable Security Controls"));
        assert_eq!(report.drivers.len(), 14);
    }

    #[test]
    fn report_is_internally_consistent() {
        let metrics = RawMetrics {
            public_endpoints: 260,
            admin_endpoints: 9,
            third_party_integrations: 18,
            monthly_active_users: 900_000,
            privileged_accounts: 170,
            mfa_adoption_pct: 35.0,
            failed_login_rate_pct: 4.2,
            monthly_requests: 45_000_000,
            unique_countries: 38,
            traffic_concentration_pct: 20.0,
            open_critical_vulns: 4,
            mean_patch_time_days: 28,
            waf_enabled: false,
            rate_limiting_enabled: true,
        };
        let report = score(&metrics);
        assert!((0.0..=100.0).contains(&report.x_score));
        assert!((report.x_score - report.raw_score * 100.0).abs() < 1e-9);
        assert!((drivers::total_points(&report.drivers) - report.raw_score * 100.0).abs() < 1e-9);
        assert_eq!(report.band, scoring::score_to_band(report.x_score));
        assert_eq!(report.recommendations.len(), 6);
    }

    #[test]
    fn default_projection_uses_configured_model() {
        let projection = default_projection(&SimulationDefaults::default()).unwrap();
        assert_eq!(projection.curve.len(), 200);
        assert_eq!(projection.expressions.r, "0.015 x^{2} + 0.8 x + 5");
        assert!((projection.x_unsafe_start.unwrap() - 73.333_333_333).abs() < 1e-6);
    }

    #[test]
    fn misconfigured_defaults_are_rejected() {
        let defaults = SimulationDefaults {
            x_min: 50.0,
            x_max: 10.0,
            ..SimulationDefaults::default()
        };
        let err = default_projection(&defaults).unwrap_err();
        assert!(matches!(err, AppError::Internal(ref msg) if msg.contains("x_max")));
        assert_eq!(
            axum::response::IntoResponse::into_response(err).status(),
            axum::http::StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
