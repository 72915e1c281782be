//! Attack surface assessments and their stored breakdowns.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use crate::errors::AppError;
use crate::services::drivers::DriverItem;
use crate::services::normalizer::RawMetrics;
use crate::services::risk_function::RiskExpressions;
use crate::services::risk_range::RangeSample;
use crate::services::scoring::{score_to_band, ScoreBand};

/// Row as persisted; drivers and recommendations are stored as JSON.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Assessment {
    pub id: Uuid,
    pub name: String,
    pub inputs: serde_json::Value,
    pub x_score: f64,
    pub drivers: serde_json::Value,
    pub recommendations: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateAssessment {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[serde(flatten)]
    #[validate(nested)]
    pub metrics: RawMetrics,
}

/// Assessment metadata with its decoded breakdown.
#[derive(Debug, Clone, Serialize)]
pub struct AssessmentSummary {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub x_score: f64,
    pub band: ScoreBand,
    pub drivers: Vec<DriverItem>,
    pub recommendations: Vec<String>,
}

impl TryFrom<Assessment> for AssessmentSummary {
    type Error = AppError;

    fn try_from(row: Assessment) -> Result<Self, Self::Error> {
        let drivers: Vec<DriverItem> = serde_json::from_value(row.drivers).map_err(|e| {
            AppError::Internal(format!("Corrupt drivers for assessment {}: {e}", row.id))
        })?;
        let recommendations: Vec<String> =
            serde_json::from_value(row.recommendations).map_err(|e| {
                AppError::Internal(format!(
                    "Corrupt recommendations for assessment {}: {e}",
                    row.id
                ))
            })?;

        Ok(Self {
            id: row.id,
            name: row.name,
            created_at: row.created_at,
            x_score: row.x_score,
            band: score_to_band(row.x_score),
            drivers,
            recommendations,
        })
    }
}

/// Full assessment response: breakdown plus the default risk curve.
#[derive(Debug, Clone, Serialize)]
pub struct AssessmentOut {
    #[serde(flatten)]
    pub summary: AssessmentSummary,
    pub threshold: f64,
    pub x_unsafe_start: Option<f64>,
    #[serde(flatten)]
    pub expressions: RiskExpressions,
    #[serde(flatten)]
    pub curve: RangeSample,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn body() -> serde_json::Value {
        json!({
            "name": "Q3 external review",
            "public_endpoints": 120,
            "admin_endpoints": 4,
            "third_party_integrations": 9,
            "monthly_active_users": 250000,
            "privileged_accounts": 40,
            "mfa_adoption_pct": 82.5,
            "failed_login_rate_pct": 1.2,
            "monthly_requests": 12000000,
            "unique_countries": 18,
            "traffic_concentration_pct": 65.0,
            "open_critical_vulns": 2,
            "mean_patch_time_days": 14,
            "waf_enabled": true,
            "rate_limiting_enabled": false
        })
    }

    #[test]
    fn create_flattens_metrics() {
        let input: CreateAssessment = serde_json::from_value(body()).unwrap();
        assert_eq!(input.name, "Q3 external review");
        assert_eq!(input.metrics.admin_endpoints, 4);
        assert!(input.metrics.waf_enabled);
        assert!(input.validate().is_ok());
    }

    #[test]
    fn nested_metric_bounds_are_validated() {
        let mut raw = body();
        raw["traffic_concentration_pct"] = json!(140.0);
        let input: CreateAssessment = serde_json::from_value(raw).unwrap();
        assert!(input.validate().is_err());
    }

    #[test]
    fn negative_counts_fail_to_deserialize() {
        let mut raw = body();
        raw["public_endpoints"] = json!(-1);
        assert!(serde_json::from_value::<CreateAssessment>(raw).is_err());
    }

    #[test]
    fn summary_decodes_stored_json() {
        let row = Assessment {
            id: Uuid::new_v4(),
            name: "stored".to_string(),
            inputs: body(),
            x_score: 61.2,
            drivers: json!([
                { "factor": "MFA Gap", "points": 7.5, "direction": "increase" },
                { "factor": "WAF Enabled", "points": -9.0, "direction": "decrease" }
            ]),
            recommendations: json!(["Enable Security Controls: ..."]),
            created_at: Utc::now(),
        };
        let summary = AssessmentSummary::try_from(row).unwrap();
        assert_eq!(summary.band, ScoreBand::High);
        assert_eq!(summary.drivers.len(), 2);
        assert_eq!(summary.recommendations.len(), 1);
    }

    #[test]
    fn summary_reports_corrupt_rows() {
        let row = Assessment {
            id: Uuid::new_v4(),
            name: "broken".to_string(),
            inputs: json!({}),
            x_score: 10.0,
            drivers: json!({ "not": "a list" }),
            recommendations: json!([]),
            created_at: Utc::now(),
        };
        assert!(matches!(
            AssessmentSummary::try_from(row),
            Err(AppError::Internal(_))
        ));
    }
}
