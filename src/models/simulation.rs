//! Simulation runs of a stored risk model over a complexity range.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::services::risk_function::RiskExpressions;
use crate::services::risk_range::RangeSample;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Simulation {
    pub id: Uuid,
    pub risk_model_id: Uuid,
    pub x_min: f64,
    pub x_max: f64,
    pub points: i32,
    pub threshold: f64,
    pub x_unsafe_start: Option<f64>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[validate(schema(function = "validate_bounds"))]
pub struct SimulationRequest {
    pub risk_model_id: Uuid,
    #[validate(range(min = -1e10, max = 1e10))]
    pub x_min: f64,
    #[validate(range(exclusive_min = 0.0, max = 1e10))]
    pub x_max: f64,
    #[validate(range(min = 2, max = 10000))]
    pub points: i32,
    #[validate(range(min = -1e10, max = 1e10))]
    pub threshold: f64,
}

fn validate_bounds(req: &SimulationRequest) -> Result<(), ValidationError> {
    if req.x_max <= req.x_min {
        let mut err = ValidationError::new("x_range");
        err.message = Some("x_max must be greater than x_min".into());
        return Err(err);
    }
    Ok(())
}

/// Stored run plus the sampled curve and display expressions.
#[derive(Debug, Clone, Serialize)]
pub struct SimulationResponse {
    #[serde(flatten)]
    pub simulation: Simulation,
    #[serde(flatten)]
    pub expressions: RiskExpressions,
    #[serde(flatten)]
    pub curve: RangeSample,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(x_min: f64, x_max: f64, points: i32) -> SimulationRequest {
        SimulationRequest {
            risk_model_id: Uuid::new_v4(),
            x_min,
            x_max,
            points,
            threshold: 3.0,
        }
    }

    #[test]
    fn accepts_reference_range() {
        assert!(request(0.0, 100.0, 200).validate().is_ok());
        assert!(request(-50.0, 0.5, 2).validate().is_ok());
    }

    #[test]
    fn rejects_inverted_range() {
        let errors = request(10.0, 5.0, 50).validate().unwrap_err();
        assert!(errors.to_string().contains("x_max must be greater than x_min"));
    }

    #[test]
    fn rejects_non_positive_x_max() {
        assert!(request(-10.0, 0.0, 50).validate().is_err());
    }

    #[test]
    fn rejects_point_counts_outside_envelope() {
        assert!(request(0.0, 10.0, 1).validate().is_err());
        assert!(request(0.0, 10.0, 10_001).validate().is_err());
        assert!(request(0.0, 10.0, 10_000).validate().is_ok());
    }
}
