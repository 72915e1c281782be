//! Stored quadratic risk models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use crate::services::risk_function::RiskCoefficients;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct RiskModel {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl RiskModel {
    pub fn coefficients(&self) -> RiskCoefficients {
        RiskCoefficients::new(self.a, self.b, self.c)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateRiskModel {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(length(max = 1000))]
    pub description: Option<String>,
    #[validate(range(min = -1e10, max = 1e10))]
    pub a: f64,
    #[validate(range(min = -1e10, max = 1e10))]
    pub b: f64,
    #[validate(range(min = -1e10, max = 1e10))]
    pub c: f64,
}

/// Partial update; absent fields keep their stored value.
#[derive(Debug, Clone, Serialize, Deserialize, Default, Validate)]
pub struct UpdateRiskModel {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    #[validate(length(max = 1000))]
    pub description: Option<String>,
    #[validate(range(min = -1e10, max = 1e10))]
    pub a: Option<f64>,
    #[validate(range(min = -1e10, max = 1e10))]
    pub b: Option<f64>,
    #[validate(range(min = -1e10, max = 1e10))]
    pub c: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn baseline() -> CreateRiskModel {
        CreateRiskModel {
            name: "Baseline".to_string(),
            description: None,
            a: 0.015,
            b: 0.8,
            c: 5.0,
        }
    }

    #[test]
    fn create_accepts_reference_model() {
        assert!(baseline().validate().is_ok());
    }

    #[test]
    fn create_rejects_empty_name_and_huge_coefficients() {
        let input = CreateRiskModel {
            name: String::new(),
            ..baseline()
        };
        assert!(input.validate().is_err());

        let input = CreateRiskModel {
            a: 2e10,
            ..baseline()
        };
        let errors = input.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("a"));
    }

    #[test]
    fn update_skips_absent_fields() {
        assert!(UpdateRiskModel::default().validate().is_ok());

        let update = UpdateRiskModel {
            c: Some(-3e10),
            ..Default::default()
        };
        assert!(update.validate().is_err());
    }

    #[test]
    fn update_deserializes_partial_body() {
        let update: UpdateRiskModel = serde_json::from_str(r#"{"b": 1.25}"#).unwrap();
        assert_eq!(update.b, Some(1.25));
        assert!(update.name.is_none());
    }
}
