use std::env;
use std::str::FromStr;

use crate::services::risk_function::{RiskCoefficients, RiskMathError};
use crate::services::simulation;

/// Configuration that cannot be used to start the service.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("DATABASE_URL must be set")]
    MissingDatabaseUrl(#[from] env::VarError),

    #[error("Invalid simulation defaults: {0}")]
    SimulationDefaults(#[from] RiskMathError),
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub database_max_connections: u32,
    pub host: String,
    pub port: u16,
    pub frontend_url: String,
    pub simulation: SimulationDefaults,
}

/// Risk model and sampling range used when no stored model is involved,
/// e.g. for the curve attached to every assessment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationDefaults {
    pub coefficients: RiskCoefficients,
    pub threshold: f64,
    pub x_min: f64,
    pub x_max: f64,
    pub points: usize,
}

impl Default for SimulationDefaults {
    fn default() -> Self {
        Self {
            coefficients: RiskCoefficients::new(0.015, 0.8, 5.0),
            threshold: 3.0,
            x_min: 0.0,
            x_max: 100.0,
            points: 200,
        }
    }
}

impl SimulationDefaults {
    pub fn from_env() -> Self {
        let fallback = Self::default();
        Self {
            coefficients: RiskCoefficients::new(
                parse_or("RISK_DEFAULT_A", fallback.coefficients.a),
                parse_or("RISK_DEFAULT_B", fallback.coefficients.b),
                parse_or("RISK_DEFAULT_C", fallback.coefficients.c),
            ),
            threshold: parse_or("RISK_DEFAULT_THRESHOLD", fallback.threshold),
            x_min: parse_or("ASSESSMENT_X_MIN", fallback.x_min),
            x_max: parse_or("ASSESSMENT_X_MAX", fallback.x_max),
            points: parse_or("ASSESSMENT_POINTS", fallback.points),
        }
    }

    /// Reject defaults the risk projection cannot be computed from.
    pub fn check(&self) -> Result<(), RiskMathError> {
        simulation::project(
            &self.coefficients,
            self.x_min,
            self.x_max,
            self.points,
            self.threshold,
        )
        .map(|_| ())
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let simulation = SimulationDefaults::from_env();
        simulation.check()?;

        Ok(Self {
            database_url: env::var("DATABASE_URL")?,
            database_max_connections: parse_or("DATABASE_MAX_CONNECTIONS", 10),
            host: env::var("BACKEND_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: parse_or("BACKEND_PORT", 8000),
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:5173".to_string()),
            simulation,
        })
    }
}

/// Read and parse an optional variable, falling back when unset or malformed.
fn parse_or<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_model() {
        let d = SimulationDefaults::default();
        assert_eq!(d.coefficients, RiskCoefficients::new(0.015, 0.8, 5.0));
        assert_eq!(d.threshold, 3.0);
        assert_eq!((d.x_min, d.x_max, d.points), (0.0, 100.0, 200));
    }

    #[test]
    fn default_defaults_pass_check() {
        assert!(SimulationDefaults::default().check().is_ok());
    }

    #[test]
    fn inverted_default_range_fails_check() {
        let defaults = SimulationDefaults {
            x_min: 500.0,
            ..SimulationDefaults::default()
        };
        assert!(matches!(
            defaults.check(),
            Err(RiskMathError::InvalidRange(_))
        ));

        let defaults = SimulationDefaults {
            points: 1,
            ..SimulationDefaults::default()
        };
        assert!(defaults.check().is_err());

        let defaults = SimulationDefaults {
            coefficients: RiskCoefficients::new(f64::NAN, 0.8, 5.0),
            ..SimulationDefaults::default()
        };
        assert!(matches!(
            defaults.check(),
            Err(RiskMathError::OutOfDomain(_))
        ));
    }

    #[test]
    fn startup_fails_on_unusable_assessment_range() {
        // ASSESSMENT_X_MIN is only read by this test.
        std::env::set_var("DATABASE_URL", "postgres://localhost/surfacesim");
        std::env::set_var("ASSESSMENT_X_MIN", "500");
        let result = AppConfig::from_env();
        std::env::remove_var("ASSESSMENT_X_MIN");

        assert!(matches!(result, Err(ConfigError::SimulationDefaults(_))));
    }

    #[test]
    fn malformed_values_fall_back() {
        std::env::set_var("SURFACESIM_TEST_PARSE_BAD", "not-a-number");
        assert_eq!(parse_or("SURFACESIM_TEST_PARSE_BAD", 42u16), 42);

        std::env::set_var("SURFACESIM_TEST_PARSE_GOOD", " 0.25 ");
        assert_eq!(parse_or("SURFACESIM_TEST_PARSE_GOOD", 1.0f64), 0.25);

        assert_eq!(parse_or("SURFACESIM_TEST_PARSE_UNSET", 7usize), 7);
    }
}
