//! Sampling of R, R', R'' over an interval and the unsafe-zone threshold solver.
//!
//! R' is linear in x, so the unsafe-zone start is always found by comparing
//! a single closed-form critical point against the interval bounds.

use serde::{Deserialize, Serialize};

use crate::services::risk_function::{check_finite, RiskCoefficients, RiskMathError};

/// |a| below this is treated as a constant derivative.
pub const FLAT_SLOPE_TOLERANCE: f64 = 1e-10;

/// R, R' and R'' sampled at evenly spaced x values.
///
/// The four vectors always have the same length.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RangeSample {
    pub x_values: Vec<f64>,
    pub r_values: Vec<f64>,
    pub r_prime_values: Vec<f64>,
    pub r_double_prime_values: Vec<f64>,
}

impl RangeSample {
    pub fn len(&self) -> usize {
        self.x_values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x_values.is_empty()
    }
}

fn check_bounds(x_min: f64, x_max: f64) -> Result<(), RiskMathError> {
    check_finite("x_min", x_min)?;
    check_finite("x_max", x_max)?;
    if x_max <= x_min {
        return Err(RiskMathError::InvalidRange(format!(
            "x_max ({x_max}) must be greater than x_min ({x_min})"
        )));
    }
    Ok(())
}

/// Sample R, R', R'' at `points` evenly spaced x values from `x_min` to `x_max`.
///
/// Both endpoints are included exactly. Ranges too narrow to hold `points`
/// distinct f64 values are rejected.
pub fn evaluate_range(
    x_min: f64,
    x_max: f64,
    points: usize,
    coeffs: &RiskCoefficients,
) -> Result<RangeSample, RiskMathError> {
    check_bounds(x_min, x_max)?;
    if points < 2 {
        return Err(RiskMathError::InvalidRange(format!(
            "point count must be at least 2, got {points}"
        )));
    }
    coeffs.check_domain()?;

    let last = points - 1;
    let step = (x_max - x_min) / last as f64;
    let x_values: Vec<f64> = (0..points)
        .map(|i| if i == last { x_max } else { x_min + step * i as f64 })
        .collect();

    // A step below the f64 spacing near x_min makes neighbouring samples collide.
    if x_values.windows(2).any(|pair| pair[1] <= pair[0]) {
        return Err(RiskMathError::InvalidRange(format!(
            "range [{x_min}, {x_max}] is too narrow for {points} points"
        )));
    }

    let r_values = x_values.iter().map(|&x| coeffs.r(x)).collect();
    let r_prime_values = x_values.iter().map(|&x| coeffs.r_prime(x)).collect();
    let r_double_prime_values = vec![coeffs.r_double_prime(); points];

    Ok(RangeSample {
        x_values,
        r_values,
        r_prime_values,
        r_double_prime_values,
    })
}

/// Smallest x in `[x_min, x_max]` where R'(x) = 2a·x + b exceeds `threshold`.
///
/// Returns `x_min` when the whole range is already unsafe and `None` when no
/// part of it is. For a decreasing derivative (a < 0) with the critical point
/// inside the range, only the left edge is checked.
pub fn unsafe_start(
    x_min: f64,
    x_max: f64,
    a: f64,
    b: f64,
    threshold: f64,
) -> Result<Option<f64>, RiskMathError> {
    check_bounds(x_min, x_max)?;
    check_finite("a", a)?;
    check_finite("b", b)?;
    check_finite("threshold", threshold)?;

    if a.abs() < FLAT_SLOPE_TOLERANCE {
        return Ok((b > threshold).then_some(x_min));
    }

    let critical_x = (threshold - b) / (2.0 * a);

    let start = if a > 0.0 {
        if critical_x < x_min {
            Some(x_min)
        } else if critical_x >= x_max {
            None
        } else {
            Some(x_min.max(critical_x))
        }
    } else if critical_x > x_max {
        Some(x_min)
    } else if critical_x <= x_min {
        None
    } else {
        // TODO: report where a decreasing R' drops back under the threshold once
        // the meaning of an unsafe zone for a < 0 models is settled.
        (2.0 * a * x_min + b > threshold).then_some(x_min)
    };

    Ok(start)
}
