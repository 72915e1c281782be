//! Quadratic risk model R(x) = a·x² + b·x + c and its display expressions.

use serde::{Deserialize, Serialize};

/// Largest coefficient or bound magnitude the engine accepts.
pub const MAX_MAGNITUDE: f64 = 1e10;

/// Failures of the risk-math half of the engine.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RiskMathError {
    #[error("Invalid range: {0}")]
    InvalidRange(String),

    #[error("Value out of domain: {0}")]
    OutOfDomain(String),
}

/// Coefficients of R(x) = a·x² + b·x + c.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskCoefficients {
    pub a: f64,
    pub b: f64,
    pub c: f64,
}

impl RiskCoefficients {
    pub fn new(a: f64, b: f64, c: f64) -> Self {
        Self { a, b, c }
    }

    /// R(x)
    pub fn r(&self, x: f64) -> f64 {
        self.a * x * x + self.b * x + self.c
    }

    /// R'(x) = 2a·x + b
    pub fn r_prime(&self, x: f64) -> f64 {
        2.0 * self.a * x + self.b
    }

    /// R''(x) = 2a
    pub fn r_double_prime(&self) -> f64 {
        2.0 * self.a
    }

    /// Reject non-finite coefficients and magnitudes above [`MAX_MAGNITUDE`].
    pub fn check_domain(&self) -> Result<(), RiskMathError> {
        check_finite("a", self.a)?;
        check_finite("b", self.b)?;
        check_finite("c", self.c)
    }
}

/// Check that a named value is finite and within ±[`MAX_MAGNITUDE`].
pub fn check_finite(name: &str, value: f64) -> Result<(), RiskMathError> {
    if !value.is_finite() || value.abs() > MAX_MAGNITUDE {
        return Err(RiskMathError::OutOfDomain(format!(
            "{name} = {value} is outside [-{MAX_MAGNITUDE:e}, {MAX_MAGNITUDE:e}]"
        )));
    }
    Ok(())
}

/// Display forms of R, R' and R''.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskExpressions {
    #[serde(rename = "expression_r")]
    pub r: String,
    #[serde(rename = "expression_r_prime")]
    pub r_prime: String,
    #[serde(rename = "expression_r_double_prime")]
    pub r_double_prime: String,
}

/// Build simplified LaTeX-compatible expressions for R, R' and R''.
///
/// Zero terms are dropped and unit coefficients elided, so `a = 0` renders a
/// linear R and an all-zero polynomial renders `0`.
pub fn build_expressions(coeffs: &RiskCoefficients) -> Result<RiskExpressions, RiskMathError> {
    coeffs.check_domain()?;

    let two_a = coeffs.r_double_prime();
    Ok(RiskExpressions {
        r: render_polynomial(&[(coeffs.a, 2), (coeffs.b, 1), (coeffs.c, 0)]),
        r_prime: render_polynomial(&[(two_a, 1), (coeffs.b, 0)]),
        r_double_prime: render_polynomial(&[(two_a, 0)]),
    })
}

/// Render `(coefficient, power)` terms, highest power first.
fn render_polynomial(terms: &[(f64, u32)]) -> String {
    let mut out = String::new();

    for &(coef, power) in terms {
        if coef == 0.0 {
            continue;
        }
        let body = render_term(coef.abs(), power);
        match (out.is_empty(), coef < 0.0) {
            (true, false) => out.push_str(&body),
            (true, true) => {
                out.push('-');
                out.push_str(&body);
            }
            (false, false) => {
                out.push_str(" + ");
                out.push_str(&body);
            }
            (false, true) => {
                out.push_str(" - ");
                out.push_str(&body);
            }
        }
    }

    if out.is_empty() {
        out.push('0');
    }
    out
}

fn render_term(magnitude: f64, power: u32) -> String {
    let var = match power {
        0 => return format_number(magnitude),
        1 => "x".to_string(),
        p => format!("x^{{{p}}}"),
    };
    if magnitude == 1.0 {
        var
    } else {
        format!("{} {var}", format_number(magnitude))
    }
}

/// Shortest round-trip decimal form, without exponent notation.
fn format_number(v: f64) -> String {
    format!("{v}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exprs(a: f64, b: f64, c: f64) -> RiskExpressions {
        build_expressions(&RiskCoefficients::new(a, b, c)).unwrap()
    }

    #[test]
    fn default_model() {
        let e = exprs(0.015, 0.8, 5.0);
        assert_eq!(e.r, "0.015 x^{2} + 0.8 x + 5");
        assert_eq!(e.r_prime, "0.03 x + 0.8");
        assert_eq!(e.r_double_prime, "0.03");
    }

    #[test]
    fn linear_when_a_is_zero() {
        let e = exprs(0.0, 2.0, 1.0);
        assert_eq!(e.r, "2 x + 1");
        assert_eq!(e.r_prime, "2");
        assert_eq!(e.r_double_prime, "0");
    }

    #[test]
    fn zero_terms_leave_no_dangling_operators() {
        assert_eq!(exprs(3.0, 0.0, 0.0).r, "3 x^{2}");
        assert_eq!(exprs(3.0, 0.0, 4.0).r, "3 x^{2} + 4");
        assert_eq!(exprs(0.0, 0.0, 7.5).r, "7.5");
        assert_eq!(exprs(0.0, 0.0, 0.0).r, "0");
        assert_eq!(exprs(0.0, 0.0, 0.0).r_prime, "0");
        assert_eq!(exprs(2.0, 0.0, 0.0).r_prime, "4 x");
    }

    #[test]
    fn unit_coefficients_are_elided() {
        assert_eq!(exprs(1.0, 1.0, 1.0).r, "x^{2} + x + 1");
        assert_eq!(exprs(-1.0, -1.0, 0.0).r, "-x^{2} - x");
        assert_eq!(exprs(0.5, 0.0, 0.0).r_prime, "x");
    }

    #[test]
    fn negative_terms_use_subtraction() {
        let e = exprs(-0.5, 2.0, -3.0);
        assert_eq!(e.r, "-0.5 x^{2} + 2 x - 3");
        assert_eq!(e.r_prime, "-x + 2");
        assert_eq!(e.r_double_prime, "-1");
    }

    #[test]
    fn negative_zero_is_dropped() {
        assert_eq!(exprs(-0.0, 1.0, -0.0).r, "x");
    }

    #[test]
    fn rejects_out_of_domain_coefficients() {
        let err = build_expressions(&RiskCoefficients::new(2e10, 0.0, 0.0)).unwrap_err();
        assert!(matches!(err, RiskMathError::OutOfDomain(_)));

        let err = build_expressions(&RiskCoefficients::new(0.0, f64::NAN, 0.0)).unwrap_err();
        assert!(matches!(err, RiskMathError::OutOfDomain(_)));

        assert!(build_expressions(&RiskCoefficients::new(1e10, -1e10, 0.0)).is_ok());
    }

    #[test]
    fn closed_form_derivatives() {
        let k = RiskCoefficients::new(0.015, 0.8, 5.0);
        assert!((k.r(10.0) - 14.5).abs() < 1e-12);
        assert!((k.r_prime(10.0) - 1.1).abs() < 1e-12);
        assert!((k.r_double_prime() - 0.03).abs() < 1e-12);
    }

    #[test]
    fn expressions_serialize_with_prefixed_names() {
        let json = serde_json::to_value(exprs(1.0, 0.0, 0.0)).unwrap();
        assert_eq!(json["expression_r"], "x^{2}");
        assert_eq!(json["expression_r_prime"], "2 x");
        assert_eq!(json["expression_r_double_prime"], "2");
    }
}
