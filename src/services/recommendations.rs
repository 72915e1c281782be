//! Rule-based mitigation recommendations.
//!
//! Rules are independent threshold tests on normalized metrics. Every rule
//! that fires contributes its text; output follows rule declaration order.

use crate::services::normalizer::NormalizedMetrics;
use crate::services::scoring::{category_score, Category};

pub const ADMIN_ENDPOINTS_THRESHOLD: f64 = 0.6;
pub const MFA_GAP_THRESHOLD: f64 = 0.3;
pub const PRIVILEGED_ACCOUNTS_THRESHOLD: f64 = 0.5;
pub const FAILED_LOGIN_THRESHOLD: f64 = 0.5;
pub const PATCH_TIME_THRESHOLD: f64 = 0.5;
pub const CRITICAL_VULNS_THRESHOLD: f64 = 0.2;
/// Controls category score below which WAF / rate limiting are recommended.
pub const CONTROLS_THRESHOLD: f64 = 0.5;

/// A single recommendation rule.
#[derive(Debug, Clone, Copy)]
pub struct Rule {
    pub name: &'static str,
    pub fires: fn(&NormalizedMetrics) -> bool,
    pub text: &'static str,
}

pub const RULES: [Rule; 6] = [
    Rule {
        name: "admin_surface_reduction",
        fires: |n| n.admin_endpoints > ADMIN_ENDPOINTS_THRESHOLD,
        text: "Admin Surface Reduction: Reduce the number of admin endpoints exposed. \
               Consider restricting admin access to internal networks or VPN-only connections.",
    },
    Rule {
        name: "mfa_enforcement",
        fires: |n| n.mfa_gap > MFA_GAP_THRESHOLD,
        text: "MFA Enforcement: Increase multi-factor authentication adoption. \
               The current MFA gap indicates significant exposure from single-factor authentication.",
    },
    Rule {
        name: "privileged_access_management",
        fires: |n| n.privileged_accounts > PRIVILEGED_ACCOUNTS_THRESHOLD,
        text: "Privileged Access Management (PAM): Implement PAM controls to monitor and restrict \
               access to privileged accounts. Consider using just-in-time access principles.",
    },
    Rule {
        name: "bot_protection",
        fires: |n| n.failed_login_rate_pct > FAILED_LOGIN_THRESHOLD,
        text: "Bot Protection and Rate Limiting: High failed login rate suggests potential brute force \
               or automated attacks. Implement enhanced bot protection and rate limiting on authentication endpoints.",
    },
    Rule {
        name: "vulnerability_patching",
        fires: |n| {
            n.mean_patch_time_days > PATCH_TIME_THRESHOLD
                || n.open_critical_vulns > CRITICAL_VULNS_THRESHOLD
        },
        text: "Vulnerability Patching: Accelerate patch deployment processes. \
               Reduce mean patch time and prioritize patching critical vulnerabilities.",
    },
    Rule {
        name: "enable_security_controls",
        fires: |n| category_score(n, Category::Controls) < CONTROLS_THRESHOLD,
        text: "Enable Security Controls: Deploy Web Application Firewall (WAF) and rate limiting \
               to protect against common attacks and traffic anomalies.",
    },
];

/// Texts of every rule that fires, in rule order. May be empty.
pub fn recommend(norm: &NormalizedMetrics) -> Vec<&'static str> {
    RULES
        .iter()
        .filter(|rule| (rule.fires)(norm))
        .map(|rule| rule.text)
        .collect()
}

/// Names of every rule that fires, in rule order.
pub fn fired_rules(norm: &NormalizedMetrics) -> Vec<&'static str> {
    RULES
        .iter()
        .filter(|rule| (rule.fires)(norm))
        .map(|rule| rule.name)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::normalizer::{normalize, tests::quiet_metrics, RawMetrics};

    #[test]
    fn quiet_posture_only_asks_for_controls() {
        let recs = recommend(&normalize(&quiet_metrics()));
        assert_eq!(recs.len(), 1);
        assert!(recs[0].starts_with("Enable Security Controls"));
    }

    #[test]
    fn nothing_fires_for_hardened_posture() {
        let raw = RawMetrics {
            waf_enabled: true,
            ..quiet_metrics()
        };
        assert!(recommend(&normalize(&raw)).is_empty());
    }

    #[test]
    fn rate_limiting_alone_is_not_enough() {
        // 0.40 < 0.5
        let raw = RawMetrics {
            rate_limiting_enabled: true,
            ..quiet_metrics()
        };
        assert_eq!(
            fired_rules(&normalize(&raw)),
            vec!["enable_security_controls"]
        );
    }

    #[test]
    fn every_rule_fires_in_declaration_order() {
        let raw = RawMetrics {
            admin_endpoints: 8,
            privileged_accounts: 150,
            mfa_adoption_pct: 20.0,
            failed_login_rate_pct: 4.0,
            mean_patch_time_days: 25,
            ..quiet_metrics()
        };
        assert_eq!(
            fired_rules(&normalize(&raw)),
            vec![
                "admin_surface_reduction",
                "mfa_enforcement",
                "privileged_access_management",
                "bot_protection",
                "vulnerability_patching",
                "enable_security_controls",
            ]
        );
    }

    #[test]
    fn thresholds_are_strict() {
        let raw = RawMetrics {
            admin_endpoints: 6,
            privileged_accounts: 100,
            mean_patch_time_days: 15,
            open_critical_vulns: 1,
            waf_enabled: true,
            ..quiet_metrics()
        };
        // 0.6, 0.5, 0.5 and 0.2 all sit exactly on their thresholds.
        assert!(recommend(&normalize(&raw)).is_empty());
    }

    #[test]
    fn critical_vulns_alone_trigger_patching() {
        let raw = RawMetrics {
            open_critical_vulns: 2,
            waf_enabled: true,
            ..quiet_metrics()
        };
        assert_eq!(
            fired_rules(&normalize(&raw)),
            vec!["vulnerability_patching"]
        );
    }

    #[test]
    fn mfa_rule_is_monotonic() {
        let mut previously_fired = false;
        for adoption in (0..=100).rev() {
            let raw = RawMetrics {
                mfa_adoption_pct: f64::from(adoption),
                ..quiet_metrics()
            };
            let fired = fired_rules(&normalize(&raw)).contains(&"mfa_enforcement");
            // Gap grows as adoption falls; once fired it never un-fires.
            assert!(fired || !previously_fired, "adoption {adoption}");
            previously_fired = fired;
        }
        assert!(previously_fired);
    }
}
