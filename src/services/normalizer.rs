//! Raw posture metrics and their projection onto a common [0, 1] scale.
//!
//! Every count is divided by a fixed scale constant and clamped. The two
//! percentage "gap" metrics are inverted first so that a larger value always
//! means more risk. Booleans pass through as 0.0 / 1.0; controls are turned
//! into risk reductions later, at composition time.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// One organization's posture at assessment time.
///
/// The `validate` bounds are the documented input envelope. The normalizer
/// itself never rejects anything and clamps whatever it is given.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct RawMetrics {
    #[validate(range(max = 5000))]
    pub public_endpoints: u32,
    #[validate(range(max = 200))]
    pub admin_endpoints: u32,
    #[validate(range(max = 200))]
    pub third_party_integrations: u32,
    #[validate(range(max = 10_000_000))]
    pub monthly_active_users: u64,
    #[validate(range(max = 50_000))]
    pub privileged_accounts: u32,
    #[validate(range(min = 0.0, max = 100.0))]
    pub mfa_adoption_pct: f64,
    #[validate(range(min = 0.0, max = 100.0))]
    pub failed_login_rate_pct: f64,
    #[validate(range(max = 1_000_000_000))]
    pub monthly_requests: u64,
    #[validate(range(max = 250))]
    pub unique_countries: u32,
    #[validate(range(min = 0.0, max = 100.0))]
    pub traffic_concentration_pct: f64,
    #[validate(range(max = 500))]
    pub open_critical_vulns: u32,
    #[validate(range(max = 365))]
    pub mean_patch_time_days: u32,
    pub waf_enabled: bool,
    pub rate_limiting_enabled: bool,
}

/// Divisors mapping each raw count onto [0, 1] before clamping.
#[derive(Debug, Clone, Copy)]
pub struct ScaleTable {
    pub public_endpoints: f64,
    pub admin_endpoints: f64,
    pub third_party_integrations: f64,
    pub monthly_active_users: f64,
    pub privileged_accounts: f64,
    pub failed_login_rate_pct: f64,
    pub monthly_requests: f64,
    pub unique_countries: f64,
    pub open_critical_vulns: f64,
    pub mean_patch_time_days: f64,
}

pub const SCALES: ScaleTable = ScaleTable {
    public_endpoints: 300.0,
    admin_endpoints: 10.0,
    third_party_integrations: 20.0,
    monthly_active_users: 1_000_000.0,
    privileged_accounts: 200.0,
    failed_login_rate_pct: 5.0,
    monthly_requests: 50_000_000.0,
    unique_countries: 40.0,
    open_critical_vulns: 5.0,
    mean_patch_time_days: 30.0,
};

/// Every metric on [0, 1]; higher is riskier except for the two controls.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct NormalizedMetrics {
    pub public_endpoints: f64,
    pub admin_endpoints: f64,
    pub third_party_integrations: f64,
    pub monthly_active_users: f64,
    pub privileged_accounts: f64,
    pub mfa_gap: f64,
    pub failed_login_rate_pct: f64,
    pub monthly_requests: f64,
    pub unique_countries: f64,
    pub geo_spread: f64,
    pub open_critical_vulns: f64,
    pub mean_patch_time_days: f64,
    pub waf_enabled: f64,
    pub rate_limiting_enabled: f64,
}

/// A single normalized metric, in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Factor {
    PublicEndpoints,
    AdminEndpoints,
    ThirdPartyIntegrations,
    MonthlyActiveUsers,
    PrivilegedAccounts,
    MfaGap,
    FailedLoginRate,
    MonthlyRequests,
    UniqueCountries,
    GeoSpread,
    OpenCriticalVulns,
    MeanPatchTime,
    WafEnabled,
    RateLimitingEnabled,
}

impl Factor {
    pub const ALL: [Factor; 14] = [
        Factor::PublicEndpoints,
        Factor::AdminEndpoints,
        Factor::ThirdPartyIntegrations,
        Factor::MonthlyActiveUsers,
        Factor::PrivilegedAccounts,
        Factor::MfaGap,
        Factor::FailedLoginRate,
        Factor::MonthlyRequests,
        Factor::UniqueCountries,
        Factor::GeoSpread,
        Factor::OpenCriticalVulns,
        Factor::MeanPatchTime,
        Factor::WafEnabled,
        Factor::RateLimitingEnabled,
    ];

    /// Human-readable name used in driver breakdowns.
    pub fn label(self) -> &'static str {
        match self {
            Self::PublicEndpoints => "Public Endpoints",
            Self::AdminEndpoints => "Admin Endpoints",
            Self::ThirdPartyIntegrations => "Third-Party Integrations",
            Self::MonthlyActiveUsers => "Monthly Active Users",
            Self::PrivilegedAccounts => "Privileged Accounts",
            Self::MfaGap => "MFA Gap",
            Self::FailedLoginRate => "Failed Login Rate",
            Self::MonthlyRequests => "Monthly Requests",
            Self::UniqueCountries => "Unique Countries",
            Self::GeoSpread => "Geographic Spread",
            Self::OpenCriticalVulns => "Open Critical Vulnerabilities",
            Self::MeanPatchTime => "Mean Patch Time",
            Self::WafEnabled => "WAF Enabled",
            Self::RateLimitingEnabled => "Rate Limiting Enabled",
        }
    }
}

impl NormalizedMetrics {
    /// Look up one metric by factor.
    pub fn value(&self, factor: Factor) -> f64 {
        match factor {
            Factor::PublicEndpoints => self.public_endpoints,
            Factor::AdminEndpoints => self.admin_endpoints,
            Factor::ThirdPartyIntegrations => self.third_party_integrations,
            Factor::MonthlyActiveUsers => self.monthly_active_users,
            Factor::PrivilegedAccounts => self.privileged_accounts,
            Factor::MfaGap => self.mfa_gap,
            Factor::FailedLoginRate => self.failed_login_rate_pct,
            Factor::MonthlyRequests => self.monthly_requests,
            Factor::UniqueCountries => self.unique_countries,
            Factor::GeoSpread => self.geo_spread,
            Factor::OpenCriticalVulns => self.open_critical_vulns,
            Factor::MeanPatchTime => self.mean_patch_time_days,
            Factor::WafEnabled => self.waf_enabled,
            Factor::RateLimitingEnabled => self.rate_limiting_enabled,
        }
    }
}

/// Project raw metrics onto [0, 1]. Total: out-of-range inputs are clamped.
pub fn normalize(raw: &RawMetrics) -> NormalizedMetrics {
    NormalizedMetrics {
        public_endpoints: scaled(f64::from(raw.public_endpoints), SCALES.public_endpoints),
        admin_endpoints: scaled(f64::from(raw.admin_endpoints), SCALES.admin_endpoints),
        third_party_integrations: scaled(
            f64::from(raw.third_party_integrations),
            SCALES.third_party_integrations,
        ),
        monthly_active_users: scaled(
            raw.monthly_active_users as f64,
            SCALES.monthly_active_users,
        ),
        privileged_accounts: scaled(
            f64::from(raw.privileged_accounts),
            SCALES.privileged_accounts,
        ),
        mfa_gap: gap(raw.mfa_adoption_pct),
        failed_login_rate_pct: scaled(raw.failed_login_rate_pct, SCALES.failed_login_rate_pct),
        monthly_requests: scaled(raw.monthly_requests as f64, SCALES.monthly_requests),
        unique_countries: scaled(f64::from(raw.unique_countries), SCALES.unique_countries),
        geo_spread: gap(raw.traffic_concentration_pct),
        open_critical_vulns: scaled(
            f64::from(raw.open_critical_vulns),
            SCALES.open_critical_vulns,
        ),
        mean_patch_time_days: scaled(
            f64::from(raw.mean_patch_time_days),
            SCALES.mean_patch_time_days,
        ),
        waf_enabled: flag(raw.waf_enabled),
        rate_limiting_enabled: flag(raw.rate_limiting_enabled),
    }
}

fn scaled(value: f64, divisor: f64) -> f64 {
    unit(value / divisor)
}

/// `1 - pct/100`, so a low adoption or concentration reads as a wide gap.
fn gap(pct: f64) -> f64 {
    unit(1.0 - pct / 100.0)
}

fn flag(enabled: bool) -> f64 {
    if enabled {
        1.0
    } else {
        0.0
    }
}

// NaN collapses to 0.0 so the output stays inside [0, 1].
fn unit(v: f64) -> f64 {
    if v.is_nan() {
        0.0
    } else {
        v.clamp(0.0, 1.0)
    }
}
