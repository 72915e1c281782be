//! Category aggregation and attack-surface score composition.
//!
//! Category weights (each set sums to 1.0):
//! - Exposure: public 50%, admin 35%, third-party 15%
//! - Identity: MAU 35%, privileged 25%, MFA gap 25%, failed logins 15%
//! - Traffic: requests 45%, countries 35%, geo spread 20%
//! - Vulnerability: critical vulns 65%, patch time 35%
//! - Controls: WAF 60%, rate limiting 40%
//!
//! Composition: 25% exposure + 30% identity + 20% traffic + 30% vuln
//! − 15% controls, scaled to 0-100 and clamped.

use serde::{Deserialize, Serialize};

use crate::services::normalizer::{Factor, NormalizedMetrics};

/// Risk dimension a factor rolls up into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Exposure,
    Identity,
    Traffic,
    Vuln,
    Controls,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Exposure,
        Category::Identity,
        Category::Traffic,
        Category::Vuln,
        Category::Controls,
    ];

    /// Signed weight of this category in the composed score.
    ///
    /// Controls is the only negative weight: enabled controls pull the score down.
    pub const fn composer_weight(self) -> f64 {
        match self {
            Self::Exposure => 0.25,
            Self::Identity => 0.30,
            Self::Traffic => 0.20,
            Self::Vuln => 0.30,
            Self::Controls => -0.15,
        }
    }
}

/// Weight of one factor inside its category.
#[derive(Debug, Clone, Copy)]
pub struct FactorWeight {
    pub factor: Factor,
    pub category: Category,
    pub weight: f64,
}

const fn fw(factor: Factor, category: Category, weight: f64) -> FactorWeight {
    FactorWeight {
        factor,
        category,
        weight,
    }
}

/// Per-category weight table, in factor declaration order.
pub const CATEGORY_WEIGHTS: [FactorWeight; 14] = [
    fw(Factor::PublicEndpoints, Category::Exposure, 0.50),
    fw(Factor::AdminEndpoints, Category::Exposure, 0.35),
    fw(Factor::ThirdPartyIntegrations, Category::Exposure, 0.15),
    fw(Factor::MonthlyActiveUsers, Category::Identity, 0.35),
    fw(Factor::PrivilegedAccounts, Category::Identity, 0.25),
    fw(Factor::MfaGap, Category::Identity, 0.25),
    fw(Factor::FailedLoginRate, Category::Identity, 0.15),
    fw(Factor::MonthlyRequests, Category::Traffic, 0.45),
    fw(Factor::UniqueCountries, Category::Traffic, 0.35),
    fw(Factor::GeoSpread, Category::Traffic, 0.20),
    fw(Factor::OpenCriticalVulns, Category::Vuln, 0.65),
    fw(Factor::MeanPatchTime, Category::Vuln, 0.35),
    fw(Factor::WafEnabled, Category::Controls, 0.60),
    fw(Factor::RateLimitingEnabled, Category::Controls, 0.40),
];

/// Category scores, each in [0, 1] for normalized inputs.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CategoryScores {
    pub exposure: f64,
    pub identity: f64,
    pub traffic: f64,
    pub vuln: f64,
    pub controls: f64,
}

impl CategoryScores {
    pub fn get(&self, category: Category) -> f64 {
        match category {
            Category::Exposure => self.exposure,
            Category::Identity => self.identity,
            Category::Traffic => self.traffic,
            Category::Vuln => self.vuln,
            Category::Controls => self.controls,
        }
    }

    fn slot(&mut self, category: Category) -> &mut f64 {
        match category {
            Category::Exposure => &mut self.exposure,
            Category::Identity => &mut self.identity,
            Category::Traffic => &mut self.traffic,
            Category::Vuln => &mut self.vuln,
            Category::Controls => &mut self.controls,
        }
    }
}

/// Coarse label for a composed score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScoreBand {
    Low,
    Medium,
    High,
    Critical,
}

impl std::fmt::Display for ScoreBand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Low => write!(f, "Low"),
            Self::Medium => write!(f, "Medium"),
            Self::High => write!(f, "High"),
            Self::Critical => write!(f, "Critical"),
        }
    }
}

/// Weighted sum of the factors belonging to one category.
pub fn category_score(norm: &NormalizedMetrics, category: Category) -> f64 {
    CATEGORY_WEIGHTS
        .iter()
        .filter(|w| w.category == category)
        .map(|w| w.weight * norm.value(w.factor))
        .sum()
}

/// Combine normalized metrics into the five category scores.
pub fn aggregate(norm: &NormalizedMetrics) -> CategoryScores {
    let mut scores = CategoryScores::default();
    for w in &CATEGORY_WEIGHTS {
        *scores.slot(w.category) += w.weight * norm.value(w.factor);
    }
    scores
}

/// Pre-clamp composed score on the 0-1 scale. May fall outside [0, 1].
pub fn raw_score(scores: &CategoryScores) -> f64 {
    Category::ALL
        .iter()
        .map(|&c| c.composer_weight() * scores.get(c))
        .sum()
}

/// Final attack-surface score in [0, 100].
///
/// Clamping is silent; callers that need the unclamped value use [`raw_score`].
pub fn compose(scores: &CategoryScores) -> f64 {
    let score = raw_score(scores) * 100.0;
    if score.is_nan() {
        0.0
    } else {
        score.clamp(0.0, 100.0)
    }
}

/// Map a composed score to its band.
pub fn score_to_band(score: f64) -> ScoreBand {
    if score >= 75.0 {
        ScoreBand::Critical
    } else if score >= 50.0 {
        ScoreBand::High
    } else if score >= 25.0 {
        ScoreBand::Medium
    } else {
        ScoreBand::Low
    }
}
