//! Driver breakdown: per-factor point contributions to the composed score.
//!
//! Each factor contributes `composer weight × category weight × value × 100`
//! points. Controls carry a negative composer weight and are tagged as
//! risk-reducing. The contributions are never clamped, so their sum is the
//! pre-clamp raw score × 100 even when the published score was clamped.

use serde::{Deserialize, Serialize};

use crate::services::normalizer::NormalizedMetrics;
use crate::services::scoring::{Category, CATEGORY_WEIGHTS};

/// Whether a factor pushes the score up or down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Increase,
    Decrease,
}

/// One factor's signed contribution, in score points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriverItem {
    pub factor: String,
    pub points: f64,
    pub direction: Direction,
}

/// Decompose the score into ranked driver items.
///
/// Ordered by descending absolute points; ties keep declaration order.
pub fn explain(norm: &NormalizedMetrics) -> Vec<DriverItem> {
    let mut drivers: Vec<DriverItem> = CATEGORY_WEIGHTS
        .iter()
        .map(|w| {
            let direction = if w.category == Category::Controls {
                Direction::Decrease
            } else {
                Direction::Increase
            };
            DriverItem {
                factor: w.factor.label().to_string(),
                points: w.category.composer_weight() * w.weight * norm.value(w.factor) * 100.0,
                direction,
            }
        })
        .collect();

    // Vec::sort_by is stable.
    drivers.sort_by(|l, r| r.points.abs().total_cmp(&l.points.abs()));
    drivers
}

/// Sum of all driver points.
pub fn total_points(drivers: &[DriverItem]) -> f64 {
    drivers.iter().map(|d| d.points).sum()
}
