//! Scoring and risk-math engine plus the services that persist its results.

pub mod assessment;
pub mod drivers;
pub mod normalizer;
pub mod recommendations;
pub mod risk_function;
pub mod risk_model;
pub mod risk_range;
pub mod scoring;
pub mod simulation;
