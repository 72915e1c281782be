//! Database models and DTOs for risk models, simulations and assessments.

pub mod assessment;
pub mod pagination;
pub mod risk_model;
pub mod simulation;
