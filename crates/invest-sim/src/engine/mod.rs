//! Calculation core: interest strategies keyed by product type and the rule-based risk scorer.
//!
//! Both engines are assembled once and are read-only afterwards, so a single instance can be
//! shared across request handlers behind an `Arc`.

pub mod domain;
mod error;
pub mod interest;
pub mod risk;

pub use domain::{
    ClientId, Investment, InvestmentId, Product, ProductId, Simulation, SimulationId,
};
pub use error::EngineError;
pub use interest::{CalculationContext, InterestCalculationEngine, InterestRule};
pub use risk::{RiskBand, RiskContext, RiskProfile, RiskScoringEngine, ScoringRule};
