//! Application layer: request validation, repository seams, the advisory service that drives the
//! engines, and the HTTP router over it.

pub mod repository;
pub mod router;
pub mod service;
pub mod validation;
pub mod views;

#[cfg(test)]
mod tests;

pub use repository::{
    InvestmentRepository, ProductRepository, RepositoryError, SimulationRepository,
};
pub use router::advisory_router;
pub use service::{AdvisoryService, AdvisoryServiceError};
pub use validation::{SimulationRequest, ValidatedSimulation, ValidationErrors};
pub use views::{
    aggregate_by_product_day, InvestmentHistoryEntry, ProductView, RiskProfileView,
    SimulationAggregate, SimulationHistoryEntry, SimulationOutcome, SimulationResult,
};
