use crate::engine::{ClientId, Investment, Product, Simulation};

/// Read access to the product catalog.
pub trait ProductRepository: Send + Sync {
    /// First catalog entry whose type label matches, ignoring case.
    fn find_by_type(&self, product_type: &str) -> Result<Option<Product>, RepositoryError>;
    fn all(&self) -> Result<Vec<Product>, RepositoryError>;
    fn by_risk_level(&self, risk_level: u8) -> Result<Vec<Product>, RepositoryError>;
}

/// Client portfolio history.
pub trait InvestmentRepository: Send + Sync {
    /// Investments owned by the client, newest first.
    fn by_client(&self, client_id: &ClientId) -> Result<Vec<Investment>, RepositoryError>;
}

/// Append-only simulation log.
pub trait SimulationRepository: Send + Sync {
    fn append(&self, simulation: Simulation) -> Result<Simulation, RepositoryError>;
    /// Simulations requested by the client, newest first.
    fn by_client(&self, client_id: &ClientId) -> Result<Vec<Simulation>, RepositoryError>;
    fn all(&self) -> Result<Vec<Simulation>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
