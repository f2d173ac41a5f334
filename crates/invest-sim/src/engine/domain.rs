use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifier wrapper for catalog products.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(pub Uuid);

/// Identifier wrapper for clients owning investments and simulations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClientId(pub Uuid);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InvestmentId(pub Uuid);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SimulationId(pub Uuid);

impl ProductId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ProductId {
    fn default() -> Self {
        Self::new()
    }
}

/// Catalog entry offered for simulation and recommendation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    /// Free-text type label used to dispatch interest rules (e.g. "CDB", "Fundo").
    pub product_type: String,
    /// Annual base rate as a fraction (0.12 for 12%).
    pub base_rate: Decimal,
    /// Human-facing risk label such as "Baixo", "Moderado" or "Alto".
    pub risk: String,
    /// Ordinal risk, 1 = low through 3 = high.
    pub risk_level: u8,
}

/// A position already held in a client's portfolio.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Investment {
    pub id: InvestmentId,
    pub client_id: ClientId,
    pub product_id: ProductId,
    /// Type label captured when the position was recorded; kept even if the catalog changes.
    pub product_type: String,
    pub amount: Decimal,
    pub yield_rate: Decimal,
    pub date: NaiveDate,
}

/// Persisted result of a successful simulation request. Append-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Simulation {
    pub id: SimulationId,
    pub client_id: ClientId,
    pub product_id: ProductId,
    pub product_name: String,
    pub invested_amount: Decimal,
    pub term_months: u32,
    pub final_amount: Decimal,
    pub simulated_at: DateTime<Utc>,
}
