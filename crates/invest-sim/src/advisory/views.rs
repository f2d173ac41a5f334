use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::engine::{
    ClientId, Investment, InvestmentId, Product, ProductId, RiskProfile, Simulation, SimulationId,
};

const AVERAGE_SCALE: u32 = 2;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductView {
    pub id: ProductId,
    pub name: String,
    pub product_type: String,
    pub rate: Decimal,
    pub risk: String,
}

impl From<&Product> for ProductView {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id,
            name: product.name.clone(),
            product_type: product.product_type.clone(),
            rate: product.base_rate,
            risk: product.risk.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationResult {
    pub final_amount: Decimal,
    /// `(final - invested) / invested` over the whole term.
    pub effective_return: Decimal,
    pub term_months: u32,
}

/// Response for a successful simulation request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationOutcome {
    pub validated_product: ProductView,
    pub result: SimulationResult,
    pub simulated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationHistoryEntry {
    pub id: SimulationId,
    pub client_id: ClientId,
    pub product: String,
    pub invested_amount: Decimal,
    pub final_amount: Decimal,
    pub term_months: u32,
    pub simulated_at: DateTime<Utc>,
}

impl From<Simulation> for SimulationHistoryEntry {
    fn from(simulation: Simulation) -> Self {
        Self {
            id: simulation.id,
            client_id: simulation.client_id,
            product: simulation.product_name,
            invested_amount: simulation.invested_amount,
            final_amount: simulation.final_amount,
            term_months: simulation.term_months,
            simulated_at: simulation.simulated_at,
        }
    }
}

/// Daily simulation volume per product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationAggregate {
    pub product: String,
    pub date: NaiveDate,
    pub simulations: usize,
    pub average_final_amount: Decimal,
}

/// Groups simulations by UTC day and product name, ordered by day then product.
pub fn aggregate_by_product_day(simulations: &[Simulation]) -> Vec<SimulationAggregate> {
    let mut buckets: BTreeMap<(NaiveDate, &str), (usize, Decimal)> = BTreeMap::new();
    for simulation in simulations {
        let key = (
            simulation.simulated_at.date_naive(),
            simulation.product_name.as_str(),
        );
        let bucket = buckets.entry(key).or_insert((0, Decimal::ZERO));
        bucket.0 += 1;
        bucket.1 += simulation.final_amount;
    }

    buckets
        .into_iter()
        .map(|((date, product), (count, total))| SimulationAggregate {
            product: product.to_string(),
            date,
            simulations: count,
            average_final_amount: (total / Decimal::from(count)).round_dp(AVERAGE_SCALE),
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskProfileView {
    pub client_id: ClientId,
    pub profile: String,
    pub score: u32,
    pub description: String,
}

impl RiskProfileView {
    pub fn new(client_id: ClientId, profile: &RiskProfile) -> Self {
        Self {
            client_id,
            profile: profile.name().to_string(),
            score: profile.score(),
            description: profile.description().to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvestmentHistoryEntry {
    pub id: InvestmentId,
    pub product_type: String,
    pub amount: Decimal,
    pub yield_rate: Decimal,
    pub date: NaiveDate,
}

impl From<Investment> for InvestmentHistoryEntry {
    fn from(investment: Investment) -> Self {
        Self {
            id: investment.id,
            product_type: investment.product_type,
            amount: investment.amount,
            yield_rate: investment.yield_rate,
            date: investment.date,
        }
    }
}
