use std::sync::Arc;

use rust_decimal::Decimal;
use tracing::info;
use uuid::Uuid;

use super::repository::{
    InvestmentRepository, ProductRepository, RepositoryError, SimulationRepository,
};
use super::validation::{validate, SimulationRequest, ValidationErrors};
use super::views::{
    aggregate_by_product_day, InvestmentHistoryEntry, ProductView, RiskProfileView,
    SimulationAggregate, SimulationHistoryEntry, SimulationOutcome, SimulationResult,
};
use crate::clock::Clock;
use crate::engine::{
    CalculationContext, ClientId, EngineError, InterestCalculationEngine, RiskBand,
    RiskScoringEngine, Simulation, SimulationId,
};

/// Service composing the repositories, both engines and the clock.
pub struct AdvisoryService<P, I, S> {
    products: Arc<P>,
    investments: Arc<I>,
    simulations: Arc<S>,
    interest: Arc<InterestCalculationEngine>,
    risk: Arc<RiskScoringEngine>,
    clock: Arc<dyn Clock>,
}

impl<P, I, S> AdvisoryService<P, I, S>
where
    P: ProductRepository + 'static,
    I: InvestmentRepository + 'static,
    S: SimulationRepository + 'static,
{
    /// Builds the service with the standard interest and scoring rule sets.
    pub fn new(
        products: Arc<P>,
        investments: Arc<I>,
        simulations: Arc<S>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, EngineError> {
        let interest = Arc::new(InterestCalculationEngine::standard()?);
        let risk = Arc::new(RiskScoringEngine::standard()?);
        Ok(Self::with_engines(
            products,
            investments,
            simulations,
            interest,
            risk,
            clock,
        ))
    }

    pub fn with_engines(
        products: Arc<P>,
        investments: Arc<I>,
        simulations: Arc<S>,
        interest: Arc<InterestCalculationEngine>,
        risk: Arc<RiskScoringEngine>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            products,
            investments,
            simulations,
            interest,
            risk,
            clock,
        }
    }

    /// Validate, price and record a simulation request.
    pub fn simulate(
        &self,
        request: SimulationRequest,
    ) -> Result<SimulationOutcome, AdvisoryServiceError> {
        let request = validate(&request)?;

        let product = self
            .products
            .find_by_type(&request.product_type)?
            .ok_or_else(|| AdvisoryServiceError::NotFound {
                entity: "product",
                key: request.product_type.clone(),
            })?;

        let context = CalculationContext::new(request.amount, request.term_months, &product)?;
        let final_amount = self.interest.calculate(&context)?;

        let simulation = Simulation {
            id: SimulationId(Uuid::new_v4()),
            client_id: request.client_id,
            product_id: product.id,
            product_name: product.name.clone(),
            invested_amount: request.amount,
            term_months: request.term_months,
            final_amount,
            simulated_at: self.clock.now(),
        };
        let stored = self.simulations.append(simulation)?;

        info!(
            client_id = %stored.client_id.0,
            product = %stored.product_name,
            term_months = stored.term_months,
            final_amount = %stored.final_amount,
            "simulation recorded"
        );

        let effective_return = if request.amount.is_zero() {
            Decimal::ZERO
        } else {
            (final_amount - request.amount) / request.amount
        };

        Ok(SimulationOutcome {
            validated_product: ProductView::from(&product),
            result: SimulationResult {
                final_amount,
                effective_return,
                term_months: request.term_months,
            },
            simulated_at: stored.simulated_at,
        })
    }

    pub fn simulations_for_client(
        &self,
        client_id: &ClientId,
    ) -> Result<Vec<SimulationHistoryEntry>, AdvisoryServiceError> {
        let simulations = self.simulations.by_client(client_id)?;
        Ok(simulations
            .into_iter()
            .map(SimulationHistoryEntry::from)
            .collect())
    }

    pub fn simulations_by_product_day(
        &self,
    ) -> Result<Vec<SimulationAggregate>, AdvisoryServiceError> {
        let simulations = self.simulations.all()?;
        Ok(aggregate_by_product_day(&simulations))
    }

    /// Score the client's portfolio against the full catalog as of today.
    pub fn risk_profile(
        &self,
        client_id: &ClientId,
    ) -> Result<RiskProfileView, AdvisoryServiceError> {
        let investments = self.investments.by_client(client_id)?;
        let products = self.products.all()?;
        let today = self.clock.today();

        let profile = self.risk.score_profile(&investments, &products, today)?;

        info!(
            client_id = %client_id.0,
            profile = profile.name(),
            score = profile.score(),
            "risk profile computed"
        );

        Ok(RiskProfileView::new(*client_id, &profile))
    }

    /// Catalog entries whose risk level matches the named profile.
    pub fn recommended_products(
        &self,
        profile: &str,
    ) -> Result<Vec<ProductView>, AdvisoryServiceError> {
        let band = RiskBand::parse(profile).ok_or_else(|| {
            ValidationErrors::single("profile", format!("unknown risk profile '{profile}'"))
        })?;

        let products = self.products.by_risk_level(band.risk_level())?;
        Ok(products.iter().map(ProductView::from).collect())
    }

    pub fn investments_for_client(
        &self,
        client_id: &ClientId,
    ) -> Result<Vec<InvestmentHistoryEntry>, AdvisoryServiceError> {
        let investments = self.investments.by_client(client_id)?;
        Ok(investments
            .into_iter()
            .map(InvestmentHistoryEntry::from)
            .collect())
    }
}

/// Error raised by the advisory service.
#[derive(Debug, thiserror::Error)]
pub enum AdvisoryServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationErrors),
    #[error("{entity} '{key}' was not found")]
    NotFound { entity: &'static str, key: String },
    #[error("product type '{0}' is not supported")]
    ProductNotSupported(String),
    #[error(transparent)]
    Engine(EngineError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl From<EngineError> for AdvisoryServiceError {
    fn from(value: EngineError) -> Self {
        match value {
            EngineError::NotSupported { product_type } => Self::ProductNotSupported(product_type),
            other => Self::Engine(other),
        }
    }
}
