use chrono::{Days, NaiveDate};
use invest_sim::advisory::{
    AdvisoryService, InvestmentRepository, ProductRepository, RepositoryError,
    SimulationRepository,
};
use invest_sim::clock::Clock;
use invest_sim::engine::{
    ClientId, EngineError, Investment, InvestmentId, Product, ProductId, Simulation,
};
use metrics_exporter_prometheus::PrometheusHandle;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};
use uuid::Uuid;

/// Client whose portfolio is seeded alongside the demo catalog.
pub(crate) const DEMO_CLIENT: ClientId =
    ClientId(Uuid::from_u128(0x0000_0000_0000_4000_8000_0000_0000_0001));

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

pub(crate) type InMemoryAdvisoryService = AdvisoryService<
    InMemoryProductRepository,
    InMemoryInvestmentRepository,
    InMemorySimulationRepository,
>;

#[derive(Default, Clone)]
pub(crate) struct InMemoryProductRepository {
    products: Arc<Mutex<Vec<Product>>>,
}

impl InMemoryProductRepository {
    pub(crate) fn with_products(products: Vec<Product>) -> Self {
        Self {
            products: Arc::new(Mutex::new(products)),
        }
    }
}

impl ProductRepository for InMemoryProductRepository {
    fn find_by_type(&self, product_type: &str) -> Result<Option<Product>, RepositoryError> {
        let guard = self.products.lock().expect("catalog mutex poisoned");
        Ok(guard
            .iter()
            .find(|product| product.product_type.eq_ignore_ascii_case(product_type))
            .cloned())
    }

    fn all(&self) -> Result<Vec<Product>, RepositoryError> {
        Ok(self.products.lock().expect("catalog mutex poisoned").clone())
    }

    fn by_risk_level(&self, risk_level: u8) -> Result<Vec<Product>, RepositoryError> {
        let guard = self.products.lock().expect("catalog mutex poisoned");
        Ok(guard
            .iter()
            .filter(|product| product.risk_level == risk_level)
            .cloned()
            .collect())
    }
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryInvestmentRepository {
    investments: Arc<Mutex<Vec<Investment>>>,
}

impl InMemoryInvestmentRepository {
    pub(crate) fn with_investments(investments: Vec<Investment>) -> Self {
        Self {
            investments: Arc::new(Mutex::new(investments)),
        }
    }
}

impl InvestmentRepository for InMemoryInvestmentRepository {
    fn by_client(&self, client_id: &ClientId) -> Result<Vec<Investment>, RepositoryError> {
        let guard = self.investments.lock().expect("investment mutex poisoned");
        let mut owned: Vec<Investment> = guard
            .iter()
            .filter(|investment| &investment.client_id == client_id)
            .cloned()
            .collect();
        owned.sort_by(|left, right| right.date.cmp(&left.date));
        Ok(owned)
    }
}

#[derive(Default, Clone)]
pub(crate) struct InMemorySimulationRepository {
    simulations: Arc<Mutex<Vec<Simulation>>>,
}

impl SimulationRepository for InMemorySimulationRepository {
    fn append(&self, simulation: Simulation) -> Result<Simulation, RepositoryError> {
        let mut guard = self.simulations.lock().expect("simulation mutex poisoned");
        if guard.iter().any(|existing| existing.id == simulation.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.push(simulation.clone());
        Ok(simulation)
    }

    fn by_client(&self, client_id: &ClientId) -> Result<Vec<Simulation>, RepositoryError> {
        let guard = self.simulations.lock().expect("simulation mutex poisoned");
        let mut owned: Vec<Simulation> = guard
            .iter()
            .filter(|simulation| &simulation.client_id == client_id)
            .cloned()
            .collect();
        owned.sort_by(|left, right| right.simulated_at.cmp(&left.simulated_at));
        Ok(owned)
    }

    fn all(&self) -> Result<Vec<Simulation>, RepositoryError> {
        Ok(self
            .simulations
            .lock()
            .expect("simulation mutex poisoned")
            .clone())
    }
}

fn catalog_entry(
    name: &str,
    product_type: &str,
    base_rate: Decimal,
    risk: &str,
    risk_level: u8,
) -> Product {
    Product {
        id: ProductId::new(),
        name: name.to_string(),
        product_type: product_type.to_string(),
        base_rate,
        risk: risk.to_string(),
        risk_level,
    }
}

pub(crate) fn seed_catalog() -> Vec<Product> {
    vec![
        catalog_entry("CDB Caixa 2026", "CDB", dec!(0.12), "Baixo", 1),
        catalog_entry("LCI CDI 90%", "LCI", dec!(0.11), "Baixo", 1),
        catalog_entry("Fundo Multimercado", "Fundo", dec!(0.14), "Moderado", 2),
        catalog_entry("Fundo Ações Tech", "Fundo", dec!(0.18), "Alto", 3),
    ]
}

/// Demo portfolio spread over the last year, anchored on `today`.
pub(crate) fn seed_investments(
    client_id: ClientId,
    catalog: &[Product],
    today: NaiveDate,
) -> Vec<Investment> {
    let holdings: [(usize, Decimal, u64); 4] = [
        (0, dec!(5000), 300),
        (2, dec!(3000), 120),
        (2, dec!(2500), 45),
        (3, dec!(1500), 10),
    ];

    holdings
        .iter()
        .filter_map(|(index, amount, days_ago)| {
            let product = catalog.get(*index)?;
            let date = today.checked_sub_days(Days::new(*days_ago))?;
            Some(Investment {
                id: InvestmentId(Uuid::new_v4()),
                client_id,
                product_id: product.id,
                product_type: product.product_type.clone(),
                amount: *amount,
                yield_rate: product.base_rate,
                date,
            })
        })
        .collect()
}

/// In-memory advisory service, optionally seeded with the demo catalog and portfolio.
pub(crate) fn build_service(
    seed_demo_data: bool,
    clock: Arc<dyn Clock>,
) -> Result<InMemoryAdvisoryService, EngineError> {
    let (catalog, investments) = if seed_demo_data {
        let catalog = seed_catalog();
        let investments = seed_investments(DEMO_CLIENT, &catalog, clock.today());
        (catalog, investments)
    } else {
        (Vec::new(), Vec::new())
    };

    AdvisoryService::new(
        Arc::new(InMemoryProductRepository::with_products(catalog)),
        Arc::new(InMemoryInvestmentRepository::with_investments(investments)),
        Arc::new(InMemorySimulationRepository::default()),
        clock,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use invest_sim::clock::FixedClock;

    fn clock() -> Arc<dyn Clock> {
        let now = Utc
            .with_ymd_and_hms(2025, 11, 20, 12, 0, 0)
            .single()
            .expect("valid timestamp");
        Arc::new(FixedClock(now))
    }

    #[test]
    fn seeded_portfolio_belongs_to_the_demo_client() {
        let catalog = seed_catalog();
        let today = NaiveDate::from_ymd_opt(2025, 11, 20).expect("valid date");

        let investments = seed_investments(DEMO_CLIENT, &catalog, today);

        assert_eq!(investments.len(), 4);
        assert!(investments.iter().all(|item| item.client_id == DEMO_CLIENT));
        assert_eq!(
            investments[3].date,
            NaiveDate::from_ymd_opt(2025, 11, 10).expect("valid date")
        );
    }

    #[test]
    fn seeded_service_profiles_the_demo_client() {
        let service = build_service(true, clock()).expect("service builds");

        let view = service.risk_profile(&DEMO_CLIENT).expect("profile");

        // 3 recent trades -> 25, weighted risk ~1.71 -> 25, volume 12000 -> 10
        assert_eq!(view.score, 60);
        assert_eq!(view.profile, "Moderate");
    }

    #[test]
    fn unseeded_service_has_an_empty_catalog() {
        let service = build_service(false, clock()).expect("service builds");

        assert!(service
            .recommended_products("conservative")
            .expect("recommendations")
            .is_empty());
    }

    #[test]
    fn duplicate_simulation_ids_conflict() {
        let repository = InMemorySimulationRepository::default();
        let simulation = Simulation {
            id: invest_sim::engine::SimulationId(Uuid::new_v4()),
            client_id: DEMO_CLIENT,
            product_id: ProductId::new(),
            product_name: "CDB Caixa 2026".to_string(),
            invested_amount: dec!(1000),
            term_months: 12,
            final_amount: dec!(1120.00),
            simulated_at: clock().now(),
        };

        repository.append(simulation.clone()).expect("first append");
        assert!(matches!(
            repository.append(simulation),
            Err(RepositoryError::Conflict)
        ));
    }
}
