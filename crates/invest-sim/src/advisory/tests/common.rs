use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::Value;
use uuid::Uuid;

use crate::advisory::repository::{
    InvestmentRepository, ProductRepository, RepositoryError, SimulationRepository,
};
use crate::advisory::validation::SimulationRequest;
use crate::advisory::{advisory_router, AdvisoryService};
use crate::clock::FixedClock;
use crate::engine::{ClientId, Investment, InvestmentId, Product, ProductId, Simulation};

pub(super) fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 11, 20, 14, 30, 0)
        .single()
        .expect("valid timestamp")
}

pub(super) fn client() -> ClientId {
    ClientId(Uuid::from_u128(0x7a3c_0001))
}

pub(super) fn catalog() -> Vec<Product> {
    vec![
        product("CDB Caixa 2026", "CDB", dec!(0.12), "Baixo", 1),
        product("LCI CDI 90%", "LCI", dec!(0.11), "Baixo", 1),
        product("Fundo Multimercado", "Fundo", dec!(0.14), "Moderado", 2),
        product("Fundo Ações Tech", "Fundo", dec!(0.18), "Alto", 3),
    ]
}

pub(super) fn product(
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

pub(super) fn investment(product: &Product, amount: Decimal, date: NaiveDate) -> Investment {
    Investment {
        id: InvestmentId(Uuid::new_v4()),
        client_id: client(),
        product_id: product.id,
        product_type: product.product_type.clone(),
        amount,
        yield_rate: product.base_rate,
        date,
    }
}

pub(super) fn request(product_type: &str, amount: Decimal, term_months: i64) -> SimulationRequest {
    SimulationRequest {
        client_id: client(),
        amount,
        term_months,
        product_type: product_type.to_string(),
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryProducts {
    pub(super) products: Arc<Mutex<Vec<Product>>>,
}

impl MemoryProducts {
    pub(super) fn with(products: Vec<Product>) -> Self {
        Self {
            products: Arc::new(Mutex::new(products)),
        }
    }
}

impl ProductRepository for MemoryProducts {
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
pub(super) struct MemoryInvestments {
    pub(super) investments: Arc<Mutex<Vec<Investment>>>,
}

impl MemoryInvestments {
    pub(super) fn with(investments: Vec<Investment>) -> Self {
        Self {
            investments: Arc::new(Mutex::new(investments)),
        }
    }
}

impl InvestmentRepository for MemoryInvestments {
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
pub(super) struct MemorySimulations {
    pub(super) simulations: Arc<Mutex<Vec<Simulation>>>,
}

impl MemorySimulations {
    pub(super) fn stored(&self) -> Vec<Simulation> {
        self.simulations
            .lock()
            .expect("simulation mutex poisoned")
            .clone()
    }
}

impl SimulationRepository for MemorySimulations {
    fn append(&self, simulation: Simulation) -> Result<Simulation, RepositoryError> {
        let mut guard = self.simulations.lock().expect("simulation mutex poisoned");
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
        Ok(self.stored())
    }
}

pub(super) struct UnavailableSimulations;

impl SimulationRepository for UnavailableSimulations {
    fn append(&self, _simulation: Simulation) -> Result<Simulation, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn by_client(&self, _client_id: &ClientId) -> Result<Vec<Simulation>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn all(&self) -> Result<Vec<Simulation>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

pub(super) type MemoryService = AdvisoryService<MemoryProducts, MemoryInvestments, MemorySimulations>;

pub(super) fn build_service(
    investments: Vec<Investment>,
) -> (MemoryService, Arc<MemorySimulations>, Vec<Product>) {
    let catalog = catalog();
    let simulations = Arc::new(MemorySimulations::default());
    let service = AdvisoryService::new(
        Arc::new(MemoryProducts::with(catalog.clone())),
        Arc::new(MemoryInvestments::with(investments)),
        simulations.clone(),
        Arc::new(FixedClock(now())),
    )
    .expect("standard engines build");
    (service, simulations, catalog)
}

pub(super) fn router_with_service(service: MemoryService) -> axum::Router {
    advisory_router(Arc::new(service))
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
