use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use tracing::{error, warn};
use uuid::Uuid;

use super::repository::{
    InvestmentRepository, ProductRepository, RepositoryError, SimulationRepository,
};
use super::service::{AdvisoryService, AdvisoryServiceError};
use super::validation::{SimulationRequest, ValidationErrors};
use super::views::{
    InvestmentHistoryEntry, ProductView, RiskProfileView, SimulationAggregate,
    SimulationHistoryEntry, SimulationOutcome,
};
use crate::engine::ClientId;

type SharedService<P, I, S> = Arc<AdvisoryService<P, I, S>>;

/// Router builder exposing simulation, profiling and history endpoints.
pub fn advisory_router<P, I, S>(service: SharedService<P, I, S>) -> Router
where
    P: ProductRepository + 'static,
    I: InvestmentRepository + 'static,
    S: SimulationRepository + 'static,
{
    Router::new()
        .route(
            "/api/v1/simulations",
            post(simulate_handler::<P, I, S>).get(simulation_history_handler::<P, I, S>),
        )
        .route(
            "/api/v1/simulations/by-product-day",
            get(simulation_aggregate_handler::<P, I, S>),
        )
        .route(
            "/api/v1/risk-profile/:client_id",
            get(risk_profile_handler::<P, I, S>),
        )
        .route(
            "/api/v1/recommended-products/:profile",
            get(recommended_products_handler::<P, I, S>),
        )
        .route(
            "/api/v1/investments/:client_id",
            get(investment_history_handler::<P, I, S>),
        )
        .with_state(service)
}

#[derive(Debug, Deserialize)]
pub(crate) struct ClientQuery {
    pub(crate) client_id: Uuid,
}

/// Reports an extractor rejection as a validation error on `field`.
fn malformed(field: &str, reason: String) -> AdvisoryServiceError {
    ValidationErrors::single(field, reason).into()
}

pub(crate) async fn simulate_handler<P, I, S>(
    State(service): State<SharedService<P, I, S>>,
    payload: Result<Json<SimulationRequest>, JsonRejection>,
) -> Result<Json<SimulationOutcome>, AdvisoryServiceError>
where
    P: ProductRepository + 'static,
    I: InvestmentRepository + 'static,
    S: SimulationRepository + 'static,
{
    let Json(request) = payload.map_err(|rejection| malformed("body", rejection.body_text()))?;
    service.simulate(request).map(Json)
}

pub(crate) async fn simulation_history_handler<P, I, S>(
    State(service): State<SharedService<P, I, S>>,
    query: Result<Query<ClientQuery>, QueryRejection>,
) -> Result<Json<Vec<SimulationHistoryEntry>>, AdvisoryServiceError>
where
    P: ProductRepository + 'static,
    I: InvestmentRepository + 'static,
    S: SimulationRepository + 'static,
{
    let Query(query) =
        query.map_err(|rejection| malformed("client_id", rejection.body_text()))?;
    service
        .simulations_for_client(&ClientId(query.client_id))
        .map(Json)
}

pub(crate) async fn simulation_aggregate_handler<P, I, S>(
    State(service): State<SharedService<P, I, S>>,
) -> Result<Json<Vec<SimulationAggregate>>, AdvisoryServiceError>
where
    P: ProductRepository + 'static,
    I: InvestmentRepository + 'static,
    S: SimulationRepository + 'static,
{
    service.simulations_by_product_day().map(Json)
}

pub(crate) async fn risk_profile_handler<P, I, S>(
    State(service): State<SharedService<P, I, S>>,
    client_id: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<RiskProfileView>, AdvisoryServiceError>
where
    P: ProductRepository + 'static,
    I: InvestmentRepository + 'static,
    S: SimulationRepository + 'static,
{
    let Path(client_id) =
        client_id.map_err(|rejection| malformed("client_id", rejection.body_text()))?;
    service.risk_profile(&ClientId(client_id)).map(Json)
}

pub(crate) async fn recommended_products_handler<P, I, S>(
    State(service): State<SharedService<P, I, S>>,
    Path(profile): Path<String>,
) -> Result<Json<Vec<ProductView>>, AdvisoryServiceError>
where
    P: ProductRepository + 'static,
    I: InvestmentRepository + 'static,
    S: SimulationRepository + 'static,
{
    service.recommended_products(&profile).map(Json)
}

pub(crate) async fn investment_history_handler<P, I, S>(
    State(service): State<SharedService<P, I, S>>,
    client_id: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<Vec<InvestmentHistoryEntry>>, AdvisoryServiceError>
where
    P: ProductRepository + 'static,
    I: InvestmentRepository + 'static,
    S: SimulationRepository + 'static,
{
    let Path(client_id) =
        client_id.map_err(|rejection| malformed("client_id", rejection.body_text()))?;
    service.investments_for_client(&ClientId(client_id)).map(Json)
}

impl AdvisoryServiceError {
    fn status(&self) -> (StatusCode, &'static str) {
        match self {
            AdvisoryServiceError::Validation(_) => (StatusCode::BAD_REQUEST, "Validation failed"),
            AdvisoryServiceError::NotFound { .. } => (StatusCode::NOT_FOUND, "Resource not found"),
            AdvisoryServiceError::ProductNotSupported(_) => {
                (StatusCode::NOT_FOUND, "Product not supported")
            }
            AdvisoryServiceError::Repository(RepositoryError::Unavailable(_)) => {
                (StatusCode::SERVICE_UNAVAILABLE, "Service unavailable")
            }
            AdvisoryServiceError::Repository(RepositoryError::Conflict) => {
                (StatusCode::CONFLICT, "Resource conflict")
            }
            AdvisoryServiceError::Engine(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
        }
    }
}

impl IntoResponse for AdvisoryServiceError {
    fn into_response(self) -> Response {
        let (status, title) = self.status();

        let detail = if status == StatusCode::INTERNAL_SERVER_ERROR {
            error!(error = %self, "unhandled advisory failure");
            "an unexpected error occurred while processing the request".to_string()
        } else {
            warn!(status = status.as_u16(), error = %self, "request rejected");
            self.to_string()
        };

        let mut payload = json!({
            "status": status.as_u16(),
            "title": title,
            "detail": detail,
        });
        if let AdvisoryServiceError::Validation(errors) = &self {
            payload["errors"] = json!(errors.errors);
        }

        (status, Json(payload)).into_response()
    }
}
