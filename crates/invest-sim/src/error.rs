use crate::advisory::AdvisoryServiceError;
use crate::config::ConfigError;
use crate::engine::EngineError;
use crate::telemetry::TelemetryError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

/// Top-level failure for the binary: startup, serving and offline commands.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("telemetry error: {0}")]
    Telemetry(#[from] TelemetryError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("engine error: {0}")]
    Engine(#[from] EngineError),
    #[error("advisory error: {0}")]
    Advisory(#[from] AdvisoryServiceError),
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            AppError::Engine(
                EngineError::InvalidArgument { .. } | EngineError::Overflow { .. },
            ) => StatusCode::BAD_REQUEST,
            AppError::Engine(EngineError::NotSupported { .. }) => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::Advisory(err) => err.into_response(),
            other => {
                let body = Json(json!({ "error": other.to_string() }));
                (other.status(), body).into_response()
            }
        }
    }
}
