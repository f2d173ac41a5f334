use std::collections::BTreeMap;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::engine::ClientId;

const MAX_PRODUCT_TYPE_LEN: usize = 50;
const MAX_AMOUNT: Decimal = dec!(1000000000);
const MAX_TERM_MONTHS: i64 = 360;

/// Inbound simulation payload prior to validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationRequest {
    pub client_id: ClientId,
    pub amount: Decimal,
    pub term_months: i64,
    pub product_type: String,
}

/// A request that passed every field check.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedSimulation {
    pub client_id: ClientId,
    pub amount: Decimal,
    pub term_months: u32,
    pub product_type: String,
}

/// Field-level validation failures, keyed by request field name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, thiserror::Error)]
#[error("request failed validation")]
pub struct ValidationErrors {
    pub errors: BTreeMap<String, Vec<String>>,
}

impl ValidationErrors {
    pub fn single(field: &str, message: impl Into<String>) -> Self {
        let mut errors = Self::default();
        errors.push(field, message);
        errors
    }

    pub fn push(&mut self, field: &str, message: impl Into<String>) {
        self.errors
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }
}

pub fn validate(request: &SimulationRequest) -> Result<ValidatedSimulation, ValidationErrors> {
    let mut errors = ValidationErrors::default();

    if request.client_id.0.is_nil() {
        errors.push("client_id", "client id is required");
    }

    let product_type = request.product_type.trim();
    if product_type.is_empty() {
        errors.push("product_type", "product type is required");
    } else if product_type.chars().count() > MAX_PRODUCT_TYPE_LEN {
        errors.push(
            "product_type",
            format!("product type must not exceed {MAX_PRODUCT_TYPE_LEN} characters"),
        );
    }

    if request.amount <= Decimal::ZERO {
        errors.push("amount", "amount must be greater than zero");
    } else if request.amount > MAX_AMOUNT {
        errors.push("amount", format!("amount must not exceed {MAX_AMOUNT}"));
    }

    if request.term_months <= 0 {
        errors.push("term_months", "term must be greater than zero months");
    } else if request.term_months > MAX_TERM_MONTHS {
        errors.push(
            "term_months",
            format!("term must not exceed {MAX_TERM_MONTHS} months"),
        );
    }

    let term_months = u32::try_from(request.term_months);
    match term_months {
        Ok(term_months) if errors.is_empty() => Ok(ValidatedSimulation {
            client_id: request.client_id,
            amount: request.amount,
            term_months,
            product_type: product_type.to_string(),
        }),
        _ => Err(errors),
    }
}
