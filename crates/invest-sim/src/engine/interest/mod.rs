mod rules;

pub use rules::{simple_interest, CdbRule, FundRule};

use std::collections::HashMap;

use rust_decimal::Decimal;
use tracing::debug;

use super::domain::Product;
use super::error::EngineError;

/// Immutable inputs for a single interest calculation.
#[derive(Debug, Clone, Copy)]
pub struct CalculationContext<'a> {
    principal: Decimal,
    term_months: u32,
    product: &'a Product,
}

impl<'a> CalculationContext<'a> {
    pub fn new(
        principal: Decimal,
        term_months: u32,
        product: &'a Product,
    ) -> Result<Self, EngineError> {
        if principal < Decimal::ZERO {
            return Err(EngineError::invalid_argument(
                "principal",
                format!("must not be negative (got {principal})"),
            ));
        }

        Ok(Self {
            principal,
            term_months,
            product,
        })
    }

    pub fn principal(&self) -> Decimal {
        self.principal
    }

    pub fn term_months(&self) -> u32 {
        self.term_months
    }

    pub fn product(&self) -> &'a Product {
        self.product
    }
}

/// Strategy computing the final amount for one product type.
pub trait InterestRule: Send + Sync {
    /// Product type label this rule answers for. Matched case-insensitively.
    fn product_type(&self) -> &str;

    fn calculate(&self, context: &CalculationContext<'_>) -> Result<Decimal, EngineError>;
}

/// Dispatch table selecting an [`InterestRule`] by the product's type label.
pub struct InterestCalculationEngine {
    rules: HashMap<String, Box<dyn InterestRule>>,
}

impl InterestCalculationEngine {
    pub fn new(rules: Vec<Box<dyn InterestRule>>) -> Result<Self, EngineError> {
        if rules.is_empty() {
            return Err(EngineError::Configuration(
                "no interest calculation rules registered".to_string(),
            ));
        }

        let mut registry = HashMap::with_capacity(rules.len());
        for rule in rules {
            let key = normalize_type(rule.product_type());
            if registry.contains_key(&key) {
                return Err(EngineError::Configuration(format!(
                    "duplicate interest rule for product type '{key}'"
                )));
            }
            registry.insert(key, rule);
        }

        Ok(Self { rules: registry })
    }

    /// Engine with the CDB and Fundo simple-interest rules.
    pub fn standard() -> Result<Self, EngineError> {
        Self::new(vec![Box::new(CdbRule), Box::new(FundRule)])
    }

    pub fn supports(&self, product_type: &str) -> bool {
        self.rules.contains_key(&normalize_type(product_type))
    }

    pub fn supported_types(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.rules.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }

    pub fn calculate(&self, context: &CalculationContext<'_>) -> Result<Decimal, EngineError> {
        let product_type = &context.product().product_type;
        let rule = self
            .rules
            .get(&normalize_type(product_type))
            .ok_or_else(|| EngineError::NotSupported {
                product_type: product_type.clone(),
            })?;

        debug!(
            product_type = %product_type,
            principal = %context.principal(),
            term_months = context.term_months(),
            "dispatching interest rule"
        );

        rule.calculate(context)
    }
}

fn normalize_type(label: &str) -> String {
    label.to_uppercase()
}
