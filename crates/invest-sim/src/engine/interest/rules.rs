use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::{CalculationContext, InterestRule};
use crate::engine::error::EngineError;

const MONTHS_PER_YEAR: Decimal = dec!(12);
const CURRENCY_SCALE: u32 = 2;

/// Simple interest over the context term, rounded to cents (midpoint to even).
///
/// `final = principal + principal * base_rate * term_months / 12`. Months are divided last so
/// whole-year multiples stay exact. Results that leave the `Decimal` range are an
/// [`EngineError::Overflow`].
pub fn simple_interest(context: &CalculationContext<'_>) -> Result<Decimal, EngineError> {
    let principal = context.principal();
    principal
        .checked_mul(context.product().base_rate)
        .and_then(|value| value.checked_mul(Decimal::from(context.term_months())))
        .and_then(|value| value.checked_div(MONTHS_PER_YEAR))
        .and_then(|interest| principal.checked_add(interest))
        .map(|amount| amount.round_dp(CURRENCY_SCALE))
        .ok_or(EngineError::Overflow {
            operation: "simple interest",
        })
}

/// Certificado de Depósito Bancário.
#[derive(Debug, Clone, Copy, Default)]
pub struct CdbRule;

impl InterestRule for CdbRule {
    fn product_type(&self) -> &str {
        "CDB"
    }

    fn calculate(&self, context: &CalculationContext<'_>) -> Result<Decimal, EngineError> {
        simple_interest(context)
    }
}

/// Investment funds; currently priced with the same simple-interest formula as CDB.
#[derive(Debug, Clone, Copy, Default)]
pub struct FundRule;

impl InterestRule for FundRule {
    fn product_type(&self) -> &str {
        "Fundo"
    }

    fn calculate(&self, context: &CalculationContext<'_>) -> Result<Decimal, EngineError> {
        simple_interest(context)
    }
}
