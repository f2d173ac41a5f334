mod profile;
mod rules;

pub use profile::{RiskBand, RiskProfile};
pub use rules::{FrequencyRule, PreferenceRule, VolumeRule};

use chrono::NaiveDate;
use tracing::debug;

use super::domain::{Investment, Product};
use super::error::EngineError;

/// Read-only view handed to every scoring rule during one evaluation.
#[derive(Debug, Clone, Copy)]
pub struct RiskContext<'a> {
    pub investments: &'a [Investment],
    pub products: &'a [Product],
    pub reference_date: NaiveDate,
}

/// Independent point contribution to the overall risk score.
pub trait ScoringRule: Send + Sync {
    fn name(&self) -> &'static str;

    fn score(&self, context: &RiskContext<'_>) -> u32;
}

/// Sums every registered [`ScoringRule`] and maps the total to a [`RiskProfile`].
pub struct RiskScoringEngine {
    rules: Vec<Box<dyn ScoringRule>>,
}

impl RiskScoringEngine {
    pub fn new(rules: Vec<Box<dyn ScoringRule>>) -> Result<Self, EngineError> {
        if rules.is_empty() {
            return Err(EngineError::Configuration(
                "no risk scoring rules registered".to_string(),
            ));
        }
        Ok(Self { rules })
    }

    /// Engine with the frequency, preference and volume rules.
    pub fn standard() -> Result<Self, EngineError> {
        Self::new(vec![
            Box::new(FrequencyRule),
            Box::new(PreferenceRule),
            Box::new(VolumeRule),
        ])
    }

    pub fn rule_names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|rule| rule.name()).collect()
    }

    pub fn score_profile(
        &self,
        investments: &[Investment],
        products: &[Product],
        reference_date: NaiveDate,
    ) -> Result<RiskProfile, EngineError> {
        if reference_date == NaiveDate::MIN {
            return Err(EngineError::invalid_argument(
                "reference_date",
                "reference date is unset",
            ));
        }

        // No history or no catalog: assume the safest profile.
        if investments.is_empty() || products.is_empty() {
            return Ok(RiskProfile::CONSERVATIVE_DEFAULT);
        }

        let context = RiskContext {
            investments,
            products,
            reference_date,
        };

        let total: i64 = self
            .rules
            .iter()
            .map(|rule| {
                let points = rule.score(&context);
                debug!(rule = rule.name(), points, "scoring rule evaluated");
                i64::from(points)
            })
            .sum();

        Ok(RiskProfile::create(total))
    }
}
