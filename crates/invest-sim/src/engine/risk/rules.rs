use std::collections::HashMap;

use chrono::{Months, NaiveDate};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::{RiskContext, ScoringRule};
use crate::engine::domain::ProductId;

const LOW_POINTS: u32 = 10;
const MEDIUM_POINTS: u32 = 25;
const HIGH_POINTS: u32 = 40;

/// Rewards transaction activity inside the trailing six calendar months.
#[derive(Debug, Clone, Copy, Default)]
pub struct FrequencyRule;

impl FrequencyRule {
    const LOOKBACK_MONTHS: u32 = 6;
    const LOW_CEILING: usize = 2;
    const MEDIUM_CEILING: usize = 6;

    fn window_start(reference_date: NaiveDate) -> NaiveDate {
        reference_date
            .checked_sub_months(Months::new(Self::LOOKBACK_MONTHS))
            .unwrap_or(NaiveDate::MIN)
    }
}

impl ScoringRule for FrequencyRule {
    fn name(&self) -> &'static str {
        "frequency"
    }

    fn score(&self, context: &RiskContext<'_>) -> u32 {
        let window_start = Self::window_start(context.reference_date);
        let recent = context
            .investments
            .iter()
            .filter(|investment| investment.date >= window_start)
            .count();

        if recent <= Self::LOW_CEILING {
            LOW_POINTS
        } else if recent <= Self::MEDIUM_CEILING {
            MEDIUM_POINTS
        } else {
            HIGH_POINTS
        }
    }
}

/// Scores the value-weighted mean risk level (RMP) of the portfolio.
///
/// Investments whose product is missing from the catalog still count toward the portfolio
/// total but add nothing to the weighted risk.
#[derive(Debug, Clone, Copy, Default)]
pub struct PreferenceRule;

impl PreferenceRule {
    const MEDIUM_FLOOR: Decimal = dec!(1.5);
    const HIGH_FLOOR: Decimal = dec!(2.5);

    pub(crate) fn weighted_risk(context: &RiskContext<'_>) -> Option<Decimal> {
        let portfolio_total: Decimal = context
            .investments
            .iter()
            .map(|investment| investment.amount)
            .sum();
        if portfolio_total.is_zero() {
            return None;
        }

        let risk_levels: HashMap<ProductId, u8> = context
            .products
            .iter()
            .map(|product| (product.id, product.risk_level))
            .collect();

        let weighted = context
            .investments
            .iter()
            .filter_map(|investment| {
                risk_levels.get(&investment.product_id).map(|level| {
                    investment.amount / portfolio_total * Decimal::from(*level)
                })
            })
            .sum();

        Some(weighted)
    }
}

impl ScoringRule for PreferenceRule {
    fn name(&self) -> &'static str {
        "preference"
    }

    fn score(&self, context: &RiskContext<'_>) -> u32 {
        let Some(rmp) = Self::weighted_risk(context) else {
            return LOW_POINTS;
        };

        if rmp < Self::MEDIUM_FLOOR {
            LOW_POINTS
        } else if rmp < Self::HIGH_FLOOR {
            MEDIUM_POINTS
        } else {
            HIGH_POINTS
        }
    }
}

/// Scores the total amount invested across every product.
#[derive(Debug, Clone, Copy, Default)]
pub struct VolumeRule;

impl VolumeRule {
    const LOW_CEILING: Decimal = dec!(5000);
    const MEDIUM_CEILING: Decimal = dec!(50000);
    const LOW_POINTS: u32 = 5;
    const MEDIUM_POINTS: u32 = 10;
    const MAX_POINTS: u32 = 20;
}

impl ScoringRule for VolumeRule {
    fn name(&self) -> &'static str {
        "volume"
    }

    fn score(&self, context: &RiskContext<'_>) -> u32 {
        let total: Decimal = context
            .investments
            .iter()
            .map(|investment| investment.amount)
            .sum();

        if total <= Self::LOW_CEILING {
            Self::LOW_POINTS
        } else if total <= Self::MEDIUM_CEILING {
            Self::MEDIUM_POINTS
        } else {
            Self::MAX_POINTS
        }
    }
}
