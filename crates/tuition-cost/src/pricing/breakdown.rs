use chrono::NaiveDate;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use super::catalog::{CreditSummary, PricingMode, Program};
use super::partners::{CohortPricing, CreditPoint};

/// Discount categories in the order the engine applies them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DiscountKind {
    CohortFixed,
    CohortVariable,
    Promotional,
    Residency,
    Alumni,
    Reimbursement,
}

impl DiscountKind {
    pub fn label(self) -> &'static str {
        match self {
            DiscountKind::CohortFixed => "cohort-fixed",
            DiscountKind::CohortVariable => "cohort-variable",
            DiscountKind::Promotional => "promotional",
            DiscountKind::Residency => "residency",
            DiscountKind::Alumni => "alumni",
            DiscountKind::Reimbursement => "reimbursement",
        }
    }

    pub fn is_percentage(self) -> bool {
        matches!(
            self,
            DiscountKind::Promotional | DiscountKind::Residency | DiscountKind::Alumni
        )
    }
}

/// One applied adjustment, recorded in application order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscountStep {
    #[serde(rename = "type")]
    pub kind: DiscountKind,
    pub name: String,
    pub description: String,
    pub discount_amount: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub percentage: Option<Decimal>,
    /// Running price once this step has been applied.
    pub price_after: Decimal,
}

/// Min/typical/max prices for a variable-credit program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CostRange {
    pub min: CreditPoint,
    pub typical: CreditPoint,
    pub max: CreditPoint,
}

/// Full engine output for one program/partner/options combination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CostBreakdown {
    pub program_code: String,
    pub program_name: String,
    pub standard_price: Decimal,
    pub base_price: Decimal,
    pub final_price: Decimal,
    pub percent_saved: u32,
    pub credits: CreditSummary,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cohort_pricing: Option<CohortPricing>,
    pub steps: Vec<DiscountStep>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost_range: Option<CostRange>,
    pub priced_on: NaiveDate,
    pub tables_version: String,
}

impl CostBreakdown {
    pub fn step(&self, kind: DiscountKind) -> Option<&DiscountStep> {
        self.steps.iter().find(|step| step.kind == kind)
    }

    pub fn has_step(&self, kind: DiscountKind) -> bool {
        self.step(kind).is_some()
    }

    pub fn total_discount(&self) -> Decimal {
        self.steps.iter().map(|step| step.discount_amount).sum()
    }

    pub fn summary(&self) -> String {
        let applied = self.steps.len();
        if applied == 0 {
            return format!(
                "{}: ${:.2} (standard price)",
                self.program_name, self.final_price
            );
        }
        format!(
            "{}: ${:.2} after {} adjustment(s), {}% below the ${:.2} standard price",
            self.program_name, self.final_price, applied, self.percent_saved, self.standard_price
        )
    }
}

pub(crate) fn round_cents(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Integer percentage saved against the standard price, never negative.
pub(crate) fn percent_saved(standard_price: Decimal, final_price: Decimal) -> u32 {
    if standard_price <= Decimal::ZERO {
        return 0;
    }
    let saved = (standard_price - final_price) / standard_price * Decimal::ONE_HUNDRED;
    let rounded = saved.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    if rounded.is_sign_negative() {
        return 0;
    }
    rounded.to_u32().unwrap_or(0)
}

/// Price a single credit point through the percentage steps already applied to the typical
/// price, using the same per-step rounding so the three points stay consistent.
pub(crate) fn discount_point(price: Decimal, steps: &[DiscountStep]) -> Decimal {
    steps
        .iter()
        .filter(|step| step.kind.is_percentage())
        .filter_map(|step| step.percentage)
        .fold(price, |running, percentage| {
            running - round_cents(running * percentage / Decimal::ONE_HUNDRED)
        })
}

/// Derive the min/typical/max projection for a variable-credit program from the steps of
/// its typical-credit breakdown. Fixed-credit programs have no range.
pub(crate) fn project_cost_range(program: &Program, steps: &[DiscountStep]) -> Option<CostRange> {
    let PricingMode::Variable {
        min_credits,
        typical_credits,
        max_credits,
        per_credit,
    } = &program.pricing
    else {
        return None;
    };

    let point = |credits: u32| CreditPoint {
        credits,
        price: discount_point(Decimal::from(credits) * *per_credit, steps),
    };

    Some(CostRange {
        min: point(*min_credits),
        typical: point(*typical_credits),
        max: point(*max_credits),
    })
}
