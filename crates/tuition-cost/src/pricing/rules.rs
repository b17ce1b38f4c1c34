use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::breakdown::{round_cents, DiscountKind, DiscountStep};
use super::catalog::Program;
use super::eligibility::{alumni_offered, promotion_open, residency_offered};
use super::engine::CostOptions;
use super::partners::{CohortPricing, Partner};

/// Engine-wide percentages for the optional discounts, expressed in percent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscountRates {
    pub promotional_percent: Decimal,
    pub residency_percent: Decimal,
    pub alumni_percent: Decimal,
}

impl Default for DiscountRates {
    fn default() -> Self {
        Self {
            promotional_percent: Decimal::from(30),
            residency_percent: Decimal::from(5),
            alumni_percent: Decimal::from(5),
        }
    }
}

impl DiscountRates {
    pub fn validate(&self) -> Result<(), RatesError> {
        let rates = [
            ("promotional", self.promotional_percent),
            ("residency", self.residency_percent),
            ("alumni", self.alumni_percent),
        ];
        for (name, value) in rates {
            if value < Decimal::ZERO || value > Decimal::ONE_HUNDRED {
                return Err(RatesError::OutOfRange { name, value });
            }
        }
        Ok(())
    }

    fn percent_for(&self, rule: PercentageRule) -> Decimal {
        match rule {
            PercentageRule::Promotional => self.promotional_percent,
            PercentageRule::Residency => self.residency_percent,
            PercentageRule::Alumni => self.alumni_percent,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RatesError {
    #[error("{name} discount rate {value} must be between 0 and 100 percent")]
    OutOfRange { name: &'static str, value: Decimal },
}

/// Inputs a percentage rule's applicability predicate is evaluated against.
pub(crate) struct RuleContext<'a> {
    pub partner: &'a Partner,
    pub options: &'a CostOptions,
    pub on: NaiveDate,
}

/// Optional percentage discounts, each gated on a user toggle and a partner flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PercentageRule {
    Promotional,
    Residency,
    Alumni,
}

/// Application order; each rule compounds on the price left by the previous one.
pub(crate) const PERCENTAGE_RULES: [PercentageRule; 3] = [
    PercentageRule::Promotional,
    PercentageRule::Residency,
    PercentageRule::Alumni,
];

impl PercentageRule {
    pub(crate) fn applies(self, context: &RuleContext<'_>) -> bool {
        match self {
            PercentageRule::Promotional => {
                context.options.apply_promotional_discount
                    && promotion_open(context.partner, context.on)
            }
            PercentageRule::Residency => {
                context.options.is_residency_eligible && residency_offered(context.partner)
            }
            PercentageRule::Alumni => {
                context.options.is_alumni_eligible && alumni_offered(context.partner)
            }
        }
    }

    fn kind(self) -> DiscountKind {
        match self {
            PercentageRule::Promotional => DiscountKind::Promotional,
            PercentageRule::Residency => DiscountKind::Residency,
            PercentageRule::Alumni => DiscountKind::Alumni,
        }
    }

    fn name(self) -> &'static str {
        match self {
            PercentageRule::Promotional => "Partner promotional discount",
            PercentageRule::Residency => "Hoboken residency discount",
            PercentageRule::Alumni => "Alumni discount",
        }
    }

    fn describe(self, partner: &Partner, percentage: Decimal) -> String {
        match self {
            PercentageRule::Promotional => match partner.promotional_discount_valid_until {
                Some(until) => format!(
                    "{percentage}% off for {} employees, enroll by {}",
                    partner.name,
                    until.format("%B %-d, %Y")
                ),
                None => format!("{percentage}% off for {} employees", partner.name),
            },
            PercentageRule::Residency => {
                format!("{percentage}% off for verified Hoboken residents")
            }
            PercentageRule::Alumni => format!("{percentage}% off for returning alumni"),
        }
    }

    /// Apply the rule's percentage to the running price and record the step.
    pub(crate) fn apply(
        self,
        running: Decimal,
        rates: &DiscountRates,
        partner: &Partner,
    ) -> DiscountStep {
        let percentage = rates.percent_for(self);
        let discount_amount = round_cents(running * percentage / Decimal::ONE_HUNDRED);
        DiscountStep {
            kind: self.kind(),
            name: self.name().to_string(),
            description: self.describe(partner, percentage),
            discount_amount,
            percentage: Some(percentage),
            price_after: running - discount_amount,
        }
    }
}

/// Record the replacement of the standard price by a partner's cohort price.
///
/// The step is recorded even when the cohort price is not lower; the amount is then zero.
pub(crate) fn cohort_step(
    program: &Program,
    partner: &Partner,
    cohort: &CohortPricing,
    standard_price: Decimal,
) -> DiscountStep {
    let cohort_price = cohort.quoted_price();
    let (kind, description) = match cohort {
        CohortPricing::Fixed { per_credit, .. } => (
            DiscountKind::CohortFixed,
            format!(
                "{} cohort rate of ${per_credit:.2} per credit for {}",
                partner.name, program.name
            ),
        ),
        CohortPricing::Variable { typical, .. } => (
            DiscountKind::CohortVariable,
            format!(
                "{} cohort price of ${:.2} for {} credits of {}",
                partner.name, typical.price, typical.credits, program.name
            ),
        ),
    };

    DiscountStep {
        kind,
        name: format!("{} cohort pricing", partner.name),
        description,
        discount_amount: (standard_price - cohort_price).max(Decimal::ZERO),
        percentage: None,
        price_after: cohort_price,
    }
}

/// Subtract employer reimbursement, capped at the running price.
pub(crate) fn reimbursement_step(requested: Decimal, running: Decimal) -> DiscountStep {
    let applied = requested.min(running).max(Decimal::ZERO);
    let description = if applied < requested {
        format!("${requested:.2} employer benefit, capped at the remaining ${running:.2}")
    } else {
        format!("${requested:.2} employer tuition benefit")
    };

    DiscountStep {
        kind: DiscountKind::Reimbursement,
        name: "Employer reimbursement".to_string(),
        description,
        discount_amount: applied,
        percentage: None,
        price_after: running - applied,
    }
}
