use std::sync::Arc;

use chrono::{Local, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::breakdown::{percent_saved, project_cost_range, CostBreakdown, DiscountStep};
use super::eligibility::DiscountAvailability;
use super::rules::{
    cohort_step, reimbursement_step, DiscountRates, RatesError, RuleContext, PERCENTAGE_RULES,
};
use super::tables::PricingTables;
use super::NotFound;

/// User-entered selections that accompany a program and partner.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CostOptions {
    pub apply_promotional_discount: bool,
    pub is_residency_eligible: bool,
    pub is_alumni_eligible: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub employer_reimbursement: Option<Decimal>,
}

/// Terminal failures for a single cost calculation; no partial breakdown is produced.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CostError {
    #[error("unknown program '{0}'")]
    UnknownProgram(String),
    #[error("unknown partner '{0}'")]
    UnknownPartner(String),
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl From<NotFound> for CostError {
    fn from(value: NotFound) -> Self {
        match value {
            NotFound::Program(code) => CostError::UnknownProgram(code),
            NotFound::Partner(id) => CostError::UnknownPartner(id),
        }
    }
}

/// Stateless cost resolver over shared, immutable pricing tables.
#[derive(Debug, Clone)]
pub struct CostEngine {
    tables: Arc<PricingTables>,
    rates: DiscountRates,
    pinned_date: Option<NaiveDate>,
}

impl CostEngine {
    /// Rejects rates outside `[0, 100]`, which would turn a discount into a surcharge.
    pub fn new(tables: Arc<PricingTables>, rates: DiscountRates) -> Result<Self, RatesError> {
        rates.validate()?;
        Ok(Self {
            tables,
            rates,
            pinned_date: None,
        })
    }

    /// Price every call as of `date` instead of the local calendar date.
    pub fn pinned_to(mut self, date: NaiveDate) -> Self {
        self.pinned_date = Some(date);
        self
    }

    pub fn tables(&self) -> &PricingTables {
        &self.tables
    }

    pub fn rates(&self) -> &DiscountRates {
        &self.rates
    }

    pub fn today(&self) -> NaiveDate {
        self.pinned_date
            .unwrap_or_else(|| Local::now().date_naive())
    }

    pub fn compute_cost(
        &self,
        program_code: &str,
        partner_id: &str,
        options: &CostOptions,
    ) -> Result<CostBreakdown, CostError> {
        self.compute_cost_on(program_code, partner_id, options, self.today())
    }

    pub fn compute_cost_on(
        &self,
        program_code: &str,
        partner_id: &str,
        options: &CostOptions,
        on: NaiveDate,
    ) -> Result<CostBreakdown, CostError> {
        match self.resolve(program_code, partner_id, options, on) {
            Ok(breakdown) => {
                debug!(
                    program = program_code,
                    partner = partner_id,
                    steps = breakdown.steps.len(),
                    final_price = %breakdown.final_price,
                    "resolved tuition breakdown"
                );
                Ok(breakdown)
            }
            Err(err) => {
                warn!(program = program_code, partner = partner_id, %err, "tuition calculation rejected");
                Err(err)
            }
        }
    }

    pub fn get_availability(
        &self,
        program_code: &str,
        partner_id: &str,
    ) -> Result<DiscountAvailability, CostError> {
        self.get_availability_on(program_code, partner_id, self.today())
    }

    /// Which optional toggles to surface before the user commits to a calculation.
    ///
    /// Shares the promotional window check with [`CostEngine::compute_cost_on`].
    pub fn get_availability_on(
        &self,
        program_code: &str,
        partner_id: &str,
        on: NaiveDate,
    ) -> Result<DiscountAvailability, CostError> {
        self.tables.catalog().get_program(program_code)?;
        let partner = self.tables.directory().get_partner(partner_id)?;
        Ok(DiscountAvailability::for_partner(partner, on))
    }

    fn resolve(
        &self,
        program_code: &str,
        partner_id: &str,
        options: &CostOptions,
        on: NaiveDate,
    ) -> Result<CostBreakdown, CostError> {
        let program = self.tables.catalog().get_program(program_code)?;
        let partner = self.tables.directory().get_partner(partner_id)?;
        let reimbursement = validate_reimbursement(options.employer_reimbursement)?;

        let standard_price = program.standard_price();
        let mut steps: Vec<DiscountStep> = Vec::new();

        let cohort = partner.cohort_for(&program.code);
        let base_price = match cohort {
            Some(cohort) => {
                let step = cohort_step(program, partner, cohort, standard_price);
                let price = step.price_after;
                steps.push(step);
                price
            }
            None => standard_price,
        };

        let mut running = base_price;
        let context = RuleContext {
            partner,
            options,
            on,
        };
        for rule in PERCENTAGE_RULES {
            if rule.applies(&context) {
                let step = rule.apply(running, &self.rates, partner);
                running = step.price_after;
                steps.push(step);
            }
        }

        if let Some(requested) = reimbursement.filter(|amount| *amount > Decimal::ZERO) {
            let step = reimbursement_step(requested, running);
            running = step.price_after;
            steps.push(step);
        }

        let final_price = running.max(Decimal::ZERO);
        let cost_range = match cohort {
            Some(_) => None,
            None => project_cost_range(program, &steps),
        };

        Ok(CostBreakdown {
            program_code: program.code.clone(),
            program_name: program.name.clone(),
            standard_price,
            base_price,
            final_price,
            percent_saved: percent_saved(standard_price, final_price),
            credits: program.credit_summary(),
            cohort_pricing: cohort.cloned(),
            steps,
            cost_range,
            priced_on: on,
            tables_version: self.tables.version().to_string(),
        })
    }
}

fn validate_reimbursement(value: Option<Decimal>) -> Result<Option<Decimal>, CostError> {
    match value {
        Some(amount) if amount.is_sign_negative() && !amount.is_zero() => {
            Err(CostError::InvalidInput(format!(
                "employer reimbursement must not be negative (got {amount})"
            )))
        }
        other => Ok(other),
    }
}
