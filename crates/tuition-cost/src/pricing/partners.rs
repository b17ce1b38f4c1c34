use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::NotFound;

/// A `{credits, price}` pair used by cohort tables and cost ranges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreditPoint {
    pub credits: u32,
    pub price: Decimal,
}

/// Partner-specific replacement for a program's standard price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum CohortPricing {
    Fixed {
        per_credit: Decimal,
        total_price: Decimal,
    },
    Variable {
        min: CreditPoint,
        typical: CreditPoint,
        max: CreditPoint,
    },
}

impl CohortPricing {
    /// Price that replaces the program's standard price in the breakdown.
    pub fn quoted_price(&self) -> Decimal {
        match self {
            CohortPricing::Fixed { total_price, .. } => *total_price,
            CohortPricing::Variable { typical, .. } => typical.price,
        }
    }
}

/// Corporate or affiliate partner and the discounts its learners may claim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Partner {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub has_special_cohort: bool,
    #[serde(default)]
    pub promotional_discount_eligible: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub promotional_discount_valid_until: Option<NaiveDate>,
    #[serde(default)]
    pub residency_discount_eligible: bool,
    #[serde(default)]
    pub alumni_discount_eligible: bool,
    /// Cohort tables keyed by program code.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub cohort_pricing: BTreeMap<String, CohortPricing>,
}

impl Partner {
    /// Cohort override in force for the program, if any.
    ///
    /// Tables are ignored unless the partner is flagged for special cohort pricing.
    pub fn cohort_for(&self, program_code: &str) -> Option<&CohortPricing> {
        if !self.has_special_cohort {
            return None;
        }
        self.cohort_pricing.get(program_code)
    }
}

/// Read-only partner lookup, preserving authored display order.
#[derive(Debug, Clone, Default)]
pub struct PartnerDirectory {
    partners: Vec<Partner>,
    index: HashMap<String, usize>,
}

impl PartnerDirectory {
    pub(crate) fn from_partners(partners: Vec<Partner>) -> Self {
        let index = partners
            .iter()
            .enumerate()
            .map(|(position, partner)| (partner.id.clone(), position))
            .collect();
        Self { partners, index }
    }

    pub fn get_partner(&self, id: &str) -> Result<&Partner, NotFound> {
        self.index
            .get(id)
            .map(|position| &self.partners[*position])
            .ok_or_else(|| NotFound::Partner(id.to_string()))
    }

    pub fn list_partners(&self) -> &[Partner] {
        &self.partners
    }
}
