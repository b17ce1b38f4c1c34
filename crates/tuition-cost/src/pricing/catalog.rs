use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::NotFound;

/// Broad grouping used by landing pages to filter the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProgramCategory {
    Certificate,
    Masters,
    Bachelors,
}

impl ProgramCategory {
    pub fn label(self) -> &'static str {
        match self {
            ProgramCategory::Certificate => "Graduate Certificate",
            ProgramCategory::Masters => "Master's Degree",
            ProgramCategory::Bachelors => "Bachelor's Degree",
        }
    }
}

/// How a program's credits (and therefore its standard price) are determined.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum PricingMode {
    /// A single credit count known up front.
    Fixed {
        credits: u32,
        per_credit: Decimal,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        total_override: Option<Decimal>,
    },
    /// Credits depend on a later concentration choice.
    Variable {
        min_credits: u32,
        typical_credits: u32,
        max_credits: u32,
        per_credit: Decimal,
    },
}

/// Catalog entry for an online program.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Program {
    pub code: String,
    pub name: String,
    pub category: ProgramCategory,
    pub pricing: PricingMode,
}

impl Program {
    /// List price before any partner, promotional, or reimbursement adjustment.
    ///
    /// Variable-mode programs are quoted at their typical credit load.
    pub fn standard_price(&self) -> Decimal {
        match &self.pricing {
            PricingMode::Fixed {
                credits,
                per_credit,
                total_override,
            } => total_override.unwrap_or_else(|| Decimal::from(*credits) * per_credit),
            PricingMode::Variable {
                typical_credits,
                per_credit,
                ..
            } => Decimal::from(*typical_credits) * per_credit,
        }
    }

    pub fn credit_summary(&self) -> CreditSummary {
        match &self.pricing {
            PricingMode::Fixed { credits, .. } => CreditSummary::Fixed { credits: *credits },
            PricingMode::Variable {
                min_credits,
                typical_credits,
                max_credits,
                ..
            } => CreditSummary::Variable {
                min: *min_credits,
                typical: *typical_credits,
                max: *max_credits,
            },
        }
    }

    pub fn is_variable(&self) -> bool {
        matches!(self.pricing, PricingMode::Variable { .. })
    }
}

/// Echo of a program's credit shape, carried on every breakdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum CreditSummary {
    Fixed { credits: u32 },
    Variable { min: u32, typical: u32, max: u32 },
}

/// Read-only program lookup, preserving authored order.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    programs: Vec<Program>,
    index: HashMap<String, usize>,
}

impl Catalog {
    pub(crate) fn from_programs(programs: Vec<Program>) -> Self {
        let index = programs
            .iter()
            .enumerate()
            .map(|(position, program)| (program.code.clone(), position))
            .collect();
        Self { programs, index }
    }

    pub fn get_program(&self, code: &str) -> Result<&Program, NotFound> {
        self.index
            .get(code)
            .map(|position| &self.programs[*position])
            .ok_or_else(|| NotFound::Program(code.to_string()))
    }

    pub fn list_programs(&self) -> &[Program] {
        &self.programs
    }

    pub fn programs_in(&self, category: ProgramCategory) -> Vec<&Program> {
        self.programs
            .iter()
            .filter(|program| program.category == category)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.programs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.programs.is_empty()
    }
}
