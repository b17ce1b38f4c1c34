//! Tuition cost resolution: static program/partner tables, the ordered discount rule set,
//! and the engine that folds them into a displayable breakdown.
//!
//! Discounts are applied in a fixed order (cohort override, promotional, residency, alumni,
//! employer reimbursement) and each percentage compounds on the already-reduced price.

mod breakdown;
mod catalog;
mod eligibility;
mod engine;
mod partners;
pub mod router;
mod rules;
mod tables;

#[cfg(test)]
mod tests;

pub use breakdown::{CostBreakdown, CostRange, DiscountKind, DiscountStep};
pub use catalog::{Catalog, CreditSummary, PricingMode, Program, ProgramCategory};
pub use eligibility::{DiscountAvailability, PromotionWindow};
pub use engine::{CostEngine, CostError, CostOptions};
pub use partners::{CohortPricing, CreditPoint, Partner, PartnerDirectory};
pub use router::pricing_router;
pub use rules::{DiscountRates, RatesError};
pub use tables::{PricingTables, TableError};

/// Lookup failure for an unknown program code or partner id.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NotFound {
    #[error("program '{0}' not found")]
    Program(String),
    #[error("partner '{0}' not found")]
    Partner(String),
}
