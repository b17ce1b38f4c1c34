use std::collections::{BTreeMap, HashSet};
use std::io::Read;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;

use super::catalog::{Catalog, PricingMode, Program, ProgramCategory};
use super::partners::{CohortPricing, CreditPoint, Partner, PartnerDirectory};

/// Immutable, versioned bundle of the catalog and partner directory.
///
/// Built once at start-up and shared by every engine invocation.
#[derive(Debug, Clone)]
pub struct PricingTables {
    version: String,
    catalog: Catalog,
    directory: PartnerDirectory,
}

/// Serialized shape accepted by [`PricingTables::from_json_reader`].
#[derive(Debug, Deserialize)]
struct TablesDocument {
    version: String,
    programs: Vec<Program>,
    partners: Vec<Partner>,
}

impl PricingTables {
    pub fn new(
        version: impl Into<String>,
        programs: Vec<Program>,
        partners: Vec<Partner>,
    ) -> Result<Self, TableError> {
        validate_programs(&programs)?;
        let catalog = Catalog::from_programs(programs);
        validate_partners(&partners, &catalog)?;

        Ok(Self {
            version: version.into(),
            catalog,
            directory: PartnerDirectory::from_partners(partners),
        })
    }

    pub fn from_json_reader<R: Read>(reader: R) -> Result<Self, TableError> {
        let document: TablesDocument = serde_json::from_reader(reader)?;
        Self::new(document.version, document.programs, document.partners)
    }

    /// Tables published with the current marketing catalog.
    pub fn standard() -> Result<Self, TableError> {
        Self::new(STANDARD_VERSION, standard_programs(), standard_partners())
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn directory(&self) -> &PartnerDirectory {
        &self.directory
    }
}

/// Reasons a set of pricing tables is rejected at load time.
#[derive(Debug, thiserror::Error)]
pub enum TableError {
    #[error("duplicate program code '{0}'")]
    DuplicateProgram(String),
    #[error("duplicate partner id '{0}'")]
    DuplicatePartner(String),
    #[error("program '{code}' has invalid credits: {detail}")]
    InvalidCredits { code: String, detail: String },
    #[error("program '{0}' has a negative price")]
    NegativePrice(String),
    #[error("program '{0}' has a price too large to discount")]
    PriceOverflow(String),
    #[error("partner '{partner}' has cohort pricing for unknown program '{program}'")]
    UnknownCohortProgram { partner: String, program: String },
    #[error("partner '{partner}' cohort pricing for '{program}' is invalid: {detail}")]
    CohortMismatch {
        partner: String,
        program: String,
        detail: String,
    },
    #[error("partner '{0}' is promotional-discount eligible but has no valid-until date")]
    MissingPromotionalWindow(String),
    #[error("unable to parse pricing tables: {0}")]
    Parse(#[from] serde_json::Error),
}

fn validate_programs(programs: &[Program]) -> Result<(), TableError> {
    let mut seen = HashSet::new();
    for program in programs {
        if !seen.insert(program.code.as_str()) {
            return Err(TableError::DuplicateProgram(program.code.clone()));
        }

        let invalid = |detail: &str| TableError::InvalidCredits {
            code: program.code.clone(),
            detail: detail.to_string(),
        };

        match &program.pricing {
            PricingMode::Fixed {
                credits,
                per_credit,
                total_override,
            } => {
                if *credits == 0 {
                    return Err(invalid("credit count must be positive"));
                }
                let override_negative = total_override
                    .map(|total| total.is_sign_negative())
                    .unwrap_or(false);
                if per_credit.is_sign_negative() || override_negative {
                    return Err(TableError::NegativePrice(program.code.clone()));
                }
                let listed = match total_override {
                    Some(total) => *total,
                    None => credit_price(*credits, *per_credit)
                        .ok_or_else(|| TableError::PriceOverflow(program.code.clone()))?,
                };
                if !has_discount_headroom(listed) {
                    return Err(TableError::PriceOverflow(program.code.clone()));
                }
            }
            PricingMode::Variable {
                min_credits,
                typical_credits,
                max_credits,
                per_credit,
            } => {
                if *min_credits == 0 {
                    return Err(invalid("minimum credits must be positive"));
                }
                if !(min_credits <= typical_credits && typical_credits <= max_credits) {
                    return Err(invalid("expected min <= typical <= max"));
                }
                if per_credit.is_sign_negative() {
                    return Err(TableError::NegativePrice(program.code.clone()));
                }
                let highest = credit_price(*max_credits, *per_credit)
                    .filter(|price| has_discount_headroom(*price));
                if highest.is_none() {
                    return Err(TableError::PriceOverflow(program.code.clone()));
                }
            }
        }
    }
    Ok(())
}

fn credit_price(credits: u32, per_credit: Decimal) -> Option<Decimal> {
    Decimal::from(credits).checked_mul(per_credit)
}

/// Percentage steps multiply the running price by up to 100 before dividing.
fn has_discount_headroom(price: Decimal) -> bool {
    price.checked_mul(Decimal::ONE_HUNDRED).is_some()
}

fn validate_partners(partners: &[Partner], catalog: &Catalog) -> Result<(), TableError> {
    let mut seen = HashSet::new();
    for partner in partners {
        if !seen.insert(partner.id.as_str()) {
            return Err(TableError::DuplicatePartner(partner.id.clone()));
        }
        if partner.promotional_discount_eligible
            && partner.promotional_discount_valid_until.is_none()
        {
            return Err(TableError::MissingPromotionalWindow(partner.id.clone()));
        }

        for (program_code, cohort) in &partner.cohort_pricing {
            let program = catalog.get_program(program_code).map_err(|_| {
                TableError::UnknownCohortProgram {
                    partner: partner.id.clone(),
                    program: program_code.clone(),
                }
            })?;
            check_cohort_shape(program, cohort).map_err(|detail| TableError::CohortMismatch {
                partner: partner.id.clone(),
                program: program_code.clone(),
                detail,
            })?;
        }
    }
    Ok(())
}

fn check_cohort_shape(program: &Program, cohort: &CohortPricing) -> Result<(), String> {
    match (&program.pricing, cohort) {
        (
            PricingMode::Fixed { credits, .. },
            CohortPricing::Fixed {
                per_credit,
                total_price,
            },
        ) => {
            if per_credit.is_sign_negative() || total_price.is_sign_negative() {
                return Err("cohort prices must not be negative".to_string());
            }
            let expected = credit_price(*credits, *per_credit)
                .ok_or_else(|| "cohort per-credit price overflows".to_string())?;
            if !has_discount_headroom(*total_price) {
                return Err("cohort total is too large to discount".to_string());
            }
            if expected != *total_price {
                return Err(format!(
                    "total {total_price} does not equal {credits} credits x {per_credit}"
                ));
            }
            Ok(())
        }
        (
            PricingMode::Variable {
                min_credits,
                typical_credits,
                max_credits,
                ..
            },
            CohortPricing::Variable { min, typical, max },
        ) => {
            let points = [
                ("min", min, *min_credits),
                ("typical", typical, *typical_credits),
                ("max", max, *max_credits),
            ];
            for (label, point, credits) in points {
                if point.credits != credits {
                    return Err(format!(
                        "{label} point covers {} credits, program expects {credits}",
                        point.credits
                    ));
                }
                if point.price.is_sign_negative() {
                    return Err(format!("{label} point price must not be negative"));
                }
                if !has_discount_headroom(point.price) {
                    return Err(format!("{label} point price is too large to discount"));
                }
            }
            Ok(())
        }
        (PricingMode::Fixed { .. }, CohortPricing::Variable { .. }) => {
            Err("variable cohort table for a fixed-credit program".to_string())
        }
        (PricingMode::Variable { .. }, CohortPricing::Fixed { .. }) => {
            Err("fixed cohort table for a variable-credit program".to_string())
        }
    }
}

const STANDARD_VERSION: &str = "2026.2";

fn standard_programs() -> Vec<Program> {
    vec![
        Program {
            code: "dataviz-pc".to_string(),
            name: "Professional Certificate in Applied Data Visualization".to_string(),
            category: ProgramCategory::Certificate,
            pricing: PricingMode::Fixed {
                credits: 3,
                per_credit: Decimal::from(1750),
                total_override: None,
            },
        },
        Program {
            code: "aai-gc".to_string(),
            name: "Graduate Certificate in Applied Artificial Intelligence".to_string(),
            category: ProgramCategory::Certificate,
            pricing: PricingMode::Fixed {
                credits: 12,
                per_credit: Decimal::from(1750),
                total_override: None,
            },
        },
        Program {
            code: "ent-gc".to_string(),
            name: "Graduate Certificate in Enterprise Systems".to_string(),
            category: ProgramCategory::Certificate,
            pricing: PricingMode::Variable {
                min_credits: 9,
                typical_credits: 12,
                max_credits: 15,
                per_credit: Decimal::from(800),
            },
        },
        Program {
            code: "mem".to_string(),
            name: "Master of Engineering in Engineering Management".to_string(),
            category: ProgramCategory::Masters,
            pricing: PricingMode::Fixed {
                credits: 30,
                per_credit: Decimal::from(1750),
                total_override: None,
            },
        },
        Program {
            code: "mscs".to_string(),
            name: "Master of Science in Computer Science".to_string(),
            category: ProgramCategory::Masters,
            pricing: PricingMode::Variable {
                min_credits: 30,
                typical_credits: 33,
                max_credits: 36,
                per_credit: Decimal::from(1750),
            },
        },
        Program {
            code: "bsit".to_string(),
            name: "Bachelor of Science in Information Technology".to_string(),
            category: ProgramCategory::Bachelors,
            pricing: PricingMode::Fixed {
                credits: 120,
                per_credit: Decimal::from(575),
                total_override: Some(Decimal::from(66_000)),
            },
        },
    ]
}

fn standard_partners() -> Vec<Partner> {
    let mut hudson_cohorts = BTreeMap::new();
    hudson_cohorts.insert(
        "aai-gc".to_string(),
        CohortPricing::Fixed {
            per_credit: Decimal::from(1400),
            total_price: Decimal::from(16_800),
        },
    );
    hudson_cohorts.insert(
        "ent-gc".to_string(),
        CohortPricing::Variable {
            min: CreditPoint {
                credits: 9,
                price: Decimal::from(5850),
            },
            typical: CreditPoint {
                credits: 12,
                price: Decimal::from(7800),
            },
            max: CreditPoint {
                credits: 15,
                price: Decimal::from(9750),
            },
        },
    );

    vec![
        Partner {
            id: "none".to_string(),
            name: "My employer is not listed".to_string(),
            has_special_cohort: false,
            promotional_discount_eligible: false,
            promotional_discount_valid_until: None,
            residency_discount_eligible: false,
            alumni_discount_eligible: true,
            cohort_pricing: BTreeMap::new(),
        },
        Partner {
            id: "hudson-health".to_string(),
            name: "Hudson Health Network".to_string(),
            has_special_cohort: true,
            promotional_discount_eligible: true,
            promotional_discount_valid_until: NaiveDate::from_ymd_opt(2026, 12, 31),
            residency_discount_eligible: true,
            alumni_discount_eligible: true,
            cohort_pricing: hudson_cohorts,
        },
        Partner {
            id: "garden-state-utilities".to_string(),
            name: "Garden State Utilities".to_string(),
            has_special_cohort: false,
            promotional_discount_eligible: true,
            promotional_discount_valid_until: NaiveDate::from_ymd_opt(2026, 6, 30),
            residency_discount_eligible: true,
            alumni_discount_eligible: true,
            cohort_pricing: BTreeMap::new(),
        },
        Partner {
            id: "meridian-bank".to_string(),
            name: "Meridian Bank".to_string(),
            has_special_cohort: false,
            promotional_discount_eligible: true,
            promotional_discount_valid_until: NaiveDate::from_ymd_opt(2027, 6, 30),
            residency_discount_eligible: false,
            alumni_discount_eligible: true,
            cohort_pricing: BTreeMap::new(),
        },
    ]
}
