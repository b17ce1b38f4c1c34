use std::collections::BTreeMap;
use std::sync::Arc;

use axum::response::Response;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde_json::Value;

use crate::pricing::{
    CohortPricing, CostEngine, CostOptions, CreditPoint, DiscountRates, Partner, PricingMode,
    PricingTables, Program, ProgramCategory,
};

pub(super) fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

pub(super) fn today() -> NaiveDate {
    date(2026, 10, 19)
}

pub(super) fn promo_deadline() -> NaiveDate {
    date(2026, 12, 31)
}

pub(super) fn money(units: i64) -> Decimal {
    Decimal::from(units)
}

pub(super) fn cents(value: i64) -> Decimal {
    Decimal::new(value, 2)
}

pub(super) fn programs() -> Vec<Program> {
    vec![
        Program {
            code: "viz".to_string(),
            name: "Professional Certificate in Data Visualization".to_string(),
            category: ProgramCategory::Certificate,
            pricing: PricingMode::Fixed {
                credits: 3,
                per_credit: money(1750),
                total_override: None,
            },
        },
        Program {
            code: "ent".to_string(),
            name: "Graduate Certificate in Enterprise Systems".to_string(),
            category: ProgramCategory::Certificate,
            pricing: PricingMode::Variable {
                min_credits: 9,
                typical_credits: 12,
                max_credits: 15,
                per_credit: money(800),
            },
        },
        Program {
            code: "aai".to_string(),
            name: "Graduate Certificate in Applied AI".to_string(),
            category: ProgramCategory::Certificate,
            pricing: PricingMode::Fixed {
                credits: 12,
                per_credit: money(1750),
                total_override: None,
            },
        },
    ]
}

fn partner(id: &str) -> Partner {
    Partner {
        id: id.to_string(),
        name: id.to_string(),
        has_special_cohort: false,
        promotional_discount_eligible: false,
        promotional_discount_valid_until: None,
        residency_discount_eligible: false,
        alumni_discount_eligible: false,
        cohort_pricing: BTreeMap::new(),
    }
}

pub(super) fn partners() -> Vec<Partner> {
    let plain = partner("none");

    let mut promo = partner("promo");
    promo.name = "Promo Health".to_string();
    promo.promotional_discount_eligible = true;
    promo.promotional_discount_valid_until = Some(promo_deadline());
    promo.residency_discount_eligible = true;
    promo.alumni_discount_eligible = true;

    let mut cohort = partner("cohort");
    cohort.name = "Cohort Bank".to_string();
    cohort.has_special_cohort = true;
    cohort.alumni_discount_eligible = true;
    cohort.cohort_pricing.insert(
        "aai".to_string(),
        CohortPricing::Fixed {
            per_credit: money(1400),
            total_price: money(16_800),
        },
    );
    cohort.cohort_pricing.insert(
        "viz".to_string(),
        CohortPricing::Fixed {
            per_credit: money(1800),
            total_price: money(5400),
        },
    );
    cohort.cohort_pricing.insert(
        "ent".to_string(),
        CohortPricing::Variable {
            min: CreditPoint {
                credits: 9,
                price: money(5850),
            },
            typical: CreditPoint {
                credits: 12,
                price: money(7800),
            },
            max: CreditPoint {
                credits: 15,
                price: money(9750),
            },
        },
    );

    vec![plain, promo, cohort]
}

pub(super) fn tables() -> PricingTables {
    PricingTables::new("fixture-1", programs(), partners()).expect("fixture tables are valid")
}

pub(super) fn engine() -> CostEngine {
    CostEngine::new(Arc::new(tables()), DiscountRates::default())
        .expect("default rates are valid")
        .pinned_to(today())
}

pub(super) fn promotional_only() -> CostOptions {
    CostOptions {
        apply_promotional_discount: true,
        ..CostOptions::default()
    }
}

pub(super) fn every_toggle() -> CostOptions {
    CostOptions {
        apply_promotional_discount: true,
        is_residency_eligible: true,
        is_alumni_eligible: true,
        employer_reimbursement: None,
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
