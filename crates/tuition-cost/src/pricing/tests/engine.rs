use super::common::*;
use rust_decimal::Decimal;

use std::sync::Arc;

use crate::pricing::{
    CostEngine, CostError, CostOptions, CreditSummary, DiscountKind, DiscountRates, RatesError,
};

fn kinds(breakdown: &crate::pricing::CostBreakdown) -> Vec<DiscountKind> {
    breakdown.steps.iter().map(|step| step.kind).collect()
}

#[test]
fn promotional_discount_on_fixed_program() {
    let breakdown = engine()
        .compute_cost("viz", "promo", &promotional_only())
        .expect("breakdown");

    assert_eq!(breakdown.base_price, money(5250));
    assert_eq!(breakdown.final_price, money(3675));
    assert_eq!(kinds(&breakdown), vec![DiscountKind::Promotional]);
    let step = &breakdown.steps[0];
    assert_eq!(step.discount_amount, money(1575));
    assert_eq!(step.percentage, Some(money(30)));
    assert_eq!(breakdown.percent_saved, 30);
    assert_eq!(breakdown.credits, CreditSummary::Fixed { credits: 3 });
    assert!(breakdown.cost_range.is_none());
}

#[test]
fn reimbursement_beyond_remaining_price_is_capped() {
    let options = CostOptions {
        employer_reimbursement: Some(money(5000)),
        ..promotional_only()
    };

    let breakdown = engine()
        .compute_cost("viz", "promo", &options)
        .expect("breakdown");

    assert_eq!(breakdown.final_price, Decimal::ZERO);
    assert_eq!(
        kinds(&breakdown),
        vec![DiscountKind::Promotional, DiscountKind::Reimbursement]
    );
    assert_eq!(breakdown.steps[0].discount_amount, money(1575));
    assert_eq!(breakdown.steps[1].discount_amount, money(3675));
    assert_eq!(breakdown.percent_saved, 100);
}

#[test]
fn reimbursement_alone_never_produces_a_refund() {
    let options = CostOptions {
        employer_reimbursement: Some(money(8000)),
        ..CostOptions::default()
    };

    let breakdown = engine()
        .compute_cost("viz", "none", &options)
        .expect("breakdown");

    assert_eq!(breakdown.base_price, money(5250));
    assert_eq!(breakdown.final_price, Decimal::ZERO);
    let step = breakdown
        .step(DiscountKind::Reimbursement)
        .expect("reimbursement step");
    assert_eq!(step.discount_amount, money(5250));
}

#[test]
fn variable_program_quotes_typical_credits_with_range() {
    let breakdown = engine()
        .compute_cost("ent", "none", &CostOptions::default())
        .expect("breakdown");

    assert_eq!(breakdown.base_price, money(9600));
    assert_eq!(breakdown.final_price, money(9600));
    assert!(breakdown.steps.is_empty());
    let range = breakdown.cost_range.expect("variable programs expose a range");
    assert_eq!((range.min.credits, range.min.price), (9, money(7200)));
    assert_eq!((range.typical.credits, range.typical.price), (12, money(9600)));
    assert_eq!((range.max.credits, range.max.price), (15, money(12_000)));
}

#[test]
fn cost_range_follows_percentage_steps_but_not_reimbursement() {
    let options = CostOptions {
        employer_reimbursement: Some(money(1000)),
        ..promotional_only()
    };

    let breakdown = engine()
        .compute_cost("ent", "promo", &options)
        .expect("breakdown");

    assert_eq!(breakdown.final_price, money(5720));
    let range = breakdown.cost_range.expect("range");
    assert_eq!(range.min.price, money(5040));
    assert_eq!(range.typical.price, money(6720));
    assert_eq!(range.max.price, money(8400));
    let promotional = breakdown
        .step(DiscountKind::Promotional)
        .expect("promotional step");
    assert_eq!(range.typical.price, promotional.price_after);
}

#[test]
fn unknown_program_fails_without_breakdown() {
    let result = engine().compute_cost("nope", "promo", &promotional_only());
    assert_eq!(result, Err(CostError::UnknownProgram("nope".to_string())));
}

#[test]
fn unknown_partner_fails_without_breakdown() {
    let result = engine().compute_cost("viz", "nobody", &CostOptions::default());
    assert_eq!(result, Err(CostError::UnknownPartner("nobody".to_string())));
}

#[test]
fn negative_reimbursement_is_invalid_input() {
    let options = CostOptions {
        employer_reimbursement: Some(money(-1)),
        ..CostOptions::default()
    };

    match engine().compute_cost("viz", "none", &options) {
        Err(CostError::InvalidInput(message)) => assert!(message.contains("negative")),
        other => panic!("expected invalid input, got {other:?}"),
    }
}

#[test]
fn zero_reimbursement_records_no_step() {
    let options = CostOptions {
        employer_reimbursement: Some(Decimal::ZERO),
        ..CostOptions::default()
    };

    let breakdown = engine()
        .compute_cost("viz", "none", &options)
        .expect("breakdown");
    assert!(!breakdown.has_step(DiscountKind::Reimbursement));
}

#[test]
fn promotional_window_includes_last_day_only() {
    let engine = engine();
    let options = promotional_only();

    let on_deadline = engine
        .compute_cost_on("viz", "promo", &options, promo_deadline())
        .expect("breakdown");
    assert!(on_deadline.has_step(DiscountKind::Promotional));
    assert_eq!(on_deadline.priced_on, promo_deadline());

    let day_after = promo_deadline().succ_opt().expect("next day");
    let expired = engine
        .compute_cost_on("viz", "promo", &options, day_after)
        .expect("breakdown");
    assert!(!expired.has_step(DiscountKind::Promotional));
    assert_eq!(expired.final_price, money(5250));
}

#[test]
fn gated_discounts_are_absent_rather_than_zero() {
    let engine = engine();

    let toggles_off = engine
        .compute_cost("viz", "promo", &CostOptions::default())
        .expect("breakdown");
    assert!(toggles_off.steps.is_empty());

    let partner_ineligible = engine
        .compute_cost("viz", "none", &every_toggle())
        .expect("breakdown");
    assert!(!partner_ineligible.has_step(DiscountKind::Promotional));
    assert!(!partner_ineligible.has_step(DiscountKind::Residency));
    assert!(!partner_ineligible.has_step(DiscountKind::Alumni));
    assert!(partner_ineligible.steps.is_empty());
}

#[test]
fn percentage_discounts_compound_in_fixed_order() {
    let breakdown = engine()
        .compute_cost("viz", "promo", &every_toggle())
        .expect("breakdown");

    assert_eq!(
        kinds(&breakdown),
        vec![
            DiscountKind::Promotional,
            DiscountKind::Residency,
            DiscountKind::Alumni
        ]
    );
    // 5250 -> 3675 -> 3491.25 -> 3316.69
    assert_eq!(breakdown.steps[1].discount_amount, cents(18_375));
    assert_eq!(breakdown.steps[2].discount_amount, cents(17_456));
    assert_eq!(breakdown.final_price, cents(331_669));
    assert_eq!(breakdown.percent_saved, 37);
}

#[test]
fn cohort_savings_count_toward_percent_saved() {
    let options = CostOptions {
        is_alumni_eligible: true,
        ..CostOptions::default()
    };

    let breakdown = engine()
        .compute_cost("aai", "cohort", &options)
        .expect("breakdown");

    assert_eq!(breakdown.standard_price, money(21_000));
    assert_eq!(breakdown.base_price, money(16_800));
    assert_eq!(
        kinds(&breakdown),
        vec![DiscountKind::CohortFixed, DiscountKind::Alumni]
    );
    assert_eq!(breakdown.steps[0].discount_amount, money(4200));
    assert_eq!(breakdown.steps[1].discount_amount, money(840));
    assert_eq!(breakdown.final_price, money(15_960));
    assert_eq!(breakdown.percent_saved, 24);
    assert!(breakdown.cohort_pricing.is_some());
}

#[test]
fn cohort_price_above_standard_is_recorded_with_zero_amount() {
    let breakdown = engine()
        .compute_cost("viz", "cohort", &CostOptions::default())
        .expect("breakdown");

    let step = breakdown
        .step(DiscountKind::CohortFixed)
        .expect("cohort step is recorded for transparency");
    assert_eq!(step.discount_amount, Decimal::ZERO);
    assert_eq!(breakdown.base_price, money(5400));
    assert_eq!(breakdown.final_price, money(5400));
    assert_eq!(breakdown.percent_saved, 0);
}

#[test]
fn variable_cohort_replaces_typical_price_without_range() {
    let breakdown = engine()
        .compute_cost("ent", "cohort", &CostOptions::default())
        .expect("breakdown");

    assert_eq!(kinds(&breakdown), vec![DiscountKind::CohortVariable]);
    assert_eq!(breakdown.steps[0].discount_amount, money(1800));
    assert_eq!(breakdown.base_price, money(7800));
    assert!(breakdown.cost_range.is_none());
    assert_eq!(breakdown.percent_saved, 19);
}

#[test]
fn every_step_reduces_or_holds_the_running_price() {
    let engine = engine();
    let reimbursements = [None, Some(Decimal::ZERO), Some(money(1000)), Some(money(1_000_000))];

    for program in engine.tables().catalog().list_programs() {
        for partner in engine.tables().directory().list_partners() {
            for mask in 0..8u8 {
                for reimbursement in reimbursements {
                    let options = CostOptions {
                        apply_promotional_discount: mask & 1 != 0,
                        is_residency_eligible: mask & 2 != 0,
                        is_alumni_eligible: mask & 4 != 0,
                        employer_reimbursement: reimbursement,
                    };
                    let breakdown = engine
                        .compute_cost(&program.code, &partner.id, &options)
                        .expect("breakdown");

                    let mut previous = breakdown.base_price;
                    for step in breakdown
                        .steps
                        .iter()
                        .filter(|step| !matches!(
                            step.kind,
                            DiscountKind::CohortFixed | DiscountKind::CohortVariable
                        ))
                    {
                        assert!(step.discount_amount >= Decimal::ZERO);
                        assert!(step.price_after <= previous);
                        previous = step.price_after;
                    }
                    assert_eq!(breakdown.final_price, previous);
                    assert!(breakdown.final_price >= Decimal::ZERO);
                    assert!(breakdown.final_price <= breakdown.base_price);
                }
            }
        }
    }
}

#[test]
fn summary_mentions_final_price_and_savings() {
    let breakdown = engine()
        .compute_cost("viz", "promo", &promotional_only())
        .expect("breakdown");

    let summary = breakdown.summary();
    assert!(summary.contains("$3675.00"), "{summary}");
    assert!(summary.contains("30%"), "{summary}");
    assert_eq!(breakdown.total_discount(), money(1575));
    assert_eq!(breakdown.tables_version, "fixture-1");
}

#[test]
fn engine_refuses_rates_that_would_raise_the_price() {
    let surcharge = DiscountRates {
        promotional_percent: money(150),
        ..DiscountRates::default()
    };
    let result = CostEngine::new(Arc::new(tables()), surcharge);
    assert!(matches!(
        result,
        Err(RatesError::OutOfRange {
            name: "promotional",
            ..
        })
    ));

    let negative = DiscountRates {
        alumni_percent: money(-5),
        ..DiscountRates::default()
    };
    assert!(CostEngine::new(Arc::new(tables()), negative).is_err());
}

#[test]
fn full_rates_zero_the_price_without_going_negative() {
    let rates = DiscountRates {
        promotional_percent: money(100),
        ..DiscountRates::default()
    };
    let engine = CostEngine::new(Arc::new(tables()), rates)
        .expect("100 percent is a valid rate")
        .pinned_to(today());

    let breakdown = engine
        .compute_cost("viz", "promo", &every_toggle())
        .expect("breakdown");

    assert_eq!(breakdown.steps[0].discount_amount, money(5250));
    for step in &breakdown.steps {
        assert!(step.discount_amount >= Decimal::ZERO);
        assert!(step.price_after >= Decimal::ZERO);
    }
    assert_eq!(breakdown.final_price, Decimal::ZERO);
    assert_eq!(breakdown.percent_saved, 100);
}
