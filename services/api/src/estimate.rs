use crate::infra::{load_engine, parse_amount, parse_date};
use chrono::NaiveDate;
use clap::Args;
use rust_decimal::Decimal;
use tuition_cost::config::AppConfig;
use tuition_cost::error::AppError;
use tuition_cost::pricing::{
    CostBreakdown, CostEngine, CostOptions, CreditSummary, DiscountAvailability,
};

#[derive(Args, Debug)]
pub(crate) struct EstimateArgs {
    /// Program code from the catalog (see `catalog`)
    #[arg(long)]
    pub(crate) program: String,
    /// Partner id from the partner directory (use `none` when the employer is not listed)
    #[arg(long)]
    pub(crate) partner: String,
    /// Apply the partner's promotional discount if it is still open
    #[arg(long)]
    pub(crate) promotional: bool,
    /// Learner is eligible for the Hoboken residency discount
    #[arg(long)]
    pub(crate) residency: bool,
    /// Learner is a returning alumnus
    #[arg(long)]
    pub(crate) alumni: bool,
    /// Employer tuition reimbursement, subtracted last
    #[arg(long, value_parser = parse_amount)]
    pub(crate) reimbursement: Option<Decimal>,
    /// Pricing date (YYYY-MM-DD). Defaults to today or PRICING_AS_OF.
    #[arg(long, value_parser = parse_date)]
    pub(crate) as_of: Option<NaiveDate>,
    /// Print the breakdown as JSON instead of text
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct AvailabilityArgs {
    /// Program code from the catalog
    #[arg(long)]
    pub(crate) program: String,
    /// Partner id from the partner directory
    #[arg(long)]
    pub(crate) partner: String,
    /// Evaluation date (YYYY-MM-DD). Defaults to today or PRICING_AS_OF.
    #[arg(long, value_parser = parse_date)]
    pub(crate) as_of: Option<NaiveDate>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct CatalogArgs {
    /// Print programs and partners as JSON
    #[arg(long)]
    pub(crate) json: bool,
}

fn configured_engine() -> Result<CostEngine, AppError> {
    let config = AppConfig::load()?;
    load_engine(&config.pricing)
}

pub(crate) fn run_estimate(args: EstimateArgs) -> Result<(), AppError> {
    let EstimateArgs {
        program,
        partner,
        promotional,
        residency,
        alumni,
        reimbursement,
        as_of,
        json,
    } = args;

    let engine = configured_engine()?;
    let options = CostOptions {
        apply_promotional_discount: promotional,
        is_residency_eligible: residency,
        is_alumni_eligible: alumni,
        employer_reimbursement: reimbursement,
    };
    let on = as_of.unwrap_or_else(|| engine.today());
    let breakdown = engine.compute_cost_on(&program, &partner, &options, on)?;

    if json {
        match serde_json::to_string_pretty(&breakdown) {
            Ok(payload) => println!("{payload}"),
            Err(err) => println!("Breakdown payload unavailable: {err}"),
        }
    } else {
        for line in render_breakdown(&breakdown) {
            println!("{line}");
        }
    }
    Ok(())
}

pub(crate) fn run_availability(args: AvailabilityArgs) -> Result<(), AppError> {
    let engine = configured_engine()?;
    let on = args.as_of.unwrap_or_else(|| engine.today());
    let availability = engine.get_availability_on(&args.program, &args.partner, on)?;

    println!("Optional discounts for {} / {} on {on}", args.program, args.partner);
    for line in render_availability(&availability) {
        println!("{line}");
    }
    Ok(())
}

pub(crate) fn run_catalog(args: CatalogArgs) -> Result<(), AppError> {
    let engine = configured_engine()?;
    let tables = engine.tables();

    if args.json {
        let payload = serde_json::json!({
            "version": tables.version(),
            "programs": tables.catalog().list_programs(),
            "partners": tables.directory().list_partners(),
        });
        match serde_json::to_string_pretty(&payload) {
            Ok(payload) => println!("{payload}"),
            Err(err) => println!("Catalog payload unavailable: {err}"),
        }
        return Ok(());
    }

    println!("Pricing tables {}", tables.version());
    println!("Programs:");
    for program in tables.catalog().list_programs() {
        println!(
            "  - {} | {} ({}) | {} | ${:.2}",
            program.code,
            program.name,
            program.category.label(),
            describe_credits(&program.credit_summary()),
            program.standard_price()
        );
    }
    println!("Partners:");
    for partner in tables.directory().list_partners() {
        println!("  - {} | {}", partner.id, partner.name);
    }
    Ok(())
}

fn describe_credits(credits: &CreditSummary) -> String {
    match credits {
        CreditSummary::Fixed { credits } => format!("{credits} credits"),
        CreditSummary::Variable { min, typical, max } => {
            format!("{min}-{max} credits (typically {typical})")
        }
    }
}

pub(crate) fn render_breakdown(breakdown: &CostBreakdown) -> Vec<String> {
    let mut lines = vec![
        format!(
            "{} [{}] priced {} (tables {})",
            breakdown.program_name,
            breakdown.program_code,
            breakdown.priced_on,
            breakdown.tables_version
        ),
        format!(
            "- Standard price: ${:.2} for {}",
            breakdown.standard_price,
            describe_credits(&breakdown.credits)
        ),
    ];

    if breakdown.steps.is_empty() {
        lines.push("- No discounts applied".to_string());
    } else {
        lines.push("- Adjustments:".to_string());
        for step in &breakdown.steps {
            let percentage = step
                .percentage
                .map(|value| format!(" ({value}%)"))
                .unwrap_or_default();
            lines.push(format!(
                "    - {}{}: -${:.2} -> ${:.2} | {}",
                step.name, percentage, step.discount_amount, step.price_after, step.description
            ));
        }
    }

    if let Some(range) = &breakdown.cost_range {
        lines.push(format!(
            "- Range by concentration: ${:.2} ({} cr) to ${:.2} ({} cr)",
            range.min.price, range.min.credits, range.max.price, range.max.credits
        ));
    }

    lines.push(format!(
        "- Your cost: ${:.2} ({}% saved)",
        breakdown.final_price, breakdown.percent_saved
    ));
    lines
}

pub(crate) fn render_availability(availability: &DiscountAvailability) -> Vec<String> {
    let flag = |shown: bool| if shown { "available" } else { "not available" };
    let mut promotional = format!("- Partner promotion: {}", flag(availability.show_promotional));
    if let Some(until) = availability.promotional_valid_until {
        promotional.push_str(&format!(" through {until}"));
    }

    vec![
        promotional,
        format!(
            "- Hoboken residency discount: {}",
            flag(availability.show_residency)
        ),
        format!("- Alumni discount: {}", flag(availability.show_alumni)),
    ]
}
