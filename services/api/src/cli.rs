use crate::estimate::{
    run_availability, run_catalog, run_estimate, AvailabilityArgs, CatalogArgs, EstimateArgs,
};
use crate::server;
use clap::{Args, Parser, Subcommand};
use tuition_cost::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Tuition Cost Estimator",
    about = "Serve or query partner tuition pricing from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Price a program for a partner and print the itemized breakdown
    Estimate(EstimateArgs),
    /// Show which optional discounts a partner's learners can claim
    Availability(AvailabilityArgs),
    /// List programs and partners from the loaded pricing tables
    Catalog(CatalogArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Estimate(args) => run_estimate(args),
        Command::Availability(args) => run_availability(args),
        Command::Catalog(args) => run_catalog(args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_serve_without_subcommand() {
        let cli = Cli::try_parse_from(["tuition-cost-api"]).expect("parses");
        assert!(cli.command.is_none());
    }

    #[test]
    fn parses_estimate_flags() {
        let cli = Cli::try_parse_from([
            "tuition-cost-api",
            "estimate",
            "--program",
            "dataviz-pc",
            "--partner",
            "meridian-bank",
            "--promotional",
            "--reimbursement",
            "1250.50",
            "--as-of",
            "2026-12-31",
        ])
        .expect("parses");

        match cli.command {
            Some(Command::Estimate(args)) => {
                assert_eq!(args.program, "dataviz-pc");
                assert!(args.promotional);
                assert!(!args.alumni);
                assert_eq!(args.reimbursement, Some(rust_decimal::Decimal::new(125_050, 2)));
                assert_eq!(args.as_of, chrono::NaiveDate::from_ymd_opt(2026, 12, 31));
            }
            other => panic!("expected estimate command, got {other:?}"),
        }
    }

    #[test]
    fn rejects_malformed_dates() {
        let result = Cli::try_parse_from([
            "tuition-cost-api",
            "availability",
            "--program",
            "mem",
            "--partner",
            "none",
            "--as-of",
            "31/12/2026",
        ]);
        assert!(result.is_err());
    }
}
