use chrono::NaiveDate;
use metrics_exporter_prometheus::PrometheusHandle;
use rust_decimal::Decimal;
use std::fs::File;
use std::io::BufReader;
use std::str::FromStr;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::info;
use tuition_cost::config::{ConfigError, PricingConfig};
use tuition_cost::error::AppError;
use tuition_cost::pricing::{CostEngine, PricingTables};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Load the pricing tables once and wrap them in an engine configured from `config`.
pub(crate) fn load_engine(config: &PricingConfig) -> Result<CostEngine, AppError> {
    let tables = match &config.tables_path {
        Some(path) => {
            let reader = BufReader::new(File::open(path)?);
            let tables = PricingTables::from_json_reader(reader)?;
            info!(path = %path.display(), version = tables.version(), "loaded pricing tables");
            tables
        }
        None => PricingTables::standard()?,
    };

    let engine = CostEngine::new(Arc::new(tables), config.rates).map_err(ConfigError::Rates)?;
    Ok(match config.as_of {
        Some(date) => engine.pinned_to(date),
        None => engine,
    })
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

pub(crate) fn parse_amount(raw: &str) -> Result<Decimal, String> {
    let cleaned: String = raw
        .trim()
        .trim_start_matches('$')
        .chars()
        .filter(|ch| *ch != ',')
        .collect();
    let amount = Decimal::from_str(&cleaned)
        .map_err(|err| format!("failed to parse '{raw}' as a currency amount ({err})"))?;
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(format!("'{raw}' must not be negative"));
    }
    Ok(amount)
}
