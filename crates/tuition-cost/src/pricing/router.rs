use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::catalog::{CreditSummary, Program, ProgramCategory};
use super::engine::{CostEngine, CostError, CostOptions};
use super::partners::Partner;

/// Router builder exposing catalog listings, estimates, and discount availability.
pub fn pricing_router(engine: Arc<CostEngine>) -> Router {
    Router::new()
        .route("/api/v1/programs", get(programs_handler))
        .route("/api/v1/partners", get(partners_handler))
        .route("/api/v1/tuition/estimate", post(estimate_handler))
        .route(
            "/api/v1/tuition/availability/:program_code/:partner_id",
            get(availability_handler),
        )
        .with_state(engine)
}

/// Body accepted by the estimate endpoint.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EstimateRequest {
    pub program_code: String,
    pub partner_id: String,
    #[serde(default)]
    pub options: CostOptions,
    /// Pricing date override; defaults to the engine's current date.
    #[serde(default)]
    pub as_of: Option<NaiveDate>,
}

/// Query string accepted by the availability endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AvailabilityQuery {
    /// Evaluation date; defaults to the engine's current date.
    #[serde(default)]
    pub as_of: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct ProgramListing {
    pub code: String,
    pub name: String,
    pub category: ProgramCategory,
    pub category_label: &'static str,
    pub credits: CreditSummary,
    pub standard_price: Decimal,
}

impl From<&Program> for ProgramListing {
    fn from(program: &Program) -> Self {
        Self {
            code: program.code.clone(),
            name: program.name.clone(),
            category: program.category,
            category_label: program.category.label(),
            credits: program.credit_summary(),
            standard_price: program.standard_price(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct PartnerListing {
    pub id: String,
    pub name: String,
}

impl From<&Partner> for PartnerListing {
    fn from(partner: &Partner) -> Self {
        Self {
            id: partner.id.clone(),
            name: partner.name.clone(),
        }
    }
}

pub(crate) async fn programs_handler(State(engine): State<Arc<CostEngine>>) -> Response {
    let programs: Vec<ProgramListing> = engine
        .tables()
        .catalog()
        .list_programs()
        .iter()
        .map(ProgramListing::from)
        .collect();
    let payload = json!({
        "version": engine.tables().version(),
        "programs": programs,
    });
    (StatusCode::OK, Json(payload)).into_response()
}

pub(crate) async fn partners_handler(State(engine): State<Arc<CostEngine>>) -> Response {
    let partners: Vec<PartnerListing> = engine
        .tables()
        .directory()
        .list_partners()
        .iter()
        .map(PartnerListing::from)
        .collect();
    (StatusCode::OK, Json(json!({ "partners": partners }))).into_response()
}

pub(crate) async fn estimate_handler(
    State(engine): State<Arc<CostEngine>>,
    Json(request): Json<EstimateRequest>,
) -> Response {
    let on = request.as_of.unwrap_or_else(|| engine.today());
    match engine.compute_cost_on(
        &request.program_code,
        &request.partner_id,
        &request.options,
        on,
    ) {
        Ok(breakdown) => (StatusCode::OK, Json(breakdown)).into_response(),
        Err(error) => cost_error_response(error),
    }
}

pub(crate) async fn availability_handler(
    State(engine): State<Arc<CostEngine>>,
    Path((program_code, partner_id)): Path<(String, String)>,
    Query(query): Query<AvailabilityQuery>,
) -> Response {
    let on = query.as_of.unwrap_or_else(|| engine.today());
    match engine.get_availability_on(&program_code, &partner_id, on) {
        Ok(availability) => (StatusCode::OK, Json(availability)).into_response(),
        Err(error) => cost_error_response(error),
    }
}

pub(crate) fn cost_error_status(error: &CostError) -> StatusCode {
    match error {
        CostError::UnknownProgram(_) | CostError::UnknownPartner(_) => StatusCode::NOT_FOUND,
        CostError::InvalidInput(_) => StatusCode::UNPROCESSABLE_ENTITY,
    }
}

fn cost_error_response(error: CostError) -> Response {
    let payload = json!({
        "error": error.to_string(),
    });
    (cost_error_status(&error), Json(payload)).into_response()
}
