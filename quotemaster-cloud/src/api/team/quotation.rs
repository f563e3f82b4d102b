//! Quotation endpoints: list, detail and the workflow transitions

use axum::{Json, extract::State};
use serde::Deserialize;
use shared::error::AppError;
use shared::models::{
    ApproveRequest, NegotiateRequest, QuotationCreate, QuotationDetail, QuotationStatus,
    QuotationSummary, RejectRequest,
};
use shared::period::PeriodKey;

use crate::api::extract::{ApiJson, ApiPath, ApiQuery};
use crate::db::quotations::{self, QuotationFilter};
use crate::services::workflow;
use crate::state::AppState;

use super::{ApiResult, internal, page, verify_team};

#[derive(Deserialize)]
pub struct ListQuery {
    pub period: Option<String>,
    pub region: Option<String>,
    pub status: Option<String>,
    pub supplier_id: Option<i64>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// GET /api/teams/:team_id/quotations
pub async fn list_quotations(
    State(state): State<AppState>,
    ApiPath(team_id): ApiPath<i64>,
    ApiQuery(query): ApiQuery<ListQuery>,
) -> ApiResult<Vec<QuotationSummary>> {
    let status = query
        .status
        .as_deref()
        .map(str::parse::<QuotationStatus>)
        .transpose()
        .map_err(|e| AppError::validation(e).with_detail("field", "status"))?;
    if let Some(period) = query.period.as_deref() {
        period.parse::<PeriodKey>()?;
    }
    verify_team(&state, team_id).await?;

    let (limit, offset) = page(query.limit, query.offset);
    let filter = QuotationFilter {
        period: query.period.as_deref(),
        region: query.region.as_deref().filter(|r| !r.trim().is_empty()),
        status,
        supplier_id: query.supplier_id,
    };

    let rows = quotations::list(&state.pool, team_id, &filter, limit, offset)
        .await
        .map_err(internal)?;
    Ok(Json(rows))
}

/// POST /api/teams/:team_id/quotations
pub async fn create_quotation(
    State(state): State<AppState>,
    ApiPath(team_id): ApiPath<i64>,
    ApiJson(request): ApiJson<QuotationCreate>,
) -> ApiResult<QuotationDetail> {
    workflow::validate_submission(&request)?;
    verify_team(&state, team_id).await?;

    let detail = workflow::submit_quotation(&state.pool, team_id, request).await?;
    Ok(Json(detail))
}

/// GET /api/teams/:team_id/quotations/:id
pub async fn get_quotation(
    State(state): State<AppState>,
    ApiPath((team_id, quotation_id)): ApiPath<(i64, i64)>,
) -> ApiResult<QuotationDetail> {
    verify_team(&state, team_id).await?;
    let detail = workflow::get_detail(&state.pool, team_id, quotation_id).await?;
    Ok(Json(detail))
}

/// POST /api/teams/:team_id/quotations/:id/negotiate
pub async fn negotiate_quotation(
    State(state): State<AppState>,
    ApiPath((team_id, quotation_id)): ApiPath<(i64, i64)>,
    ApiJson(request): ApiJson<NegotiateRequest>,
) -> ApiResult<QuotationDetail> {
    workflow::validate_negotiation_payload(&request)?;
    verify_team(&state, team_id).await?;

    let detail =
        workflow::negotiate_quotation(&state.pool, team_id, quotation_id, request).await?;
    Ok(Json(detail))
}

/// POST /api/teams/:team_id/quotations/:id/approve
pub async fn approve_quotation(
    State(state): State<AppState>,
    ApiPath((team_id, quotation_id)): ApiPath<(i64, i64)>,
    ApiJson(request): ApiJson<ApproveRequest>,
) -> ApiResult<QuotationDetail> {
    workflow::validate_approval_payload(&request)?;
    verify_team(&state, team_id).await?;

    let detail = workflow::approve_quotation(&state.pool, team_id, quotation_id, request).await?;
    Ok(Json(detail))
}

/// POST /api/teams/:team_id/quotations/:id/reject
pub async fn reject_quotation(
    State(state): State<AppState>,
    ApiPath((team_id, quotation_id)): ApiPath<(i64, i64)>,
    ApiJson(request): ApiJson<RejectRequest>,
) -> ApiResult<QuotationDetail> {
    workflow::validate_rejection(&request)?;
    verify_team(&state, team_id).await?;

    let detail = workflow::reject_quotation(&state.pool, team_id, quotation_id, request).await?;
    Ok(Json(detail))
}
