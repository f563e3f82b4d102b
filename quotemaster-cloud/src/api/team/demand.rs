//! Kitchen demand endpoint

use axum::{Json, extract::State};
use serde::Serialize;
use shared::models::DemandUpsertRequest;

use crate::api::extract::{ApiJson, ApiPath};
use crate::services::demand::{upsert_demands as upsert, validate_demands};
use crate::state::AppState;

use super::{ApiResult, verify_team};

#[derive(Serialize)]
pub struct DemandUpsertResponse {
    pub period: String,
    pub updated: usize,
}

/// PUT /api/teams/:team_id/demands
pub async fn upsert_demands(
    State(state): State<AppState>,
    ApiPath(team_id): ApiPath<i64>,
    ApiJson(request): ApiJson<DemandUpsertRequest>,
) -> ApiResult<DemandUpsertResponse> {
    let period = validate_demands(&request)?.to_string();
    verify_team(&state, team_id).await?;

    let updated = upsert(&state.pool, team_id, request).await?;
    Ok(Json(DemandUpsertResponse { period, updated }))
}
