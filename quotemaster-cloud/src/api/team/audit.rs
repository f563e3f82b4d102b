//! Audit log endpoint

use axum::{Json, extract::State};
use serde::Deserialize;

use crate::api::extract::{ApiPath, ApiQuery};
use crate::db::audit::{self, AuditEntry};
use crate::state::AppState;

use super::{ApiResult, internal, page, verify_team};

#[derive(Deserialize)]
pub struct AuditQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// GET /api/teams/:team_id/audit?limit=&offset=
pub async fn audit_log(
    State(state): State<AppState>,
    ApiPath(team_id): ApiPath<i64>,
    ApiQuery(query): ApiQuery<AuditQuery>,
) -> ApiResult<Vec<AuditEntry>> {
    verify_team(&state, team_id).await?;
    let (limit, offset) = page(query.limit, query.offset);

    let entries = audit::query(&state.pool, team_id, limit, offset)
        .await
        .map_err(internal)?;
    Ok(Json(entries))
}
