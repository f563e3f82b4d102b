//! Comparison matrix endpoint

use axum::{Json, extract::State};
use shared::models::{ComparisonMatrix, MatrixQuery};

use crate::api::extract::{ApiPath, ApiQuery};
use crate::services::matrix::{MatrixRequest, build_matrix};
use crate::state::AppState;

use super::{ApiResult, verify_team};

/// GET /api/teams/:team_id/matrix?period=YYYY-MM-NN&region=&category=
pub async fn get_matrix(
    State(state): State<AppState>,
    ApiPath(team_id): ApiPath<i64>,
    ApiQuery(query): ApiQuery<MatrixQuery>,
) -> ApiResult<ComparisonMatrix> {
    let request = MatrixRequest::try_from(query)?;
    verify_team(&state, team_id).await?;

    let matrix = build_matrix(&state.pool, team_id, request, state.price_lookback_months).await?;
    Ok(Json(matrix))
}
