//! Product price history endpoint

use axum::{Json, extract::State};
use serde::Deserialize;
use shared::error::{AppError, ErrorCode};
use shared::models::PriceHistoryEntry;

use crate::api::extract::{ApiPath, ApiQuery};
use crate::db::{catalog, price_history};
use crate::state::AppState;

use super::{ApiResult, internal, page, verify_team};

#[derive(Deserialize)]
pub struct PriceHistoryQuery {
    pub region: Option<String>,
    pub limit: Option<i64>,
}

/// GET /api/teams/:team_id/products/:product_id/price-history?region=&limit=
pub async fn get_price_history(
    State(state): State<AppState>,
    ApiPath((team_id, product_id)): ApiPath<(i64, i64)>,
    ApiQuery(query): ApiQuery<PriceHistoryQuery>,
) -> ApiResult<Vec<PriceHistoryEntry>> {
    verify_team(&state, team_id).await?;

    catalog::find_product(&state.pool, team_id, product_id)
        .await
        .map_err(internal)?
        .ok_or_else(|| {
            AppError::new(ErrorCode::ProductNotFound).with_detail("product_id", product_id)
        })?;

    let (limit, _) = page(query.limit, None);
    let region = query.region.as_deref().map(str::trim).filter(|r| !r.is_empty());

    let entries = price_history::list_for_product(&state.pool, team_id, product_id, region, limit)
        .await
        .map_err(internal)?;
    Ok(Json(entries))
}
