//! Kitchen demand upserts

use std::collections::HashSet;

use rust_decimal::Decimal;
use serde_json::json;
use shared::error::{AppError, ErrorCode};
use shared::models::DemandUpsertRequest;
use shared::period::PeriodKey;
use shared::util::now_millis;
use sqlx::PgPool;

use crate::db;
use crate::error::ServiceResult;

/// Validate a demand batch, returning the parsed period
pub fn validate_demands(request: &DemandUpsertRequest) -> Result<PeriodKey, AppError> {
    let period: PeriodKey = request.period.trim().parse()?;
    if request.items.is_empty() {
        return Err(AppError::validation("At least one demand entry is required"));
    }
    let mut seen = HashSet::with_capacity(request.items.len());
    for item in &request.items {
        if item.quantity < Decimal::ZERO {
            return Err(AppError::with_message(
                ErrorCode::InvalidQuantity,
                format!("quantity must not be negative, got {}", item.quantity),
            )
            .with_detail("kitchen_id", item.kitchen_id)
            .with_detail("product_id", item.product_id));
        }
        if !seen.insert((item.kitchen_id, item.product_id)) {
            return Err(AppError::validation("Duplicate kitchen/product demand entry")
                .with_detail("kitchen_id", item.kitchen_id)
                .with_detail("product_id", item.product_id));
        }
    }
    Ok(period)
}

/// Upsert a batch of demand quantities in one transaction.
///
/// Returns the number of entries written.
pub async fn upsert_demands(
    pool: &PgPool,
    team_id: i64,
    request: DemandUpsertRequest,
) -> ServiceResult<usize> {
    let period = validate_demands(&request)?.to_string();
    let now = now_millis();
    let mut tx = pool.begin().await?;

    let kitchen_ids: Vec<i64> = request.items.iter().map(|i| i.kitchen_id).collect();
    let known_kitchens: HashSet<i64> =
        db::teams::existing_kitchen_ids(&mut *tx, team_id, &kitchen_ids)
            .await?
            .into_iter()
            .collect();
    if let Some(missing) = kitchen_ids.iter().find(|id| !known_kitchens.contains(*id)) {
        return Err(AppError::new(ErrorCode::KitchenNotFound)
            .with_detail("kitchen_id", *missing)
            .into());
    }

    let product_ids: Vec<i64> = request.items.iter().map(|i| i.product_id).collect();
    let known_products: HashSet<i64> = db::catalog::find_products(&mut *tx, team_id, &product_ids)
        .await?
        .into_iter()
        .map(|p| p.id)
        .collect();
    if let Some(missing) = product_ids.iter().find(|id| !known_products.contains(*id)) {
        return Err(AppError::new(ErrorCode::ProductNotFound)
            .with_detail("product_id", *missing)
            .into());
    }

    for item in &request.items {
        db::demand::upsert(
            &mut tx,
            team_id,
            item.kitchen_id,
            item.product_id,
            &period,
            item.quantity,
            now,
        )
        .await?;
    }

    let written = request.items.len();
    let detail = json!({ "period": period, "entries": written });
    db::audit::log(&mut *tx, team_id, "demand.upserted", Some(&detail), now).await?;
    tx.commit().await?;

    tracing::info!(team_id, period = %period, entries = written, "Kitchen demand updated");
    Ok(written)
}
