//! Kitchen demand quantities

use rust_decimal::Decimal;
use shared::models::KitchenDemand;
use sqlx::{PgConnection, PgPool};

use super::BoxError;

/// Demand of kitchens in `region` for products of `category`, ordered by
/// kitchen name
pub async fn list_for_category(
    pool: &PgPool,
    team_id: i64,
    period: &str,
    region: &str,
    category: &str,
) -> Result<Vec<KitchenDemand>, BoxError> {
    let rows: Vec<KitchenDemand> = sqlx::query_as(
        r#"
        SELECT d.kitchen_id, k.name AS kitchen_name, d.product_id, d.quantity
        FROM kitchen_demands d
        JOIN kitchens k ON k.id = d.kitchen_id
        JOIN products p ON p.id = d.product_id
        WHERE d.team_id = $1 AND d.period = $2 AND k.region = $3 AND p.category = $4
        ORDER BY k.name, d.kitchen_id
        "#,
    )
    .bind(team_id)
    .bind(period)
    .bind(region)
    .bind(category)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn upsert(
    conn: &mut PgConnection,
    team_id: i64,
    kitchen_id: i64,
    product_id: i64,
    period: &str,
    quantity: Decimal,
    now: i64,
) -> Result<(), BoxError> {
    sqlx::query(
        r#"
        INSERT INTO kitchen_demands (team_id, kitchen_id, product_id, period, quantity, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6)
        ON CONFLICT (kitchen_id, product_id, period)
        DO UPDATE SET quantity = EXCLUDED.quantity, updated_at = EXCLUDED.updated_at
        "#,
    )
    .bind(team_id)
    .bind(kitchen_id)
    .bind(product_id)
    .bind(period)
    .bind(quantity)
    .bind(now)
    .execute(conn)
    .await?;
    Ok(())
}
