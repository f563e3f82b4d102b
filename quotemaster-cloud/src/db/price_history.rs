//! Price history (append-only approved prices)

use rust_decimal::Decimal;
use shared::models::PriceHistoryEntry;
use sqlx::{PgConnection, PgPool};

use super::BoxError;

/// A price history row to append on approval
#[derive(Debug, Clone)]
pub struct NewPriceHistory<'a> {
    pub team_id: i64,
    pub product_id: i64,
    pub supplier_id: i64,
    pub quotation_id: i64,
    pub quote_item_id: i64,
    pub period: &'a str,
    pub region: &'a str,
    pub price: Decimal,
    pub vat_rate: Decimal,
    pub price_with_vat: Decimal,
    pub recorded_at: i64,
    pub recorded_by: Option<&'a str>,
}

pub async fn insert(conn: &mut PgConnection, entry: &NewPriceHistory<'_>) -> Result<(), BoxError> {
    sqlx::query(
        r#"
        INSERT INTO price_history (
            team_id, product_id, supplier_id, quotation_id, quote_item_id,
            period, region, price, vat_rate, price_with_vat, recorded_at, recorded_by
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
        "#,
    )
    .bind(entry.team_id)
    .bind(entry.product_id)
    .bind(entry.supplier_id)
    .bind(entry.quotation_id)
    .bind(entry.quote_item_id)
    .bind(entry.period)
    .bind(entry.region)
    .bind(entry.price)
    .bind(entry.vat_rate)
    .bind(entry.price_with_vat)
    .bind(entry.recorded_at)
    .bind(entry.recorded_by)
    .execute(conn)
    .await?;
    Ok(())
}

/// History of one product, newest first
pub async fn list_for_product(
    pool: &PgPool,
    team_id: i64,
    product_id: i64,
    region: Option<&str>,
    limit: i64,
) -> Result<Vec<PriceHistoryEntry>, BoxError> {
    let rows: Vec<PriceHistoryEntry> = sqlx::query_as(
        r#"
        SELECT id, team_id, product_id, supplier_id, quotation_id, quote_item_id,
               period, region, price, vat_rate, price_with_vat, recorded_at, recorded_by
        FROM price_history
        WHERE team_id = $1 AND product_id = $2
            AND ($3::TEXT IS NULL OR region = $3)
        ORDER BY period DESC, recorded_at DESC, id DESC
        LIMIT $4
        "#,
    )
    .bind(team_id)
    .bind(product_id)
    .bind(region)
    .bind(limit)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Distinct periods in `(floor, before)` holding history for products of
/// the category
pub async fn periods_with_history(
    pool: &PgPool,
    team_id: i64,
    region: &str,
    category: &str,
    floor: &str,
    before: &str,
) -> Result<Vec<String>, BoxError> {
    let rows: Vec<(String,)> = sqlx::query_as(
        r#"
        SELECT DISTINCT h.period
        FROM price_history h
        JOIN products p ON p.id = h.product_id
        WHERE h.team_id = $1 AND h.region = $2 AND p.category = $3
            AND h.period > $4 AND h.period < $5
        ORDER BY h.period DESC
        "#,
    )
    .bind(team_id)
    .bind(region)
    .bind(category)
    .bind(floor)
    .bind(before)
    .fetch_all(pool)
    .await?;
    Ok(rows.into_iter().map(|r| r.0).collect())
}

/// Lowest price with VAT per product of the category in one period
pub async fn lowest_prices(
    pool: &PgPool,
    team_id: i64,
    region: &str,
    category: &str,
    period: &str,
) -> Result<Vec<(i64, Decimal)>, BoxError> {
    let rows: Vec<(i64, Decimal)> = sqlx::query_as(
        r#"
        SELECT h.product_id, MIN(h.price_with_vat)
        FROM price_history h
        JOIN products p ON p.id = h.product_id
        WHERE h.team_id = $1 AND h.region = $2 AND p.category = $3 AND h.period = $4
        GROUP BY h.product_id
        "#,
    )
    .bind(team_id)
    .bind(region)
    .bind(category)
    .bind(period)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}
