//! Product and supplier reads

use shared::models::{Product, Supplier};
use sqlx::{PgExecutor, PgPool};

use super::BoxError;

const PRODUCT_COLUMNS: &str = "id, team_id, code, name, unit, category, base_quantity, vat_rate, is_active, created_at";

/// Active products of a category, ordered by code
pub async fn list_active_products(
    pool: &PgPool,
    team_id: i64,
    category: &str,
) -> Result<Vec<Product>, BoxError> {
    let sql = format!(
        "SELECT {PRODUCT_COLUMNS} FROM products \
         WHERE team_id = $1 AND category = $2 AND is_active = TRUE \
         ORDER BY code, id"
    );
    let rows: Vec<Product> = sqlx::query_as(&sql)
        .bind(team_id)
        .bind(category)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

/// Products of the team with the given ids (active or not)
pub async fn find_products<'e>(
    db: impl PgExecutor<'e>,
    team_id: i64,
    product_ids: &[i64],
) -> Result<Vec<Product>, BoxError> {
    let sql = format!(
        "SELECT {PRODUCT_COLUMNS} FROM products WHERE team_id = $1 AND id = ANY($2)"
    );
    let rows: Vec<Product> = sqlx::query_as(&sql)
        .bind(team_id)
        .bind(product_ids)
        .fetch_all(db)
        .await?;
    Ok(rows)
}

pub async fn find_product(
    pool: &PgPool,
    team_id: i64,
    product_id: i64,
) -> Result<Option<Product>, BoxError> {
    let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE team_id = $1 AND id = $2");
    let row: Option<Product> = sqlx::query_as(&sql)
        .bind(team_id)
        .bind(product_id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn find_supplier<'e>(
    db: impl PgExecutor<'e>,
    team_id: i64,
    supplier_id: i64,
) -> Result<Option<Supplier>, BoxError> {
    let row: Option<Supplier> = sqlx::query_as(
        r#"
        SELECT id, team_id, code, name, is_active, deleted_at, created_at
        FROM suppliers
        WHERE team_id = $1 AND id = $2
        "#,
    )
    .bind(team_id)
    .bind(supplier_id)
    .fetch_optional(db)
    .await?;
    Ok(row)
}
