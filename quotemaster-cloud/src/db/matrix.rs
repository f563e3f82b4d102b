//! Matrix source queries

use rust_decimal::Decimal;
use sqlx::PgPool;

use crate::matrix::{QuoteLine, SupplierQuote};

use super::BoxError;
use super::quotations::parse_status;

#[derive(sqlx::FromRow)]
struct SupplierQuoteRow {
    supplier_id: i64,
    code: String,
    name: String,
    quotation_id: i64,
    status: String,
    is_active: bool,
    deleted_at: Option<i64>,
}

/// Suppliers holding a non-rejected quotation for the period and region,
/// ordered by supplier code. Availability is filtered by the matrix builder.
pub async fn list_supplier_quotes(
    pool: &PgPool,
    team_id: i64,
    period: &str,
    region: &str,
) -> Result<Vec<SupplierQuote>, BoxError> {
    let rows: Vec<SupplierQuoteRow> = sqlx::query_as(
        r#"
        SELECT s.id AS supplier_id, s.code, s.name, q.id AS quotation_id, q.status,
               s.is_active, s.deleted_at
        FROM quotations q
        JOIN suppliers s ON s.id = q.supplier_id
        WHERE q.team_id = $1 AND q.period = $2 AND q.region = $3
            AND q.status <> 'rejected'
        ORDER BY s.code, s.id
        "#,
    )
    .bind(team_id)
    .bind(period)
    .bind(region)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|r| SupplierQuote {
            status: parse_status(&r.status),
            supplier_id: r.supplier_id,
            code: r.code,
            name: r.name,
            quotation_id: r.quotation_id,
            is_active: r.is_active,
            deleted_at: r.deleted_at,
        })
        .collect())
}

#[derive(sqlx::FromRow)]
struct QuoteLineRow {
    item_id: i64,
    quotation_id: i64,
    supplier_id: i64,
    product_id: i64,
    status: String,
    initial_price: Decimal,
    negotiated_price: Option<Decimal>,
    approved_price: Option<Decimal>,
    vat_rate: Option<Decimal>,
    in_stock: bool,
}

/// Quote items of non-rejected quotations for products of the category
pub async fn list_quote_lines(
    pool: &PgPool,
    team_id: i64,
    period: &str,
    region: &str,
    category: &str,
) -> Result<Vec<QuoteLine>, BoxError> {
    let rows: Vec<QuoteLineRow> = sqlx::query_as(
        r#"
        SELECT i.id AS item_id, q.id AS quotation_id, q.supplier_id, i.product_id, q.status,
               i.initial_price, i.negotiated_price, i.approved_price, i.vat_rate, i.in_stock
        FROM quote_items i
        JOIN quotations q ON q.id = i.quotation_id
        JOIN products p ON p.id = i.product_id
        WHERE q.team_id = $1 AND q.period = $2 AND q.region = $3 AND p.category = $4
            AND q.status <> 'rejected'
        ORDER BY i.id
        "#,
    )
    .bind(team_id)
    .bind(period)
    .bind(region)
    .bind(category)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|r| QuoteLine {
            status: parse_status(&r.status),
            item_id: r.item_id,
            quotation_id: r.quotation_id,
            supplier_id: r.supplier_id,
            product_id: r.product_id,
            initial_price: r.initial_price,
            negotiated_price: r.negotiated_price,
            approved_price: r.approved_price,
            vat_rate: r.vat_rate,
            in_stock: r.in_stock,
        })
        .collect())
}
