//! Quotation and quote item database operations

use rust_decimal::Decimal;
use shared::models::{Quotation, QuotationStatus, QuotationSummary, QuoteItem, QuoteItemInput};
use sqlx::{PgConnection, PgExecutor, PgPool};

use super::BoxError;

/// Decode a stored status string
pub(crate) fn parse_status(raw: &str) -> QuotationStatus {
    raw.parse().unwrap_or_else(|e| {
        tracing::warn!(status = %raw, error = %e, "Invalid quotation status, defaulting to pending");
        QuotationStatus::Pending
    })
}

const QUOTATION_COLUMNS: &str = "id, team_id, supplier_id, period, region, status, note, \
    submitted_at, updated_at, negotiated_at, approved_at, approved_by, rejected_reason";

#[derive(sqlx::FromRow)]
struct QuotationRow {
    id: i64,
    team_id: i64,
    supplier_id: i64,
    period: String,
    region: String,
    status: String,
    note: Option<String>,
    submitted_at: i64,
    updated_at: i64,
    negotiated_at: Option<i64>,
    approved_at: Option<i64>,
    approved_by: Option<String>,
    rejected_reason: Option<String>,
}

impl QuotationRow {
    fn into_quotation(self) -> Quotation {
        Quotation {
            status: parse_status(&self.status),
            id: self.id,
            team_id: self.team_id,
            supplier_id: self.supplier_id,
            period: self.period,
            region: self.region,
            note: self.note,
            submitted_at: self.submitted_at,
            updated_at: self.updated_at,
            negotiated_at: self.negotiated_at,
            approved_at: self.approved_at,
            approved_by: self.approved_by,
            rejected_reason: self.rejected_reason,
        }
    }
}

// ── Reads ──

pub async fn find<'e>(
    db: impl PgExecutor<'e>,
    team_id: i64,
    quotation_id: i64,
) -> Result<Option<Quotation>, BoxError> {
    let sql = format!("SELECT {QUOTATION_COLUMNS} FROM quotations WHERE team_id = $1 AND id = $2");
    let row: Option<QuotationRow> = sqlx::query_as(&sql)
        .bind(team_id)
        .bind(quotation_id)
        .fetch_optional(db)
        .await?;
    Ok(row.map(QuotationRow::into_quotation))
}

/// Load a quotation and lock its row for the rest of the transaction
pub async fn find_for_update(
    conn: &mut PgConnection,
    team_id: i64,
    quotation_id: i64,
) -> Result<Option<Quotation>, BoxError> {
    let sql = format!(
        "SELECT {QUOTATION_COLUMNS} FROM quotations WHERE team_id = $1 AND id = $2 FOR UPDATE"
    );
    let row: Option<QuotationRow> = sqlx::query_as(&sql)
        .bind(team_id)
        .bind(quotation_id)
        .fetch_optional(conn)
        .await?;
    Ok(row.map(QuotationRow::into_quotation))
}

pub async fn list_items<'e>(
    db: impl PgExecutor<'e>,
    quotation_id: i64,
) -> Result<Vec<QuoteItem>, BoxError> {
    let rows: Vec<QuoteItem> = sqlx::query_as(
        r#"
        SELECT id, quotation_id, product_id, initial_price, negotiated_price,
               approved_price, vat_rate, in_stock, note
        FROM quote_items
        WHERE quotation_id = $1
        ORDER BY id
        "#,
    )
    .bind(quotation_id)
    .fetch_all(db)
    .await?;
    Ok(rows)
}

/// Filters for the quotation list
#[derive(Debug, Default)]
pub struct QuotationFilter<'a> {
    pub period: Option<&'a str>,
    pub region: Option<&'a str>,
    pub status: Option<QuotationStatus>,
    pub supplier_id: Option<i64>,
}

#[derive(sqlx::FromRow)]
struct QuotationSummaryRow {
    id: i64,
    supplier_id: i64,
    supplier_code: String,
    supplier_name: String,
    period: String,
    region: String,
    status: String,
    item_count: i64,
    submitted_at: i64,
    updated_at: i64,
}

pub async fn list(
    pool: &PgPool,
    team_id: i64,
    filter: &QuotationFilter<'_>,
    limit: i64,
    offset: i64,
) -> Result<Vec<QuotationSummary>, BoxError> {
    let rows: Vec<QuotationSummaryRow> = sqlx::query_as(
        r#"
        SELECT q.id, q.supplier_id, s.code AS supplier_code, s.name AS supplier_name,
               q.period, q.region, q.status,
               (SELECT COUNT(*) FROM quote_items i WHERE i.quotation_id = q.id) AS item_count,
               q.submitted_at, q.updated_at
        FROM quotations q
        JOIN suppliers s ON s.id = q.supplier_id
        WHERE q.team_id = $1
            AND ($2::TEXT IS NULL OR q.period = $2)
            AND ($3::TEXT IS NULL OR q.region = $3)
            AND ($4::TEXT IS NULL OR q.status = $4)
            AND ($5::BIGINT IS NULL OR q.supplier_id = $5)
        ORDER BY q.period DESC, s.code, q.id
        LIMIT $6 OFFSET $7
        "#,
    )
    .bind(team_id)
    .bind(filter.period)
    .bind(filter.region)
    .bind(filter.status.map(|s| s.as_str()))
    .bind(filter.supplier_id)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|r| QuotationSummary {
            status: parse_status(&r.status),
            id: r.id,
            supplier_id: r.supplier_id,
            supplier_code: r.supplier_code,
            supplier_name: r.supplier_name,
            period: r.period,
            region: r.region,
            item_count: r.item_count,
            submitted_at: r.submitted_at,
            updated_at: r.updated_at,
        })
        .collect())
}

// ── Writes (transactional) ──

pub async fn exists_for_supplier(
    conn: &mut PgConnection,
    team_id: i64,
    supplier_id: i64,
    period: &str,
    region: &str,
) -> Result<bool, BoxError> {
    let row: Option<(i64,)> = sqlx::query_as(
        "SELECT id FROM quotations WHERE team_id = $1 AND supplier_id = $2 AND period = $3 AND region = $4",
    )
    .bind(team_id)
    .bind(supplier_id)
    .bind(period)
    .bind(region)
    .fetch_optional(conn)
    .await?;
    Ok(row.is_some())
}

pub async fn insert(
    conn: &mut PgConnection,
    team_id: i64,
    supplier_id: i64,
    period: &str,
    region: &str,
    note: Option<&str>,
    now: i64,
) -> Result<i64, BoxError> {
    let (id,): (i64,) = sqlx::query_as(
        r#"
        INSERT INTO quotations (team_id, supplier_id, period, region, status, note, submitted_at, updated_at)
        VALUES ($1, $2, $3, $4, 'pending', $5, $6, $6)
        RETURNING id
        "#,
    )
    .bind(team_id)
    .bind(supplier_id)
    .bind(period)
    .bind(region)
    .bind(note)
    .bind(now)
    .fetch_one(conn)
    .await?;
    Ok(id)
}

pub async fn insert_item(
    conn: &mut PgConnection,
    quotation_id: i64,
    item: &QuoteItemInput,
) -> Result<i64, BoxError> {
    let (id,): (i64,) = sqlx::query_as(
        r#"
        INSERT INTO quote_items (quotation_id, product_id, initial_price, vat_rate, in_stock, note)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING id
        "#,
    )
    .bind(quotation_id)
    .bind(item.product_id)
    .bind(item.initial_price)
    .bind(item.vat_rate)
    .bind(item.in_stock)
    .bind(&item.note)
    .fetch_one(conn)
    .await?;
    Ok(id)
}

pub async fn set_negotiated_price(
    conn: &mut PgConnection,
    item_id: i64,
    price: Decimal,
) -> Result<(), BoxError> {
    sqlx::query("UPDATE quote_items SET negotiated_price = $1 WHERE id = $2")
        .bind(price)
        .bind(item_id)
        .execute(conn)
        .await?;
    Ok(())
}

pub async fn set_approved_price(
    conn: &mut PgConnection,
    item_id: i64,
    price: Decimal,
) -> Result<(), BoxError> {
    sqlx::query("UPDATE quote_items SET approved_price = $1 WHERE id = $2")
        .bind(price)
        .bind(item_id)
        .execute(conn)
        .await?;
    Ok(())
}

pub async fn mark_negotiation(
    conn: &mut PgConnection,
    quotation_id: i64,
    note: Option<&str>,
    now: i64,
) -> Result<(), BoxError> {
    sqlx::query(
        r#"
        UPDATE quotations
        SET status = 'negotiation', negotiated_at = $1, updated_at = $1,
            note = COALESCE($2, note)
        WHERE id = $3
        "#,
    )
    .bind(now)
    .bind(note)
    .bind(quotation_id)
    .execute(conn)
    .await?;
    Ok(())
}

pub async fn mark_approved(
    conn: &mut PgConnection,
    quotation_id: i64,
    approved_by: &str,
    now: i64,
) -> Result<(), BoxError> {
    sqlx::query(
        r#"
        UPDATE quotations
        SET status = 'approved', approved_at = $1, approved_by = $2, updated_at = $1
        WHERE id = $3
        "#,
    )
    .bind(now)
    .bind(approved_by)
    .bind(quotation_id)
    .execute(conn)
    .await?;
    Ok(())
}

pub async fn mark_rejected(
    conn: &mut PgConnection,
    quotation_id: i64,
    reason: &str,
    now: i64,
) -> Result<(), BoxError> {
    sqlx::query(
        r#"
        UPDATE quotations
        SET status = 'rejected', rejected_reason = $1, updated_at = $2
        WHERE id = $3
        "#,
    )
    .bind(reason)
    .bind(now)
    .bind(quotation_id)
    .execute(conn)
    .await?;
    Ok(())
}
