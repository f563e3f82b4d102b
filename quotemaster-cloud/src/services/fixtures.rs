//! Seed rows for database-backed service tests

use rust_decimal::Decimal;
use shared::models::{ApproveRequest, QuotationCreate, QuoteItemInput};
use sqlx::PgPool;

use super::workflow;

pub fn d(s: &str) -> Decimal {
    s.parse().unwrap()
}

pub async fn team(pool: &PgPool) -> i64 {
    sqlx::query_scalar("INSERT INTO teams (name, created_at) VALUES ('Central kitchen', 0) RETURNING id")
        .fetch_one(pool)
        .await
        .unwrap()
}

pub async fn supplier(pool: &PgPool, team_id: i64, code: &str) -> i64 {
    sqlx::query_scalar(
        "INSERT INTO suppliers (team_id, code, name, created_at) VALUES ($1, $2, $3, 0) RETURNING id",
    )
    .bind(team_id)
    .bind(code)
    .bind(format!("Supplier {code}"))
    .fetch_one(pool)
    .await
    .unwrap()
}

pub async fn product(pool: &PgPool, team_id: i64, code: &str, base: &str, vat: &str) -> i64 {
    sqlx::query_scalar(
        r#"
        INSERT INTO products (team_id, code, name, unit, category, base_quantity, vat_rate, created_at)
        VALUES ($1, $2, $3, 'kg', 'veg', $4, $5, 0)
        RETURNING id
        "#,
    )
    .bind(team_id)
    .bind(code)
    .bind(format!("Product {code}"))
    .bind(d(base))
    .bind(d(vat))
    .fetch_one(pool)
    .await
    .unwrap()
}

/// Submission for region `north` pricing each `(product_id, price)`
pub fn quotation(supplier_id: i64, period: &str, prices: &[(i64, &str)]) -> QuotationCreate {
    QuotationCreate {
        supplier_id,
        period: period.to_string(),
        region: "north".to_string(),
        note: None,
        items: prices
            .iter()
            .map(|&(product_id, price)| QuoteItemInput {
                product_id,
                initial_price: d(price),
                vat_rate: None,
                in_stock: true,
                note: None,
            })
            .collect(),
    }
}

/// Submit and approve at the initial prices, returning the quotation id
pub async fn approved_quotation(
    pool: &PgPool,
    team_id: i64,
    supplier_id: i64,
    period: &str,
    prices: &[(i64, &str)],
) -> i64 {
    let detail = workflow::submit_quotation(pool, team_id, quotation(supplier_id, period, prices))
        .await
        .unwrap();
    let approve = ApproveRequest {
        approved_by: "buyer@team".to_string(),
        items: vec![],
    };
    workflow::approve_quotation(pool, team_id, detail.quotation.id, approve)
        .await
        .unwrap();
    detail.quotation.id
}
