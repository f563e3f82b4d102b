//! Price history (approved prices, append-only)

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One approved price, written when a quotation is approved
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct PriceHistoryEntry {
    pub id: i64,
    pub team_id: i64,
    pub product_id: i64,
    pub supplier_id: i64,
    pub quotation_id: i64,
    pub quote_item_id: i64,
    pub period: String,
    pub region: String,
    /// Approved price before VAT
    pub price: Decimal,
    pub vat_rate: Decimal,
    pub price_with_vat: Decimal,
    pub recorded_at: i64,
    pub recorded_by: Option<String>,
}
