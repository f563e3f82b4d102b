//! Product Model

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Product entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Product {
    pub id: i64,
    pub team_id: i64,
    pub code: String,
    pub name: String,
    /// Purchasing unit (kg, box, litre, ...)
    pub unit: String,
    pub category: String,
    /// Quantity used when no kitchen demand is recorded for a period
    pub base_quantity: Decimal,
    /// VAT rate in percentage (e.g., 8 = 8%)
    pub vat_rate: Decimal,
    pub is_active: bool,
    pub created_at: i64,
}
