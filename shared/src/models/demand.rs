//! Kitchen demand quantities

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Demand of one kitchen for one product in a period
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct KitchenDemand {
    pub kitchen_id: i64,
    pub kitchen_name: String,
    pub product_id: i64,
    pub quantity: Decimal,
}

/// Upsert demand payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DemandUpsertRequest {
    pub period: String,
    pub items: Vec<DemandInput>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DemandInput {
    pub kitchen_id: i64,
    pub product_id: i64,
    pub quantity: Decimal,
}
