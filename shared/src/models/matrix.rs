//! Price comparison matrix (product × supplier)

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::quotation::QuotationStatus;

/// Matrix request parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatrixQuery {
    pub period: String,
    pub region: String,
    pub category: String,
}

/// Comparison matrix for one (period, region, category)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonMatrix {
    pub period: String,
    pub region: String,
    pub category: String,
    pub generated_at: i64,
    pub suppliers: Vec<SupplierColumn>,
    pub rows: Vec<ProductRow>,
    pub overview: MatrixOverview,
    pub previous_period: Option<String>,
    pub has_previous_data: bool,
}

/// One supplier column with its coverage counters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SupplierColumn {
    pub supplier_id: i64,
    pub code: String,
    pub name: String,
    pub quotation_id: i64,
    pub status: QuotationStatus,
    /// Products of the category this supplier quoted
    pub quoted: u32,
    pub total_products: u32,
    pub coverage_percent: Decimal,
    /// Rows where this supplier holds the best price
    pub best_count: u32,
    /// Σ price_with_vat × quantity over quoted rows
    pub quoted_total: Decimal,
}

/// Demand of one kitchen contributing to a row quantity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KitchenQuantity {
    pub kitchen_id: i64,
    pub kitchen_name: String,
    pub quantity: Decimal,
}

/// One product row
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductRow {
    pub product_id: i64,
    pub code: String,
    pub name: String,
    pub unit: String,
    pub base_quantity: Decimal,
    /// Σ kitchen demand, `None` when no kitchen recorded demand
    pub demand_quantity: Option<Decimal>,
    pub demand_by_kitchen: Vec<KitchenQuantity>,
    /// demand_quantity ?? base_quantity
    pub quantity: Decimal,
    /// Lowest approved price (with VAT) in the previous period
    pub previous_price: Option<Decimal>,
    /// Keyed by supplier id
    pub cells: BTreeMap<i64, MatrixCell>,
    pub best_supplier_id: Option<i64>,
    pub best_price: Option<Decimal>,
    pub quoted_count: u32,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    pub avg_price: Option<Decimal>,
    /// (max - min) / min × 100
    pub spread_percent: Option<Decimal>,
}

/// One supplier's price for one product
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatrixCell {
    pub supplier_id: i64,
    pub quotation_id: i64,
    pub item_id: i64,
    pub status: QuotationStatus,
    pub initial_price: Decimal,
    pub negotiated_price: Option<Decimal>,
    pub approved_price: Option<Decimal>,
    /// approved ?? negotiated ?? initial, before VAT
    pub effective_price: Decimal,
    pub vat_rate: Decimal,
    pub price_with_vat: Decimal,
    pub in_stock: bool,
    pub is_best: bool,
    /// price_with_vat - previous_price
    pub variance_amount: Option<Decimal>,
    pub variance_percent: Option<Decimal>,
}

/// Difference of a current total against a reference total
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Delta {
    pub reference: Decimal,
    /// current - reference
    pub amount: Decimal,
    /// amount / reference × 100, `None` when reference is zero
    pub percent: Option<Decimal>,
}

/// Aggregate KPIs over the whole matrix
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatrixOverview {
    pub product_count: u32,
    pub supplier_count: u32,
    /// Rows with a best price
    pub quoted_products: u32,
    pub uncovered_products: u32,
    pub coverage_percent: Decimal,
    /// Σ best_price × quantity
    pub current_total: Decimal,
    /// Σ best cell's initial price with VAT × quantity
    pub initial_total: Decimal,
    /// Σ best_price × base_quantity
    pub base_total: Decimal,
    /// Σ previous_price × quantity over rows with both prices
    pub previous_total: Option<Decimal>,
    pub vs_initial: Delta,
    pub vs_base: Delta,
    pub vs_previous: Option<Delta>,
}
