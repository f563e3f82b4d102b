//! Price comparison matrix engine
//!
//! Pure computation over inputs already loaded from the database:
//! [`MatrixInput`] in, `ComparisonMatrix` out. Loading lives in
//! `services::matrix`.
//!
//! The build runs in two phases. Rows (one per product) and columns (one per
//! supplier) are initialised first, then quote lines populate the cells.
//! Best prices, coverage, previous-period variance and the overview KPIs are
//! derived afterwards.

mod builder;
pub mod money;
mod overview;

use std::collections::HashMap;

use rust_decimal::Decimal;
use shared::models::{KitchenDemand, Product, QuotationStatus};
use shared::period::PeriodKey;

pub use builder::build;

/// A supplier column source: a supplier with its quotation for the period
/// and region.
#[derive(Debug, Clone)]
pub struct SupplierQuote {
    pub supplier_id: i64,
    pub code: String,
    pub name: String,
    pub quotation_id: i64,
    pub status: QuotationStatus,
    pub is_active: bool,
    pub deleted_at: Option<i64>,
}

impl SupplierQuote {
    pub fn is_available(&self) -> bool {
        self.is_active && self.deleted_at.is_none()
    }
}

/// One quote item joined with its quotation
#[derive(Debug, Clone)]
pub struct QuoteLine {
    pub item_id: i64,
    pub quotation_id: i64,
    pub supplier_id: i64,
    pub product_id: i64,
    pub status: QuotationStatus,
    pub initial_price: Decimal,
    pub negotiated_price: Option<Decimal>,
    pub approved_price: Option<Decimal>,
    /// Item override; falls back to the product rate
    pub vat_rate: Option<Decimal>,
    pub in_stock: bool,
}

impl QuoteLine {
    pub fn effective_price(&self) -> Decimal {
        self.approved_price
            .or(self.negotiated_price)
            .unwrap_or(self.initial_price)
    }
}

/// Lowest approved price per product in the resolved previous period
#[derive(Debug, Clone)]
pub struct PreviousPrices {
    pub period: PeriodKey,
    pub prices: HashMap<i64, Decimal>,
}

/// Everything the engine needs for one (period, region, category)
#[derive(Debug, Clone)]
pub struct MatrixInput {
    pub period: PeriodKey,
    pub region: String,
    pub category: String,
    /// Active products of the category, in display order
    pub products: Vec<Product>,
    /// Suppliers in display order (ties on best price go to the earlier
    /// column); unavailable ones are dropped by the builder
    pub suppliers: Vec<SupplierQuote>,
    pub demands: Vec<KitchenDemand>,
    pub lines: Vec<QuoteLine>,
    pub previous: Option<PreviousPrices>,
    pub generated_at: i64,
}
