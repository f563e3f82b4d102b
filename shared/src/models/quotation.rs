//! Quotation Model
//!
//! A quotation is one supplier's price list for a (period, region). Its items
//! may cover products of any category.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, ErrorCode};

/// Quotation workflow status
///
/// `pending → negotiation → approved`, with `rejected` reachable from any
/// non-terminal state. Negotiation may repeat.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum QuotationStatus {
    Pending,
    Negotiation,
    Approved,
    Rejected,
}

impl QuotationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Negotiation => "negotiation",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Approved | Self::Rejected)
    }

    pub fn can_transition_to(&self, next: QuotationStatus) -> bool {
        if self.is_terminal() {
            return false;
        }
        next != Self::Pending
    }

    /// Validate a transition, mapping terminal states to their own error codes
    pub fn check_transition(&self, next: QuotationStatus) -> Result<(), AppError> {
        if self.can_transition_to(next) {
            return Ok(());
        }
        let code = match self {
            Self::Approved => ErrorCode::QuotationAlreadyApproved,
            Self::Rejected => ErrorCode::QuotationRejected,
            _ => ErrorCode::InvalidStatusTransition,
        };
        Err(AppError::new(code)
            .with_detail("from", self.as_str())
            .with_detail("to", next.as_str()))
    }
}

impl std::fmt::Display for QuotationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for QuotationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "negotiation" => Ok(Self::Negotiation),
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            other => Err(format!("unknown quotation status: {other}")),
        }
    }
}

/// Quotation entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Quotation {
    pub id: i64,
    pub team_id: i64,
    pub supplier_id: i64,
    pub period: String,
    pub region: String,
    pub status: QuotationStatus,
    pub note: Option<String>,
    pub submitted_at: i64,
    pub updated_at: i64,
    pub negotiated_at: Option<i64>,
    pub approved_at: Option<i64>,
    pub approved_by: Option<String>,
    pub rejected_reason: Option<String>,
}

/// Quote line item
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct QuoteItem {
    pub id: i64,
    pub quotation_id: i64,
    pub product_id: i64,
    pub initial_price: Decimal,
    pub negotiated_price: Option<Decimal>,
    pub approved_price: Option<Decimal>,
    /// Overrides the product VAT rate when present
    pub vat_rate: Option<Decimal>,
    pub in_stock: bool,
    pub note: Option<String>,
}

impl QuoteItem {
    /// approved ?? negotiated ?? initial
    pub fn effective_price(&self) -> Decimal {
        self.approved_price
            .or(self.negotiated_price)
            .unwrap_or(self.initial_price)
    }
}

/// Quotation list entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuotationSummary {
    pub id: i64,
    pub supplier_id: i64,
    pub supplier_code: String,
    pub supplier_name: String,
    pub period: String,
    pub region: String,
    pub status: QuotationStatus,
    pub item_count: i64,
    pub submitted_at: i64,
    pub updated_at: i64,
}

/// Quotation with its items
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuotationDetail {
    #[serde(flatten)]
    pub quotation: Quotation,
    pub items: Vec<QuoteItem>,
}

/// Submit quotation payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuotationCreate {
    pub supplier_id: i64,
    pub period: String,
    pub region: String,
    pub note: Option<String>,
    pub items: Vec<QuoteItemInput>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuoteItemInput {
    pub product_id: i64,
    pub initial_price: Decimal,
    pub vat_rate: Option<Decimal>,
    #[serde(default = "default_in_stock")]
    pub in_stock: bool,
    pub note: Option<String>,
}

fn default_in_stock() -> bool {
    true
}

/// Negotiate payload: new prices for some or all items
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NegotiateRequest {
    pub items: Vec<NegotiatedPrice>,
    pub note: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NegotiatedPrice {
    pub item_id: i64,
    pub negotiated_price: Decimal,
}

/// Approve payload. Items without an override are approved at their
/// negotiated (or else initial) price.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApproveRequest {
    pub approved_by: String,
    #[serde(default)]
    pub items: Vec<ApprovedPrice>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApprovedPrice {
    pub item_id: i64,
    pub approved_price: Decimal,
}

/// Reject payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RejectRequest {
    pub reason: String,
}
