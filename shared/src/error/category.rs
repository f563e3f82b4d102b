//! Error category classification

use super::codes::ErrorCode;
use serde::{Deserialize, Serialize};

/// Error category classification based on error code ranges
///
/// Categories are determined by the leading digit of the error code:
/// - 0xxx: General errors
/// - 1xxx: Team errors
/// - 2xxx: Supplier errors
/// - 3xxx: Product errors
/// - 4xxx: Quotation errors
/// - 5xxx: Pricing errors
/// - 9xxx: System errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// General errors (0xxx)
    General,
    /// Team errors (1xxx)
    Team,
    /// Supplier errors (2xxx)
    Supplier,
    /// Product errors (3xxx)
    Product,
    /// Quotation errors (4xxx)
    Quotation,
    /// Pricing errors (5xxx)
    Pricing,
    /// System errors (9xxx and anything unassigned)
    System,
}

impl ErrorCategory {
    /// Determine category from error code value
    pub fn from_code(code: u16) -> Self {
        match code {
            0..1000 => Self::General,
            1000..2000 => Self::Team,
            2000..3000 => Self::Supplier,
            3000..4000 => Self::Product,
            4000..5000 => Self::Quotation,
            5000..6000 => Self::Pricing,
            _ => Self::System,
        }
    }

    /// Get the string name for this category
    pub fn name(&self) -> &'static str {
        match self {
            Self::General => "general",
            Self::Team => "team",
            Self::Supplier => "supplier",
            Self::Product => "product",
            Self::Quotation => "quotation",
            Self::Pricing => "pricing",
            Self::System => "system",
        }
    }
}

impl ErrorCode {
    /// Get the category for this error code
    pub fn category(&self) -> ErrorCategory {
        ErrorCategory::from_code(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_from_code() {
        assert_eq!(ErrorCategory::from_code(0), ErrorCategory::General);
        assert_eq!(ErrorCategory::from_code(999), ErrorCategory::General);
        assert_eq!(ErrorCategory::from_code(1001), ErrorCategory::Team);
        assert_eq!(ErrorCategory::from_code(2001), ErrorCategory::Supplier);
        assert_eq!(ErrorCategory::from_code(3001), ErrorCategory::Product);
        assert_eq!(ErrorCategory::from_code(4001), ErrorCategory::Quotation);
        assert_eq!(ErrorCategory::from_code(5101), ErrorCategory::Pricing);
        assert_eq!(ErrorCategory::from_code(7001), ErrorCategory::System);
        assert_eq!(ErrorCategory::from_code(9001), ErrorCategory::System);
    }

    #[test]
    fn test_error_code_category() {
        assert_eq!(ErrorCode::Success.category(), ErrorCategory::General);
        assert_eq!(ErrorCode::TeamNotFound.category(), ErrorCategory::Team);
        assert_eq!(
            ErrorCode::SupplierInactive.category(),
            ErrorCategory::Supplier
        );
        assert_eq!(
            ErrorCode::QuotationAlreadyApproved.category(),
            ErrorCategory::Quotation
        );
        assert_eq!(ErrorCode::InvalidPeriod.category(), ErrorCategory::Pricing);
        assert_eq!(ErrorCode::DatabaseError.category(), ErrorCategory::System);
    }

    #[test]
    fn test_category_serde() {
        let json = serde_json::to_string(&ErrorCategory::Quotation).unwrap();
        assert_eq!(json, "\"quotation\"");

        let category: ErrorCategory = serde_json::from_str("\"pricing\"").unwrap();
        assert_eq!(category, ErrorCategory::Pricing);
    }
}
