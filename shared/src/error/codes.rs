//! Unified error codes for QuoteMaster
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Team errors
//! - 2xxx: Supplier errors
//! - 3xxx: Product errors
//! - 4xxx: Quotation errors
//! - 5xxx: Pricing / period errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values for efficient serialization
/// and cross-language compatibility with the web console.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,
    /// Invalid request
    InvalidRequest = 5,
    /// Invalid format
    InvalidFormat = 6,
    /// Required field missing
    RequiredField = 7,
    /// Value out of range
    ValueOutOfRange = 8,

    // ==================== 1xxx: Team ====================
    /// Team not found
    TeamNotFound = 1001,
    /// Kitchen not found
    KitchenNotFound = 1101,

    // ==================== 2xxx: Supplier ====================
    /// Supplier not found
    SupplierNotFound = 2001,
    /// Supplier is inactive or deleted
    SupplierInactive = 2002,

    // ==================== 3xxx: Product ====================
    /// Product not found
    ProductNotFound = 3001,
    /// Product is inactive
    ProductInactive = 3002,

    // ==================== 4xxx: Quotation ====================
    /// Quotation not found
    QuotationNotFound = 4001,
    /// Quotation has already been approved
    QuotationAlreadyApproved = 4002,
    /// Quotation has been rejected
    QuotationRejected = 4003,
    /// Status transition not allowed
    InvalidStatusTransition = 4004,
    /// Quotation item not found
    QuotationItemNotFound = 4005,
    /// Quotation for supplier/period/region already exists
    QuotationExists = 4006,
    /// Quotation has no items
    QuotationEmpty = 4007,
    /// Duplicate product in quotation
    DuplicateQuotationItem = 4008,

    // ==================== 5xxx: Pricing ====================
    /// Price must be positive
    InvalidPrice = 5001,
    /// Quantity must be non-negative
    InvalidQuantity = 5002,
    /// VAT rate out of range
    InvalidVatRate = 5003,
    /// Period key is malformed
    InvalidPeriod = 5101,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Database error
    DatabaseError = 9002,
    /// Operation timeout
    TimeoutError = 9004,
    /// Configuration error
    ConfigError = 9005,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Check if this is a success code
    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, ErrorCode::Success)
    }

    /// Get the developer-facing English message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::Unknown => "An unknown error occurred",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::AlreadyExists => "Resource already exists",
            ErrorCode::InvalidRequest => "Invalid request",
            ErrorCode::InvalidFormat => "Invalid format",
            ErrorCode::RequiredField => "Required field is missing",
            ErrorCode::ValueOutOfRange => "Value is out of range",

            // Team
            ErrorCode::TeamNotFound => "Team not found",
            ErrorCode::KitchenNotFound => "Kitchen not found",

            // Supplier
            ErrorCode::SupplierNotFound => "Supplier not found",
            ErrorCode::SupplierInactive => "Supplier is inactive",

            // Product
            ErrorCode::ProductNotFound => "Product not found",
            ErrorCode::ProductInactive => "Product is inactive",

            // Quotation
            ErrorCode::QuotationNotFound => "Quotation not found",
            ErrorCode::QuotationAlreadyApproved => "Quotation has already been approved",
            ErrorCode::QuotationRejected => "Quotation has been rejected",
            ErrorCode::InvalidStatusTransition => "Quotation status transition not allowed",
            ErrorCode::QuotationItemNotFound => "Quotation item not found",
            ErrorCode::QuotationExists => {
                "A quotation for this supplier, period and region already exists"
            }
            ErrorCode::QuotationEmpty => "Quotation has no items",
            ErrorCode::DuplicateQuotationItem => "Item appears more than once in the request",

            // Pricing
            ErrorCode::InvalidPrice => "Price must be a positive amount",
            ErrorCode::InvalidQuantity => "Quantity must not be negative",
            ErrorCode::InvalidVatRate => "VAT rate must be between 0 and 100",
            ErrorCode::InvalidPeriod => "Period must be formatted as YYYY-MM-NN",

            // System
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::DatabaseError => "Database error",
            ErrorCode::TimeoutError => "Operation timed out",
            ErrorCode::ConfigError => "Configuration error",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error when converting from an invalid u16 to ErrorCode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            0 => Ok(ErrorCode::Success),
            1 => Ok(ErrorCode::Unknown),
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            4 => Ok(ErrorCode::AlreadyExists),
            5 => Ok(ErrorCode::InvalidRequest),
            6 => Ok(ErrorCode::InvalidFormat),
            7 => Ok(ErrorCode::RequiredField),
            8 => Ok(ErrorCode::ValueOutOfRange),

            // Team
            1001 => Ok(ErrorCode::TeamNotFound),
            1101 => Ok(ErrorCode::KitchenNotFound),

            // Supplier
            2001 => Ok(ErrorCode::SupplierNotFound),
            2002 => Ok(ErrorCode::SupplierInactive),

            // Product
            3001 => Ok(ErrorCode::ProductNotFound),
            3002 => Ok(ErrorCode::ProductInactive),

            // Quotation
            4001 => Ok(ErrorCode::QuotationNotFound),
            4002 => Ok(ErrorCode::QuotationAlreadyApproved),
            4003 => Ok(ErrorCode::QuotationRejected),
            4004 => Ok(ErrorCode::InvalidStatusTransition),
            4005 => Ok(ErrorCode::QuotationItemNotFound),
            4006 => Ok(ErrorCode::QuotationExists),
            4007 => Ok(ErrorCode::QuotationEmpty),
            4008 => Ok(ErrorCode::DuplicateQuotationItem),

            // Pricing
            5001 => Ok(ErrorCode::InvalidPrice),
            5002 => Ok(ErrorCode::InvalidQuantity),
            5003 => Ok(ErrorCode::InvalidVatRate),
            5101 => Ok(ErrorCode::InvalidPeriod),

            // System
            9001 => Ok(ErrorCode::InternalError),
            9002 => Ok(ErrorCode::DatabaseError),
            9004 => Ok(ErrorCode::TimeoutError),
            9005 => Ok(ErrorCode::ConfigError),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
