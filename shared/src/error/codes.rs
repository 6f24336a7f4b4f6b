//! Unified error codes for the order server
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 4xxx: Order / checkout errors
//! - 5xxx: Discount errors (coupon, cashback)
//! - 6xxx: Product / catalog errors
//! - 8xxx: Customer errors
//! - 9xxx: System errors

use http::StatusCode;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values for efficient serialization
/// and cross-language compatibility (Rust, TypeScript, etc.)
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

    // ==================== 4xxx: Order / Checkout ====================
    /// Order not found
    OrderNotFound = 4001,
    /// Referenced catalog data missing (product or option id unknown)
    CatalogIntegrity = 4002,
    /// Variant group selection outside rule bounds
    StructuralValidation = 4003,
    /// Client-claimed price disagrees with the server-computed value
    PriceMismatch = 4004,
    /// Uniqueness conflict at commit time (retry with fresh identifiers)
    PersistenceConflict = 4005,

    // ==================== 5xxx: Discount ====================
    /// Coupon code unknown, inactive or expired
    CouponInvalid = 5001,
    /// Coupon usage cap reached
    CouponExhausted = 5002,
    /// Coupon applied at the wrong scope (product vs order level)
    CouponScope = 5003,
    /// Requested cashback exceeds balance or payable amount
    CashbackInsufficient = 5004,

    // ==================== 6xxx: Product ====================
    /// Product not found
    ProductNotFound = 6001,
    /// Variant option not found
    VariantOptionNotFound = 6002,

    // ==================== 8xxx: Customer ====================
    /// Customer not found
    CustomerNotFound = 8001,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Database error
    DatabaseError = 9002,
}

impl ErrorCode {
    /// Get the numeric code value
    pub fn code(&self) -> u16 {
        *self as u16
    }

    /// Get the category this code belongs to
    pub fn category(&self) -> super::ErrorCategory {
        super::ErrorCategory::from_code(self.code())
    }

    /// Get the default human-readable message for this error code
    pub fn message(&self) -> &'static str {
        match self {
            Self::Success => "Success",
            Self::Unknown => "Unknown error",
            Self::ValidationFailed => "Validation failed",
            Self::NotFound => "Resource not found",
            Self::AlreadyExists => "Resource already exists",
            Self::InvalidRequest => "Invalid request",

            Self::OrderNotFound => "Order not found",
            Self::CatalogIntegrity => "Referenced catalog data not found",
            Self::StructuralValidation => "Variant selection violates product rules",
            Self::PriceMismatch => "Submitted price does not match the server price",
            Self::PersistenceConflict => "Order could not be committed, please retry",

            Self::CouponInvalid => "Coupon is invalid or expired",
            Self::CouponExhausted => "Coupon usage limit reached",
            Self::CouponScope => "Coupon cannot be applied at this level",
            Self::CashbackInsufficient => "Insufficient cashback balance",

            Self::ProductNotFound => "Product not found",
            Self::VariantOptionNotFound => "Variant option not found",

            Self::CustomerNotFound => "Customer not found",

            Self::InternalError => "Internal server error",
            Self::DatabaseError => "Database error",
        }
    }

    /// Get the HTTP status code for this error
    pub fn http_status(&self) -> StatusCode {
        match self {
            Self::Success => StatusCode::OK,
            Self::Unknown => StatusCode::INTERNAL_SERVER_ERROR,
            Self::ValidationFailed | Self::InvalidRequest => StatusCode::BAD_REQUEST,
            Self::NotFound
            | Self::OrderNotFound
            | Self::ProductNotFound
            | Self::VariantOptionNotFound
            | Self::CustomerNotFound => StatusCode::NOT_FOUND,
            Self::AlreadyExists | Self::PersistenceConflict => StatusCode::CONFLICT,
            Self::CatalogIntegrity
            | Self::StructuralValidation
            | Self::PriceMismatch
            | Self::CouponInvalid
            | Self::CouponExhausted
            | Self::CouponScope
            | Self::CashbackInsufficient => StatusCode::UNPROCESSABLE_ENTITY,
            Self::InternalError | Self::DatabaseError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl From<ErrorCode> for u16 {
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error returned when converting an unknown u16 into an [`ErrorCode`]
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
        let code = match value {
            0 => Self::Success,
            1 => Self::Unknown,
            2 => Self::ValidationFailed,
            3 => Self::NotFound,
            4 => Self::AlreadyExists,
            5 => Self::InvalidRequest,
            4001 => Self::OrderNotFound,
            4002 => Self::CatalogIntegrity,
            4003 => Self::StructuralValidation,
            4004 => Self::PriceMismatch,
            4005 => Self::PersistenceConflict,
            5001 => Self::CouponInvalid,
            5002 => Self::CouponExhausted,
            5003 => Self::CouponScope,
            5004 => Self::CashbackInsufficient,
            6001 => Self::ProductNotFound,
            6002 => Self::VariantOptionNotFound,
            8001 => Self::CustomerNotFound,
            9001 => Self::InternalError,
            9002 => Self::DatabaseError,
            other => return Err(InvalidErrorCode(other)),
        };
        Ok(code)
    }
}
