//! Checkout rejection types
//!
//! Every gate of the engine fails with a typed, terminal rejection.
//! Nothing is downgraded to a warning and nothing is auto-corrected;
//! the conversion into [`AppError`] carries the structured context the
//! client needs to repair its submission.

use crate::db::repository::RepoError;
use shared::error::{AppError, ErrorCode};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CheckoutError {
    #[error("Referenced product {product_id} not found")]
    ProductMissing { product_id: i64 },

    #[error("Referenced variant option {option_id} not found")]
    OptionMissing { option_id: i64 },

    #[error("Group {group_id} on product {product_id}: {reason}")]
    Structural {
        product_id: i64,
        group_id: i64,
        reason: String,
    },

    #[error("Price mismatch on {context}: claimed {claimed}, expected {expected}")]
    PriceMismatch {
        context: String,
        claimed: i64,
        expected: i64,
    },

    #[error("Amount out of range on {context}")]
    AmountOverflow { context: String },

    #[error("Coupon '{code}' is invalid or expired")]
    CouponInvalid { code: String },

    #[error("Coupon '{code}' has no uses left")]
    CouponExhausted { code: String },

    #[error("Coupon '{code}' cannot be applied at this level")]
    CouponScope { code: String },

    #[error("Cashback {requested} exceeds available {available}")]
    CashbackInsufficient { requested: i64, available: i64 },

    #[error("Customer {customer_id} not found")]
    CustomerNotFound { customer_id: i64 },

    #[error("Order commit conflicted, retry")]
    PersistenceConflict,

    #[error(transparent)]
    Repo(RepoError),
}

impl From<RepoError> for CheckoutError {
    fn from(err: RepoError) -> Self {
        match err {
            // A writer lost to a concurrent one; the submission is
            // retryable as-is
            RepoError::Conflict(_) => CheckoutError::PersistenceConflict,
            other => CheckoutError::Repo(other),
        }
    }
}

impl CheckoutError {
    pub fn structural(product_id: i64, group_id: i64, reason: impl Into<String>) -> Self {
        Self::Structural {
            product_id,
            group_id,
            reason: reason.into(),
        }
    }

    pub fn price_mismatch(context: impl Into<String>, claimed: i64, expected: i64) -> Self {
        Self::PriceMismatch {
            context: context.into(),
            claimed,
            expected,
        }
    }
}

impl From<CheckoutError> for AppError {
    fn from(err: CheckoutError) -> Self {
        match err {
            CheckoutError::ProductMissing { product_id } => {
                AppError::new(ErrorCode::CatalogIntegrity).with_detail("product_id", product_id)
            }
            CheckoutError::OptionMissing { option_id } => {
                AppError::new(ErrorCode::CatalogIntegrity).with_detail("option_id", option_id)
            }
            CheckoutError::Structural {
                product_id,
                group_id,
                ref reason,
            } => AppError::with_message(ErrorCode::StructuralValidation, reason.clone())
                .with_detail("product_id", product_id)
                .with_detail("group_id", group_id),
            CheckoutError::PriceMismatch {
                ref context,
                claimed,
                expected,
            } => AppError::new(ErrorCode::PriceMismatch)
                .with_detail("context", context.clone())
                .with_detail("claimed", claimed)
                .with_detail("expected", expected),
            CheckoutError::AmountOverflow { ref context } => {
                AppError::with_message(ErrorCode::ValidationFailed, "Amount out of range")
                    .with_detail("context", context.clone())
            }
            CheckoutError::CouponInvalid { ref code } => {
                AppError::new(ErrorCode::CouponInvalid).with_detail("code", code.clone())
            }
            CheckoutError::CouponExhausted { ref code } => {
                AppError::new(ErrorCode::CouponExhausted).with_detail("code", code.clone())
            }
            CheckoutError::CouponScope { ref code } => {
                AppError::new(ErrorCode::CouponScope).with_detail("code", code.clone())
            }
            CheckoutError::CashbackInsufficient {
                requested,
                available,
            } => AppError::new(ErrorCode::CashbackInsufficient)
                .with_detail("requested", requested)
                .with_detail("available", available),
            CheckoutError::CustomerNotFound { customer_id } => {
                AppError::new(ErrorCode::CustomerNotFound).with_detail("customer_id", customer_id)
            }
            CheckoutError::PersistenceConflict => AppError::new(ErrorCode::PersistenceConflict),
            CheckoutError::Repo(repo) => repo.into(),
        }
    }
}

pub type CheckoutResult<T> = Result<T, CheckoutError>;
