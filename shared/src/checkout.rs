//! Checkout request DTOs
//!
//! The wire payload a client submits to place an order. Every claimed
//! price is untrusted input; the server recomputes all of them and
//! rejects the whole submission on any disagreement.

use crate::models::DeliveryType;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Checkout submission payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NewOrderRequest {
    pub customer_id: Option<i64>,
    pub delivery_type: DeliveryType,
    pub payment_method_id: Option<i64>,
    /// Order-level coupon code
    #[validate(length(min = 1, max = 64))]
    pub coupon_code: Option<String>,
    /// Cashback to debit, in cents
    #[validate(range(min = 0, max = 100_000_000))]
    pub apply_cashback_amount: Option<i64>,
    /// Client-claimed payable total, in cents
    pub total_price: i64,
    #[validate(range(min = 0, max = 100_000_000))]
    pub delivery_fee: Option<i64>,
    #[validate(length(max = 500))]
    pub note: Option<String>,
    #[validate(length(min = 1), nested)]
    pub products: Vec<NewOrderItem>,
}

/// One submitted order line
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NewOrderItem {
    pub product_id: i64,
    /// Client-claimed unit price, in cents
    pub price: i64,
    #[validate(range(min = 1, max = 999))]
    pub quantity: i64,
    /// Line-level coupon code bound to this product
    #[validate(length(min = 1, max = 64))]
    pub coupon_code: Option<String>,
    #[validate(length(max = 500))]
    pub note: Option<String>,
    #[validate(nested)]
    #[serde(default)]
    pub variants: Vec<NewOrderVariantSelection>,
}

/// Submitted selections for one variant group
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NewOrderVariantSelection {
    pub variant_group_id: i64,
    #[validate(length(min = 1), nested)]
    pub options: Vec<NewOrderOptionSelection>,
}

/// One selected option with its claimed price
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NewOrderOptionSelection {
    pub variant_option_id: i64,
    /// Client-claimed option price, in cents
    pub price: i64,
    #[validate(range(min = 1, max = 999))]
    pub quantity: i64,
}
