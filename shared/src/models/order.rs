//! Order aggregate models
//!
//! An order is persisted as an immutable aggregate: the `Order` row
//! plus its item, variant and option rows. Core financial fields are
//! never updated after the commit.

use serde::{Deserialize, Serialize};

/// How the order reaches the customer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "lowercase"))]
pub enum DeliveryType {
    Pickup,
    Delivery,
    Table,
}

/// Persisted order row (aggregate root)
///
/// All money in cents. `sequential_id` restarts daily per store;
/// `public_id` is the 6-character customer-facing code, unique per
/// store.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Order {
    pub id: i64,
    pub store_id: i64,
    pub customer_id: Option<i64>,
    pub sequential_id: i64,
    pub public_id: String,
    pub delivery_type: DeliveryType,
    pub payment_method_id: Option<i64>,
    /// Σ line totals before any discounts
    pub subtotal: i64,
    /// Σ line coupon discounts + order coupon discount + cashback used
    pub discount_amount: i64,
    pub delivery_fee: i64,
    /// subtotal + delivery_fee
    pub total: i64,
    /// subtotal − discounts + delivery_fee (amount payable)
    pub discounted_total: i64,
    /// Order-level coupon, when one applied
    pub coupon_id: Option<i64>,
    pub cashback_used: i64,
    pub note: Option<String>,
    /// Epoch millis
    pub created_at: i64,
}

/// Persisted order line
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct OrderItem {
    pub id: i64,
    pub order_id: i64,
    pub product_id: i64,
    pub name: String,
    /// Server-computed unit price after any line coupon
    pub unit_price: i64,
    /// Canonical unit price before line discounts
    pub original_price: i64,
    pub quantity: i64,
    /// (original_price − unit_price) × quantity
    pub discount_amount: i64,
    /// Line coupon, when one applied
    pub coupon_id: Option<i64>,
    pub note: Option<String>,
}

/// Variant group heading attached to an order line
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct OrderItemVariant {
    pub id: i64,
    pub order_item_id: i64,
    pub variant_group_id: i64,
    pub name: String,
}

/// Option row beneath a variant heading
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct OrderItemOption {
    pub id: i64,
    pub order_item_variant_id: i64,
    pub variant_option_id: i64,
    pub name: String,
    /// Resolved option price in cents
    pub price: i64,
    pub quantity: i64,
}

/// Fully hydrated order aggregate as returned by the API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderDetail {
    #[serde(flatten)]
    pub order: Order,
    pub items: Vec<OrderItemDetail>,
}

/// Order line with its nested variant selections
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItemDetail {
    #[serde(flatten)]
    pub item: OrderItem,
    pub variants: Vec<OrderItemVariantDetail>,
}

/// Variant heading with its option rows
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItemVariantDetail {
    #[serde(flatten)]
    pub variant: OrderItemVariant,
    pub options: Vec<OrderItemOption>,
}
