//! Variant group, option and product-link models

use serde::{Deserialize, Serialize};

/// Named group of selectable options (e.g. "Size", "Toppings")
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct VariantGroup {
    pub id: i64,
    pub store_id: i64,
    pub name: String,
}

/// Selectable option within a variant group
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct VariantOption {
    pub id: i64,
    pub variant_group_id: i64,
    pub name: String,
    /// Explicit option price in cents; overrides any linked product price
    pub price_override: Option<i64>,
    /// Cross-sell product whose base price applies when no override is set
    pub linked_product_id: Option<i64>,
    pub is_active: bool,
}

/// Per-product cardinality rule for a variant group
///
/// One row per (product, group) pair. Selection counts refer to
/// distinct options; `max_total_quantity` caps the summed quantities.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct VariantGroupRule {
    pub product_id: i64,
    pub variant_group_id: i64,
    pub min_selected: i64,
    pub max_selected: i64,
    pub max_total_quantity: Option<i64>,
    pub available: bool,
}
