//! Product Model

use serde::{Deserialize, Serialize};

/// Product entity
///
/// All prices are integer minor units (cents).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Product {
    pub id: i64,
    pub store_id: i64,
    pub name: String,
    /// Regular price in cents
    pub base_price: i64,
    /// Promotional price in cents, only honored when `activate_promotion` is set
    pub promotion_price: Option<i64>,
    pub activate_promotion: bool,
    pub is_active: bool,
}

impl Product {
    /// Canonical unit price: the promotion price when the promotion is
    /// active and a price is set, otherwise the base price.
    pub fn effective_price(&self) -> i64 {
        if self.activate_promotion {
            self.promotion_price.unwrap_or(self.base_price)
        } else {
            self.base_price
        }
    }
}
