//! Coupon resolution
//!
//! Collects every coupon code a submission mentions (line level and
//! order level) and resolves them in one store-scoped batch query.
//! A code that resolves to nothing is not fatal here; the pricing and
//! discount stages reject at the point of use, where scope is known.

use std::collections::HashMap;

use shared::checkout::NewOrderRequest;
use shared::models::Coupon;
use sqlx::SqlitePool;

use super::error::CheckoutResult;
use crate::db::repository::coupon as coupon_repo;

/// Usable coupons for a submission, keyed by code
#[derive(Debug, Default)]
pub struct CouponBook {
    coupons: HashMap<String, Coupon>,
}

impl CouponBook {
    pub fn get(&self, code: &str) -> Option<&Coupon> {
        self.coupons.get(code)
    }

    pub fn is_empty(&self) -> bool {
        self.coupons.is_empty()
    }

    #[cfg(test)]
    pub fn from_coupons(coupons: impl IntoIterator<Item = Coupon>) -> Self {
        Self {
            coupons: coupons.into_iter().map(|c| (c.code.clone(), c)).collect(),
        }
    }
}

/// Resolve all mentioned codes against the store's usable coupons
pub async fn load(
    pool: &SqlitePool,
    store_id: i64,
    request: &NewOrderRequest,
    now: i64,
) -> CheckoutResult<CouponBook> {
    let mut codes: Vec<String> = request
        .products
        .iter()
        .filter_map(|line| line.coupon_code.clone())
        .collect();
    if let Some(code) = &request.coupon_code {
        codes.push(code.clone());
    }
    codes.sort();
    codes.dedup();

    if codes.is_empty() {
        return Ok(CouponBook::default());
    }

    let coupons = coupon_repo::find_usable_by_codes(pool, store_id, &codes, now).await?;
    Ok(CouponBook {
        coupons: coupons.into_iter().map(|c| (c.code.clone(), c)).collect(),
    })
}
