//! Discount composition
//!
//! Folds the three discount sources into final totals in fixed
//! precedence: line coupons (already inside `PricedOrder`), then the
//! order-level coupon, then the cashback debit. Each source applies to
//! the value remaining after the previous one, so no amount is
//! discounted twice.

use shared::checkout::NewOrderRequest;
use shared::models::Coupon;

use super::coupons::CouponBook;
use super::error::{CheckoutError, CheckoutResult};
use super::pricing::{PricedOrder, claims_match};

/// Final money figures for an accepted submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChargeSummary {
    pub subtotal: i64,
    pub line_discount_total: i64,
    pub order_discount: i64,
    pub cashback_used: i64,
    /// line + order + cashback
    pub discount_amount: i64,
    pub delivery_fee: i64,
    /// subtotal + delivery_fee
    pub total: i64,
    /// subtotal − discount_amount + delivery_fee
    pub discounted_total: i64,
    pub order_coupon_id: Option<i64>,
}

/// Compose discounts and verify the claimed total
///
/// `cashback_balance` is the ledger balance read outside the commit;
/// the persister re-checks it under the write lock.
pub fn compose(
    request: &NewOrderRequest,
    priced: &PricedOrder,
    coupons: &CouponBook,
    cashback_balance: i64,
) -> CheckoutResult<ChargeSummary> {
    let delivery_fee = request.delivery_fee.unwrap_or(0);

    // 1. Line coupons are already folded into the priced order
    let after_lines = priced.subtotal - priced.line_discount_total;

    // 2. Order-level coupon: store-wide codes only, and never a code
    //    already consumed by a line
    let order_coupon = resolve_order_coupon(request, priced, coupons)?;
    let order_discount = order_coupon
        .map(|c| c.discount_on(after_lines))
        .unwrap_or(0);

    // 3. Cashback debit, bounded by balance and by the payable remainder
    let payable = after_lines - order_discount + delivery_fee;
    let cashback_used = request.apply_cashback_amount.unwrap_or(0);
    if cashback_used > 0 {
        let available = cashback_balance.min(payable);
        if cashback_used > available {
            return Err(CheckoutError::CashbackInsufficient {
                requested: cashback_used,
                available,
            });
        }
    }

    let discount_amount = priced.line_discount_total + order_discount + cashback_used;
    let total = priced.subtotal + delivery_fee;
    let discounted_total = priced.subtotal - discount_amount + delivery_fee;

    if !claims_match(request.total_price, discounted_total) {
        return Err(CheckoutError::price_mismatch(
            "order total",
            request.total_price,
            discounted_total,
        ));
    }

    Ok(ChargeSummary {
        subtotal: priced.subtotal,
        line_discount_total: priced.line_discount_total,
        order_discount,
        cashback_used,
        discount_amount,
        delivery_fee,
        total,
        discounted_total,
        order_coupon_id: order_coupon.map(|c| c.id),
    })
}

fn resolve_order_coupon<'a>(
    request: &NewOrderRequest,
    priced: &PricedOrder,
    coupons: &'a CouponBook,
) -> CheckoutResult<Option<&'a Coupon>> {
    let Some(code) = &request.coupon_code else {
        return Ok(None);
    };
    let coupon = coupons
        .get(code)
        .ok_or_else(|| CheckoutError::CouponInvalid { code: code.clone() })?;

    // Product-bound coupons only apply at line level
    if coupon.product_id.is_some() {
        return Err(CheckoutError::CouponScope { code: code.clone() });
    }
    // A code already consumed by a line cannot discount the order too
    if priced.lines.iter().any(|l| l.coupon_id == Some(coupon.id)) {
        return Err(CheckoutError::CouponScope { code: code.clone() });
    }
    Ok(Some(coupon))
}
