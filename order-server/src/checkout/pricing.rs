//! Price recomputation
//!
//! Pure, deterministic recomputation of every claimed price in the
//! submission. The claimed numbers are only ever compared against the
//! server's own results; they never feed into a total.

use shared::checkout::{NewOrderItem, NewOrderRequest};
use shared::models::Coupon;

use super::catalog::CatalogSnapshot;
use super::coupons::CouponBook;
use super::error::{CheckoutError, CheckoutResult};

/// The single place deciding whether a claimed amount matches a
/// computed one. Integer cents compare exactly.
pub fn claims_match(claimed: i64, computed: i64) -> bool {
    claimed == computed
}

/// Overflow on a client-influenced amount is a rejection, never a wrap
fn add_amount(a: i64, b: i64, context: &str) -> CheckoutResult<i64> {
    a.checked_add(b).ok_or_else(|| CheckoutError::AmountOverflow {
        context: context.to_string(),
    })
}

fn mul_amount(a: i64, b: i64, context: &str) -> CheckoutResult<i64> {
    a.checked_mul(b).ok_or_else(|| CheckoutError::AmountOverflow {
        context: context.to_string(),
    })
}

/// One selected option with its server-resolved price
#[derive(Debug, Clone)]
pub struct PricedOption {
    pub option_id: i64,
    pub group_id: i64,
    pub name: String,
    pub price: i64,
    pub quantity: i64,
}

/// One order line after recomputation
#[derive(Debug, Clone)]
pub struct PricedLine {
    pub product_id: i64,
    pub product_name: String,
    /// Canonical unit price before line discounts
    pub original_price: i64,
    /// Unit price after the line coupon, if any
    pub unit_price: i64,
    pub quantity: i64,
    /// (original_price − unit_price) × quantity
    pub line_discount: i64,
    pub coupon_id: Option<i64>,
    /// Σ option price × option quantity, counted once per line
    pub options_total: i64,
    /// Gross line value: canonical unit price × quantity + options
    pub gross_total: i64,
    pub options: Vec<PricedOption>,
    pub note: Option<String>,
}

/// Whole submission after recomputation
#[derive(Debug, Clone)]
pub struct PricedOrder {
    pub lines: Vec<PricedLine>,
    /// Σ gross line totals
    pub subtotal: i64,
    /// Σ line coupon discounts
    pub line_discount_total: i64,
}

/// Recompute every price in the request
///
/// Rejects with `PriceMismatch` on the first disagreement between a
/// claimed price and the canonical one; with `CouponInvalid` /
/// `CouponScope` when a line names an unusable or wrongly scoped
/// coupon. Idempotent over identical inputs.
pub fn price_order(
    request: &NewOrderRequest,
    catalog: &CatalogSnapshot,
    coupons: &CouponBook,
) -> CheckoutResult<PricedOrder> {
    let mut lines = Vec::with_capacity(request.products.len());
    let mut subtotal: i64 = 0;
    let mut line_discount_total: i64 = 0;

    for line in &request.products {
        let priced = price_line(line, catalog, coupons)?;
        subtotal = add_amount(subtotal, priced.gross_total, "subtotal")?;
        line_discount_total = add_amount(line_discount_total, priced.line_discount, "subtotal")?;
        lines.push(priced);
    }

    Ok(PricedOrder {
        lines,
        subtotal,
        line_discount_total,
    })
}

fn price_line(
    line: &NewOrderItem,
    catalog: &CatalogSnapshot,
    coupons: &CouponBook,
) -> CheckoutResult<PricedLine> {
    let product = catalog.product(line.product_id)?;
    let canonical = product.effective_price();

    // A line coupon must exist and be bound to this exact product
    let coupon: Option<&Coupon> = match &line.coupon_code {
        Some(code) => {
            let coupon = coupons
                .get(code)
                .ok_or_else(|| CheckoutError::CouponInvalid { code: code.clone() })?;
            if coupon.product_id != Some(product.id) {
                return Err(CheckoutError::CouponScope { code: code.clone() });
            }
            Some(coupon)
        }
        None => None,
    };

    let discounted = coupon.map(|c| canonical - c.discount_on(canonical));

    // The claimed unit price must be the canonical price or, with a
    // line coupon, the coupon-discounted price.
    let unit_price = if claims_match(line.price, canonical) {
        discounted.unwrap_or(canonical)
    } else if let Some(d) = discounted
        && claims_match(line.price, d)
    {
        d
    } else {
        return Err(CheckoutError::price_mismatch(
            format!("product {}", product.id),
            line.price,
            discounted.unwrap_or(canonical),
        ));
    };

    let mut options = Vec::new();
    let mut options_total: i64 = 0;
    for selection in &line.variants {
        for selected in &selection.options {
            let option = catalog.option(selected.variant_option_id)?;
            let expected = catalog.option_price(option);
            if !claims_match(selected.price, expected) {
                return Err(CheckoutError::price_mismatch(
                    format!("option {}", option.id),
                    selected.price,
                    expected,
                ));
            }
            let context = format!("option {}", option.id);
            options_total = add_amount(
                options_total,
                mul_amount(expected, selected.quantity, &context)?,
                &context,
            )?;
            options.push(PricedOption {
                option_id: option.id,
                group_id: option.variant_group_id,
                name: option.name.clone(),
                price: expected,
                quantity: selected.quantity,
            });
        }
    }

    let context = format!("product {}", product.id);
    let line_discount = mul_amount(canonical - unit_price, line.quantity, &context)?;
    let gross_total = add_amount(
        mul_amount(canonical, line.quantity, &context)?,
        options_total,
        &context,
    )?;

    Ok(PricedLine {
        product_id: product.id,
        product_name: product.name.clone(),
        original_price: canonical,
        unit_price,
        quantity: line.quantity,
        line_discount,
        coupon_id: coupon.map(|c| c.id),
        options_total,
        gross_total,
        options,
        note: line.note.clone(),
    })
}
