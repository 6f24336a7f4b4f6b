//! Checkout engine tests
//!
//! Pure-stage tests build catalog snapshots and coupon books directly;
//! flow tests run the whole pipeline against a migrated SQLite file in
//! a temp directory.

mod test_flows;

use std::collections::HashMap;

use shared::checkout::{
    NewOrderItem, NewOrderOptionSelection, NewOrderRequest, NewOrderVariantSelection,
};
use shared::models::{
    Coupon, DeliveryType, DiscountType, Product, VariantGroup, VariantGroupRule, VariantOption,
};

use super::catalog::CatalogSnapshot;

pub const STORE: i64 = 1;

// ==================== fixture builders ====================

pub fn product(id: i64, base_price: i64) -> Product {
    Product {
        id,
        store_id: STORE,
        name: format!("Product {id}"),
        base_price,
        promotion_price: None,
        activate_promotion: false,
        is_active: true,
    }
}

pub fn promoted_product(id: i64, base_price: i64, promotion_price: i64) -> Product {
    Product {
        promotion_price: Some(promotion_price),
        activate_promotion: true,
        ..product(id, base_price)
    }
}

pub fn option(id: i64, group_id: i64, price_override: Option<i64>) -> VariantOption {
    VariantOption {
        id,
        variant_group_id: group_id,
        name: format!("Option {id}"),
        price_override,
        linked_product_id: None,
        is_active: true,
    }
}

pub fn rule(product_id: i64, group_id: i64, min: i64, max: i64) -> VariantGroupRule {
    VariantGroupRule {
        product_id,
        variant_group_id: group_id,
        min_selected: min,
        max_selected: max,
        max_total_quantity: None,
        available: true,
    }
}

pub fn coupon(
    id: i64,
    code: &str,
    product_id: Option<i64>,
    discount_type: DiscountType,
    value: i64,
) -> Coupon {
    Coupon {
        id,
        store_id: STORE,
        code: code.into(),
        product_id,
        discount_type,
        discount_value: value,
        max_uses: 100,
        used: 0,
        start_date: None,
        end_date: None,
        is_active: true,
    }
}

/// Snapshot over explicit rows; groups are synthesized from options
pub fn snapshot(
    products: Vec<Product>,
    rules: Vec<VariantGroupRule>,
    options: Vec<VariantOption>,
) -> CatalogSnapshot {
    let groups: HashMap<i64, VariantGroup> = options
        .iter()
        .map(|o| {
            (
                o.variant_group_id,
                VariantGroup {
                    id: o.variant_group_id,
                    store_id: STORE,
                    name: format!("Group {}", o.variant_group_id),
                },
            )
        })
        .collect();
    CatalogSnapshot {
        products: products.into_iter().map(|p| (p.id, p)).collect(),
        rules: rules
            .into_iter()
            .map(|r| ((r.product_id, r.variant_group_id), r))
            .collect(),
        options: options.into_iter().map(|o| (o.id, o)).collect(),
        groups,
        linked_products: HashMap::new(),
    }
}

pub fn line(product_id: i64, price: i64, quantity: i64) -> NewOrderItem {
    NewOrderItem {
        product_id,
        price,
        quantity,
        coupon_code: None,
        note: None,
        variants: vec![],
    }
}

pub fn selection(group_id: i64, options: Vec<(i64, i64, i64)>) -> NewOrderVariantSelection {
    NewOrderVariantSelection {
        variant_group_id: group_id,
        options: options
            .into_iter()
            .map(|(id, price, quantity)| NewOrderOptionSelection {
                variant_option_id: id,
                price,
                quantity,
            })
            .collect(),
    }
}

pub fn request(total_price: i64, products: Vec<NewOrderItem>) -> NewOrderRequest {
    NewOrderRequest {
        customer_id: None,
        delivery_type: DeliveryType::Pickup,
        payment_method_id: None,
        coupon_code: None,
        apply_cashback_amount: None,
        total_price,
        delivery_fee: None,
        note: None,
        products,
    }
}
