//! Order persistence
//!
//! Single write transaction for everything a committed order touches:
//! the daily sequential id, the public id, the aggregate rows, the
//! coupon increments and the cashback debit. Any gate failing rolls
//! the whole submission back; nothing is retried internally.

use std::collections::HashSet;

use rand::Rng;
use shared::checkout::NewOrderRequest;
use shared::models::{CashbackKind, Order, OrderItem, OrderItemOption, OrderItemVariant};
use shared::util::snowflake_id;
use sqlx::SqlitePool;

use super::catalog::CatalogSnapshot;
use super::discount::ChargeSummary;
use super::error::{CheckoutError, CheckoutResult};
use super::pricing::PricedOrder;
use crate::db::repository::{RepoError, coupon as coupon_repo, customer as customer_repo, order as order_repo};

const PUBLIC_ID_LEN: usize = 6;
const PUBLIC_ID_CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
const PUBLIC_ID_ATTEMPTS: usize = 5;

fn random_public_id() -> String {
    let mut rng = rand::thread_rng();
    (0..PUBLIC_ID_LEN)
        .map(|_| PUBLIC_ID_CHARSET[rng.gen_range(0..PUBLIC_ID_CHARSET.len())] as char)
        .collect()
}

/// Commit the accepted submission, returning the new order id
pub async fn persist_order(
    pool: &SqlitePool,
    store_id: i64,
    customer_id: Option<i64>,
    request: &NewOrderRequest,
    priced: &PricedOrder,
    summary: &ChargeSummary,
    catalog: &CatalogSnapshot,
    now: i64,
) -> CheckoutResult<i64> {
    let mut tx = pool.begin().await.map_err(RepoError::from)?;

    let sequential_id = order_repo::next_sequential_id(&mut tx, store_id, now).await?;

    // Collision pre-check; the UNIQUE(store_id, public_id) constraint
    // is the backstop when a race slips past it
    let mut public_id = None;
    for _ in 0..PUBLIC_ID_ATTEMPTS {
        let candidate = random_public_id();
        if !order_repo::public_id_taken(&mut tx, store_id, &candidate).await? {
            public_id = Some(candidate);
            break;
        }
    }
    let public_id = public_id.ok_or(CheckoutError::PersistenceConflict)?;

    let order_id = snowflake_id();
    let order = Order {
        id: order_id,
        store_id,
        customer_id,
        sequential_id,
        public_id,
        delivery_type: request.delivery_type,
        payment_method_id: request.payment_method_id,
        subtotal: summary.subtotal,
        discount_amount: summary.discount_amount,
        delivery_fee: summary.delivery_fee,
        total: summary.total,
        discounted_total: summary.discounted_total,
        coupon_id: summary.order_coupon_id,
        cashback_used: summary.cashback_used,
        note: request.note.clone(),
        created_at: now,
    };
    order_repo::insert_order(&mut tx, &order)
        .await
        .map_err(|e| match e {
            RepoError::Duplicate(_) => CheckoutError::PersistenceConflict,
            other => other.into(),
        })?;

    for line in &priced.lines {
        let item = OrderItem {
            id: snowflake_id(),
            order_id,
            product_id: line.product_id,
            name: line.product_name.clone(),
            unit_price: line.unit_price,
            original_price: line.original_price,
            quantity: line.quantity,
            discount_amount: line.line_discount,
            coupon_id: line.coupon_id,
            note: line.note.clone(),
        };
        order_repo::insert_item(&mut tx, &item).await?;

        // One heading row per distinct group, in order of appearance
        let mut written_groups: Vec<(i64, i64)> = Vec::new();
        for option in &line.options {
            let variant_row_id = match written_groups
                .iter()
                .find(|(group_id, _)| *group_id == option.group_id)
            {
                Some((_, row_id)) => *row_id,
                None => {
                    let group_name = catalog
                        .groups
                        .get(&option.group_id)
                        .map(|g| g.name.clone())
                        .unwrap_or_default();
                    let variant = OrderItemVariant {
                        id: snowflake_id(),
                        order_item_id: item.id,
                        variant_group_id: option.group_id,
                        name: group_name,
                    };
                    order_repo::insert_item_variant(&mut tx, &variant).await?;
                    written_groups.push((option.group_id, variant.id));
                    variant.id
                }
            };
            let row = OrderItemOption {
                id: snowflake_id(),
                order_item_variant_id: variant_row_id,
                variant_option_id: option.option_id,
                name: option.name.clone(),
                price: option.price,
                quantity: option.quantity,
            };
            order_repo::insert_item_option(&mut tx, &row).await?;
        }
    }

    // Each distinct coupon is consumed exactly once per order
    let mut coupon_ids: HashSet<i64> = priced.lines.iter().filter_map(|l| l.coupon_id).collect();
    if let Some(id) = summary.order_coupon_id {
        coupon_ids.insert(id);
    }
    for coupon_id in coupon_ids {
        if !coupon_repo::consume_use(&mut tx, coupon_id).await? {
            // A competing order took the last use since resolution
            let code = coupon_repo::find_by_id(pool, coupon_id)
                .await
                .ok()
                .flatten()
                .map(|c| c.code)
                .unwrap_or_default();
            return Err(CheckoutError::CouponExhausted { code });
        }
    }

    // Cashback debit: balance re-checked under the write lock
    if summary.cashback_used > 0 {
        let customer_id = customer_id.ok_or_else(|| {
            CheckoutError::CashbackInsufficient {
                requested: summary.cashback_used,
                available: 0,
            }
        })?;
        let balance = customer_repo::cashback_balance_tx(&mut tx, store_id, customer_id).await?;
        if balance < summary.cashback_used {
            return Err(CheckoutError::CashbackInsufficient {
                requested: summary.cashback_used,
                available: balance,
            });
        }
        customer_repo::append_cashback_entry(
            &mut tx,
            store_id,
            customer_id,
            Some(order_id),
            summary.cashback_used,
            CashbackKind::Used,
        )
        .await?;
    }

    // Duplicate public ids and lost write-lock races both surface here;
    // either way the client retries the identical submission
    tx.commit().await.map_err(|e| match RepoError::from(e) {
        RepoError::Duplicate(_) | RepoError::Conflict(_) => CheckoutError::PersistenceConflict,
        other => other.into(),
    })?;

    Ok(order_id)
}
