//! Order Repository
//!
//! Reads hydrate the full aggregate; writes only happen inside the
//! checkout transaction and never update committed rows.

use super::{RepoResult, sql_placeholders};
use shared::models::{
    Order, OrderDetail, OrderItem, OrderItemDetail, OrderItemOption, OrderItemVariant,
    OrderItemVariantDetail,
};
use shared::util::utc_day_bounds;
use sqlx::{Sqlite, SqlitePool, Transaction};

const ORDER_COLUMNS: &str = "id, store_id, customer_id, sequential_id, public_id, delivery_type, \
                             payment_method_id, subtotal, discount_amount, delivery_fee, total, \
                             discounted_total, coupon_id, cashback_used, note, created_at";

/// Next store-scoped sequential id for the day containing `now`
///
/// MAX+1 inside the write transaction; the transaction's lock makes
/// concurrent submissions observe distinct values.
pub async fn next_sequential_id(
    tx: &mut Transaction<'_, Sqlite>,
    store_id: i64,
    now: i64,
) -> RepoResult<i64> {
    let (day_start, day_end) = utc_day_bounds(now);
    let max = sqlx::query_scalar::<_, i64>(
        "SELECT COALESCE(MAX(sequential_id), 0) FROM customer_order \
         WHERE store_id = ? AND created_at >= ? AND created_at < ?",
    )
    .bind(store_id)
    .bind(day_start)
    .bind(day_end)
    .fetch_one(&mut **tx)
    .await?;
    Ok(max + 1)
}

/// Whether a public id is already taken within the store
pub async fn public_id_taken(
    tx: &mut Transaction<'_, Sqlite>,
    store_id: i64,
    public_id: &str,
) -> RepoResult<bool> {
    let count = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM customer_order WHERE store_id = ? AND public_id = ?",
    )
    .bind(store_id)
    .bind(public_id)
    .fetch_one(&mut **tx)
    .await?;
    Ok(count > 0)
}

pub async fn insert_order(tx: &mut Transaction<'_, Sqlite>, order: &Order) -> RepoResult<()> {
    let sql = format!(
        "INSERT INTO customer_order ({ORDER_COLUMNS}) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"
    );
    sqlx::query(&sql)
        .bind(order.id)
        .bind(order.store_id)
        .bind(order.customer_id)
        .bind(order.sequential_id)
        .bind(&order.public_id)
        .bind(order.delivery_type)
        .bind(order.payment_method_id)
        .bind(order.subtotal)
        .bind(order.discount_amount)
        .bind(order.delivery_fee)
        .bind(order.total)
        .bind(order.discounted_total)
        .bind(order.coupon_id)
        .bind(order.cashback_used)
        .bind(&order.note)
        .bind(order.created_at)
        .execute(&mut **tx)
        .await?;
    Ok(())
}

pub async fn insert_item(tx: &mut Transaction<'_, Sqlite>, item: &OrderItem) -> RepoResult<()> {
    sqlx::query(
        "INSERT INTO order_item (id, order_id, product_id, name, unit_price, original_price, \
                                 quantity, discount_amount, coupon_id, note) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(item.id)
    .bind(item.order_id)
    .bind(item.product_id)
    .bind(&item.name)
    .bind(item.unit_price)
    .bind(item.original_price)
    .bind(item.quantity)
    .bind(item.discount_amount)
    .bind(item.coupon_id)
    .bind(&item.note)
    .execute(&mut **tx)
    .await?;
    Ok(())
}

pub async fn insert_item_variant(
    tx: &mut Transaction<'_, Sqlite>,
    variant: &OrderItemVariant,
) -> RepoResult<()> {
    sqlx::query(
        "INSERT INTO order_item_variant (id, order_item_id, variant_group_id, name) \
         VALUES (?, ?, ?, ?)",
    )
    .bind(variant.id)
    .bind(variant.order_item_id)
    .bind(variant.variant_group_id)
    .bind(&variant.name)
    .execute(&mut **tx)
    .await?;
    Ok(())
}

pub async fn insert_item_option(
    tx: &mut Transaction<'_, Sqlite>,
    option: &OrderItemOption,
) -> RepoResult<()> {
    sqlx::query(
        "INSERT INTO order_item_option (id, order_item_variant_id, variant_option_id, name, \
                                        price, quantity) \
         VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(option.id)
    .bind(option.order_item_variant_id)
    .bind(option.variant_option_id)
    .bind(&option.name)
    .bind(option.price)
    .bind(option.quantity)
    .execute(&mut **tx)
    .await?;
    Ok(())
}

/// Fetch a fully hydrated aggregate by store and public id
pub async fn find_by_public_id(
    pool: &SqlitePool,
    store_id: i64,
    public_id: &str,
) -> RepoResult<Option<OrderDetail>> {
    let sql =
        format!("SELECT {ORDER_COLUMNS} FROM customer_order WHERE store_id = ? AND public_id = ?");
    let order = sqlx::query_as::<_, Order>(&sql)
        .bind(store_id)
        .bind(public_id)
        .fetch_optional(pool)
        .await?;

    match order {
        Some(order) => Ok(Some(hydrate(pool, order).await?)),
        None => Ok(None),
    }
}

/// Fetch a fully hydrated aggregate by internal id
pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<OrderDetail>> {
    let sql = format!("SELECT {ORDER_COLUMNS} FROM customer_order WHERE id = ?");
    let order = sqlx::query_as::<_, Order>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;

    match order {
        Some(order) => Ok(Some(hydrate(pool, order).await?)),
        None => Ok(None),
    }
}

async fn hydrate(pool: &SqlitePool, order: Order) -> RepoResult<OrderDetail> {
    let items = sqlx::query_as::<_, OrderItem>(
        "SELECT id, order_id, product_id, name, unit_price, original_price, quantity, \
                discount_amount, coupon_id, note \
         FROM order_item WHERE order_id = ? ORDER BY id",
    )
    .bind(order.id)
    .fetch_all(pool)
    .await?;

    let item_ids: Vec<i64> = items.iter().map(|i| i.id).collect();
    let variants = if item_ids.is_empty() {
        Vec::new()
    } else {
        let sql = format!(
            "SELECT id, order_item_id, variant_group_id, name FROM order_item_variant \
             WHERE order_item_id IN ({}) ORDER BY id",
            sql_placeholders(item_ids.len())
        );
        let mut query = sqlx::query_as::<_, OrderItemVariant>(&sql);
        for id in &item_ids {
            query = query.bind(id);
        }
        query.fetch_all(pool).await?
    };

    let variant_ids: Vec<i64> = variants.iter().map(|v| v.id).collect();
    let mut options = if variant_ids.is_empty() {
        Vec::new()
    } else {
        let sql = format!(
            "SELECT id, order_item_variant_id, variant_option_id, name, price, quantity \
             FROM order_item_option WHERE order_item_variant_id IN ({}) ORDER BY id",
            sql_placeholders(variant_ids.len())
        );
        let mut query = sqlx::query_as::<_, OrderItemOption>(&sql);
        for id in &variant_ids {
            query = query.bind(id);
        }
        query.fetch_all(pool).await?
    };

    // Assemble bottom-up: options under their variant, variants under their item
    let mut variant_details: Vec<OrderItemVariantDetail> = variants
        .into_iter()
        .map(|variant| {
            let opts = options
                .extract_if(.., |o| o.order_item_variant_id == variant.id)
                .collect();
            OrderItemVariantDetail {
                variant,
                options: opts,
            }
        })
        .collect();

    let item_details = items
        .into_iter()
        .map(|item| {
            let vars = variant_details
                .extract_if(.., |v| v.variant.order_item_id == item.id)
                .collect();
            OrderItemDetail {
                item,
                variants: vars,
            }
        })
        .collect();

    Ok(OrderDetail {
        order,
        items: item_details,
    })
}
