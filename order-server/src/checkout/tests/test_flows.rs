//! End-to-end checkout flows against a real SQLite file

use shared::models::{DeliveryType, DiscountType, Order};
use sqlx::SqlitePool;
use tempfile::TempDir;

use super::*;
use crate::checkout::{CheckoutError, CheckoutService};
use crate::db::DbService;
use crate::db::repository::{
    RepoError, coupon as coupon_repo, customer as customer_repo, order as order_repo,
};
use crate::events::OrderEvents;

struct Flow {
    service: CheckoutService,
    events: OrderEvents,
    pool: SqlitePool,
    _dir: TempDir,
}

async fn flow() -> Flow {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("orders.db");
    let db = DbService::new(path.to_str().unwrap()).await.unwrap();
    let events = OrderEvents::new();
    let service = CheckoutService::new(db.pool.clone(), events.clone());
    Flow {
        service,
        events,
        pool: db.pool,
        _dir: dir,
    }
}

async fn seed_product(pool: &SqlitePool, id: i64, base_price: i64) {
    sqlx::query(
        "INSERT INTO product (id, store_id, name, base_price, activate_promotion, is_active) \
         VALUES (?, ?, ?, ?, 0, 1)",
    )
    .bind(id)
    .bind(STORE)
    .bind(format!("Product {id}"))
    .bind(base_price)
    .execute(pool)
    .await
    .unwrap();
}

async fn seed_group(pool: &SqlitePool, group_id: i64, product_id: i64, min: i64, max: i64) {
    sqlx::query("INSERT INTO variant_group (id, store_id, name) VALUES (?, ?, ?)")
        .bind(group_id)
        .bind(STORE)
        .bind(format!("Group {group_id}"))
        .execute(pool)
        .await
        .unwrap();
    sqlx::query(
        "INSERT INTO product_variant_link (product_id, variant_group_id, min_selected, \
                                           max_selected, available) VALUES (?, ?, ?, ?, 1)",
    )
    .bind(product_id)
    .bind(group_id)
    .bind(min)
    .bind(max)
    .execute(pool)
    .await
    .unwrap();
}

async fn seed_option(pool: &SqlitePool, id: i64, group_id: i64, price: i64) {
    sqlx::query(
        "INSERT INTO variant_option (id, variant_group_id, name, price_override, is_active) \
         VALUES (?, ?, ?, ?, 1)",
    )
    .bind(id)
    .bind(group_id)
    .bind(format!("Option {id}"))
    .bind(price)
    .execute(pool)
    .await
    .unwrap();
}

async fn seed_coupon(
    pool: &SqlitePool,
    id: i64,
    code: &str,
    product_id: Option<i64>,
    discount_type: DiscountType,
    value: i64,
    max_uses: i64,
) {
    let kind = match discount_type {
        DiscountType::Percentage => "percentage",
        DiscountType::Fixed => "fixed",
    };
    sqlx::query(
        "INSERT INTO coupon (id, store_id, code, product_id, discount_type, discount_value, \
                             max_uses, used, is_active) VALUES (?, ?, ?, ?, ?, ?, ?, 0, 1)",
    )
    .bind(id)
    .bind(STORE)
    .bind(code)
    .bind(product_id)
    .bind(kind)
    .bind(value)
    .bind(max_uses)
    .execute(pool)
    .await
    .unwrap();
}

async fn seed_customer(pool: &SqlitePool, id: i64) {
    sqlx::query("INSERT INTO customer (id, name) VALUES (?, ?)")
        .bind(id)
        .bind(format!("Customer {id}"))
        .execute(pool)
        .await
        .unwrap();
}

async fn grant_cashback(pool: &SqlitePool, customer_id: i64, amount: i64) {
    sqlx::query(
        "INSERT INTO cashback_entry (id, customer_id, store_id, amount, kind, created_at) \
         VALUES (?, ?, ?, ?, 'generated', ?)",
    )
    .bind(shared::util::snowflake_id())
    .bind(customer_id)
    .bind(STORE)
    .bind(amount)
    .bind(shared::util::now_millis())
    .execute(pool)
    .await
    .unwrap();
}

async fn order_count(pool: &SqlitePool) -> i64 {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM customer_order")
        .fetch_one(pool)
        .await
        .unwrap()
}

#[tokio::test]
async fn test_successful_checkout_persists_and_broadcasts() {
    let flow = flow().await;
    seed_product(&flow.pool, 1, 1000).await;

    let mut rx = flow.events.subscribe();

    let mut req = request(2300, vec![line(1, 1000, 2)]);
    req.delivery_fee = Some(300);

    let detail = flow.service.place_order(STORE, &req).await.unwrap();
    assert_eq!(detail.order.subtotal, 2000);
    assert_eq!(detail.order.discount_amount, 0);
    assert_eq!(detail.order.total, 2300);
    assert_eq!(detail.order.discounted_total, 2300);
    assert_eq!(detail.order.sequential_id, 1);
    assert_eq!(detail.order.public_id.len(), 6);
    assert_eq!(detail.items.len(), 1);
    assert_eq!(detail.items[0].item.quantity, 2);

    // Event published after the commit
    let event = rx.try_recv().unwrap();
    assert_eq!(event.order_id, detail.order.id);
    assert_eq!(event.public_id, detail.order.public_id);
    assert_eq!(event.discounted_total, 2300);

    // Aggregate observable by public id
    let fetched = order_repo::find_by_public_id(&flow.pool, STORE, &detail.order.public_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(fetched.order.id, detail.order.id);
}

#[tokio::test]
async fn test_sequential_ids_increment_within_day() {
    let flow = flow().await;
    seed_product(&flow.pool, 1, 500).await;

    let req = request(500, vec![line(1, 500, 1)]);
    let first = flow.service.place_order(STORE, &req).await.unwrap();
    let second = flow.service.place_order(STORE, &req).await.unwrap();

    assert_eq!(first.order.sequential_id, 1);
    assert_eq!(second.order.sequential_id, 2);
    assert_ne!(first.order.public_id, second.order.public_id);
}

#[tokio::test]
async fn test_variant_selections_persisted_under_line() {
    let flow = flow().await;
    seed_product(&flow.pool, 1, 1000).await;
    seed_group(&flow.pool, 10, 1, 1, 2).await;
    seed_option(&flow.pool, 100, 10, 150).await;
    seed_option(&flow.pool, 101, 10, 0).await;

    let mut item = line(1, 1000, 1);
    item.variants = vec![selection(10, vec![(100, 150, 1), (101, 0, 1)])];
    let req = request(1150, vec![item]);

    let detail = flow.service.place_order(STORE, &req).await.unwrap();
    assert_eq!(detail.items[0].variants.len(), 1);
    let variant = &detail.items[0].variants[0];
    assert_eq!(variant.variant.variant_group_id, 10);
    assert_eq!(variant.options.len(), 2);
    assert_eq!(
        variant.options.iter().map(|o| o.price).sum::<i64>(),
        150
    );
}

#[tokio::test]
async fn test_coupon_used_increments_once_per_order() {
    let flow = flow().await;
    seed_product(&flow.pool, 1, 1000).await;
    seed_coupon(
        &flow.pool,
        7,
        "TEN",
        Some(1),
        DiscountType::Percentage,
        10,
        100,
    )
    .await;

    // Quantity 3 still consumes a single use
    let mut item = line(1, 900, 3);
    item.coupon_code = Some("TEN".into());
    let req = request(2700, vec![item]);

    let detail = flow.service.place_order(STORE, &req).await.unwrap();
    assert_eq!(detail.order.discount_amount, 300);

    let coupon = coupon_repo::find_by_id(&flow.pool, 7).await.unwrap().unwrap();
    assert_eq!(coupon.used, 1);
}

#[tokio::test]
async fn test_exhausted_coupon_rejected_and_nothing_persisted() {
    let flow = flow().await;
    seed_product(&flow.pool, 1, 1000).await;
    seed_coupon(&flow.pool, 7, "ONCE", None, DiscountType::Fixed, 100, 1).await;

    let mut req = request(900, vec![line(1, 1000, 1)]);
    req.coupon_code = Some("ONCE".into());

    flow.service.place_order(STORE, &req).await.unwrap();
    let err = flow.service.place_order(STORE, &req).await.unwrap_err();
    assert!(matches!(
        err,
        CheckoutError::CouponInvalid { .. } | CheckoutError::CouponExhausted { .. }
    ));

    assert_eq!(order_count(&flow.pool).await, 1);
    let coupon = coupon_repo::find_by_id(&flow.pool, 7).await.unwrap().unwrap();
    assert_eq!(coupon.used, 1);
}

#[tokio::test]
async fn test_concurrent_submissions_consume_last_use_once() {
    let flow = flow().await;
    seed_product(&flow.pool, 1, 1000).await;
    seed_coupon(&flow.pool, 7, "LAST", None, DiscountType::Fixed, 100, 1).await;

    let mut req = request(900, vec![line(1, 1000, 1)]);
    req.coupon_code = Some("LAST".into());

    let (a, b) = tokio::join!(
        flow.service.place_order(STORE, &req),
        flow.service.place_order(STORE, &req),
    );

    // Exactly one submission wins the last use
    assert_eq!([a.is_ok(), b.is_ok()].iter().filter(|ok| **ok).count(), 1);
    let coupon = coupon_repo::find_by_id(&flow.pool, 7).await.unwrap().unwrap();
    assert_eq!(coupon.used, 1);
    assert_eq!(order_count(&flow.pool).await, 1);
}

#[tokio::test]
async fn test_held_write_lock_surfaces_retryable_conflict() {
    let flow = flow().await;
    seed_product(&flow.pool, 1, 500).await;

    // Another connection holds the write lock for the whole attempt
    let mut writer = flow.pool.acquire().await.unwrap();
    sqlx::query("BEGIN IMMEDIATE")
        .execute(&mut *writer)
        .await
        .unwrap();

    let req = request(500, vec![line(1, 500, 1)]);
    let err = flow.service.place_order(STORE, &req).await.unwrap_err();
    assert!(matches!(err, CheckoutError::PersistenceConflict));

    sqlx::query("ROLLBACK").execute(&mut *writer).await.unwrap();
    drop(writer);

    assert_eq!(order_count(&flow.pool).await, 0);

    // The identical submission goes through once the writer is gone
    let detail = flow.service.place_order(STORE, &req).await.unwrap();
    assert_eq!(detail.order.discounted_total, 500);
}

#[tokio::test]
async fn test_public_id_collision_rejected_by_constraint() {
    let flow = flow().await;

    let order = |id: i64, sequential_id: i64| Order {
        id,
        store_id: STORE,
        customer_id: None,
        sequential_id,
        public_id: "AAAAAA".into(),
        delivery_type: DeliveryType::Pickup,
        payment_method_id: None,
        subtotal: 500,
        discount_amount: 0,
        delivery_fee: 0,
        total: 500,
        discounted_total: 500,
        coupon_id: None,
        cashback_used: 0,
        note: None,
        created_at: shared::util::now_millis(),
    };

    let mut tx = flow.pool.begin().await.unwrap();
    order_repo::insert_order(&mut tx, &order(1, 1)).await.unwrap();
    let err = order_repo::insert_order(&mut tx, &order(2, 2))
        .await
        .unwrap_err();
    tx.rollback().await.unwrap();

    assert!(matches!(err, RepoError::Duplicate(_)));
}

#[tokio::test]
async fn test_cashback_debit_appends_ledger_entry() {
    let flow = flow().await;
    seed_product(&flow.pool, 1, 1000).await;
    seed_customer(&flow.pool, 42).await;
    grant_cashback(&flow.pool, 42, 300).await;

    let mut req = request(800, vec![line(1, 1000, 1)]);
    req.customer_id = Some(42);
    req.apply_cashback_amount = Some(200);

    let detail = flow.service.place_order(STORE, &req).await.unwrap();
    assert_eq!(detail.order.cashback_used, 200);
    assert_eq!(detail.order.discounted_total, 800);

    let balance = customer_repo::cashback_balance(&flow.pool, STORE, 42)
        .await
        .unwrap();
    assert_eq!(balance, 100);

    // Debit entry references the order
    let kind: String = sqlx::query_scalar(
        "SELECT kind FROM cashback_entry WHERE order_id = ? AND customer_id = 42",
    )
    .bind(detail.order.id)
    .fetch_one(&flow.pool)
    .await
    .unwrap();
    assert_eq!(kind, "used");
}

#[tokio::test]
async fn test_cashback_insufficient_rejects_whole_order() {
    let flow = flow().await;
    seed_product(&flow.pool, 1, 1000).await;
    seed_customer(&flow.pool, 42).await;
    grant_cashback(&flow.pool, 42, 300).await;

    let mut req = request(500, vec![line(1, 1000, 1)]);
    req.customer_id = Some(42);
    req.apply_cashback_amount = Some(500);

    let err = flow.service.place_order(STORE, &req).await.unwrap_err();
    assert!(matches!(err, CheckoutError::CashbackInsufficient { .. }));
    assert_eq!(order_count(&flow.pool).await, 0);

    // Ledger untouched
    let balance = customer_repo::cashback_balance(&flow.pool, STORE, 42)
        .await
        .unwrap();
    assert_eq!(balance, 300);
}

#[tokio::test]
async fn test_structural_rejection_persists_nothing() {
    let flow = flow().await;
    seed_product(&flow.pool, 1, 1000).await;
    seed_group(&flow.pool, 10, 1, 1, 1).await;
    seed_option(&flow.pool, 100, 10, 0).await;

    // Required group omitted entirely
    let req = request(1000, vec![line(1, 1000, 1)]);
    let err = flow.service.place_order(STORE, &req).await.unwrap_err();
    assert!(matches!(err, CheckoutError::Structural { group_id: 10, .. }));
    assert_eq!(order_count(&flow.pool).await, 0);
}

#[tokio::test]
async fn test_price_mismatch_persists_nothing() {
    let flow = flow().await;
    seed_product(&flow.pool, 1, 1000).await;

    let req = request(900, vec![line(1, 900, 1)]);
    let err = flow.service.place_order(STORE, &req).await.unwrap_err();
    assert!(matches!(err, CheckoutError::PriceMismatch { .. }));
    assert_eq!(order_count(&flow.pool).await, 0);
}

#[tokio::test]
async fn test_unknown_product_is_catalog_integrity() {
    let flow = flow().await;

    let req = request(1000, vec![line(99, 1000, 1)]);
    let err = flow.service.place_order(STORE, &req).await.unwrap_err();
    assert!(matches!(
        err,
        CheckoutError::ProductMissing { product_id: 99 }
    ));
}

#[tokio::test]
async fn test_unknown_customer_rejected() {
    let flow = flow().await;
    seed_product(&flow.pool, 1, 1000).await;

    let mut req = request(1000, vec![line(1, 1000, 1)]);
    req.customer_id = Some(404);

    let err = flow.service.place_order(STORE, &req).await.unwrap_err();
    assert!(matches!(
        err,
        CheckoutError::CustomerNotFound { customer_id: 404 }
    ));
}

#[tokio::test]
async fn test_expired_coupon_not_resolved() {
    let flow = flow().await;
    seed_product(&flow.pool, 1, 1000).await;
    seed_coupon(&flow.pool, 7, "OLD", None, DiscountType::Fixed, 100, 10).await;
    // Window closed in the past
    sqlx::query("UPDATE coupon SET end_date = 1000 WHERE id = 7")
        .execute(&flow.pool)
        .await
        .unwrap();

    let mut req = request(900, vec![line(1, 1000, 1)]);
    req.coupon_code = Some("OLD".into());

    let err = flow.service.place_order(STORE, &req).await.unwrap_err();
    assert!(matches!(err, CheckoutError::CouponInvalid { .. }));
}

#[tokio::test]
async fn test_store_isolation_for_order_lookup() {
    let flow = flow().await;
    seed_product(&flow.pool, 1, 500).await;

    let req = request(500, vec![line(1, 500, 1)]);
    let detail = flow.service.place_order(STORE, &req).await.unwrap();

    let other_store = order_repo::find_by_public_id(&flow.pool, STORE + 1, &detail.order.public_id)
        .await
        .unwrap();
    assert!(other_store.is_none());
}
