//! Customer / Cashback Repository

use super::RepoResult;
use shared::models::{CashbackKind, Customer};
use shared::util::{now_millis, snowflake_id};
use sqlx::{Sqlite, SqlitePool, Transaction};

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Customer>> {
    let customer =
        sqlx::query_as::<_, Customer>("SELECT id, name, phone FROM customer WHERE id = ?")
            .bind(id)
            .fetch_optional(pool)
            .await?;
    Ok(customer)
}

/// Current ledger balance: Σ generated − Σ used
pub async fn cashback_balance(
    pool: &SqlitePool,
    store_id: i64,
    customer_id: i64,
) -> RepoResult<i64> {
    let balance = sqlx::query_scalar::<_, i64>(
        "SELECT COALESCE(SUM(CASE kind WHEN 'generated' THEN amount ELSE -amount END), 0) \
         FROM cashback_entry WHERE store_id = ? AND customer_id = ?",
    )
    .bind(store_id)
    .bind(customer_id)
    .fetch_one(pool)
    .await?;
    Ok(balance)
}

/// Same balance query against an open transaction
///
/// Used for the re-check inside the order commit, where the write
/// lock is already held.
pub async fn cashback_balance_tx(
    tx: &mut Transaction<'_, Sqlite>,
    store_id: i64,
    customer_id: i64,
) -> RepoResult<i64> {
    let balance = sqlx::query_scalar::<_, i64>(
        "SELECT COALESCE(SUM(CASE kind WHEN 'generated' THEN amount ELSE -amount END), 0) \
         FROM cashback_entry WHERE store_id = ? AND customer_id = ?",
    )
    .bind(store_id)
    .bind(customer_id)
    .fetch_one(&mut **tx)
    .await?;
    Ok(balance)
}

/// Append a ledger entry inside an open transaction
pub async fn append_cashback_entry(
    tx: &mut Transaction<'_, Sqlite>,
    store_id: i64,
    customer_id: i64,
    order_id: Option<i64>,
    amount: i64,
    kind: CashbackKind,
) -> RepoResult<i64> {
    let id = snowflake_id();
    sqlx::query(
        "INSERT INTO cashback_entry (id, customer_id, store_id, order_id, amount, kind, created_at) \
         VALUES (?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(id)
    .bind(customer_id)
    .bind(store_id)
    .bind(order_id)
    .bind(amount)
    .bind(kind)
    .bind(now_millis())
    .execute(&mut **tx)
    .await?;
    Ok(id)
}
