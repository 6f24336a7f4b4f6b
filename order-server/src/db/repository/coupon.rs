//! Coupon Repository

use super::{RepoResult, sql_placeholders};
use shared::models::Coupon;
use sqlx::{Sqlite, SqlitePool, Transaction};

const COUPON_COLUMNS: &str = "id, store_id, code, product_id, discount_type, discount_value, \
                              max_uses, used, start_date, end_date, is_active";

/// Batch fetch usable coupons by code within a store
///
/// Filters to active coupons with uses left whose validity window
/// contains `now` (open bounds pass). Codes with no matching row are
/// simply absent from the result.
pub async fn find_usable_by_codes(
    pool: &SqlitePool,
    store_id: i64,
    codes: &[String],
    now: i64,
) -> RepoResult<Vec<Coupon>> {
    if codes.is_empty() {
        return Ok(Vec::new());
    }
    let sql = format!(
        "SELECT {COUPON_COLUMNS} FROM coupon \
         WHERE store_id = ? AND is_active = 1 AND used < max_uses \
           AND (start_date IS NULL OR start_date <= ?) \
           AND (end_date IS NULL OR end_date >= ?) \
           AND code IN ({})",
        sql_placeholders(codes.len())
    );
    let mut query = sqlx::query_as::<_, Coupon>(&sql)
        .bind(store_id)
        .bind(now)
        .bind(now);
    for code in codes {
        query = query.bind(code);
    }
    Ok(query.fetch_all(pool).await?)
}

/// Consume one use of a coupon inside an open transaction
///
/// The conditional increment is the concurrency guard: a competing
/// order that took the last use makes this affect zero rows.
/// Returns whether the use was actually taken.
pub async fn consume_use(tx: &mut Transaction<'_, Sqlite>, coupon_id: i64) -> RepoResult<bool> {
    let rows = sqlx::query("UPDATE coupon SET used = used + 1 WHERE id = ? AND used < max_uses")
        .bind(coupon_id)
        .execute(&mut **tx)
        .await?;
    Ok(rows.rows_affected() == 1)
}

/// Fetch a coupon by id (diagnostics and tests)
pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Coupon>> {
    let sql = format!("SELECT {COUPON_COLUMNS} FROM coupon WHERE id = ?");
    let coupon = sqlx::query_as::<_, Coupon>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(coupon)
}
