//! Product / Variant Repository

use super::{RepoResult, sql_placeholders};
use shared::models::{Product, VariantGroup, VariantGroupRule, VariantOption};
use sqlx::SqlitePool;

/// Batch fetch active products by id within a store
pub async fn find_by_ids(
    pool: &SqlitePool,
    store_id: i64,
    ids: &[i64],
) -> RepoResult<Vec<Product>> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }
    let sql = format!(
        "SELECT id, store_id, name, base_price, promotion_price, activate_promotion, is_active \
         FROM product WHERE store_id = ? AND is_active = 1 AND id IN ({})",
        sql_placeholders(ids.len())
    );
    let mut query = sqlx::query_as::<_, Product>(&sql).bind(store_id);
    for id in ids {
        query = query.bind(id);
    }
    Ok(query.fetch_all(pool).await?)
}

/// Batch fetch variant-group rules for the given products
pub async fn find_rules_for_products(
    pool: &SqlitePool,
    product_ids: &[i64],
) -> RepoResult<Vec<VariantGroupRule>> {
    if product_ids.is_empty() {
        return Ok(Vec::new());
    }
    let sql = format!(
        "SELECT product_id, variant_group_id, min_selected, max_selected, max_total_quantity, available \
         FROM product_variant_link WHERE product_id IN ({})",
        sql_placeholders(product_ids.len())
    );
    let mut query = sqlx::query_as::<_, VariantGroupRule>(&sql);
    for id in product_ids {
        query = query.bind(id);
    }
    Ok(query.fetch_all(pool).await?)
}

/// Batch fetch active variant options by id
pub async fn find_options_by_ids(
    pool: &SqlitePool,
    ids: &[i64],
) -> RepoResult<Vec<VariantOption>> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }
    let sql = format!(
        "SELECT id, variant_group_id, name, price_override, linked_product_id, is_active \
         FROM variant_option WHERE is_active = 1 AND id IN ({})",
        sql_placeholders(ids.len())
    );
    let mut query = sqlx::query_as::<_, VariantOption>(&sql);
    for id in ids {
        query = query.bind(id);
    }
    Ok(query.fetch_all(pool).await?)
}

/// Batch fetch variant groups by id (for persisted group headings)
pub async fn find_groups_by_ids(
    pool: &SqlitePool,
    ids: &[i64],
) -> RepoResult<Vec<VariantGroup>> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }
    let sql = format!(
        "SELECT id, store_id, name FROM variant_group WHERE id IN ({})",
        sql_placeholders(ids.len())
    );
    let mut query = sqlx::query_as::<_, VariantGroup>(&sql);
    for id in ids {
        query = query.bind(id);
    }
    Ok(query.fetch_all(pool).await?)
}

/// Batch fetch linked cross-sell products regardless of store
///
/// Option pricing falls back to the linked product's base price, so
/// these rows are needed even when the products themselves are not
/// part of the submission.
pub async fn find_linked_by_ids(pool: &SqlitePool, ids: &[i64]) -> RepoResult<Vec<Product>> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }
    let sql = format!(
        "SELECT id, store_id, name, base_price, promotion_price, activate_promotion, is_active \
         FROM product WHERE id IN ({})",
        sql_placeholders(ids.len())
    );
    let mut query = sqlx::query_as::<_, Product>(&sql);
    for id in ids {
        query = query.bind(id);
    }
    Ok(query.fetch_all(pool).await?)
}
