//! Catalog snapshot
//!
//! Collects every product and variant-option id referenced by a
//! submission and resolves them in batch queries. A missing id fails
//! the whole submission before any validation or pricing runs.

use std::collections::{HashMap, HashSet};

use shared::checkout::NewOrderRequest;
use shared::models::{Product, VariantGroup, VariantGroupRule, VariantOption};
use sqlx::SqlitePool;

use super::error::{CheckoutError, CheckoutResult};
use crate::db::repository::product as product_repo;

/// Invocation-local view of the catalog rows a submission touches
#[derive(Debug, Default)]
pub struct CatalogSnapshot {
    pub products: HashMap<i64, Product>,
    /// Keyed by (product_id, variant_group_id)
    pub rules: HashMap<(i64, i64), VariantGroupRule>,
    pub options: HashMap<i64, VariantOption>,
    pub groups: HashMap<i64, VariantGroup>,
    /// Cross-sell products referenced by options, for price fallback
    pub linked_products: HashMap<i64, Product>,
}

impl CatalogSnapshot {
    pub fn product(&self, id: i64) -> CheckoutResult<&Product> {
        self.products
            .get(&id)
            .ok_or(CheckoutError::ProductMissing { product_id: id })
    }

    pub fn option(&self, id: i64) -> CheckoutResult<&VariantOption> {
        self.options
            .get(&id)
            .ok_or(CheckoutError::OptionMissing { option_id: id })
    }

    pub fn rule(&self, product_id: i64, group_id: i64) -> Option<&VariantGroupRule> {
        self.rules.get(&(product_id, group_id))
    }

    /// Expected option price: explicit override, else linked product
    /// base price, else zero.
    pub fn option_price(&self, option: &VariantOption) -> i64 {
        if let Some(price) = option.price_override {
            return price;
        }
        option
            .linked_product_id
            .and_then(|id| self.linked_products.get(&id))
            .map(|p| p.base_price)
            .unwrap_or(0)
    }
}

/// Load the snapshot for a submission
///
/// Fails with `CatalogIntegrity` when any referenced product or option
/// id resolves to nothing.
pub async fn load(
    pool: &SqlitePool,
    store_id: i64,
    request: &NewOrderRequest,
) -> CheckoutResult<CatalogSnapshot> {
    let mut product_ids: HashSet<i64> = HashSet::new();
    let mut option_ids: HashSet<i64> = HashSet::new();
    let mut group_ids: HashSet<i64> = HashSet::new();

    for line in &request.products {
        product_ids.insert(line.product_id);
        for selection in &line.variants {
            group_ids.insert(selection.variant_group_id);
            for option in &selection.options {
                option_ids.insert(option.variant_option_id);
            }
        }
    }

    let product_id_vec: Vec<i64> = product_ids.iter().copied().collect();
    let option_id_vec: Vec<i64> = option_ids.iter().copied().collect();
    let group_id_vec: Vec<i64> = group_ids.iter().copied().collect();

    let (products, options, groups) = tokio::try_join!(
        product_repo::find_by_ids(pool, store_id, &product_id_vec),
        product_repo::find_options_by_ids(pool, &option_id_vec),
        product_repo::find_groups_by_ids(pool, &group_id_vec),
    )?;

    // Every referenced id must have resolved
    let found: HashSet<i64> = products.iter().map(|p| p.id).collect();
    if let Some(missing) = product_ids.iter().find(|id| !found.contains(id)) {
        return Err(CheckoutError::ProductMissing {
            product_id: *missing,
        });
    }
    let found: HashSet<i64> = options.iter().map(|o| o.id).collect();
    if let Some(missing) = option_ids.iter().find(|id| !found.contains(id)) {
        return Err(CheckoutError::OptionMissing {
            option_id: *missing,
        });
    }

    let rules = product_repo::find_rules_for_products(pool, &product_id_vec).await?;

    // Cross-sell products priced as option fallbacks
    let linked_ids: Vec<i64> = options
        .iter()
        .filter(|o| o.price_override.is_none())
        .filter_map(|o| o.linked_product_id)
        .collect();
    let linked = product_repo::find_linked_by_ids(pool, &linked_ids).await?;

    Ok(CatalogSnapshot {
        products: products.into_iter().map(|p| (p.id, p)).collect(),
        rules: rules
            .into_iter()
            .map(|r| ((r.product_id, r.variant_group_id), r))
            .collect(),
        options: options.into_iter().map(|o| (o.id, o)).collect(),
        groups: groups.into_iter().map(|g| (g.id, g)).collect(),
        linked_products: linked.into_iter().map(|p| (p.id, p)).collect(),
    })
}
