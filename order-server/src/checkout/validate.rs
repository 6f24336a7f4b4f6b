//! Structural validation
//!
//! Pure checks of each submitted variant selection against the
//! product's group rules. Violations are terminal and name the group
//! and the bound that failed; selections are never trimmed or
//! auto-corrected.

use std::collections::HashSet;

use shared::checkout::{NewOrderItem, NewOrderRequest};

use super::catalog::CatalogSnapshot;
use super::error::{CheckoutError, CheckoutResult};

/// Validate every line of the request against the catalog snapshot
pub fn validate_structure(
    request: &NewOrderRequest,
    catalog: &CatalogSnapshot,
) -> CheckoutResult<()> {
    for line in &request.products {
        validate_line(line, catalog)?;
    }
    Ok(())
}

fn validate_line(line: &NewOrderItem, catalog: &CatalogSnapshot) -> CheckoutResult<()> {
    let product_id = line.product_id;
    // Catalog loading already guaranteed presence; keep the gate anyway
    catalog.product(product_id)?;

    let mut seen_groups: HashSet<i64> = HashSet::new();

    for selection in &line.variants {
        let group_id = selection.variant_group_id;

        if !seen_groups.insert(group_id) {
            return Err(CheckoutError::structural(
                product_id,
                group_id,
                "group submitted more than once",
            ));
        }

        let rule = catalog.rule(product_id, group_id).ok_or_else(|| {
            CheckoutError::structural(product_id, group_id, "group not linked to product")
        })?;
        if !rule.available {
            return Err(CheckoutError::structural(
                product_id,
                group_id,
                "group not available for product",
            ));
        }

        // Every option must belong to the declared group
        let mut seen_options: HashSet<i64> = HashSet::new();
        let mut total_quantity: i64 = 0;
        for selected in &selection.options {
            let option = catalog.option(selected.variant_option_id)?;
            if option.variant_group_id != group_id {
                return Err(CheckoutError::structural(
                    product_id,
                    group_id,
                    format!("option {} belongs to another group", option.id),
                ));
            }
            if !seen_options.insert(option.id) {
                return Err(CheckoutError::structural(
                    product_id,
                    group_id,
                    format!("option {} selected more than once", option.id),
                ));
            }
            total_quantity += selected.quantity;
        }

        let distinct = seen_options.len() as i64;
        if distinct < rule.min_selected {
            return Err(CheckoutError::structural(
                product_id,
                group_id,
                format!(
                    "{} option(s) selected, minimum is {}",
                    distinct, rule.min_selected
                ),
            ));
        }
        if distinct > rule.max_selected {
            return Err(CheckoutError::structural(
                product_id,
                group_id,
                format!(
                    "{} option(s) selected, maximum is {}",
                    distinct, rule.max_selected
                ),
            ));
        }
        if let Some(max_total) = rule.max_total_quantity
            && total_quantity > max_total
        {
            return Err(CheckoutError::structural(
                product_id,
                group_id,
                format!(
                    "total option quantity {} exceeds limit {}",
                    total_quantity, max_total
                ),
            ));
        }
    }

    // Required groups must be present even when the client omits them
    for ((rule_product, group_id), rule) in &catalog.rules {
        if *rule_product == product_id
            && rule.available
            && rule.min_selected > 0
            && !seen_groups.contains(group_id)
        {
            return Err(CheckoutError::structural(
                product_id,
                *group_id,
                format!("group requires at least {} option(s)", rule.min_selected),
            ));
        }
    }

    Ok(())
}
