//! Checkout engine
//!
//! Turns an untrusted submission into an immutable, fully priced order
//! aggregate, or rejects it with a typed error. The pipeline runs the
//! same gates in the same sequence for every submission:
//!
//! ```text
//! request ──► catalog + coupon load ──► structural validation
//!         ──► price recomputation ──► discount composition
//!         ──► persist (one transaction) ──► OrderCreated broadcast
//! ```
//!
//! The middle stages are pure functions over the loaded snapshots, so
//! pricing a submission twice yields identical results and nothing is
//! written before every gate has passed.

pub mod catalog;
pub mod coupons;
pub mod discount;
pub mod error;
pub mod persist;
pub mod pricing;
pub mod validate;

#[cfg(test)]
mod tests;

pub use error::{CheckoutError, CheckoutResult};

use shared::checkout::NewOrderRequest;
use shared::models::OrderDetail;
use shared::util::now_millis;
use sqlx::SqlitePool;

use crate::db::repository::{customer as customer_repo, order as order_repo};
use crate::events::{OrderCreated, OrderEvents};

/// The checkout engine over a database pool and the event channel
#[derive(Clone)]
pub struct CheckoutService {
    pool: SqlitePool,
    events: OrderEvents,
}

impl CheckoutService {
    pub fn new(pool: SqlitePool, events: OrderEvents) -> Self {
        Self { pool, events }
    }

    /// Run the full pipeline for one submission
    ///
    /// Returns the persisted aggregate on success. Every failure is a
    /// terminal, typed rejection; no partial writes survive.
    pub async fn place_order(
        &self,
        store_id: i64,
        request: &NewOrderRequest,
    ) -> CheckoutResult<OrderDetail> {
        let now = now_millis();

        // Resolve the customer reference before touching anything else
        let customer_id = match request.customer_id {
            Some(id) => {
                let customer = customer_repo::find_by_id(&self.pool, id).await?;
                if customer.is_none() {
                    return Err(CheckoutError::CustomerNotFound { customer_id: id });
                }
                Some(id)
            }
            None => None,
        };

        let (catalog, coupon_book) = tokio::try_join!(
            catalog::load(&self.pool, store_id, request),
            coupons::load(&self.pool, store_id, request, now),
        )?;

        validate::validate_structure(request, &catalog)?;
        let priced = pricing::price_order(request, &catalog, &coupon_book)?;

        // Balance read outside the commit; re-checked under the write lock
        let balance = match customer_id {
            Some(id) => customer_repo::cashback_balance(&self.pool, store_id, id).await?,
            None => 0,
        };
        let summary = discount::compose(request, &priced, &coupon_book, balance)?;

        let order_id = persist::persist_order(
            &self.pool,
            store_id,
            customer_id,
            request,
            &priced,
            &summary,
            &catalog,
            now,
        )
        .await?;

        let detail = order_repo::find_by_id(&self.pool, order_id)
            .await?
            .ok_or_else(|| {
                CheckoutError::Repo(crate::db::repository::RepoError::Database(
                    "committed order vanished".into(),
                ))
            })?;

        tracing::info!(
            store_id,
            order_id,
            public_id = %detail.order.public_id,
            sequential_id = detail.order.sequential_id,
            total = detail.order.discounted_total,
            "order committed"
        );

        self.events.publish(OrderCreated {
            order_id,
            store_id,
            customer_id,
            sequential_id: detail.order.sequential_id,
            public_id: detail.order.public_id.clone(),
            discounted_total: detail.order.discounted_total,
            created_at: detail.order.created_at,
        });

        Ok(detail)
    }
}
