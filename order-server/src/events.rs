//! Order event broadcast
//!
//! Successful checkouts publish an [`OrderCreated`] event after the
//! commit. Consumers subscribe to the broadcast channel; a lagging or
//! absent consumer never affects the checkout path.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

const EVENT_CHANNEL_CAPACITY: usize = 256;

/// Published once per committed order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderCreated {
    pub order_id: i64,
    pub store_id: i64,
    pub customer_id: Option<i64>,
    pub sequential_id: i64,
    pub public_id: String,
    /// Amount payable in cents
    pub discounted_total: i64,
    pub created_at: i64,
}

/// Shared handle on the order event channel
#[derive(Debug, Clone)]
pub struct OrderEvents {
    tx: broadcast::Sender<OrderCreated>,
}

impl OrderEvents {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<OrderCreated> {
        self.tx.subscribe()
    }

    /// Publish an event; no receivers is not an error
    pub fn publish(&self, event: OrderCreated) {
        match self.tx.send(event) {
            Ok(n) => tracing::debug!(receivers = n, "order event published"),
            Err(_) => tracing::debug!("order event dropped, no subscribers"),
        }
    }
}

impl Default for OrderEvents {
    fn default() -> Self {
        Self::new()
    }
}
