//! Customers API Module
//!
//! REST endpoints for customer cashback balance.

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().route(
        "/api/stores/{store_id}/customers/{customer_id}/cashback",
        get(handler::cashback_balance),
    )
}
