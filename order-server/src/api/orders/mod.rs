//! Orders API Module
//!
//! REST endpoints for checkout and order lookup.

mod handler;

use axum::{Router, routing::get, routing::post};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/stores/{store_id}/orders", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", post(handler::place_order))
        .route("/{public_id}", get(handler::get_by_public_id))
}
