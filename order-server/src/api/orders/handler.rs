//! Orders API Handlers
//!
//! - Place an order (runs the checkout engine)
//! - Fetch a persisted aggregate by public id

use axum::{
    Json,
    extract::{Path, State},
};
use validator::Validate;

use crate::core::ServerState;
use crate::db::repository::order as order_repo;
use crate::utils::{AppError, AppResult, ErrorCode};
use shared::checkout::NewOrderRequest;
use shared::models::OrderDetail;

/// POST /api/stores/{store_id}/orders - Submit a checkout
///
/// The request carries claimed prices; the server recomputes every one
/// of them and rejects the whole submission on any disagreement.
pub async fn place_order(
    State(state): State<ServerState>,
    Path(store_id): Path<i64>,
    Json(request): Json<NewOrderRequest>,
) -> AppResult<Json<OrderDetail>> {
    request
        .validate()
        .map_err(|e| AppError::validation(e.to_string()))?;

    let detail = state.checkout.place_order(store_id, &request).await?;
    Ok(Json(detail))
}

/// GET /api/stores/{store_id}/orders/{public_id} - Fetch an order
pub async fn get_by_public_id(
    State(state): State<ServerState>,
    Path((store_id, public_id)): Path<(i64, String)>,
) -> AppResult<Json<OrderDetail>> {
    let detail = order_repo::find_by_public_id(state.pool(), store_id, &public_id)
        .await
        .map_err(AppError::from)?
        .ok_or_else(|| {
            AppError::new(ErrorCode::OrderNotFound).with_detail("public_id", public_id)
        })?;
    Ok(Json(detail))
}
