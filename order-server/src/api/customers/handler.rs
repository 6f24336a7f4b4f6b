//! Customers API Handlers

use axum::{
    Json,
    extract::{Path, State},
};

use crate::core::ServerState;
use crate::db::repository::customer as customer_repo;
use crate::utils::{AppError, AppResult, ErrorCode};
use shared::models::CashbackBalance;

/// GET /api/stores/{store_id}/customers/{customer_id}/cashback
///
/// Current ledger balance: Σ generated − Σ used.
pub async fn cashback_balance(
    State(state): State<ServerState>,
    Path((store_id, customer_id)): Path<(i64, i64)>,
) -> AppResult<Json<CashbackBalance>> {
    let customer = customer_repo::find_by_id(state.pool(), customer_id)
        .await
        .map_err(AppError::from)?;
    if customer.is_none() {
        return Err(AppError::new(ErrorCode::CustomerNotFound).with_detail("id", customer_id));
    }

    let balance = customer_repo::cashback_balance(state.pool(), store_id, customer_id)
        .await
        .map_err(AppError::from)?;

    Ok(Json(CashbackBalance {
        customer_id,
        balance,
    }))
}
