//! Customer and cashback ledger models

use serde::{Deserialize, Serialize};

/// Customer entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Customer {
    pub id: i64,
    pub name: String,
    pub phone: Option<String>,
}

/// Direction of a cashback ledger entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "lowercase"))]
pub enum CashbackKind {
    Generated,
    Used,
}

/// Append-only cashback ledger entry
///
/// Balance = Σ generated − Σ used. Entries are never updated or
/// deleted; a debit appends a `Used` row referencing the order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct CashbackEntry {
    pub id: i64,
    pub customer_id: i64,
    pub store_id: i64,
    pub order_id: Option<i64>,
    /// Amount in cents, always positive
    pub amount: i64,
    pub kind: CashbackKind,
    /// Epoch millis
    pub created_at: i64,
}

/// Current ledger balance for a customer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CashbackBalance {
    pub customer_id: i64,
    pub balance: i64,
}
