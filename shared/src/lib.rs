//! Shared types for the order server
//!
//! Domain models, the unified error system, checkout request DTOs and
//! small utilities used by both the server and its clients.

pub mod checkout;
pub mod error;
pub mod models;
pub mod util;

// Re-exports
pub use serde::{Deserialize, Serialize};

pub use error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};
