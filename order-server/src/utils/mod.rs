//! 工具模块 - 日志和统一错误类型

pub mod logger;

// Re-export unified error types from shared
pub use shared::error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};
