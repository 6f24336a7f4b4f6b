//! API 路由模块
//!
//! # 结构
//!
//! - [`health`] - 健康检查
//! - [`orders`] - 下单和订单查询接口
//! - [`customers`] - 客户返现余额接口

pub mod customers;
pub mod health;
pub mod orders;

// Re-export common types for handlers
pub use crate::utils::{AppError, AppResult};
