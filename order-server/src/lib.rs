//! Order Server - 订单构建与价格完整性校验服务
//!
//! # 架构概述
//!
//! 服务端是价格的唯一权威：客户端提交的所有金额仅作为声明参与比对，
//! 任何不一致都会拒绝整个订单。核心流程：
//!
//! - **目录快照** (`checkout::catalog`): 批量解析提交引用的商品和选项
//! - **优惠券解析** (`checkout::coupons`): 店铺范围内的可用券批量查询
//! - **结构校验** (`checkout::validate`): 变体组基数规则
//! - **价格重算** (`checkout::pricing`): 纯函数逐项重算
//! - **折扣合成** (`checkout::discount`): 券 + 返现的固定优先级合成
//! - **持久化** (`checkout::persist`): 单事务写入不可变聚合
//!
//! # 模块结构
//!
//! ```text
//! order-server/src/
//! ├── core/          # 配置、状态、HTTP 服务器
//! ├── checkout/      # 结账引擎 (六个阶段)
//! ├── api/           # HTTP 路由和处理器
//! ├── db/            # 数据库层 (SQLite WAL)
//! ├── events.rs      # 订单事件广播
//! └── utils/         # 日志和统一错误
//! ```

pub mod api;
pub mod checkout;
pub mod core;
pub mod db;
pub mod events;
pub mod utils;

// Re-export 公共类型
pub use checkout::{CheckoutError, CheckoutService};
pub use core::{Config, Server, ServerState};
pub use events::{OrderCreated, OrderEvents};
pub use utils::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};
