use sqlx::SqlitePool;

use crate::checkout::CheckoutService;
use crate::core::Config;
use crate::db::DbService;
use crate::events::OrderEvents;
use crate::utils::AppError;

/// 服务器状态 - 持有所有服务的共享引用
///
/// ServerState 是订单服务的核心数据结构。所有字段都是浅拷贝
/// (连接池 / broadcast sender 内部为 Arc)，克隆成本极低。
#[derive(Clone)]
pub struct ServerState {
    /// 服务器配置
    pub config: Config,
    /// 数据库服务 (SQLite WAL)
    pub db: DbService,
    /// 订单事件广播
    pub events: OrderEvents,
    /// 结账引擎
    pub checkout: CheckoutService,
}

impl ServerState {
    /// 初始化服务器状态: 打开数据库、运行迁移、装配结账引擎
    pub async fn initialize(config: &Config) -> Result<Self, AppError> {
        let db = DbService::new(&config.database_path).await?;
        Ok(Self::with_db(config.clone(), db))
    }

    /// 使用已打开的数据库装配状态 (测试场景)
    pub fn with_db(config: Config, db: DbService) -> Self {
        let events = OrderEvents::new();
        let checkout = CheckoutService::new(db.pool.clone(), events.clone());
        Self {
            config,
            db,
            events,
            checkout,
        }
    }

    /// 获取数据库连接池
    pub fn pool(&self) -> &SqlitePool {
        &self.db.pool
    }
}
