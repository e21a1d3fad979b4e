//! 产品资源：模型、存储、查询/命令服务和 HTTP 处理器

pub mod command;
pub mod error;
pub mod handler;
pub mod memory;
pub mod model;
pub mod query;
pub mod seed;
pub mod sqlite;
pub mod store;

use std::sync::Arc;

use crate::config::{DatabaseConfig, StoreBackend};
use crate::infrastructure::database::DatabaseManager;

use self::memory::InMemoryProductStore;
use self::sqlite::SqliteProductStore;
use self::store::ProductStore;

/// 按配置打开存储后端
pub async fn open_store(config: &DatabaseConfig) -> Result<Arc<dyn ProductStore>, sqlx::Error> {
    match config.backend {
        StoreBackend::Memory => Ok(Arc::new(InMemoryProductStore::new())),
        StoreBackend::Sqlite => {
            let db = DatabaseManager::new(config).await?;
            let store = SqliteProductStore::new(db.get_pool().clone());
            store.create_tables().await?;
            Ok(Arc::new(store))
        }
    }
}
