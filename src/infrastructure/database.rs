//! 数据库基础设施

use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions},
    Error,
};
use std::{str::FromStr, time::Duration};
use tracing::info;

use crate::config::DatabaseConfig;

pub struct DatabaseManager {
    pool: SqlitePool,
}

impl DatabaseManager {
    pub async fn new(config: &DatabaseConfig) -> Result<Self, Error> {
        let options = SqliteConnectOptions::from_str(&config.url)?.create_if_missing(true);

        // 每个内存数据库连接都是独立的库，只能用一个常驻连接
        let pool_options = if is_in_memory(&config.url) {
            SqlitePoolOptions::new()
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new()
                .max_connections(config.max_connections)
                .acquire_timeout(Duration::from_secs(8))
        };

        info!("Connecting to database: {}", config.url);
        let pool = pool_options.connect_with(options).await?;

        Ok(Self { pool })
    }

    pub fn get_pool(&self) -> &SqlitePool {
        &self.pool
    }
}

fn is_in_memory(url: &str) -> bool {
    url.contains(":memory:") || url.contains("mode=memory")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_memory_detection() {
        assert!(is_in_memory("sqlite::memory:"));
        assert!(is_in_memory("sqlite://file:products?mode=memory&cache=shared"));
        assert!(!is_in_memory("sqlite://products.db"));
    }

    #[tokio::test]
    async fn test_connect_in_memory() {
        let config = DatabaseConfig {
            url: "sqlite::memory:".to_string(),
            ..Default::default()
        };
        let db = DatabaseManager::new(&config).await.unwrap();

        let one: (i64,) = sqlx::query_as("SELECT 1")
            .fetch_one(db.get_pool())
            .await
            .unwrap();
        assert_eq!(one.0, 1);
    }
}
