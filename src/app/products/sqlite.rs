//! 基于 SQLx 的 SQLite 产品存储

use async_trait::async_trait;
use sqlx::sqlite::SqlitePool;
use tracing::info;

use super::model::{product_key, Product};
use super::store::{Change, ChangeSet, ProductStore, StoreError, StoreResult};

#[derive(Debug, Clone)]
pub struct SqliteProductStore {
    pool: SqlitePool,
}

impl SqliteProductStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// 创建产品表（在实际应用中应该使用迁移）
    ///
    /// `product_key` 保存小写的产品编号，主键约束保证不区分大小写的唯一性。
    pub async fn create_tables(&self) -> Result<(), sqlx::Error> {
        info!("Creating products table...");

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS products (
                product_key    TEXT PRIMARY KEY NOT NULL,
                product_number TEXT NOT NULL,
                name           TEXT NOT NULL,
                price          REAL NOT NULL,
                department     TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

#[async_trait]
impl ProductStore for SqliteProductStore {
    fn backend(&self) -> &'static str {
        "sqlite"
    }

    async fn find_all(&self) -> StoreResult<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>(
            "SELECT product_number, name, price, department FROM products",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }

    async fn find_by_number(&self, product_number: &str) -> StoreResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(
            "SELECT product_number, name, price, department FROM products WHERE product_key = ?1",
        )
        .bind(product_key(product_number))
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    async fn count(&self) -> StoreResult<usize> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;

        Ok(count.0 as usize)
    }

    async fn commit(&self, changes: ChangeSet) -> StoreResult<()> {
        // 未提交的事务在 drop 时回滚
        let mut tx = self.pool.begin().await?;

        for change in changes {
            match change {
                Change::Add(product) => {
                    sqlx::query(
                        "INSERT INTO products (product_key, product_number, name, price, department) \
                         VALUES (?1, ?2, ?3, ?4, ?5)",
                    )
                    .bind(product.key())
                    .bind(&product.product_number)
                    .bind(&product.name)
                    .bind(product.price)
                    .bind(&product.department)
                    .execute(&mut *tx)
                    .await
                    .map_err(|err| insert_error(err, &product.product_number))?;
                }
                Change::Update(product) => {
                    let result = sqlx::query(
                        "UPDATE products SET name = ?2, price = ?3, department = ?4 \
                         WHERE product_key = ?1",
                    )
                    .bind(product.key())
                    .bind(&product.name)
                    .bind(product.price)
                    .bind(&product.department)
                    .execute(&mut *tx)
                    .await?;

                    if result.rows_affected() == 0 {
                        return Err(StoreError::Missing(product.product_number));
                    }
                }
                Change::Remove(product) => {
                    let result = sqlx::query("DELETE FROM products WHERE product_key = ?1")
                        .bind(product.key())
                        .execute(&mut *tx)
                        .await?;

                    if result.rows_affected() == 0 {
                        return Err(StoreError::Missing(product.product_number));
                    }
                }
            }
        }

        tx.commit().await?;
        Ok(())
    }
}

fn insert_error(err: sqlx::Error, product_number: &str) -> StoreError {
    match &err {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
            StoreError::Duplicate(product_number.to_string())
        }
        _ => StoreError::Database(err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::products::seed::{self, SEED_COUNT};
    use crate::config::DatabaseConfig;
    use rand::{rngs::StdRng, SeedableRng};
    use crate::infrastructure::database::DatabaseManager;

    async fn create_test_store() -> SqliteProductStore {
        let config = DatabaseConfig {
            url: "sqlite::memory:".to_string(),
            ..Default::default()
        };
        let db = DatabaseManager::new(&config)
            .await
            .expect("Failed to open in-memory database");

        let store = SqliteProductStore::new(db.get_pool().clone());
        store.create_tables().await.expect("Failed to create tables");
        store
    }

    fn product(number: &str, price: f64) -> Product {
        Product::new(number, "Rustic Granite Car", price, "Electronics")
    }

    #[tokio::test]
    async fn test_add_and_find() {
        let store = create_test_store().await;
        assert!(store.is_empty().await.unwrap());

        let mut changes = ChangeSet::new();
        changes.add(product("Electronics-Car-001", 33.5));
        store.commit(changes).await.unwrap();

        let found = store
            .find_by_number("ELECTRONICS-CAR-001")
            .await
            .unwrap()
            .expect("product should exist");
        assert_eq!(found, product("Electronics-Car-001", 33.5));
        assert_eq!(store.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_rolls_back_whole_commit() {
        let store = create_test_store().await;
        let mut changes = ChangeSet::new();
        changes.add(product("Electronics-Car-001", 10.0));
        store.commit(changes).await.unwrap();

        let mut changes = ChangeSet::new();
        changes
            .add(product("Electronics-Car-002", 11.0))
            .add(product("electronics-car-001", 12.0));
        let err = store.commit(changes).await.unwrap_err();
        assert!(matches!(err, StoreError::Duplicate(_)));

        let all = store.find_all().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].price, 10.0);
    }

    #[tokio::test]
    async fn test_update_and_remove() {
        let store = create_test_store().await;
        let mut changes = ChangeSet::new();
        changes.add(product("Electronics-Car-001", 10.0));
        store.commit(changes).await.unwrap();

        let mut changes = ChangeSet::new();
        changes.update(product("Electronics-Car-001", 99.0));
        store.commit(changes).await.unwrap();
        let found = store.find_by_number("electronics-car-001").await.unwrap();
        assert_eq!(found.map(|p| p.price), Some(99.0));

        let mut changes = ChangeSet::new();
        changes.remove(product("ELECTRONICS-CAR-001", 99.0));
        store.commit(changes).await.unwrap();
        assert!(store.is_empty().await.unwrap());

        let mut changes = ChangeSet::new();
        changes.update(product("Electronics-Car-001", 1.0));
        assert!(matches!(
            store.commit(changes).await,
            Err(StoreError::Missing(_))
        ));
    }

    #[tokio::test]
    async fn test_seed_commits_once() {
        let store = create_test_store().await;
        let mut rng = StdRng::seed_from_u64(11);

        let seeded = seed::init_data(&store, &mut rng).await.unwrap();
        assert_eq!(seeded, SEED_COUNT);
        assert_eq!(store.count().await.unwrap(), SEED_COUNT);

        // 已有数据时不再写入
        let seeded = seed::init_data(&store, &mut rng).await.unwrap();
        assert_eq!(seeded, 0);
        assert_eq!(store.find_all().await.unwrap().len(), SEED_COUNT);

        let first = store
            .find_all()
            .await
            .unwrap()
            .into_iter()
            .find(|p| p.product_number.ends_with("-001"))
            .expect("sequence starts at 001");
        let found = store
            .find_by_number(&first.product_number.to_uppercase())
            .await
            .unwrap();
        assert_eq!(found, Some(first));
    }
}
