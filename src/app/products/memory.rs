//! 内存产品存储，用于测试和 `memory` 后端

use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::model::{product_key, Product};
use super::store::{Change, ChangeSet, ProductStore, StoreError, StoreResult};

#[derive(Debug, Default)]
pub struct InMemoryProductStore {
    products: RwLock<BTreeMap<String, Product>>,
}

impl InMemoryProductStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProductStore for InMemoryProductStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn find_all(&self) -> StoreResult<Vec<Product>> {
        Ok(self.products.read().await.values().cloned().collect())
    }

    async fn find_by_number(&self, product_number: &str) -> StoreResult<Option<Product>> {
        let key = product_key(product_number);
        Ok(self.products.read().await.get(&key).cloned())
    }

    async fn count(&self) -> StoreResult<usize> {
        Ok(self.products.read().await.len())
    }

    async fn commit(&self, changes: ChangeSet) -> StoreResult<()> {
        let mut products = self.products.write().await;

        // 在副本上执行，全部成功后再替换
        let mut staged = products.clone();
        for change in changes {
            match change {
                Change::Add(product) => {
                    let key = product.key();
                    if staged.contains_key(&key) {
                        return Err(StoreError::Duplicate(product.product_number));
                    }
                    staged.insert(key, product);
                }
                Change::Update(product) => match staged.get_mut(&product.key()) {
                    Some(existing) => *existing = product,
                    None => return Err(StoreError::Missing(product.product_number)),
                },
                Change::Remove(product) => {
                    if staged.remove(&product.key()).is_none() {
                        return Err(StoreError::Missing(product.product_number));
                    }
                }
            }
        }

        *products = staged;
        Ok(())
    }
}
