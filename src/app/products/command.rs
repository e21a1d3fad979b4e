//! 产品写操作服务
//!
//! 所有写操作都经过 [`ProductStore::commit`]；提交失败报告为校验失败，不重试。

use std::sync::Arc;

use tracing::{info, warn};
use validator::Validate;

use super::error::ProductError;
use super::model::{Product, ProductPatch};
use super::store::{ChangeSet, ProductStore};

#[derive(Clone)]
pub struct ProductCommandService {
    store: Arc<dyn ProductStore>,
}

impl ProductCommandService {
    pub fn new(store: Arc<dyn ProductStore>) -> Self {
        Self { store }
    }

    /// 创建产品；编号已存在时由存储层拒绝
    pub async fn create(&self, product: Product) -> Result<Product, ProductError> {
        product.validate()?;

        let mut changes = ChangeSet::new();
        changes.add(product.clone());
        self.commit(changes).await?;

        info!("Created product: {}", product.product_number);
        Ok(product)
    }

    /// 整体替换名称、价格和部门，产品编号只作为查找键
    pub async fn replace(&self, product: Product) -> Result<Product, ProductError> {
        product.validate()?;

        let mut existing = self.find(&product.product_number).await?;
        existing.name = product.name;
        existing.price = product.price;
        existing.department = product.department;

        let mut changes = ChangeSet::new();
        changes.update(existing.clone());
        self.commit(changes).await?;

        info!("Replaced product: {}", existing.product_number);
        Ok(existing)
    }

    /// 部分更新；合并后的结果重新校验，不合法时不写入
    pub async fn patch(
        &self,
        product_number: &str,
        patch: &ProductPatch,
    ) -> Result<Product, ProductError> {
        let existing = self.find(product_number).await?;

        let patched = patch.apply(&existing);
        patched.validate()?;

        let mut changes = ChangeSet::new();
        changes.update(patched.clone());
        self.commit(changes).await?;

        info!("Patched product: {}", patched.product_number);
        Ok(patched)
    }

    pub async fn delete(&self, product_number: &str) -> Result<(), ProductError> {
        let existing = self.find(product_number).await?;

        let mut changes = ChangeSet::new();
        changes.remove(existing.clone());
        self.commit(changes).await?;

        info!("Deleted product: {}", existing.product_number);
        Ok(())
    }

    async fn find(&self, product_number: &str) -> Result<Product, ProductError> {
        self.store
            .find_by_number(product_number)
            .await?
            .ok_or_else(|| ProductError::NotFound(product_number.to_string()))
    }

    async fn commit(&self, changes: ChangeSet) -> Result<(), ProductError> {
        self.store.commit(changes).await.map_err(|err| {
            warn!("Commit failed: {}", err);
            ProductError::commit_failed(err)
        })
    }
}
