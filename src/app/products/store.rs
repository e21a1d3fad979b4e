//! 产品存储抽象
//!
//! 写操作先暂存在 [`ChangeSet`] 中，只有调用 [`ProductStore::commit`] 后才对后续读取可见。
//! 一次提交要么全部生效，要么全部不生效。

use async_trait::async_trait;

use super::model::Product;

/// 存储层错误
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("a product with number '{0}' already exists")]
    Duplicate(String),
    #[error("product '{0}' does not exist")]
    Missing(String),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// 暂存的写操作
#[derive(Debug, Clone, PartialEq)]
pub enum Change {
    Add(Product),
    Update(Product),
    Remove(Product),
}

/// 一次提交的工作单元，按加入顺序执行
#[derive(Debug, Clone, Default)]
pub struct ChangeSet {
    changes: Vec<Change>,
}

impl ChangeSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, product: Product) -> &mut Self {
        self.changes.push(Change::Add(product));
        self
    }

    pub fn add_range(&mut self, products: impl IntoIterator<Item = Product>) -> &mut Self {
        self.changes.extend(products.into_iter().map(Change::Add));
        self
    }

    pub fn update(&mut self, product: Product) -> &mut Self {
        self.changes.push(Change::Update(product));
        self
    }

    pub fn remove(&mut self, product: Product) -> &mut Self {
        self.changes.push(Change::Remove(product));
        self
    }

}

impl IntoIterator for ChangeSet {
    type Item = Change;
    type IntoIter = std::vec::IntoIter<Change>;

    fn into_iter(self) -> Self::IntoIter {
        self.changes.into_iter()
    }
}

/// 产品存储
#[async_trait]
pub trait ProductStore: Send + Sync {
    /// 存储后端名称，用于日志和健康检查
    fn backend(&self) -> &'static str;

    /// 所有已提交的产品，顺序不保证
    async fn find_all(&self) -> StoreResult<Vec<Product>>;

    /// 按产品编号查找（不区分大小写）
    async fn find_by_number(&self, product_number: &str) -> StoreResult<Option<Product>>;

    /// 原子地提交一组变更
    async fn commit(&self, changes: ChangeSet) -> StoreResult<()>;

    /// 已提交的产品数量
    async fn count(&self) -> StoreResult<usize> {
        Ok(self.find_all().await?.len())
    }

    async fn is_empty(&self) -> StoreResult<bool> {
        Ok(self.count().await? == 0)
    }
}
