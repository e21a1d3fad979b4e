//! 产品查询服务

use std::sync::Arc;

use serde::Deserialize;
use tracing::warn;

use super::error::ProductError;
use super::model::Product;
use super::store::ProductStore;

pub const DEFAULT_LIMIT: usize = 15;

/// 达到此页大小时记录一条提示日志，不拒绝请求
pub const LARGE_PAGE_LIMIT: usize = 100;

/// 列表查询参数
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ListQuery {
    pub department: Option<String>,
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

impl ListQuery {
    pub fn limit(&self) -> usize {
        self.limit.unwrap_or(DEFAULT_LIMIT)
    }

    pub fn offset(&self) -> usize {
        self.offset.unwrap_or(0)
    }

    pub fn department(&self) -> &str {
        self.department.as_deref().unwrap_or_default()
    }
}

/// 一页结果；`total_count` 是分页前的匹配数量
#[derive(Debug, Clone, PartialEq)]
pub struct ProductPage {
    pub items: Vec<Product>,
    pub total_count: usize,
}

/// 过滤、排序、分页
pub fn select_page(products: Vec<Product>, query: &ListQuery) -> ProductPage {
    let department = query.department();
    let mut matched: Vec<Product> = products
        .into_iter()
        .filter(|product| product.in_department(department))
        .collect();
    let total_count = matched.len();

    matched.sort_by(|a, b| a.product_number.cmp(&b.product_number));

    let items = matched
        .into_iter()
        .skip(query.offset())
        .take(query.limit())
        .collect();

    ProductPage { items, total_count }
}

#[derive(Clone)]
pub struct ProductQueryService {
    store: Arc<dyn ProductStore>,
}

impl ProductQueryService {
    pub fn new(store: Arc<dyn ProductStore>) -> Self {
        Self { store }
    }

    pub async fn list(&self, query: &ListQuery) -> Result<ProductPage, ProductError> {
        if query.limit() >= LARGE_PAGE_LIMIT {
            warn!(limit = query.limit(), "Large page requested");
        }

        let products = self.store.find_all().await?;
        Ok(select_page(products, query))
    }

    pub async fn get_by_number(&self, product_number: &str) -> Result<Product, ProductError> {
        self.store
            .find_by_number(product_number)
            .await?
            .ok_or_else(|| ProductError::NotFound(product_number.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::products::memory::InMemoryProductStore;
    use crate::app::products::store::ChangeSet;

    fn catalog() -> Vec<Product> {
        vec![
            Product::new("Music-Pants-004", "Smart Plastic Pants", 20.0, "Music"),
            Product::new("Books-Chair-001", "Small Steel Chair", 10.0, "Books"),
            Product::new("Movies-Car-003", "Sleek Wooden Car", 30.0, "Movies"),
            Product::new("Books-Shoes-002", "Rustic Rubber Shoes", 40.0, "Books"),
            Product::new("Music-Car-005", "Ergonomic Granite Car", 50.0, "Music"),
        ]
    }

    fn numbers(page: &ProductPage) -> Vec<&str> {
        page.items.iter().map(|p| p.product_number.as_str()).collect()
    }

    async fn create_service() -> ProductQueryService {
        let store = Arc::new(InMemoryProductStore::new());
        let mut changes = ChangeSet::new();
        changes.add_range(catalog());
        store.commit(changes).await.unwrap();
        ProductQueryService::new(store)
    }

    #[test]
    fn test_defaults() {
        let query = ListQuery::default();
        assert_eq!(query.limit(), 15);
        assert_eq!(query.offset(), 0);
        assert_eq!(query.department(), "");
    }

    #[test]
    fn test_no_filter_sorts_everything() {
        let page = select_page(catalog(), &ListQuery::default());
        assert_eq!(page.total_count, 5);
        assert_eq!(
            numbers(&page),
            [
                "Books-Chair-001",
                "Books-Shoes-002",
                "Movies-Car-003",
                "Music-Car-005",
                "Music-Pants-004"
            ]
        );
    }

    #[test]
    fn test_department_prefix_filter() {
        let query = ListQuery {
            department: Some("mu".to_string()),
            ..Default::default()
        };
        let page = select_page(catalog(), &query);
        assert_eq!(page.total_count, 2);
        assert!(page.items.iter().all(|p| p.in_department("MU")));
    }

    #[test]
    fn test_total_count_ignores_paging() {
        let query = ListQuery {
            department: None,
            limit: Some(2),
            offset: Some(1),
        };
        let page = select_page(catalog(), &query);
        assert_eq!(page.total_count, 5);
        assert_eq!(numbers(&page), ["Books-Shoes-002", "Movies-Car-003"]);

        let query = ListQuery {
            offset: Some(10),
            ..Default::default()
        };
        let page = select_page(catalog(), &query);
        assert_eq!(page.total_count, 5);
        assert!(page.items.is_empty());
    }

    #[test]
    fn test_no_match_is_empty() {
        let query = ListQuery {
            department: Some("Garden".to_string()),
            ..Default::default()
        };
        let page = select_page(catalog(), &query);
        assert_eq!(page, ProductPage { items: vec![], total_count: 0 });
    }

    #[tokio::test]
    async fn test_list_through_store() {
        let service = create_service().await;
        let query = ListQuery {
            department: Some("books".to_string()),
            limit: Some(1),
            offset: None,
        };

        let page = service.list(&query).await.unwrap();
        assert_eq!(page.total_count, 2);
        assert_eq!(numbers(&page), ["Books-Chair-001"]);

        // 大页只产生提示日志
        let query = ListQuery {
            limit: Some(500),
            ..Default::default()
        };
        assert_eq!(service.list(&query).await.unwrap().items.len(), 5);
    }

    #[tokio::test]
    async fn test_get_by_number_is_case_insensitive() {
        let service = create_service().await;

        let lower = service.get_by_number("books-chair-001").await.unwrap();
        let upper = service.get_by_number("BOOKS-CHAIR-001").await.unwrap();
        assert_eq!(lower, upper);
        assert_eq!(lower.product_number, "Books-Chair-001");

        assert!(matches!(
            service.get_by_number("Books-Chair").await,
            Err(ProductError::NotFound(_))
        ));
    }
}
