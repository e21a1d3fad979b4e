//! 产品处理器
//!
//! 只负责请求解析和响应映射，业务逻辑在查询/命令服务中。

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::{header, HeaderMap, HeaderName, HeaderValue, StatusCode},
    response::{IntoResponse, Json, Response},
};
use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};

use super::{
    command::ProductCommandService,
    model::{product_key, Product, ProductPatch},
    query::{ListQuery, ProductQueryService},
};
use crate::core::error::ApiError;

pub const TOTAL_COUNT_HEADER: HeaderName = HeaderName::from_static("x-total-count");

/// 路径段中需要转义的字符
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

#[derive(Clone)]
pub struct ProductState {
    pub queries: ProductQueryService,
    pub commands: ProductCommandService,
}

/// GET /v{version}/products
pub async fn list_products(
    State(state): State<ProductState>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> Result<(HeaderMap, Json<Vec<Product>>), ApiError> {
    let Query(query) = query?;
    let page = state.queries.list(&query).await?;

    let mut headers = HeaderMap::new();
    headers.insert(TOTAL_COUNT_HEADER, HeaderValue::from(page.total_count));

    Ok((headers, Json(page.items)))
}

/// GET /v{version}/products/{productNumber}
pub async fn get_product(
    State(state): State<ProductState>,
    Path((_version, product_number)): Path<(String, String)>,
) -> Result<Json<Product>, ApiError> {
    let product = state.queries.get_by_number(&product_number).await?;
    Ok(Json(product))
}

/// POST /v{version}/products
pub async fn create_product(
    State(state): State<ProductState>,
    Path(version): Path<String>,
    payload: Result<Json<Product>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(product) = payload?;
    let created = state.commands.create(product).await?;

    let mut headers = HeaderMap::new();
    if let Ok(value) = HeaderValue::from_str(&location(&version, &created.product_number)) {
        headers.insert(header::LOCATION, value);
    }

    Ok((StatusCode::CREATED, headers, Json(created)).into_response())
}

/// 新建产品的地址，产品编号按小写编码为单个路径段
fn location(version: &str, product_number: &str) -> String {
    let key = product_key(product_number);
    format!(
        "/{}/products/{}",
        utf8_percent_encode(version, PATH_SEGMENT),
        utf8_percent_encode(&key, PATH_SEGMENT)
    )
}

/// PUT /v{version}/products
pub async fn replace_product(
    State(state): State<ProductState>,
    payload: Result<Json<Product>, JsonRejection>,
) -> Result<Json<Product>, ApiError> {
    let Json(product) = payload?;
    let replaced = state.commands.replace(product).await?;
    Ok(Json(replaced))
}

/// PATCH /v{version}/products/{productNumber}
pub async fn patch_product(
    State(state): State<ProductState>,
    Path((_version, product_number)): Path<(String, String)>,
    payload: Result<Json<ProductPatch>, JsonRejection>,
) -> Result<Json<Product>, ApiError> {
    let Json(patch) = payload?;
    let patched = state.commands.patch(&product_number, &patch).await?;
    Ok(Json(patched))
}

/// DELETE /v{version}/products/{productNumber}
pub async fn delete_product(
    State(state): State<ProductState>,
    Path((_version, product_number)): Path<(String, String)>,
) -> Result<StatusCode, ApiError> {
    state.commands.delete(&product_number).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location_is_a_single_segment() {
        assert_eq!(location("v1", "Books-Chair-001"), "/v1/products/books-chair-001");
        assert_eq!(location("v1", "Books-Chair?001"), "/v1/products/books-chair%3F001");
        assert_eq!(location("v1", "Books/Chair-001"), "/v1/products/books%2Fchair-001");
        assert_eq!(location("v1.0", "Books Chair#1"), "/v1.0/products/books%20chair%231");
        assert_eq!(location("v1", "Bücher-100%"), "/v1/products/b%C3%BCcher-100%25");
    }
}
