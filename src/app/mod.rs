//! 路由注册与应用状态

pub mod products;

use std::{sync::Arc, time::Duration};

use axum::{
    extract::{FromRef, State},
    http::header,
    middleware,
    response::Json,
    routing::get,
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::HttpConfig;
use crate::core::{
    error::ApiError,
    middleware::{request_logging_middleware, REQUEST_ID_HEADER},
    version::require_api_version,
};
use products::{
    command::ProductCommandService,
    handler::{self, ProductState, TOTAL_COUNT_HEADER},
    query::ProductQueryService,
    store::ProductStore,
};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ProductStore>,
    pub products: ProductState,
}

impl AppState {
    pub fn new(store: Arc<dyn ProductStore>) -> Self {
        let products = ProductState {
            queries: ProductQueryService::new(store.clone()),
            commands: ProductCommandService::new(store.clone()),
        };
        Self { store, products }
    }
}

impl FromRef<AppState> for ProductState {
    fn from_ref(state: &AppState) -> Self {
        state.products.clone()
    }
}

/// 创建路由
pub fn build_router(state: AppState, http: &HttpConfig) -> Router {
    // 版本化的产品 API
    let products = Router::new()
        .route(
            "/:version/products",
            get(handler::list_products)
                .post(handler::create_product)
                .put(handler::replace_product),
        )
        .route(
            "/:version/products/:product_number",
            get(handler::get_product)
                .patch(handler::patch_product)
                .delete(handler::delete_product),
        )
        .route_layer(middleware::from_fn(require_api_version));

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
        .expose_headers([TOTAL_COUNT_HEADER, header::LOCATION, REQUEST_ID_HEADER]);

    Router::new()
        .route("/health", get(health_check))
        .merge(products)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors)
                .layer(TimeoutLayer::new(Duration::from_secs(http.timeout_seconds)))
                .layer(middleware::from_fn(request_logging_middleware)),
        )
        .with_state(state)
}

/// 健康检查
async fn health_check(State(state): State<AppState>) -> Result<Json<serde_json::Value>, ApiError> {
    let products = state
        .store
        .count()
        .await
        .map_err(|e| ApiError::InternalServerError(e.to_string()))?;

    Ok(Json(serde_json::json!({
        "status": "healthy",
        "backend": state.store.backend(),
        "products": products,
        "timestamp": chrono::Utc::now().to_rfc3339(),
    })))
}
