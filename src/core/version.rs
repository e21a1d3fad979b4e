//! API 版本检查
//!
//! 路由形如 `/:version/products`，版本段接受 `v1` 和 `v1.0`。

use std::collections::HashMap;

use axum::{
    extract::{rejection::PathRejection, Path, Request},
    middleware::Next,
    response::{IntoResponse, Response},
};

use super::error::{ApiError, ValidationProblem};

pub const SUPPORTED_VERSIONS: &[&str] = &["1", "1.0"];

/// 解析 `v1` / `v1.0` 形式的版本段，返回去掉前缀的版本号
pub fn parse_version(segment: &str) -> Option<&str> {
    let version = segment
        .strip_prefix('v')
        .or_else(|| segment.strip_prefix('V'))?;
    SUPPORTED_VERSIONS.contains(&version).then_some(version)
}

pub async fn require_api_version(
    params: Result<Path<HashMap<String, String>>, PathRejection>,
    req: Request,
    next: Next,
) -> Response {
    let Path(params) = match params {
        Ok(params) => params,
        Err(rejection) => return ApiError::from(rejection).into_response(),
    };

    match params.get("version").map(|v| parse_version(v)) {
        Some(Some(_)) => next.run(req).await,
        _ => ApiError::Validation(ValidationProblem::single(
            "version",
            format!(
                "The requested API version is not supported. Supported versions: {}",
                SUPPORTED_VERSIONS.join(", ")
            ),
        ))
        .into_response(),
    }
}
