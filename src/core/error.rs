//! 核心错误处理模块

use std::collections::BTreeMap;

use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::error;

/// HTTP 层错误类型
#[derive(Debug)]
pub enum ApiError {
    /// 404，空响应体
    NotFound,
    /// 400，结构化的问题描述
    Validation(ValidationProblem),
    /// 500
    InternalServerError(String),
}

/// 校验失败的字段错误集合，字段名使用 JSON 中的名称
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ValidationProblem {
    errors: BTreeMap<String, Vec<String>>,
}

impl ValidationProblem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
        let mut problem = Self::new();
        problem.push(field, message);
        problem
    }

    pub fn push(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors
            .entry(field.into())
            .or_default()
            .push(message.into());
    }

    /// 某个字段的错误信息
    pub fn messages(&self, field: &str) -> &[String] {
        self.errors.get(field).map(Vec::as_slice).unwrap_or_default()
    }
}

impl std::fmt::Display for ValidationProblem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let messages: Vec<String> = self
            .errors
            .iter()
            .flat_map(|(field, messages)| messages.iter().map(move |m| format!("{field}: {m}")))
            .collect();
        write!(f, "{}", messages.join(", "))
    }
}

impl From<validator::ValidationErrors> for ValidationProblem {
    fn from(err: validator::ValidationErrors) -> Self {
        let mut problem = ValidationProblem::new();

        for (field, errors) in err.field_errors() {
            let field = camel_case(&field);
            for error in errors {
                let message = error
                    .message
                    .as_ref()
                    .map(|msg| msg.to_string())
                    .unwrap_or_else(|| format!("The {field} field is invalid."));
                problem.push(field.clone(), message);
            }
        }

        problem
    }
}

/// 问题描述响应体
#[derive(Serialize)]
pub struct ProblemDetails<'a> {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub title: &'static str,
    pub status: u16,
    pub errors: &'a ValidationProblem,
}

/// 500 错误响应结构
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub code: u16,
    pub timestamp: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::NotFound => StatusCode::NOT_FOUND.into_response(),
            ApiError::Validation(problem) => {
                let status = StatusCode::BAD_REQUEST;
                let body = ProblemDetails {
                    kind: "https://tools.ietf.org/html/rfc7231#section-6.5.1",
                    title: "One or more validation errors occurred.",
                    status: status.as_u16(),
                    errors: &problem,
                };

                (
                    status,
                    [(header::CONTENT_TYPE, "application/problem+json")],
                    Json(body),
                )
                    .into_response()
            }
            ApiError::InternalServerError(message) => {
                error!("Internal error: {}", message);

                let status = StatusCode::INTERNAL_SERVER_ERROR;
                let error_response = ErrorResponse {
                    error: "INTERNAL_SERVER_ERROR".to_string(),
                    message,
                    code: status.as_u16(),
                    timestamp: chrono::Utc::now().to_rfc3339(),
                };

                (status, Json(error_response)).into_response()
            }
        }
    }
}

impl From<ValidationProblem> for ApiError {
    fn from(problem: ValidationProblem) -> Self {
        ApiError::Validation(problem)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Validation(ValidationProblem::single("body", rejection.body_text()))
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::Validation(ValidationProblem::single("query", rejection.body_text()))
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::Validation(ValidationProblem::single("path", rejection.body_text()))
    }
}

/// `product_number` -> `productNumber`
///
/// validator 报告的是 Rust 字段名，这里与模型上的 `#[serde(rename_all = "camelCase")]`
/// 保持一致，使错误键与请求 JSON 中的字段名相同。
fn camel_case(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    let mut upper = false;
    for c in field.chars() {
        if c == '_' {
            upper = true;
        } else if upper {
            out.extend(c.to_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[derive(Validate)]
    struct Sample {
        #[validate(length(min = 1, message = "required"))]
        product_number: String,
        #[validate(range(min = 1))]
        price: i32,
    }

    #[test]
    fn test_camel_case() {
        assert_eq!(camel_case("product_number"), "productNumber");
        assert_eq!(camel_case("name"), "name");
    }

    #[test]
    fn test_from_validation_errors() {
        let sample = Sample {
            product_number: String::new(),
            price: 0,
        };
        let problem = ValidationProblem::from(sample.validate().unwrap_err());

        assert_eq!(problem.messages("productNumber"), ["required".to_string()]);
        assert_eq!(problem.messages("price"), ["The price field is invalid.".to_string()]);
        assert!(problem.messages("name").is_empty());
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(ApiError::NotFound.into_response().status(), StatusCode::NOT_FOUND);

        let response = ApiError::Validation(ValidationProblem::single("name", "required")).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "application/problem+json"
        );

        let response = ApiError::InternalServerError("boom".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
