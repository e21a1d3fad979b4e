//! 产品服务错误

use crate::core::error::{ApiError, ValidationProblem};

use super::store::StoreError;

#[derive(Debug, thiserror::Error)]
pub enum ProductError {
    #[error("product '{0}' not found")]
    NotFound(String),
    #[error("validation failed: {0}")]
    Validation(ValidationProblem),
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ProductError {
    /// 提交失败统一报告为校验失败，携带底层错误信息
    pub fn commit_failed(err: StoreError) -> Self {
        ProductError::Validation(ValidationProblem::single("product", err.to_string()))
    }
}

impl From<validator::ValidationErrors> for ProductError {
    fn from(err: validator::ValidationErrors) -> Self {
        ProductError::Validation(err.into())
    }
}

impl From<ProductError> for ApiError {
    fn from(err: ProductError) -> Self {
        match err {
            ProductError::NotFound(_) => ApiError::NotFound,
            ProductError::Validation(problem) => ApiError::Validation(problem),
            ProductError::Store(err) => ApiError::InternalServerError(err.to_string()),
        }
    }
}
