//! HTTP 核心组件：错误映射、中间件、版本检查

pub mod error;
pub mod middleware;
pub mod version;
