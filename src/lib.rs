//! # 产品 REST API
//!
//! 单一资源的 CRUD 服务：
//! - 按部门前缀过滤、分页并返回总数的产品列表
//! - 按产品编号（不区分大小写）查询、创建、替换、部分更新和删除
//! - 内存和 SQLite 两种存储后端，启动时为空存储生成示例数据

pub mod app;
pub mod config;
pub mod core;
pub mod infrastructure;

pub use app::{build_router, AppState};
pub use app::products::model::{Product, ProductPatch};
pub use config::Config;
