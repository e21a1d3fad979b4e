//! 产品数据模型

use serde::{Deserialize, Deserializer, Serialize};
use validator::{Validate, ValidationError};

/// 产品实体
///
/// `product_number` 是业务主键，比较时不区分大小写，见 [`product_key`]。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[validate(custom(function = "not_blank", message = "The productNumber field is required."))]
    pub product_number: String,

    #[validate(custom(function = "not_blank", message = "The name field is required."))]
    pub name: String,

    #[validate(range(min = 0.0, message = "The price field must not be negative."))]
    pub price: f64,

    #[validate(custom(function = "not_blank", message = "The department field is required."))]
    pub department: String,
}

impl Product {
    pub fn new(
        product_number: impl Into<String>,
        name: impl Into<String>,
        price: f64,
        department: impl Into<String>,
    ) -> Self {
        Self {
            product_number: product_number.into(),
            name: name.into(),
            price,
            department: department.into(),
        }
    }

    /// 存储层使用的规范化主键
    pub fn key(&self) -> String {
        product_key(&self.product_number)
    }

    /// 部门前缀匹配（不区分大小写），空过滤条件匹配所有产品
    pub fn in_department(&self, prefix: &str) -> bool {
        prefix.is_empty()
            || self
                .department
                .to_lowercase()
                .starts_with(&prefix.to_lowercase())
    }
}

/// 产品编号的规范化形式，所有查找、替换、删除都按此比较
pub fn product_key(product_number: &str) -> String {
    product_number.to_lowercase()
}

/// 部分更新文档
///
/// 只包含可修改的字段；产品编号是查找键，不能通过 PATCH 修改。
/// 省略的字段保持不变，显式的 `null` 会被拒绝。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ProductPatch {
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub name: Option<String>,
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub price: Option<f64>,
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub department: Option<String>,
}

/// 字段出现时必须有值；缺省由 `#[serde(default)]` 处理
fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

impl ProductPatch {
    /// 将补丁合并到产品副本上，原产品保持不变
    pub fn apply(&self, product: &Product) -> Product {
        let mut patched = product.clone();

        if let Some(name) = &self.name {
            patched.name = name.clone();
        }
        if let Some(price) = self.price {
            patched.price = price;
        }
        if let Some(department) = &self.department {
            patched.department = department.clone();
        }

        patched
    }
}

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("required"));
    }
    Ok(())
}
