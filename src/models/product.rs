use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};

/// 品类 / 子品类 (嵌入在商品上)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
}

/// 供应商
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Supplier {
    pub code: i64,
    pub name: String,
}

impl Supplier {
    /// 编码为 0 或无名称的供应商没有身份, 不进入查找表
    pub fn is_identified(&self) -> bool {
        self.code != 0 && !self.name.is_empty()
    }
}

/// 商品目录条目, 按商品编码唯一
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub code: String,
    pub name: String,
    #[serde(default)]
    pub alt_name: Option<String>,
    pub unit: String,
    pub category: Category,
    pub subcategory: Category,
    pub supplier: Supplier,
    #[serde(with = "super::decimal::json_number")]
    pub weight: BigDecimal,
    #[serde(default)]
    pub pack_size: Option<i64>,
}
