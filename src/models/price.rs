use bigdecimal::BigDecimal;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// 客户-商品价格关系 (以 customerId + productCode 为键, 键本身存放在外层 Map)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerProduct {
    pub contract_id: i64,
    #[serde(with = "super::decimal::json_number")]
    pub price: BigDecimal,
    pub discount: i64,
    pub is_active: bool,
}

/// customerId -> productCode -> 价格关系
pub type CustomerProducts = IndexMap<String, IndexMap<String, CustomerProduct>>;
