use crate::models::decimal::json_number;
use crate::models::Product;
use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// 带客户合同价格的商品
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductWithPrice {
    #[serde(flatten)]
    pub product: Product,
    #[serde(with = "json_number")]
    pub price: BigDecimal,
    pub contract_id: i64,
    pub is_active: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortBy {
    #[default]
    Name,
    Price,
    Supplier,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

/// 搜索过滤条件; 品类/供应商按名称精确匹配
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchFilter {
    pub category: Option<String>,
    pub supplier: Option<String>,
    #[serde(with = "json_number::option")]
    pub min_price: Option<BigDecimal>,
    #[serde(with = "json_number::option")]
    pub max_price: Option<BigDecimal>,
    pub sort_by: SortBy,
    pub sort_order: SortOrder,
}

/// 名称比较, 不区分大小写
pub(crate) fn compare_names(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase())
}

fn matches_query(item: &ProductWithPrice, query: &str) -> bool {
    let product = &item.product;
    product.name.to_lowercase().contains(query)
        || product
            .alt_name
            .as_ref()
            .is_some_and(|alt| alt.to_lowercase().contains(query))
        || product.supplier.name.to_lowercase().contains(query)
        || product.category.name.to_lowercase().contains(query)
}

/// 文本搜索 + 过滤 + 排序
pub fn apply(mut items: Vec<ProductWithPrice>, query: &str, filter: &SearchFilter) -> Vec<ProductWithPrice> {
    let query = query.trim().to_lowercase();

    items.retain(|item| {
        (query.is_empty() || matches_query(item, &query))
            && filter
                .category
                .as_ref()
                .map_or(true, |c| &item.product.category.name == c)
            && filter
                .supplier
                .as_ref()
                .map_or(true, |s| &item.product.supplier.name == s)
            && filter.min_price.as_ref().map_or(true, |min| &item.price >= min)
            && filter.max_price.as_ref().map_or(true, |max| &item.price <= max)
    });

    items.sort_by(|a, b| {
        let ordering = match filter.sort_by {
            SortBy::Name => compare_names(&a.product.name, &b.product.name),
            SortBy::Price => a.price.cmp(&b.price),
            SortBy::Supplier => compare_names(&a.product.supplier.name, &b.product.supplier.name),
        };
        match filter.sort_order {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    });
    items
}
