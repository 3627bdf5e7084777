pub mod search;

pub use search::{ProductWithPrice, SearchFilter, SortBy, SortOrder};

use crate::error::{EtlError, Result};
use crate::export::{CUSTOMERS_FILE, CUSTOMER_PRODUCTS_FILE, PRODUCTS_FILE};
use crate::models::{CustomerProducts, CustomerRecord, Product};
use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::BTreeSet;
use std::path::Path;

/// 目录统计
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogStats {
    pub total_customers: usize,
    pub total_products: usize,
    pub customer_with_most_products: Option<CustomerRecord>,
    pub average_products_per_customer: usize,
}

/// 内存中的目录 (缓存只随值的销毁而失效)
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    customers: Vec<CustomerRecord>,
    products: IndexMap<String, Product>,
    customer_products: CustomerProducts,
}

impl Catalog {
    pub fn new(
        customers: Vec<CustomerRecord>,
        products: IndexMap<String, Product>,
        customer_products: CustomerProducts,
    ) -> Self {
        Self {
            customers,
            products,
            customer_products,
        }
    }

    /// 从数据目录加载三个产物
    pub async fn load(dir: &Path) -> Result<Self> {
        let customers = read_json(&dir.join(CUSTOMERS_FILE)).await?;
        let products = read_json(&dir.join(PRODUCTS_FILE)).await?;
        let customer_products = read_json(&dir.join(CUSTOMER_PRODUCTS_FILE)).await?;
        Ok(Self::new(customers, products, customer_products))
    }

    pub fn customers(&self) -> &[CustomerRecord] {
        &self.customers
    }

    pub fn customer(&self, id: &str) -> Option<&CustomerRecord> {
        self.customers.iter().find(|c| c.id == id)
    }

    pub fn product(&self, code: &str) -> Option<&Product> {
        self.products.get(code)
    }

    /// 客户可订购的商品及其合同价格, 按名称排序
    pub fn products_for_customer(&self, customer_id: &str) -> Vec<ProductWithPrice> {
        let Some(prices) = self.customer_products.get(customer_id) else {
            return Vec::new();
        };

        let mut result: Vec<ProductWithPrice> = prices
            .iter()
            .filter_map(|(code, price)| {
                self.products.get(code).map(|product| ProductWithPrice {
                    product: product.clone(),
                    price: price.price.clone(),
                    contract_id: price.contract_id,
                    is_active: price.is_active,
                })
            })
            .collect();
        result.sort_by(|a, b| search::compare_names(&a.product.name, &b.product.name));
        result
    }

    pub fn search(&self, customer_id: &str, query: &str, filter: &SearchFilter) -> Vec<ProductWithPrice> {
        search::apply(self.products_for_customer(customer_id), query, filter)
    }

    /// 客户商品涉及的品类名称 (去重, 排序)
    pub fn categories_for(&self, customer_id: &str) -> Vec<String> {
        self.distinct_names(customer_id, |p| &p.product.category.name)
    }

    /// 客户商品涉及的供应商名称 (去重, 排序)
    pub fn suppliers_for(&self, customer_id: &str) -> Vec<String> {
        self.distinct_names(customer_id, |p| &p.product.supplier.name)
    }

    fn distinct_names<F>(&self, customer_id: &str, name: F) -> Vec<String>
    where
        F: Fn(&ProductWithPrice) -> &String,
    {
        self.products_for_customer(customer_id)
            .iter()
            .map(|p| name(p).clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    pub fn stats(&self) -> CatalogStats {
        // 并列时取最先出现的客户
        let top = self.customers.iter().fold(None::<&CustomerRecord>, |best, c| match best {
            Some(b) if b.product_count >= c.product_count => Some(b),
            _ => Some(c),
        });
        let average = if self.customers.is_empty() {
            0
        } else {
            let total: usize = self.customers.iter().map(|c| c.product_count).sum();
            (total as f64 / self.customers.len() as f64).round() as usize
        };

        CatalogStats {
            total_customers: self.customers.len(),
            total_products: self.products.len(),
            customer_with_most_products: top.cloned(),
            average_products_per_customer: average,
        }
    }
}

async fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| EtlError::io(path, e))?;
    serde_json::from_slice(&bytes).map_err(|e| EtlError::Json {
        artifact: path.display().to_string(),
        source: e,
    })
}
