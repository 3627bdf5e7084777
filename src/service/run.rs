use crate::models::{Customer, CustomerProducts, Product, RunSummary};
use chrono::NaiveDate;
use indexmap::IndexMap;

/// 一次运行的上下文: 所有集合归它所有, 依次以 &mut 传给各阶段
#[derive(Debug)]
pub struct PipelineRun {
    today: NaiveDate,
    pub customers: IndexMap<String, Customer>,
    pub products: IndexMap<String, Product>,
    pub customer_products: CustomerProducts,
    pub summary: RunSummary,
}

impl PipelineRun {
    /// `today` 是判断合同是否生效的日历日期, 整个运行期间固定
    pub fn new(today: NaiveDate) -> Self {
        Self {
            today,
            customers: IndexMap::new(),
            products: IndexMap::new(),
            customer_products: IndexMap::new(),
            summary: RunSummary::default(),
        }
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    /// 客户当前保留的价格关系数量
    pub fn product_count(&self, customer_id: &str) -> usize {
        self.customer_products
            .get(customer_id)
            .map_or(0, IndexMap::len)
    }

    pub fn relationship_count(&self) -> usize {
        self.customer_products.values().map(IndexMap::len).sum()
    }
}
