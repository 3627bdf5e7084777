use super::run::PipelineRun;

/// 校验结果
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValidationReport {
    pub total: usize,
    pub missing: usize,
}

impl ValidationReport {
    /// (total - missing) / total; 没有任何关系时视为 1.0
    pub fn integrity_ratio(&self) -> f64 {
        if self.total == 0 {
            return 1.0;
        }
        (self.total - self.missing) as f64 / self.total as f64
    }
}

/// 移除引用了不存在商品的价格关系 (孤儿关系), 逐条记录并计数.
/// 关系全部被移除的客户不再保留空的价格表.
pub fn validate(run: &mut PipelineRun) -> ValidationReport {
    tracing::info!("Validating data integrity...");
    let products = &run.products;
    let mut total = 0usize;
    let mut missing = 0usize;

    for (customer_id, prices) in run.customer_products.iter_mut() {
        total += prices.len();
        prices.retain(|product_code, _| {
            let known = products.contains_key(product_code);
            if !known {
                missing += 1;
                tracing::warn!(
                    "Product {} in customer {} not found in products catalog",
                    product_code,
                    customer_id
                );
            }
            known
        });
    }
    run.customer_products.retain(|_, prices| !prices.is_empty());

    let report = ValidationReport { total, missing };
    tracing::info!("Data validation complete:");
    tracing::info!("   Total customer-product relationships: {}", total);
    tracing::info!("   Missing products in catalog: {}", missing);
    tracing::info!("   Data integrity: {:.1}%", report.integrity_ratio() * 100.0);

    run.summary.relationships_total = total;
    run.summary.missing_products = missing;
    run.summary.integrity_ratio = report.integrity_ratio();
    report
}
