use super::run::PipelineRun;
use crate::models::{CustomerRank, RunSummary};

const TOP_CUSTOMERS: usize = 5;

/// 按保留的商品数降序; 数量相同按首次出现顺序
pub fn top_customers(run: &PipelineRun, limit: usize) -> Vec<CustomerRank> {
    let mut ranks: Vec<CustomerRank> = run
        .customers
        .values()
        .map(|c| CustomerRank {
            id: c.id.clone(),
            name: c.name.clone(),
            product_count: run.product_count(&c.id),
        })
        .collect();
    ranks.sort_by(|a, b| b.product_count.cmp(&a.product_count));
    ranks.truncate(limit);
    ranks
}

/// 补全汇总中依赖最终集合的字段
pub fn finalize(run: &mut PipelineRun) {
    run.summary.customer_count = run.customers.len();
    run.summary.product_count = run.products.len();
    run.summary.top_customers = top_customers(run, TOP_CUSTOMERS);
}

pub fn log_summary(summary: &RunSummary) {
    tracing::info!("Processing Summary:");
    tracing::info!("{}", "=".repeat(50));
    tracing::info!(
        "Contract rows: {} processed, {} skipped, {} numeric warnings",
        summary.contracts.processed,
        summary.contracts.skipped,
        summary.contracts.numeric_warnings
    );
    tracing::info!(
        "Product rows: {} processed, {} skipped, {} numeric warnings",
        summary.products.processed,
        summary.products.skipped,
        summary.products.numeric_warnings
    );
    tracing::info!("Customers: {}", summary.customer_count);
    tracing::info!("Products: {}", summary.product_count);
    tracing::info!(
        "Customer-Product relationships: {} ({} dropped, integrity {:.1}%)",
        summary.surviving_relationships(),
        summary.missing_products,
        summary.integrity_ratio * 100.0
    );

    tracing::info!("Top {} customers by product count:", summary.top_customers.len());
    for (idx, customer) in summary.top_customers.iter().enumerate() {
        tracing::info!("{}. {}: {} products", idx + 1, customer.name, customer.product_count);
    }

    tracing::info!("Generated file sizes:");
    for artifact in &summary.artifacts {
        tracing::info!("{}: {:.1} KB", artifact.name, artifact.bytes as f64 / 1024.0);
    }
    tracing::info!("Total: {:.1} KB", summary.total_artifact_bytes() as f64 / 1024.0);
}
