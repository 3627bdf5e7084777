use super::run::PipelineRun;
use crate::db::{self, CatalogRows};
use crate::error::Result;
use crate::models::LookupTables;
use sqlx::PgPool;

/// 数据库导入: 只导入已校验的数据, 按外键依赖顺序分块 upsert
pub struct CatalogLoader {
    pool: PgPool,
    batch_size: usize,
}

impl CatalogLoader {
    pub fn new(pool: PgPool, batch_size: usize) -> Self {
        Self {
            pool,
            batch_size: batch_size.max(1),
        }
    }

    pub async fn load(&self, run: &PipelineRun, lookups: &LookupTables) -> Result<()> {
        let rows = CatalogRows::from_run(run, lookups);
        tracing::info!(
            "Loading into database: {} categories, {} subcategories, {} suppliers, {} products, {} customers, {} contracts, {} customer products",
            lookups.categories.len(),
            lookups.subcategories.len(),
            lookups.suppliers.len(),
            rows.products.len(),
            rows.customers.len(),
            rows.contracts.len(),
            rows.customer_products.len()
        );

        for chunk in lookups.categories.chunks(self.batch_size) {
            db::upsert_categories(&self.pool, chunk).await?;
        }
        for chunk in lookups.subcategories.chunks(self.batch_size) {
            db::upsert_subcategories(&self.pool, chunk).await?;
        }
        for chunk in lookups.suppliers.chunks(self.batch_size) {
            db::upsert_suppliers(&self.pool, chunk).await?;
        }
        for chunk in rows.products.chunks(self.batch_size) {
            db::upsert_products(&self.pool, chunk).await?;
        }
        for chunk in rows.customers.chunks(self.batch_size) {
            db::upsert_customers(&self.pool, chunk).await?;
        }
        for chunk in rows.contracts.chunks(self.batch_size) {
            db::upsert_contracts(&self.pool, chunk).await?;
        }

        let total = rows.customer_products.len();
        for (idx, chunk) in rows.customer_products.chunks(self.batch_size).enumerate() {
            db::upsert_customer_products(&self.pool, chunk).await?;
            let done = (idx * self.batch_size + chunk.len()).min(total);
            if (idx + 1) % 10 == 0 || done == total {
                tracing::info!("customer_products 进度: {}/{}", done, total);
            }
        }

        tracing::info!("Database load complete");
        Ok(())
    }
}
