use super::*;
use crate::error::{EtlError, Result};
use crate::models::{ArtifactSize, CustomerRecord, LookupTables};
use crate::service::PipelineRun;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// 向数据目录写入产物文件
#[derive(Debug, Clone)]
pub struct ArtifactWriter {
    dir: PathBuf,
}

impl ArtifactWriter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// 目录不存在时创建
    pub async fn prepare(&self) -> Result<()> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| EtlError::io(&self.dir, e))
    }

    /// 以 2 空格缩进写出, 相同输入得到逐字节相同的文件
    pub async fn write<T: Serialize + ?Sized>(&self, name: &str, value: &T) -> Result<ArtifactSize> {
        let bytes = serde_json::to_vec_pretty(value).map_err(|e| EtlError::Json {
            artifact: name.to_string(),
            source: e,
        })?;
        let path = self.dir.join(name);
        tokio::fs::write(&path, &bytes)
            .await
            .map_err(|e| EtlError::io(&path, e))?;

        tracing::info!("Created {} ({:.1} KB)", path.display(), bytes.len() as f64 / 1024.0);
        Ok(ArtifactSize {
            name: name.to_string(),
            bytes: bytes.len() as u64,
        })
    }
}

/// customers.json 的投影: 合同展开为数组, productCount 为校验后保留的关系数
pub fn customer_records(run: &PipelineRun) -> Vec<CustomerRecord> {
    run.customers
        .values()
        .map(|customer| customer.to_record(run.product_count(&customer.id)))
        .collect()
}

/// 写出全部产物; `lookups` 为 Some 时额外写出品类/子品类/供应商表
pub async fn write_artifacts(
    writer: &ArtifactWriter,
    run: &PipelineRun,
    lookups: Option<&LookupTables>,
) -> Result<Vec<ArtifactSize>> {
    tracing::info!("Generating JSON files in {}...", writer.dir().display());
    writer.prepare().await?;

    let customers = customer_records(run);
    let mut written = vec![
        writer.write(CUSTOMERS_FILE, &customers).await?,
        writer.write(PRODUCTS_FILE, &run.products).await?,
        writer.write(CUSTOMER_PRODUCTS_FILE, &run.customer_products).await?,
    ];

    if let Some(tables) = lookups {
        written.push(writer.write(CATEGORIES_FILE, &tables.categories).await?);
        written.push(writer.write(SUBCATEGORIES_FILE, &tables.subcategories).await?);
        written.push(writer.write(SUPPLIERS_FILE, &tables.suppliers).await?);
    }

    Ok(written)
}
