use super::loader::CatalogLoader;
use super::run::PipelineRun;
use super::{contracts, products, report, validator};
use crate::config::AppConfig;
use crate::db::create_pool;
use crate::error::{EtlError, Result};
use crate::export::{write_artifacts, ArtifactWriter};
use crate::models::{LookupTables, RunSummary};
use crate::parser::RowParser;
use chrono::{Local, NaiveDate};
use std::path::Path;

/// 目录数据生成服务: 解析 -> 规范化 -> 校验 -> 写出 -> (可选) 导入数据库
pub struct PipelineService {
    config: AppConfig,
}

impl PipelineService {
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    /// 以本地当天日期运行
    pub async fn run(&self) -> Result<RunSummary> {
        self.run_on(Local::now().date_naive()).await
    }

    /// 以指定日期判断合同生效并运行一次完整流程
    pub async fn run_on(&self, today: NaiveDate) -> Result<RunSummary> {
        let input = &self.config.input;
        tracing::info!("Starting catalog processing (today = {})", today);

        // 两个源文件都必须可访问, 否则不产生任何输出
        ensure_readable(&input.contracts_path).await?;
        ensure_readable(&input.products_path).await?;

        let parser = RowParser::new()
            .with_delimiter(self.config.delimiter_byte())
            .with_header_rows(input.header_rows);
        let mut run = PipelineRun::new(today);

        let content = parser.read_file(&input.contracts_path).await?;
        contracts::normalize(&mut run, parser.rows(&content));

        let content = parser.read_file(&input.products_path).await?;
        products::normalize(&mut run, parser.rows(&content));

        validator::validate(&mut run);

        let lookups = LookupTables::from_products(&run.products);
        let writer = ArtifactWriter::new(&self.config.output.data_dir);
        let emitted = self.config.output.emit_lookup_tables.then_some(&lookups);
        run.summary.artifacts = write_artifacts(&writer, &run, emitted).await?;
        report::finalize(&mut run);

        if let Some(url) = &self.config.database.url {
            let pool = create_pool(url, self.config.database.max_connections).await?;
            tracing::info!("Database pool created");
            CatalogLoader::new(pool, self.config.database.batch_size)
                .load(&run, &lookups)
                .await?;
        }

        report::log_summary(&run.summary);
        Ok(run.summary)
    }
}

async fn ensure_readable(path: &Path) -> Result<()> {
    tokio::fs::metadata(path)
        .await
        .map(|_| ())
        .map_err(|e| EtlError::io(path, e))
}
