use catalog_etl::{AppConfig, PipelineService};
use tracing::{error, info};
use tracing_subscriber::fmt::time::ChronoLocal;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 初始化日志 - 本地时间格式
    tracing_subscriber::fmt()
        .with_timer(ChronoLocal::new("%Y-%m-%d %H:%M:%S".to_string()))
        .with_target(true)
        .with_level(true)
        .init();

    // 加载配置
    let config = AppConfig::from_env()?;
    info!("Starting catalog processing with config: {:?}", config.input);
    info!("Output directory: {}", config.output.data_dir.display());
    if config.database.url.is_some() {
        info!("Database load enabled (batch size {})", config.database.batch_size);
    }

    let service = PipelineService::new(config);
    match service.run().await {
        Ok(summary) => {
            info!(
                "Catalog processing completed: {} customers, {} products, {} relationships",
                summary.customer_count,
                summary.product_count,
                summary.surviving_relationships()
            );
            Ok(())
        }
        Err(e) => {
            error!("Catalog processing failed: {}", e);
            Err(e.into())
        }
    }
}
