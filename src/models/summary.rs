use serde::Serialize;

/// 单个源文件的处理统计
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StageStats {
    pub rows_read: usize,
    pub processed: usize,
    pub skipped: usize,
    pub numeric_warnings: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerRank {
    pub id: String,
    pub name: String,
    pub product_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtifactSize {
    pub name: String,
    pub bytes: u64,
}

/// 一次运行的汇总 (运行结束时输出给操作员)
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunSummary {
    pub contracts: StageStats,
    pub products: StageStats,
    pub customer_count: usize,
    pub product_count: usize,
    pub relationships_total: usize,
    pub missing_products: usize,
    pub integrity_ratio: f64,
    pub top_customers: Vec<CustomerRank>,
    pub artifacts: Vec<ArtifactSize>,
}

impl RunSummary {
    pub fn surviving_relationships(&self) -> usize {
        self.relationships_total - self.missing_products
    }

    pub fn total_artifact_bytes(&self) -> u64 {
        self.artifacts.iter().map(|a| a.bytes).sum()
    }
}
