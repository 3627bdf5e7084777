use super::run::PipelineRun;
use crate::models::{Category, Product, StageStats, Supplier};
use crate::parser::{parse_decimal, parse_int, parse_optional_int, RawRow};
use bigdecimal::BigDecimal;

/// 商品表的列位置 (0 起)
mod col {
    pub const CODE: usize = 0;
    pub const CATEGORY_ID: usize = 1;
    pub const CATEGORY_NAME: usize = 2;
    pub const SUBCATEGORY_ID: usize = 3;
    pub const SUBCATEGORY_NAME: usize = 4;
    pub const NAME: usize = 5;
    pub const ALT_NAME: usize = 6;
    pub const UNIT: usize = 7;
    pub const PACK_SIZE: usize = 8;
    pub const SUPPLIER_CODE: usize = 19;
    pub const SUPPLIER_NAME: usize = 20;
    pub const WEIGHT: usize = 40;
}

const PROGRESS_EVERY: usize = 1_000;

/// 从一行构建商品; 缺少编码、名称或单位时返回 None
pub fn product_from_raw(row: &RawRow, numeric_warnings: &mut usize) -> Option<Product> {
    let code = row.get(col::CODE);
    let name = row.get(col::NAME);
    let unit = row.get(col::UNIT);
    if code.is_empty() || name.is_empty() || unit.is_empty() {
        return None;
    }

    let mut int_or_zero = |index: usize| {
        parse_int(row.get(index)).unwrap_or_else(|| {
            *numeric_warnings += 1;
            0
        })
    };
    let category_id = int_or_zero(col::CATEGORY_ID);
    let subcategory_id = int_or_zero(col::SUBCATEGORY_ID);
    let supplier_code = int_or_zero(col::SUPPLIER_CODE);
    let weight = parse_decimal(row.get(col::WEIGHT)).unwrap_or_else(|| {
        *numeric_warnings += 1;
        BigDecimal::from(0)
    });

    let alt_name = row.get(col::ALT_NAME);
    Some(Product {
        code: code.to_string(),
        name: name.to_string(),
        alt_name: (!alt_name.is_empty()).then(|| alt_name.to_string()),
        unit: unit.to_string(),
        category: Category {
            id: category_id,
            name: row.get(col::CATEGORY_NAME).to_string(),
        },
        subcategory: Category {
            id: subcategory_id,
            name: row.get(col::SUBCATEGORY_NAME).to_string(),
        },
        supplier: Supplier {
            code: supplier_code,
            name: row.get(col::SUPPLIER_NAME).to_string(),
        },
        weight,
        pack_size: parse_optional_int(row.get(col::PACK_SIZE)),
    })
}

/// 规范化商品表. 同一编码后出现的行整体覆盖先前的 (不合并)
pub fn normalize<I>(run: &mut PipelineRun, rows: I)
where
    I: IntoIterator<Item = Result<RawRow, csv::Error>>,
{
    tracing::info!("Processing products source...");
    let mut stats = StageStats::default();

    for row in rows {
        stats.rows_read += 1;
        let row = match row {
            Ok(row) => row,
            Err(e) => {
                stats.skipped += 1;
                tracing::debug!("Skipping unreadable product row: {}", e);
                continue;
            }
        };

        let Some(product) = product_from_raw(&row, &mut stats.numeric_warnings) else {
            stats.skipped += 1;
            tracing::debug!("Skipping product row {}: missing code, name or unit", row.line);
            continue;
        };
        run.products.insert(product.code.clone(), product);

        stats.processed += 1;
        if stats.processed % PROGRESS_EVERY == 0 {
            tracing::info!("  Processed {} product rows...", stats.processed);
        }
    }

    tracing::info!(
        "Products processed: {} rows, {} skipped, {} numeric warnings; {} unique products",
        stats.processed,
        stats.skipped,
        stats.numeric_warnings,
        run.products.len()
    );
    run.summary.products = stats;
}
