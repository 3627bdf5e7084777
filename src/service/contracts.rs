use super::run::PipelineRun;
use crate::models::{Contract, Customer, CustomerProduct, StageStats};
use crate::parser::{parse_date, parse_decimal, parse_int, RawRow};
use bigdecimal::BigDecimal;
use chrono::NaiveDate;

/// 合同表的列位置 (0 起)
mod col {
    pub const CUSTOMER_ID: usize = 0;
    pub const CUSTOMER_NAME: usize = 1;
    pub const CONTRACT_ID: usize = 3;
    pub const DATE_FROM: usize = 5;
    pub const DATE_TO: usize = 6;
    pub const PAYMENT_TERMS: usize = 7;
    pub const PAYMENT_METHOD: usize = 8;
    pub const CONTRACT_NAME: usize = 9;
    pub const PRODUCT_CODE: usize = 20;
    pub const DISCOUNT: usize = 26;
    pub const PRICE: usize = 27;
}

const PROGRESS_EVERY: usize = 10_000;

/// 合同表的一行 (已校验必填字段)
#[derive(Debug, Clone, PartialEq)]
pub struct ContractRow {
    pub customer_id: String,
    pub customer_name: String,
    pub contract_id: i64,
    pub contract_name: String,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub payment_terms: i64,
    pub payment_method: String,
    pub product_code: String,
    pub price: BigDecimal,
    pub discount: i64,
}

impl ContractRow {
    /// 缺少客户 id、客户名称或商品编码时返回 None;
    /// 无法解析的数字按 0 处理并累加 `numeric_warnings`
    pub fn from_raw(row: &RawRow, numeric_warnings: &mut usize) -> Option<Self> {
        let customer_id = row.get(col::CUSTOMER_ID);
        let customer_name = row.get(col::CUSTOMER_NAME);
        let product_code = row.get(col::PRODUCT_CODE);
        if customer_id.is_empty() || customer_name.is_empty() || product_code.is_empty() {
            return None;
        }

        let mut int_or_zero = |index: usize| {
            parse_int(row.get(index)).unwrap_or_else(|| {
                *numeric_warnings += 1;
                0
            })
        };
        let contract_id = int_or_zero(col::CONTRACT_ID);
        let payment_terms = int_or_zero(col::PAYMENT_TERMS);
        let discount = int_or_zero(col::DISCOUNT);
        let price = parse_decimal(row.get(col::PRICE)).unwrap_or_else(|| {
            *numeric_warnings += 1;
            BigDecimal::from(0)
        });

        Some(Self {
            customer_id: customer_id.to_string(),
            customer_name: customer_name.to_string(),
            contract_id,
            contract_name: row.get(col::CONTRACT_NAME).to_string(),
            date_from: parse_date(row.get(col::DATE_FROM)),
            date_to: parse_date(row.get(col::DATE_TO)),
            payment_terms,
            payment_method: row.get(col::PAYMENT_METHOD).to_string(),
            product_code: product_code.to_string(),
            price,
            discount,
        })
    }

    fn contract(&self) -> Contract {
        Contract {
            id: self.contract_id,
            name: self.contract_name.clone(),
            date_from: self.date_from,
            date_to: self.date_to,
            payment_terms: self.payment_terms,
            payment_method: self.payment_method.clone(),
        }
    }
}

/// 合同是否在 `today` 生效. 任一日期缺失或无法解析时默认生效 (fail-open)
pub fn is_active(date_from: Option<NaiveDate>, date_to: Option<NaiveDate>, today: NaiveDate) -> bool {
    match (date_from, date_to) {
        (Some(from), Some(to)) => from <= today && today <= to,
        _ => true,
    }
}

/// 规范化合同表: 客户首次出现时创建, 合同首次出现生效, 价格关系后出现者覆盖
pub fn normalize<I>(run: &mut PipelineRun, rows: I)
where
    I: IntoIterator<Item = Result<RawRow, csv::Error>>,
{
    tracing::info!("Processing contracts source...");
    let mut stats = StageStats::default();
    let today = run.today();

    for row in rows {
        stats.rows_read += 1;
        let row = match row {
            Ok(row) => row,
            Err(e) => {
                stats.skipped += 1;
                tracing::debug!("Skipping unreadable contract row: {}", e);
                continue;
            }
        };

        let Some(parsed) = ContractRow::from_raw(&row, &mut stats.numeric_warnings) else {
            stats.skipped += 1;
            tracing::debug!("Skipping contract row {}: missing customer or product", row.line);
            continue;
        };

        let customer = run
            .customers
            .entry(parsed.customer_id.clone())
            .or_insert_with(|| Customer::new(&parsed.customer_id, &parsed.customer_name));
        if parsed.contract_id != 0 {
            customer.add_contract(parsed.contract());
        }

        run.customer_products
            .entry(parsed.customer_id.clone())
            .or_default()
            .insert(
                parsed.product_code.clone(),
                CustomerProduct {
                    contract_id: parsed.contract_id,
                    is_active: is_active(parsed.date_from, parsed.date_to, today),
                    price: parsed.price,
                    discount: parsed.discount,
                },
            );

        stats.processed += 1;
        if stats.processed % PROGRESS_EVERY == 0 {
            tracing::info!("  Processed {} contract rows...", stats.processed);
        }
    }

    tracing::info!(
        "Contracts processed: {} rows, {} skipped, {} numeric warnings; {} unique customers",
        stats.processed,
        stats.skipped,
        stats.numeric_warnings,
        run.customers.len()
    );
    run.summary.contracts = stats;
}
