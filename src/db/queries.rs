use super::rows::{ContractRow, CustomerProductRow, CustomerRow, ProductRow};
use crate::error::{EtlError, Result};
use crate::models::{Category, Subcategory, Supplier};
use sqlx::{PgPool, Postgres, QueryBuilder};
use std::time::Duration;

/// 单条批量语句的超时
const STATEMENT_TIMEOUT: Duration = Duration::from_secs(30);

/// 执行一条批量 upsert, 带超时控制
async fn execute(pool: &PgPool, table: &'static str, mut builder: QueryBuilder<'_, Postgres>, rows: usize) -> Result<()> {
    tracing::debug!("Upserting {} rows into {}", rows, table);
    let start_time = std::time::Instant::now();

    let execute_result = tokio::time::timeout(STATEMENT_TIMEOUT, builder.build().execute(pool)).await;

    match execute_result {
        Ok(Ok(result)) => {
            tracing::debug!(
                "✓ {} upsert affected {} rows in {:?}",
                table,
                result.rows_affected(),
                start_time.elapsed()
            );
            Ok(())
        }
        Ok(Err(e)) => {
            tracing::error!("✗ {} upsert failed after {:?}: {:?}", table, start_time.elapsed(), e);
            Err(EtlError::Database(e))
        }
        Err(_) => {
            tracing::error!("✗ {} upsert timed out (>{:?})", table, STATEMENT_TIMEOUT);
            Err(EtlError::DatabaseTimeout { table })
        }
    }
}

pub async fn upsert_categories(pool: &PgPool, rows: &[Category]) -> Result<()> {
    if rows.is_empty() {
        return Ok(());
    }
    let mut builder = QueryBuilder::new("INSERT INTO categories (id, name) ");
    builder.push_values(rows, |mut b, row| {
        b.push_bind(row.id).push_bind(&row.name);
    });
    builder.push(" ON CONFLICT (id) DO UPDATE SET name = EXCLUDED.name");
    execute(pool, "categories", builder, rows.len()).await
}

pub async fn upsert_subcategories(pool: &PgPool, rows: &[Subcategory]) -> Result<()> {
    if rows.is_empty() {
        return Ok(());
    }
    let mut builder = QueryBuilder::new("INSERT INTO subcategories (id, category_id, name) ");
    builder.push_values(rows, |mut b, row| {
        b.push_bind(row.id).push_bind(row.category_id).push_bind(&row.name);
    });
    builder.push(
        " ON CONFLICT (id) DO UPDATE SET category_id = EXCLUDED.category_id, name = EXCLUDED.name",
    );
    execute(pool, "subcategories", builder, rows.len()).await
}

pub async fn upsert_suppliers(pool: &PgPool, rows: &[Supplier]) -> Result<()> {
    if rows.is_empty() {
        return Ok(());
    }
    let mut builder = QueryBuilder::new("INSERT INTO suppliers (code, name) ");
    builder.push_values(rows, |mut b, row| {
        b.push_bind(row.code).push_bind(&row.name);
    });
    builder.push(" ON CONFLICT (code) DO UPDATE SET name = EXCLUDED.name");
    execute(pool, "suppliers", builder, rows.len()).await
}

pub async fn upsert_products(pool: &PgPool, rows: &[ProductRow]) -> Result<()> {
    if rows.is_empty() {
        return Ok(());
    }
    let mut builder = QueryBuilder::new(
        "INSERT INTO products (
            code, name, alt_name, unit, category_id, subcategory_id,
            supplier_id, weight, pack_size
        ) ",
    );
    builder.push_values(rows, |mut b, row| {
        b.push_bind(&row.code)
            .push_bind(&row.name)
            .push_bind(row.alt_name.as_deref())
            .push_bind(&row.unit)
            .push_bind(row.category_id)
            .push_bind(row.subcategory_id)
            .push_bind(row.supplier_id)
            .push_bind(row.weight.clone())
            .push_bind(row.pack_size);
    });
    builder.push(
        " ON CONFLICT (code) DO UPDATE SET
            name = EXCLUDED.name,
            alt_name = EXCLUDED.alt_name,
            unit = EXCLUDED.unit,
            category_id = EXCLUDED.category_id,
            subcategory_id = EXCLUDED.subcategory_id,
            supplier_id = EXCLUDED.supplier_id,
            weight = EXCLUDED.weight,
            pack_size = EXCLUDED.pack_size",
    );
    execute(pool, "products", builder, rows.len()).await
}

pub async fn upsert_customers(pool: &PgPool, rows: &[CustomerRow]) -> Result<()> {
    if rows.is_empty() {
        return Ok(());
    }
    let mut builder = QueryBuilder::new("INSERT INTO customers (id, name, product_count) ");
    builder.push_values(rows, |mut b, row| {
        b.push_bind(&row.id).push_bind(&row.name).push_bind(row.product_count);
    });
    builder.push(
        " ON CONFLICT (id) DO UPDATE SET name = EXCLUDED.name, product_count = EXCLUDED.product_count",
    );
    execute(pool, "customers", builder, rows.len()).await
}

pub async fn upsert_contracts(pool: &PgPool, rows: &[ContractRow]) -> Result<()> {
    if rows.is_empty() {
        return Ok(());
    }
    let mut builder = QueryBuilder::new(
        "INSERT INTO contracts (
            customer_id, contract_id, name, date_from, date_to,
            payment_terms, payment_method
        ) ",
    );
    builder.push_values(rows, |mut b, row| {
        b.push_bind(&row.customer_id)
            .push_bind(row.contract_id)
            .push_bind(&row.name)
            .push_bind(row.date_from)
            .push_bind(row.date_to)
            .push_bind(row.payment_terms)
            .push_bind(&row.payment_method);
    });
    builder.push(
        " ON CONFLICT (customer_id, contract_id) DO UPDATE SET
            name = EXCLUDED.name,
            date_from = EXCLUDED.date_from,
            date_to = EXCLUDED.date_to,
            payment_terms = EXCLUDED.payment_terms,
            payment_method = EXCLUDED.payment_method",
    );
    execute(pool, "contracts", builder, rows.len()).await
}

pub async fn upsert_customer_products(pool: &PgPool, rows: &[CustomerProductRow]) -> Result<()> {
    if rows.is_empty() {
        return Ok(());
    }
    let mut builder = QueryBuilder::new(
        "INSERT INTO customer_products (
            customer_id, product_code, contract_id, price, discount, is_active
        ) ",
    );
    builder.push_values(rows, |mut b, row| {
        b.push_bind(&row.customer_id)
            .push_bind(&row.product_code)
            .push_bind(row.contract_id)
            .push_bind(row.price.clone())
            .push_bind(row.discount)
            .push_bind(row.is_active);
    });
    builder.push(
        " ON CONFLICT (customer_id, product_code) DO UPDATE SET
            contract_id = EXCLUDED.contract_id,
            price = EXCLUDED.price,
            discount = EXCLUDED.discount,
            is_active = EXCLUDED.is_active",
    );
    execute(pool, "customer_products", builder, rows.len()).await
}
