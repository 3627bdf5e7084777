use crate::models::{LookupTables, Product};
use crate::service::PipelineRun;
use bigdecimal::BigDecimal;
use chrono::NaiveDate;

/// 单位缺失时的默认计量单位
pub const DEFAULT_UNIT: &str = "KOM";

/// products 表的行
#[derive(Debug, Clone, PartialEq)]
pub struct ProductRow {
    pub code: String,
    pub name: String,
    pub alt_name: Option<String>,
    pub unit: String,
    pub category_id: Option<i64>,
    pub subcategory_id: Option<i64>,
    pub supplier_id: Option<i64>,
    pub weight: BigDecimal,
    pub pack_size: Option<i64>,
}

impl ProductRow {
    /// 外键只指向查找表中实际存在的条目
    pub fn from_product(product: &Product, lookups: &LookupTables) -> Self {
        let unit = if product.unit.is_empty() {
            DEFAULT_UNIT.to_string()
        } else {
            product.unit.clone()
        };
        Self {
            code: product.code.clone(),
            name: product.name.clone(),
            alt_name: product.alt_name.clone(),
            unit,
            category_id: lookups
                .has_category(product.category.id)
                .then_some(product.category.id),
            subcategory_id: (lookups.has_category(product.category.id)
                && lookups.has_subcategory(product.subcategory.id))
            .then_some(product.subcategory.id),
            supplier_id: lookups
                .has_supplier(product.supplier.code)
                .then_some(product.supplier.code),
            weight: product.weight.clone(),
            pack_size: product.pack_size,
        }
    }
}

/// customers 表的行
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerRow {
    pub id: String,
    pub name: String,
    pub product_count: i64,
}

/// contracts 表的行 (主键 customer_id + contract_id)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractRow {
    pub customer_id: String,
    pub contract_id: i64,
    pub name: String,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub payment_terms: i64,
    pub payment_method: String,
}

/// customer_products 表的行 (主键 customer_id + product_code)
#[derive(Debug, Clone, PartialEq)]
pub struct CustomerProductRow {
    pub customer_id: String,
    pub product_code: String,
    pub contract_id: i64,
    pub price: BigDecimal,
    pub discount: i64,
    pub is_active: bool,
}

/// 一次导入所需的全部行, 按外键依赖顺序排列
#[derive(Debug, Clone, Default)]
pub struct CatalogRows {
    pub products: Vec<ProductRow>,
    pub customers: Vec<CustomerRow>,
    pub contracts: Vec<ContractRow>,
    pub customer_products: Vec<CustomerProductRow>,
}

impl CatalogRows {
    /// 从已校验的运行上下文投影
    pub fn from_run(run: &PipelineRun, lookups: &LookupTables) -> Self {
        let products = run
            .products
            .values()
            .map(|p| ProductRow::from_product(p, lookups))
            .collect();

        let customers = run
            .customers
            .values()
            .map(|c| CustomerRow {
                id: c.id.clone(),
                name: c.name.clone(),
                product_count: run.product_count(&c.id) as i64,
            })
            .collect();

        let contracts = run
            .customers
            .values()
            .flat_map(|c| {
                c.contracts.values().map(move |contract| ContractRow {
                    customer_id: c.id.clone(),
                    contract_id: contract.id,
                    name: contract.name.clone(),
                    date_from: contract.date_from,
                    date_to: contract.date_to,
                    payment_terms: contract.payment_terms,
                    payment_method: contract.payment_method.clone(),
                })
            })
            .collect();

        let customer_products = run
            .customer_products
            .iter()
            .flat_map(|(customer_id, prices)| {
                prices.iter().map(move |(code, price)| CustomerProductRow {
                    customer_id: customer_id.clone(),
                    product_code: code.clone(),
                    contract_id: price.contract_id,
                    price: price.price.clone(),
                    discount: price.discount,
                    is_active: price.is_active,
                })
            })
            .collect();

        Self {
            products,
            customers,
            contracts,
            customer_products,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Category, Contract, Customer, CustomerProduct, Supplier};
    use indexmap::IndexMap;

    fn product(code: &str, unit: &str, supplier: Supplier) -> Product {
        Product {
            code: code.to_string(),
            name: "Sok od jabuke".to_string(),
            alt_name: None,
            unit: unit.to_string(),
            category: Category { id: 20, name: "Pića".to_string() },
            subcategory: Category { id: 0, name: String::new() },
            supplier,
            weight: BigDecimal::from(1),
            pack_size: Some(6),
        }
    }

    #[test]
    fn product_row_drops_unknown_references() {
        let mut products = IndexMap::new();
        products.insert("A1".to_string(), product("A1", "", Supplier { code: 0, name: "Nepoznat".to_string() }));
        products.insert("A2".to_string(), product("A2", "L", Supplier { code: 9, name: "Jamnica".to_string() }));
        let lookups = LookupTables::from_products(&products);

        let first = ProductRow::from_product(&products["A1"], &lookups);
        assert_eq!(first.unit, DEFAULT_UNIT);
        assert_eq!(first.category_id, Some(20));
        assert_eq!(first.subcategory_id, None);
        assert_eq!(first.supplier_id, None);

        let second = ProductRow::from_product(&products["A2"], &lookups);
        assert_eq!(second.unit, "L");
        assert_eq!(second.supplier_id, Some(9));
    }

    #[test]
    fn product_row_nulls_subcategory_without_category() {
        let mut orphan = product("A1", "KOM", Supplier { code: 9, name: "Jamnica".to_string() });
        orphan.category = Category { id: 0, name: String::new() };
        orphan.subcategory = Category { id: 101, name: "Jogurti".to_string() };
        let mut products = IndexMap::new();
        products.insert("A1".to_string(), orphan);
        let lookups = LookupTables::from_products(&products);

        let row = ProductRow::from_product(&products["A1"], &lookups);
        assert_eq!(row.category_id, None);
        assert_eq!(row.subcategory_id, None);
        assert_eq!(row.supplier_id, Some(9));
    }

    #[test]
    fn rows_flatten_contracts_and_prices() {
        let mut run = PipelineRun::new(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        let mut customer = Customer::new("C1", "Konzum");
        for id in [1, 2] {
            customer.add_contract(Contract {
                id,
                name: format!("Ugovor {id}"),
                date_from: None,
                date_to: None,
                payment_terms: 30,
                payment_method: "virman".to_string(),
            });
        }
        run.customers.insert("C1".to_string(), customer);
        run.customer_products.entry("C1".to_string()).or_default().insert(
            "A1".to_string(),
            CustomerProduct {
                contract_id: 2,
                price: BigDecimal::from(4),
                discount: 0,
                is_active: false,
            },
        );

        let rows = CatalogRows::from_run(&run, &LookupTables::default());
        assert_eq!(rows.contracts.len(), 2);
        assert_eq!(rows.contracts[1].customer_id, "C1");
        assert_eq!(rows.customers[0].product_count, 1);
        assert_eq!(rows.customer_products[0].product_code, "A1");
        assert!(!rows.customer_products[0].is_active);
    }
}
