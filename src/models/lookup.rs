use super::product::{Category, Product, Supplier};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 子品类查找行 (关联父品类)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subcategory {
    pub id: i64,
    pub category_id: i64,
    pub name: String,
}

/// 从商品目录投影出的规范化查找表
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LookupTables {
    pub categories: Vec<Category>,
    pub subcategories: Vec<Subcategory>,
    pub suppliers: Vec<Supplier>,
}

impl LookupTables {
    /// 品类按 id 唯一, 供应商按 code 唯一; 同键后出现者覆盖, 输出按键升序.
    /// id/code 为 0 的条目没有身份, 不输出; 父品类未输出的子品类也不输出.
    pub fn from_products(products: &IndexMap<String, Product>) -> Self {
        let mut categories: BTreeMap<i64, Category> = BTreeMap::new();
        let mut subcategories: BTreeMap<i64, Subcategory> = BTreeMap::new();
        let mut suppliers: BTreeMap<i64, Supplier> = BTreeMap::new();

        for product in products.values() {
            if product.category.id != 0 {
                categories.insert(product.category.id, product.category.clone());
            }
            if product.category.id != 0 && product.subcategory.id != 0 {
                subcategories.insert(
                    product.subcategory.id,
                    Subcategory {
                        id: product.subcategory.id,
                        category_id: product.category.id,
                        name: product.subcategory.name.clone(),
                    },
                );
            }
            if product.supplier.is_identified() {
                suppliers.insert(product.supplier.code, product.supplier.clone());
            }
        }

        Self {
            categories: categories.into_values().collect(),
            subcategories: subcategories.into_values().collect(),
            suppliers: suppliers.into_values().collect(),
        }
    }

    pub fn has_category(&self, id: i64) -> bool {
        self.categories.binary_search_by_key(&id, |c| c.id).is_ok()
    }

    pub fn has_subcategory(&self, id: i64) -> bool {
        self.subcategories.binary_search_by_key(&id, |s| s.id).is_ok()
    }

    pub fn has_supplier(&self, code: i64) -> bool {
        self.suppliers
            .binary_search_by_key(&code, |s| s.code)
            .is_ok()
    }
}
