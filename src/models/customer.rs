use chrono::NaiveDate;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// 合同 (客户与公司之间有期限的商务协议)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contract {
    pub id: i64,
    pub name: String,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub payment_terms: i64,
    pub payment_method: String,
}

/// 客户 (运行期间的内部形态, 合同按 id 去重保序)
#[derive(Debug, Clone)]
pub struct Customer {
    pub id: String,
    pub name: String,
    pub contracts: IndexMap<i64, Contract>,
}

impl Customer {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            contracts: IndexMap::new(),
        }
    }

    /// 首次出现的合同生效, 返回是否新增
    pub fn add_contract(&mut self, contract: Contract) -> bool {
        if self.contracts.contains_key(&contract.id) {
            return false;
        }
        self.contracts.insert(contract.id, contract);
        true
    }

    pub fn to_record(&self, product_count: usize) -> CustomerRecord {
        CustomerRecord {
            id: self.id.clone(),
            name: self.name.clone(),
            contracts: self.contracts.values().cloned().collect(),
            product_count,
        }
    }
}

/// customers.json 中的客户记录
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerRecord {
    pub id: String,
    pub name: String,
    pub contracts: Vec<Contract>,
    pub product_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contract(id: i64, name: &str) -> Contract {
        Contract {
            id,
            name: name.to_string(),
            date_from: None,
            date_to: None,
            payment_terms: 30,
            payment_method: "virman".to_string(),
        }
    }

    #[test]
    fn first_contract_wins() {
        let mut customer = Customer::new("C1", "Konzum");
        assert!(customer.add_contract(contract(7, "Ugovor 2024")));
        assert!(!customer.add_contract(contract(7, "Ugovor izmijenjen")));

        assert_eq!(customer.contracts.len(), 1);
        assert_eq!(customer.contracts[&7].name, "Ugovor 2024");
    }

    #[test]
    fn record_flattens_contracts_in_insertion_order() {
        let mut customer = Customer::new("C1", "Konzum");
        customer.add_contract(contract(9, "B"));
        customer.add_contract(contract(3, "A"));

        let record = customer.to_record(4);
        let ids: Vec<i64> = record.contracts.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![9, 3]);
        assert_eq!(record.product_count, 4);
    }
}
