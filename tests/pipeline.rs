use catalog_etl::config::AppConfig;
use catalog_etl::export::{CUSTOMERS_FILE, CUSTOMER_PRODUCTS_FILE, PRODUCTS_FILE, SUPPLIERS_FILE};
use catalog_etl::{Catalog, EtlError, PipelineService};
use chrono::NaiveDate;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const CONTRACT_HEADER: &str = "Tablica rabata;;;;\nKupac;Naziv;;Ugovor;;Od;Do\n";
const PRODUCT_HEADER: &str = "Artikli s težinama;;;\nSifra;Grupa;Naziv grupe\n";

struct ContractLine<'a> {
    customer: &'a str,
    name: &'a str,
    contract: &'a str,
    contract_name: &'a str,
    from: &'a str,
    to: &'a str,
    product: &'a str,
    discount: &'a str,
    price: &'a str,
}

impl Default for ContractLine<'_> {
    fn default() -> Self {
        Self {
            customer: "1001",
            name: "Konzum d.d.",
            contract: "7",
            contract_name: "Ugovor 2024",
            from: "1.1.2024",
            to: "31.12.2024",
            product: "A1",
            discount: "5",
            price: "12,50",
        }
    }
}

fn contract_line(line: &ContractLine) -> String {
    let mut fields = vec![String::new(); 28];
    fields[0] = line.customer.to_string();
    fields[1] = format!("\"{}\"", line.name);
    fields[3] = line.contract.to_string();
    fields[5] = line.from.to_string();
    fields[6] = line.to.to_string();
    fields[7] = "60".to_string();
    fields[8] = "virman".to_string();
    fields[9] = line.contract_name.to_string();
    fields[20] = line.product.to_string();
    fields[26] = line.discount.to_string();
    fields[27] = line.price.to_string();
    fields.join(";") + "\n"
}

fn product_line(code: &str, name: &str, supplier: (&str, &str)) -> String {
    let mut fields = vec![String::new(); 41];
    fields[0] = code.to_string();
    fields[1] = "10".to_string();
    fields[2] = "Mliječni proizvodi".to_string();
    fields[3] = "101".to_string();
    fields[4] = "Jogurti".to_string();
    fields[5] = name.to_string();
    fields[7] = "KOM".to_string();
    fields[8] = "12".to_string();
    fields[19] = supplier.0.to_string();
    fields[20] = supplier.1.to_string();
    fields[40] = "0,180".to_string();
    fields.join(";") + "\n"
}

struct Fixture {
    dir: TempDir,
}

impl Fixture {
    fn new(contracts: &[String], products: &[String]) -> Self {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("contracts.csv"), CONTRACT_HEADER.to_string() + &contracts.concat()).unwrap();
        fs::write(dir.path().join("products.csv"), PRODUCT_HEADER.to_string() + &products.concat()).unwrap();
        Self { dir }
    }

    fn config(&self, out: &str) -> AppConfig {
        let mut config = AppConfig::default();
        config.input.contracts_path = self.dir.path().join("contracts.csv");
        config.input.products_path = self.dir.path().join("products.csv");
        config.output.data_dir = self.out(out);
        config
    }

    fn out(&self, out: &str) -> PathBuf {
        self.dir.path().join(out)
    }
}

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
}

fn read_json(dir: &Path, name: &str) -> Value {
    serde_json::from_slice(&fs::read(dir.join(name)).unwrap()).unwrap()
}

fn standard_fixture() -> Fixture {
    Fixture::new(
        &[
            contract_line(&ContractLine::default()),
            contract_line(&ContractLine {
                product: "A2",
                contract_name: "Promijenjeni naziv",
                from: "1.1.2025",
                price: "3,10",
                ..ContractLine::default()
            }),
            contract_line(&ContractLine {
                customer: "1002",
                name: "Plodine d.d.",
                contract: "3",
                product: "X1",
                ..ContractLine::default()
            }),
            contract_line(&ContractLine {
                customer: "1002",
                name: "Plodine d.d.",
                contract: "3",
                product: "A1",
                from: "",
                to: "1.1.2020",
                ..ContractLine::default()
            }),
            contract_line(&ContractLine { product: "", ..ContractLine::default() }),
        ],
        &[
            product_line("A1", "Jogurt 180g", ("501", "Dukat")),
            product_line("A2", "Mlijeko 1L", ("502", "Vindija")),
            product_line("A1", "Jogurt voćni 180g", ("501", "Dukat")),
            product_line("", "Bez šifre", ("501", "Dukat")),
        ],
    )
}

#[tokio::test]
async fn run_produces_validated_artifacts() {
    let fixture = standard_fixture();
    let summary = PipelineService::new(fixture.config("data"))
        .run_on(today())
        .await
        .unwrap();

    assert_eq!(summary.contracts.processed, 4);
    assert_eq!(summary.contracts.skipped, 1);
    assert_eq!(summary.products.processed, 3);
    assert_eq!(summary.products.skipped, 1);
    assert_eq!(summary.relationships_total, 4);
    assert_eq!(summary.missing_products, 1);
    assert_eq!(summary.customer_count, 2);
    assert_eq!(summary.product_count, 2);
    assert_eq!(summary.top_customers[0].id, "1001");

    let out = fixture.out("data");
    let customers = read_json(&out, CUSTOMERS_FILE);
    assert_eq!(customers[0]["name"], "Konzum d.d.");
    assert_eq!(customers[0]["productCount"], 2);
    assert_eq!(customers[1]["productCount"], 1);

    // 同一客户同一合同的两行只产生一个合同, 元数据以第一行为准
    let contracts = customers[0]["contracts"].as_array().unwrap();
    assert_eq!(contracts.len(), 1);
    assert_eq!(contracts[0]["name"], "Ugovor 2024");
    assert_eq!(contracts[0]["dateFrom"], "2024-01-01");
    assert_eq!(contracts[0]["paymentTerms"], 60);

    let prices = read_json(&out, CUSTOMER_PRODUCTS_FILE);
    assert_eq!(prices["1001"]["A1"]["isActive"], true);
    assert_eq!(prices["1001"]["A2"]["isActive"], false);
    assert_eq!(prices["1002"]["A1"]["isActive"], true);
    assert!(prices["1002"].get("X1").is_none());
    assert!(prices["1001"]["A1"]["price"].is_number());
    assert_eq!(prices["1001"]["A2"]["price"].to_string(), "3.10");

    let products = read_json(&out, PRODUCTS_FILE);
    assert_eq!(products["A1"]["name"], "Jogurt voćni 180g");
    assert_eq!(products["A1"]["category"]["name"], "Mliječni proizvodi");
    assert_eq!(products["A1"]["packSize"], 12);
    assert!(products["A1"]["altName"].is_null());
    assert!(products["A1"]["weight"].is_number());
    assert_eq!(products["A1"]["weight"].to_string(), "0.180");

    let suppliers = read_json(&out, SUPPLIERS_FILE);
    assert_eq!(suppliers.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn no_dangling_product_references() {
    let fixture = standard_fixture();
    PipelineService::new(fixture.config("data"))
        .run_on(today())
        .await
        .unwrap();

    let out = fixture.out("data");
    let products = read_json(&out, PRODUCTS_FILE);
    let prices = read_json(&out, CUSTOMER_PRODUCTS_FILE);
    for (_, by_code) in prices.as_object().unwrap() {
        for code in by_code.as_object().unwrap().keys() {
            assert!(products.get(code).is_some(), "dangling product {code}");
        }
    }
}

#[tokio::test]
async fn reruns_are_byte_identical() {
    let fixture = standard_fixture();
    for out in ["first", "second"] {
        PipelineService::new(fixture.config(out))
            .run_on(today())
            .await
            .unwrap();
    }

    for name in [CUSTOMERS_FILE, PRODUCTS_FILE, CUSTOMER_PRODUCTS_FILE, SUPPLIERS_FILE] {
        let first = fs::read(fixture.out("first").join(name)).unwrap();
        let second = fs::read(fixture.out("second").join(name)).unwrap();
        assert_eq!(first, second, "{name} differs between runs");
    }
}

#[tokio::test]
async fn missing_source_is_fatal_and_writes_nothing() {
    let fixture = standard_fixture();
    let mut config = fixture.config("data");
    config.input.products_path = fixture.dir.path().join("does-not-exist.csv");

    let err = PipelineService::new(config).run_on(today()).await.unwrap_err();
    assert!(matches!(err, EtlError::Io { .. }));
    assert!(!fixture.out("data").exists());
}

#[tokio::test]
async fn lookup_tables_can_be_disabled() {
    let fixture = standard_fixture();
    let mut config = fixture.config("data");
    config.output.emit_lookup_tables = false;

    let summary = PipelineService::new(config).run_on(today()).await.unwrap();
    assert_eq!(summary.artifacts.len(), 3);
    assert!(!fixture.out("data").join(SUPPLIERS_FILE).exists());
}

#[tokio::test]
async fn windows_1250_sources_are_decoded() {
    let fixture = Fixture::new(&[], &[]);
    let contracts = CONTRACT_HEADER.to_string()
        + &contract_line(&ContractLine { name: "Šibenka", ..ContractLine::default() });
    let (encoded, _, _) = encoding_rs::WINDOWS_1250.encode(&contracts);
    fs::write(fixture.dir.path().join("contracts.csv"), encoded.as_ref()).unwrap();
    fs::write(
        fixture.dir.path().join("products.csv"),
        PRODUCT_HEADER.to_string() + &product_line("A1", "Jogurt", ("501", "Dukat")),
    )
    .unwrap();

    PipelineService::new(fixture.config("data"))
        .run_on(today())
        .await
        .unwrap();

    let customers = read_json(&fixture.out("data"), CUSTOMERS_FILE);
    assert_eq!(customers[0]["name"], "Šibenka");
}

#[tokio::test]
async fn catalog_reads_generated_artifacts() {
    let fixture = standard_fixture();
    PipelineService::new(fixture.config("data"))
        .run_on(today())
        .await
        .unwrap();

    let catalog = Catalog::load(&fixture.out("data")).await.unwrap();
    assert_eq!(catalog.customers().len(), 2);
    assert_eq!(catalog.customer("1002").unwrap().name, "Plodine d.d.");
    assert!(catalog.product("X1").is_none());

    let offered = catalog.products_for_customer("1001");
    let names: Vec<&str> = offered.iter().map(|p| p.product.name.as_str()).collect();
    assert_eq!(names, vec!["Jogurt voćni 180g", "Mlijeko 1L"]);
    assert_eq!(offered[0].contract_id, 7);
    assert_eq!(offered[0].price.to_string(), "12.50");

    assert_eq!(catalog.suppliers_for("1001"), vec!["Dukat", "Vindija"]);
    assert_eq!(catalog.categories_for("1001"), vec!["Mliječni proizvodi"]);
    assert!(catalog.products_for_customer("9999").is_empty());

    let stats = catalog.stats();
    assert_eq!(stats.total_customers, 2);
    assert_eq!(stats.total_products, 2);
    assert_eq!(stats.customer_with_most_products.unwrap().id, "1001");
    assert_eq!(stats.average_products_per_customer, 2);
}
