pub mod artifacts;

pub use artifacts::{write_artifacts, ArtifactWriter};

pub const CUSTOMERS_FILE: &str = "customers.json";
pub const PRODUCTS_FILE: &str = "products.json";
pub const CUSTOMER_PRODUCTS_FILE: &str = "customer-products.json";
pub const CATEGORIES_FILE: &str = "categories.json";
pub const SUBCATEGORIES_FILE: &str = "subcategories.json";
pub const SUPPLIERS_FILE: &str = "suppliers.json";
