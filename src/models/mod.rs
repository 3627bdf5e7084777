pub mod customer;
pub mod decimal;
pub mod lookup;
pub mod price;
pub mod product;
pub mod summary;

pub use customer::{Contract, Customer, CustomerRecord};
pub use lookup::{LookupTables, Subcategory};
pub use price::{CustomerProduct, CustomerProducts};
pub use product::{Category, Product, Supplier};
pub use summary::{ArtifactSize, CustomerRank, RunSummary, StageStats};
