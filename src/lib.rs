pub mod catalog;
pub mod config;
pub mod db;
pub mod error;
pub mod export;
pub mod models;
pub mod parser;
pub mod service;

pub use catalog::Catalog;
pub use config::AppConfig;
pub use db::create_pool;
pub use error::{EtlError, Result};
pub use service::{PipelineRun, PipelineService};
