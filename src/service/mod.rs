pub mod contracts;
pub mod loader;
pub mod pipeline;
pub mod products;
pub mod report;
pub mod run;
pub mod validator;

pub use loader::CatalogLoader;
pub use pipeline::PipelineService;
pub use run::PipelineRun;
pub use validator::ValidationReport;
