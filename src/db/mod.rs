pub mod pool;
pub mod queries;
pub mod rows;

pub use pool::create_pool;
pub use queries::*;
pub use rows::*;
