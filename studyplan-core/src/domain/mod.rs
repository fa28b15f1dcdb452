mod allocator;
mod classifier;
mod error;
mod query;

pub mod models;

pub use allocator::*;
pub use classifier::*;
pub use error::*;
pub use query::*;
