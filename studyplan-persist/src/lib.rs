mod error;
mod exchange;
mod gateway;
mod session;

pub mod kv;

pub use error::*;
pub use exchange::*;
pub use gateway::*;
pub use session::*;
