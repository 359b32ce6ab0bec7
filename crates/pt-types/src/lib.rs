pub mod allocation;
pub mod config;
pub mod errors;
pub mod report;

pub use allocation::*;
pub use config::*;
pub use errors::*;
pub use report::*;
