pub mod config;
pub mod error;
pub mod search;

pub use config::*;
pub use error::*;
pub use search::*;
