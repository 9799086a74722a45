pub mod config;
pub mod types;

pub use config::{Config, StoreConfig, ValidationConfig};
pub use types::*;
