pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::storage::{LocalStorage, MemoryStorage};
pub use config::AppConfig;
pub use crate::core::{
    access::AccessCodeGate, atlas::Atlas, resolver::DataSourceResolver,
    visited::VisitedStateStore,
};
pub use utils::error::{AtlasError, Result};
