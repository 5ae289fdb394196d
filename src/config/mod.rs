#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
pub use cli::{CliConfig, CodeAction, Command, OutputFormat};
pub use toml_config::AppConfig;
