use crate::config::toml_config::AppConfig;
use crate::domain::model::Theme;
use crate::utils::error::Result;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "heritage-atlas")]
#[command(about = "Browse World Heritage Sites and keep track of the ones you have visited")]
pub struct CliConfig {
    /// Path to a TOML configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Override the local storage directory
    #[arg(long, global = true)]
    pub storage_path: Option<String>,

    /// Override the remote dataset URL
    #[arg(long, global = true)]
    pub dataset_url: Option<String>,

    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Emit logs as JSON")]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// List the site catalog
    Sites {
        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,

        /// Only list sites marked as visited
        #[arg(long)]
        visited_only: bool,
    },
    /// Mark a site as visited, or unmark it if it already is
    Toggle { name: String },
    /// List visited site names
    Visited,
    /// Show catalog and visited counts
    Stats,
    /// Manage the remote sync access code
    Code {
        #[command(subcommand)]
        action: CodeAction,
    },
    /// Set the theme preference
    Theme {
        #[arg(value_enum)]
        theme: Theme,
    },
    /// Write the visited state to a JSON file
    Export {
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, Subcommand)]
pub enum CodeAction {
    /// Enter an access code and sync from the bound snapshot
    Set { code: String },
    /// Forget the access code and go back to local storage only
    Clear,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Csv,
    Json,
}

impl CliConfig {
    /// 載入配置檔 (若有)，再套用命令列覆蓋設定
    pub fn app_config(&self) -> Result<AppConfig> {
        let mut config = match &self.config {
            Some(path) => AppConfig::from_file(path)?,
            None => AppConfig::default(),
        };

        if let Some(storage_path) = &self.storage_path {
            config.storage.path = storage_path.clone();
        }
        if let Some(dataset_url) = &self.dataset_url {
            config.dataset.remote_url = dataset_url.clone();
        }

        Ok(config)
    }
}
