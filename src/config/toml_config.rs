use crate::core::access::DEFAULT_GIST_API_BASE;
use crate::domain::model::ReconcilePolicy;
use crate::domain::ports::ConfigProvider;
use crate::utils::error::{AtlasError, Result};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_DATASET_URL: &str = "https://ihp-wins.unesco.org/dataset/88c8eff6-b94d-4826-bb13-7107ac4c02a9/resource/2f46f6b2-45f9-402b-ace9-1e02c9c97a3d/download/whc-sites-2025.csv";
pub const DEFAULT_LOCAL_DATASET: &str = "assets/whc-sites-2025.csv";
pub const DEFAULT_STORAGE_PATH: &str = ".heritage-atlas";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub dataset: DatasetConfig,
    pub storage: StorageConfig,
    pub sync: SyncConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasetConfig {
    pub remote_url: String,
    pub local_path: String,
    pub timeout_seconds: u64,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            remote_url: DEFAULT_DATASET_URL.to_string(),
            local_path: DEFAULT_LOCAL_DATASET.to_string(),
            timeout_seconds: 15,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub path: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: DEFAULT_STORAGE_PATH.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    pub gist_api_base: String,
    pub policy: ReconcilePolicy,
    pub timeout_seconds: u64,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            gist_api_base: DEFAULT_GIST_API_BASE.to_string(),
            policy: ReconcilePolicy::default(),
            timeout_seconds: 10,
        }
    }
}

impl AppConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| AtlasError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${DATASET_URL})，找不到的變數保留原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| AtlasError::ConfigError {
            message: format!("env substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }
}

impl ConfigProvider for AppConfig {
    fn remote_dataset_url(&self) -> &str {
        &self.dataset.remote_url
    }

    fn local_dataset_path(&self) -> &str {
        &self.dataset.local_path
    }

    fn dataset_timeout(&self) -> Duration {
        Duration::from_secs(self.dataset.timeout_seconds)
    }

    fn storage_path(&self) -> &str {
        &self.storage.path
    }

    fn gist_api_base(&self) -> &str {
        &self.sync.gist_api_base
    }

    fn sync_timeout(&self) -> Duration {
        Duration::from_secs(self.sync.timeout_seconds)
    }

    fn reconcile_policy(&self) -> ReconcilePolicy {
        self.sync.policy
    }
}

impl Validate for AppConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_url("dataset.remote_url", &self.dataset.remote_url)?;
        validation::validate_path("dataset.local_path", &self.dataset.local_path)?;
        validation::validate_file_extension("dataset.local_path", &self.dataset.local_path, &["csv"])?;
        validation::validate_range("dataset.timeout_seconds", self.dataset.timeout_seconds, 1, 300)?;

        validation::validate_path("storage.path", &self.storage.path)?;

        validation::validate_non_empty_string("sync.gist_api_base", &self.sync.gist_api_base)?;
        validation::validate_url("sync.gist_api_base", &self.sync.gist_api_base)?;
        validation::validate_range("sync.timeout_seconds", self.sync.timeout_seconds, 1, 300)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = AppConfig::from_toml_str("").unwrap();

        assert_eq!(config.remote_dataset_url(), DEFAULT_DATASET_URL);
        assert_eq!(config.local_dataset_path(), DEFAULT_LOCAL_DATASET);
        assert_eq!(config.storage_path(), DEFAULT_STORAGE_PATH);
        assert_eq!(config.gist_api_base(), "https://api.github.com");
        assert_eq!(config.reconcile_policy(), ReconcilePolicy::Replace);
        assert_eq!(config.sync_timeout(), Duration::from_secs(10));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_full_config() {
        let toml_content = r#"
[dataset]
remote_url = "https://data.example.org/whc.csv"
local_path = "data/whc.csv"
timeout_seconds = 30

[storage]
path = "/tmp/atlas"

[sync]
gist_api_base = "http://localhost:9000"
policy = "merge"
timeout_seconds = 5
"#;

        let config = AppConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.remote_dataset_url(), "https://data.example.org/whc.csv");
        assert_eq!(config.dataset_timeout(), Duration::from_secs(30));
        assert_eq!(config.storage_path(), "/tmp/atlas");
        assert_eq!(config.reconcile_policy(), ReconcilePolicy::Merge);
        assert_eq!(config.sync_timeout(), Duration::from_secs(5));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("ATLAS_TEST_DATASET_URL", "https://mirror.example.org/whc.csv");

        let toml_content = r#"
[dataset]
remote_url = "${ATLAS_TEST_DATASET_URL}"
local_path = "${ATLAS_TEST_UNSET_VARIABLE}.csv"
"#;

        let config = AppConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.dataset.remote_url, "https://mirror.example.org/whc.csv");
        assert_eq!(config.dataset.local_path, "${ATLAS_TEST_UNSET_VARIABLE}.csv");

        std::env::remove_var("ATLAS_TEST_DATASET_URL");
    }

    #[test]
    fn test_config_validation() {
        let bad_url = AppConfig::from_toml_str("[dataset]\nremote_url = \"invalid-url\"").unwrap();
        assert!(bad_url.validate().is_err());

        let bad_extension =
            AppConfig::from_toml_str("[dataset]\nlocal_path = \"assets/sites.txt\"").unwrap();
        assert!(bad_extension.validate().is_err());

        let bad_timeout = AppConfig::from_toml_str("[sync]\ntimeout_seconds = 0").unwrap();
        assert!(bad_timeout.validate().is_err());
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let err = AppConfig::from_toml_str("[dataset\nremote_url = 1").unwrap_err();
        assert!(matches!(err, AtlasError::ConfigError { .. }));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[storage]\npath = \"./atlas-data\"\n")
            .unwrap();

        let config = AppConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.storage_path(), "./atlas-data");
        assert_eq!(config.local_dataset_path(), DEFAULT_LOCAL_DATASET);
    }
}
