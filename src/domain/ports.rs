use crate::domain::model::{CatalogOrigin, ReconcilePolicy};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::time::Duration;

/// Local persistent key-value storage (string keys, string values).
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> impl std::future::Future<Output = Result<Option<String>>> + Send;
    fn set(&self, key: &str, value: &str)
        -> impl std::future::Future<Output = Result<()>> + Send;
    fn remove(&self, key: &str) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn remote_dataset_url(&self) -> &str;
    fn local_dataset_path(&self) -> &str;
    fn dataset_timeout(&self) -> Duration;
    fn storage_path(&self) -> &str;
    fn gist_api_base(&self) -> &str;
    fn sync_timeout(&self) -> Duration;
    fn reconcile_policy(&self) -> ReconcilePolicy;
}

/// One stage of the dataset fallback chain: something that yields raw CSV text.
#[async_trait]
pub trait DatasetSource: Send + Sync {
    fn name(&self) -> &str;
    fn origin(&self) -> CatalogOrigin;
    async fn fetch_csv(&self) -> Result<String>;
}

/// Pull-only source of a visited-site snapshot, addressed by a resource locator.
#[async_trait]
pub trait SnapshotSource: Send + Sync {
    async fn fetch_visited(&self, locator: &str) -> Result<Vec<String>>;
}
