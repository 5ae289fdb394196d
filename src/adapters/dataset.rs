use crate::domain::model::CatalogOrigin;
use crate::domain::ports::DatasetSource;
use crate::utils::error::{AtlasError, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::path::PathBuf;

/// Authoritative dataset served over HTTP.
pub struct HttpDataset {
    client: Client,
    url: String,
}

impl HttpDataset {
    pub fn new(client: Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }
}

#[async_trait]
impl DatasetSource for HttpDataset {
    fn name(&self) -> &str {
        &self.url
    }

    fn origin(&self) -> CatalogOrigin {
        CatalogOrigin::Remote
    }

    async fn fetch_csv(&self) -> Result<String> {
        tracing::debug!("Requesting dataset: {}", self.url);
        let response = self.client.get(&self.url).send().await?;

        tracing::debug!("Dataset response status: {}", response.status());
        if !response.status().is_success() {
            return Err(AtlasError::HttpStatusError {
                url: self.url.clone(),
                status: response.status().as_u16(),
            });
        }

        Ok(response.text().await?)
    }
}

/// Bundled copy of the dataset on the local file system.
pub struct FileDataset {
    path: PathBuf,
    label: String,
}

impl FileDataset {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let label = path.display().to_string();
        Self { path, label }
    }
}

#[async_trait]
impl DatasetSource for FileDataset {
    fn name(&self) -> &str {
        &self.label
    }

    fn origin(&self) -> CatalogOrigin {
        CatalogOrigin::Local
    }

    async fn fetch_csv(&self) -> Result<String> {
        Ok(tokio::fs::read_to_string(&self.path).await?)
    }
}
