use crate::domain::ports::SnapshotSource;
use crate::utils::error::{AtlasError, Result};
use async_trait::async_trait;
use reqwest::header::{ACCEPT, USER_AGENT};
use reqwest::Client;
use serde_json::Value;

const CLIENT_USER_AGENT: &str = concat!("heritage-atlas/", env!("CARGO_PKG_VERSION"));

/// Reads a visited-site snapshot from a GitHub gist (read-only).
pub struct GistClient {
    client: Client,
}

impl GistClient {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl SnapshotSource for GistClient {
    async fn fetch_visited(&self, locator: &str) -> Result<Vec<String>> {
        tracing::debug!("Fetching remote snapshot: {}", locator);
        let response = self
            .client
            .get(locator)
            .header(USER_AGENT, CLIENT_USER_AGENT)
            .header(ACCEPT, "application/vnd.github+json")
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(AtlasError::HttpStatusError {
                url: locator.to_string(),
                status: response.status().as_u16(),
            });
        }

        let document: Value = response.json().await?;
        visited_from_document(&document)
    }
}

/// Pull the visited list out of either a bare snapshot document or a gist
/// document whose files hold one.
pub fn visited_from_document(document: &Value) -> Result<Vec<String>> {
    if document.get("visitedSites").is_some() {
        return Ok(visited_sites(document));
    }

    let content = snapshot_file_content(document).ok_or_else(|| AtlasError::SnapshotError {
        message: "No JSON data file found in gist".to_string(),
    })?;

    let snapshot: Value = serde_json::from_str(content)?;
    Ok(visited_sites(&snapshot))
}

/// First file named like `*data*.json*`, else the first `*.json` file.
fn snapshot_file_content(document: &Value) -> Option<&str> {
    let files = document.get("files")?.as_object()?;

    let named = |pred: &dyn Fn(&str) -> bool| {
        files
            .iter()
            .find(|(name, _)| pred(name.to_lowercase().as_str()))
            .and_then(|(_, file)| file.get("content")?.as_str())
    };

    named(&|name: &str| name.contains("data") && name.contains(".json"))
        .or_else(|| named(&|name: &str| name.ends_with(".json")))
}

/// A snapshot without a usable `visitedSites` list counts as empty.
fn visited_sites(snapshot: &Value) -> Vec<String> {
    snapshot
        .get("visitedSites")
        .and_then(Value::as_array)
        .map(|names| {
            names
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}
