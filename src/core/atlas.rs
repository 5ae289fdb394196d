use crate::adapters::dataset::{FileDataset, HttpDataset};
use crate::adapters::gist::GistClient;
use crate::core::access::{AccessBindings, AccessCodeGate};
use crate::core::resolver::DataSourceResolver;
use crate::core::visited::VisitedStateStore;
use crate::domain::model::{Catalog, ExportSnapshot, ReconcilePolicy, Stats, Theme};
use crate::domain::ports::{ConfigProvider, KeyValueStore, SnapshotSource};
use crate::utils::error::{AtlasError, Result};
use reqwest::Client;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Remote dataset first, then the bundled copy.
pub fn resolver_from_config<C: ConfigProvider>(config: &C) -> Result<DataSourceResolver> {
    let client = Client::builder().timeout(config.dataset_timeout()).build()?;

    Ok(DataSourceResolver::new(vec![
        Box::new(HttpDataset::new(client, config.remote_dataset_url())),
        Box::new(FileDataset::new(config.local_dataset_path())),
    ]))
}

/// Owns the session state: the catalog, the visited-state store and the
/// access-code gate. Built once at start-up and handed to the presentation layer.
pub struct Atlas<S: KeyValueStore> {
    catalog: Catalog,
    store: VisitedStateStore<S>,
    gate: AccessCodeGate,
    snapshots: Box<dyn SnapshotSource>,
}

impl<S: KeyValueStore> Atlas<S> {
    pub async fn bootstrap<C: ConfigProvider>(config: &C, storage: S) -> Result<Self> {
        let resolver = resolver_from_config(config)?;
        let sync_client = Client::builder().timeout(config.sync_timeout()).build()?;

        Self::assemble(
            &resolver,
            storage,
            AccessCodeGate::new(AccessBindings::builtin(config.gist_api_base())),
            Box::new(GistClient::new(sync_client)),
            config.reconcile_policy(),
        )
        .await
    }

    /// Resolve the catalog and load the visited state concurrently.
    pub async fn assemble(
        resolver: &DataSourceResolver,
        storage: S,
        mut gate: AccessCodeGate,
        snapshots: Box<dyn SnapshotSource>,
        policy: ReconcilePolicy,
    ) -> Result<Self> {
        let mut store = VisitedStateStore::new(storage, policy);

        let (catalog, loaded) = tokio::join!(
            resolver.resolve(),
            store.load_and_reconcile(&mut gate, snapshots.as_ref())
        );
        loaded?;

        tracing::info!(
            "Atlas ready: {} sites ({}), {} visited, sync {}",
            catalog.len(),
            catalog.origin(),
            store.len(),
            if gate.is_active() { "on" } else { "off" }
        );

        Ok(Self {
            catalog,
            store,
            gate,
            snapshots,
        })
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn store(&self) -> &VisitedStateStore<S> {
        &self.store
    }

    pub fn gate(&self) -> &AccessCodeGate {
        &self.gate
    }

    pub fn is_visited(&self, name: &str) -> bool {
        self.store.is_visited(name)
    }

    pub async fn toggle(&mut self, name: &str) -> Result<bool> {
        self.store.toggle(name).await
    }

    pub async fn set_theme(&mut self, theme: Theme) -> Result<()> {
        self.store.set_theme(theme).await
    }

    /// Validate and save the code, then pull the bound snapshot.
    /// Returns whether the snapshot was applied.
    pub async fn enter_access_code(&mut self, code: &str) -> Result<bool> {
        if !self.gate.validate(code) {
            return Err(AtlasError::InvalidAccessCode);
        }

        self.gate.save(self.store.storage()).await?;
        Ok(self.store.reconcile(&mut self.gate, self.snapshots.as_ref()).await)
    }

    pub async fn clear_access_code(&mut self) -> Result<()> {
        self.gate.clear(self.store.storage()).await
    }

    pub fn export_snapshot(&self) -> ExportSnapshot {
        self.store.export_snapshot()
    }

    /// Write the export as pretty JSON. A directory (or no path) gets the default file name.
    pub async fn write_export(&self, output: Option<&Path>) -> Result<PathBuf> {
        let snapshot = self.export_snapshot();
        let path = match output {
            Some(path) if path.is_dir() => path.join(snapshot.default_file_name()),
            Some(path) => path.to_path_buf(),
            None => PathBuf::from(snapshot.default_file_name()),
        };

        let json = serde_json::to_string_pretty(&snapshot)?;
        tokio::fs::write(&path, json).await?;

        tracing::info!(
            "Exported {} visited sites to {}",
            snapshot.total_sites,
            path.display()
        );
        Ok(path)
    }

    /// `visited` counts distinct visited names present in the catalog.
    pub fn stats(&self) -> Stats {
        let total = self.catalog.len();
        let names: HashSet<&str> = self
            .catalog
            .sites()
            .iter()
            .map(|site| site.name.as_str())
            .collect();
        let visited = self
            .store
            .visited()
            .iter()
            .filter(|name| names.contains(name.as_str()))
            .count();

        Stats {
            total,
            visited,
            remaining: total - visited,
        }
    }
}
