use crate::core::fallback::fallback_catalog;
use crate::core::normalizer;
use crate::domain::model::Catalog;
use crate::domain::ports::DatasetSource;
use crate::utils::error::{AtlasError, Result};

/// Ordered dataset fallback chain. Each stage is tried at most once per
/// `resolve`; when all of them fail the built-in catalog is returned.
pub struct DataSourceResolver {
    sources: Vec<Box<dyn DatasetSource>>,
}

impl DataSourceResolver {
    pub fn new(sources: Vec<Box<dyn DatasetSource>>) -> Self {
        Self { sources }
    }

    pub async fn resolve(&self) -> Catalog {
        for source in &self.sources {
            tracing::debug!("Loading dataset from {}", source.name());
            match load_from(&**source).await {
                Ok(catalog) => {
                    tracing::info!(
                        "Loaded {} sites from {} ({})",
                        catalog.len(),
                        source.name(),
                        catalog.origin()
                    );
                    return catalog;
                }
                Err(e) => {
                    tracing::warn!("Dataset source {} failed: {}", source.name(), e);
                }
            }
        }

        let catalog = fallback_catalog();
        tracing::warn!("All dataset sources failed, using {} built-in sites", catalog.len());
        catalog
    }
}

/// Fetch and normalize one stage. A document that yields no usable sites
/// counts as a failure so the chain keeps going.
pub async fn load_from(source: &dyn DatasetSource) -> Result<Catalog> {
    let text = source.fetch_csv().await?;
    let normalized = normalizer::normalize(&text);

    if normalized.sites.is_empty() {
        return Err(AtlasError::DataSourceError {
            source_name: source.name().to_string(),
            message: format!(
                "no usable sites ({} rows skipped)",
                normalized.skipped_rows
            ),
        });
    }

    Ok(Catalog::new(normalized.sites, source.origin()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::CatalogOrigin;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    const CSV: &str = "name_en,states_name_en,latitude,longitude,date_inscribed,category_short\n\
                       Petra,Jordan,30.3285,35.4444,1985,Cultural\n\
                       Angkor,Cambodia,13.4125,103.8670,1992,Cultural\n";

    struct StaticSource {
        name: &'static str,
        origin: CatalogOrigin,
        body: Option<&'static str>,
        calls: Arc<AtomicUsize>,
    }

    impl StaticSource {
        fn boxed(
            name: &'static str,
            origin: CatalogOrigin,
            body: Option<&'static str>,
        ) -> (Box<dyn DatasetSource>, Arc<AtomicUsize>) {
            let calls = Arc::new(AtomicUsize::new(0));
            let source = Self {
                name,
                origin,
                body,
                calls: calls.clone(),
            };
            (Box::new(source), calls)
        }
    }

    #[async_trait]
    impl DatasetSource for StaticSource {
        fn name(&self) -> &str {
            self.name
        }

        fn origin(&self) -> CatalogOrigin {
            self.origin
        }

        async fn fetch_csv(&self) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.body.map(str::to_string).ok_or_else(|| AtlasError::DataSourceError {
                source_name: self.name.to_string(),
                message: "unreachable".to_string(),
            })
        }
    }

    #[tokio::test]
    async fn test_primary_success_skips_later_stages() {
        let (remote, remote_calls) = StaticSource::boxed("remote", CatalogOrigin::Remote, Some(CSV));
        let (local, local_calls) = StaticSource::boxed("local", CatalogOrigin::Local, Some(CSV));
        let resolver = DataSourceResolver::new(vec![remote, local]);

        let catalog = resolver.resolve().await;

        assert_eq!(catalog.origin(), CatalogOrigin::Remote);
        assert_eq!(catalog.len(), 2);
        assert_eq!(remote_calls.load(Ordering::SeqCst), 1);
        assert_eq!(local_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_primary_failure_matches_local_pathway() {
        let (remote, _) = StaticSource::boxed("remote", CatalogOrigin::Remote, None);
        let (local, local_calls) = StaticSource::boxed("local", CatalogOrigin::Local, Some(CSV));
        let resolver = DataSourceResolver::new(vec![remote, local]);

        let catalog = resolver.resolve().await;

        let (direct, _) = StaticSource::boxed("local", CatalogOrigin::Local, Some(CSV));
        let expected = load_from(&*direct).await.unwrap();

        assert_eq!(catalog.origin(), CatalogOrigin::Local);
        assert_eq!(catalog.sites(), expected.sites());
        assert_eq!(local_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_unusable_document_falls_through() {
        let (remote, _) = StaticSource::boxed(
            "remote",
            CatalogOrigin::Remote,
            Some("<html><body>maintenance</body></html>"),
        );
        let (local, _) = StaticSource::boxed("local", CatalogOrigin::Local, Some(CSV));
        let resolver = DataSourceResolver::new(vec![remote, local]);

        let catalog = resolver.resolve().await;
        assert_eq!(catalog.origin(), CatalogOrigin::Local);
    }

    #[tokio::test]
    async fn test_all_failures_use_builtin_catalog() {
        let (remote, remote_calls) = StaticSource::boxed("remote", CatalogOrigin::Remote, None);
        let (local, local_calls) = StaticSource::boxed("local", CatalogOrigin::Local, None);
        let resolver = DataSourceResolver::new(vec![remote, local]);

        let catalog = resolver.resolve().await;

        assert_eq!(catalog.origin(), CatalogOrigin::Fallback);
        assert!(!catalog.is_empty());
        assert_eq!(remote_calls.load(Ordering::SeqCst), 1);
        assert_eq!(local_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_empty_chain_still_returns_catalog() {
        let resolver = DataSourceResolver::new(Vec::new());
        let catalog = resolver.resolve().await;
        assert_eq!(catalog.origin(), CatalogOrigin::Fallback);
    }
}
