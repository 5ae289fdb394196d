pub mod access;
pub mod atlas;
pub mod csv_line;
pub mod fallback;
pub mod normalizer;
pub mod resolver;
pub mod visited;

pub use crate::domain::model::{Catalog, CatalogOrigin, ExportSnapshot, Site, YearInscribed};
pub use crate::domain::ports::{ConfigProvider, DatasetSource, KeyValueStore, SnapshotSource};
pub use crate::utils::error::Result;
