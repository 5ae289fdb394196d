// Adapters layer: concrete implementations for external systems (http, file system, gist API).

pub mod dataset;
pub mod gist;
pub mod storage;
