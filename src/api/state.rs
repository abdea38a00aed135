use std::sync::Arc;

use crate::{
    config::{BuildConfig, Config},
    services::{catalog::Catalog, dataset::DatasetSource, providers::MetadataProvider},
};

/// Shared application state
///
/// Everything here is read-only after startup; the live build is swapped
/// inside `Catalog`.
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<Catalog>,
    pub dataset: Arc<dyn DatasetSource>,
    pub metadata: Option<Arc<dyn MetadataProvider>>,
    pub build_config: Arc<BuildConfig>,
    pub default_top_n: usize,
    pub max_top_n: usize,
}

impl AppState {
    /// Creates state with no metadata provider
    pub fn new(catalog: Arc<Catalog>, dataset: Arc<dyn DatasetSource>, config: &Config) -> Self {
        Self {
            catalog,
            dataset,
            metadata: None,
            build_config: Arc::new(config.build_config()),
            default_top_n: config.default_top_n,
            max_top_n: config.max_top_n,
        }
    }

    pub fn with_metadata(mut self, provider: Arc<dyn MetadataProvider>) -> Self {
        self.metadata = Some(provider);
        self
    }

    /// Requested count, defaulted and clamped to `max_top_n`
    pub fn top_n(&self, requested: Option<usize>) -> usize {
        requested.unwrap_or(self.default_top_n).min(self.max_top_n)
    }
}
