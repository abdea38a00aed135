use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use futures::future::{BoxFuture, FutureExt, Shared};
use serde::Serialize;
use sha2::{Digest, Sha256};
use tokio::sync::{Mutex, RwLock};

use crate::{
    config::{BuildConfig, WeightingScheme},
    error::{AppError, AppResult, BuildError},
    models::{Corpus, RawRecord},
    services::{
        normalizer::normalize,
        similarity::{IndexKind, SimilarityIndex},
        vectorizer::{build_vector_space, VectorSpace},
    },
};

/// Number of hex characters kept from the SHA-256 fingerprint
const BUILD_ID_LEN: usize = 16;

/// One immutable build generation: corpus, vector space and similarity index
#[derive(Debug)]
pub struct BuildHandle {
    pub build_id: String,
    pub config: BuildConfig,
    pub corpus: Corpus,
    pub vector_space: Arc<VectorSpace>,
    pub index: SimilarityIndex,
    pub built_at: DateTime<Utc>,
}

/// Summary of a build, as reported to clients
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct BuildInfo {
    pub build_id: String,
    pub records: usize,
    pub vocabulary_size: usize,
    pub similarity_mode: IndexKind,
    pub weighting_scheme: WeightingScheme,
    pub built_at: DateTime<Utc>,
}

impl BuildHandle {
    pub fn info(&self) -> BuildInfo {
        BuildInfo {
            build_id: self.build_id.clone(),
            records: self.corpus.len(),
            vocabulary_size: self.vector_space.vocabulary_len(),
            similarity_mode: self.index.kind(),
            weighting_scheme: self.config.weighting_scheme,
            built_at: self.built_at,
        }
    }
}

/// Deterministic fingerprint of the build inputs
pub fn build_id(raw: &[RawRecord], config: &BuildConfig) -> Result<String, BuildError> {
    let records = serde_json::to_vec(raw).map_err(|e| BuildError::Task(e.to_string()))?;
    let config = serde_json::to_vec(config).map_err(|e| BuildError::Task(e.to_string()))?;

    let mut hasher = Sha256::new();
    hasher.update(&records);
    hasher.update([0u8]);
    hasher.update(&config);

    let mut id = format!("{:x}", hasher.finalize());
    id.truncate(BUILD_ID_LEN);
    Ok(id)
}

/// Runs normalize → vectorize → index in one pass
///
/// Pure and synchronous; either returns a complete handle or an error with
/// nothing built.
pub fn build(raw: &[RawRecord], config: &BuildConfig) -> Result<BuildHandle, BuildError> {
    let build_id = build_id(raw, config)?;
    let corpus = normalize(raw, config)?;

    let vector_space = Arc::new(build_vector_space(
        corpus.records().iter().map(|r| r.text.as_str()),
        config,
    ));

    let kind = IndexKind::resolve(
        config.similarity_mode,
        corpus.len(),
        config.similarity_mode_threshold,
    );
    let index = SimilarityIndex::build(vector_space.clone(), kind);

    tracing::info!(
        build_id = %build_id,
        records = corpus.len(),
        vocabulary = vector_space.vocabulary_len(),
        mode = ?kind,
        "Recommendation index built"
    );

    Ok(BuildHandle {
        build_id,
        config: config.clone(),
        corpus,
        vector_space,
        index,
        built_at: Utc::now(),
    })
}

type SharedBuild = Result<Arc<BuildHandle>, BuildError>;
type PendingBuild = Shared<BoxFuture<'static, SharedBuild>>;

/// The live handle and the request generation that made it live
struct LiveBuild {
    generation: u64,
    handle: Arc<BuildHandle>,
}

/// A running build; `generation` is the newest request waiting on it
struct InFlight {
    generation: u64,
    build: PendingBuild,
}

#[derive(Default)]
struct CatalogState {
    current: RwLock<Option<LiveBuild>>,
    in_flight: Mutex<HashMap<String, InFlight>>,
    generation: AtomicU64,
    builds_started: AtomicUsize,
}

impl CatalogState {
    /// Retires the in-flight entry for `key` and makes a successful result live
    async fn publish(&self, key: &str, result: &SharedBuild) {
        let mut in_flight = self.in_flight.lock().await;
        let generation = in_flight.remove(key).map_or(0, |pending| pending.generation);

        match result {
            Ok(handle) => self.install(generation, handle.clone()).await,
            Err(e) => {
                tracing::error!(build_id = %key, error = %e, "Build failed, keeping previous index");
            }
        }
    }

    /// Swaps in `handle` unless a newer request already made its build live
    async fn install(&self, generation: u64, handle: Arc<BuildHandle>) {
        let mut current = self.current.write().await;

        if let Some(live) = current.as_ref() {
            if live.generation > generation {
                tracing::warn!(
                    build_id = %handle.build_id,
                    live_build_id = %live.handle.build_id,
                    "Build superseded by a newer request, not publishing"
                );
                return;
            }
        }

        tracing::info!(build_id = %handle.build_id, generation, "Build is live");
        *current = Some(LiveBuild { generation, handle });
    }
}

/// Holds the live build and coalesces concurrent rebuilds
///
/// Queries take a clone of the live `Arc<BuildHandle>` and never hold the
/// lock while ranking. At most one build per build id runs at a time; every
/// caller asking for the same id awaits that build. Builds run in their own
/// task, so a caller that goes away does not cancel or lose the build.
/// Results are published in request order: a build finishing after a newer
/// request's build went live is returned to its callers but not published.
#[derive(Default)]
pub struct Catalog {
    state: Arc<CatalogState>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// The live build, or `BuildNotReady` if no build has succeeded yet
    pub async fn current(&self) -> AppResult<Arc<BuildHandle>> {
        self.state
            .current
            .read()
            .await
            .as_ref()
            .map(|live| live.handle.clone())
            .ok_or(AppError::BuildNotReady)
    }

    /// Number of builds actually executed (memoized and coalesced calls excluded)
    pub fn builds_started(&self) -> usize {
        self.state.builds_started.load(Ordering::SeqCst)
    }

    /// Builds from `raw` and `config` and makes the result live
    ///
    /// Returns the live handle unchanged when it already has the requested
    /// build id. A failed build leaves the previous handle in place.
    pub async fn rebuild(
        &self,
        raw: Vec<RawRecord>,
        config: BuildConfig,
    ) -> AppResult<Arc<BuildHandle>> {
        let key = build_id(&raw, &config)?;

        let pending = {
            let mut in_flight = self.state.in_flight.lock().await;
            let generation = self.state.generation.fetch_add(1, Ordering::SeqCst) + 1;

            if let Some(live) = self.state.current.write().await.as_mut() {
                if live.handle.build_id == key {
                    tracing::debug!(build_id = %key, "Build already live, reusing");
                    live.generation = generation;
                    return Ok(live.handle.clone());
                }
            }

            match in_flight.entry(key.clone()) {
                Entry::Occupied(mut entry) => {
                    tracing::debug!(build_id = %key, "Joining in-flight build");
                    let pending = entry.get_mut();
                    pending.generation = generation;
                    pending.build.clone()
                }
                Entry::Vacant(entry) => {
                    let build = self.spawn_build(key, raw, config);
                    entry.insert(InFlight {
                        generation,
                        build: build.clone(),
                    });
                    build
                }
            }
        };

        pending.await.map_err(AppError::from)
    }

    /// Starts a detached build task that publishes its own result
    fn spawn_build(&self, key: String, raw: Vec<RawRecord>, config: BuildConfig) -> PendingBuild {
        self.state.builds_started.fetch_add(1, Ordering::SeqCst);
        let state = self.state.clone();

        let task = tokio::spawn(async move {
            tracing::info!(build_id = %key, records = raw.len(), "Starting build");

            let result = tokio::task::spawn_blocking(move || build(&raw, &config))
                .await
                .map_err(|e| BuildError::Task(e.to_string()))
                .and_then(|built| built)
                .map(Arc::new);

            state.publish(&key, &result).await;
            result
        });

        task.map(|joined| joined.unwrap_or_else(|e| Err(BuildError::Task(e.to_string()))))
            .boxed()
            .shared()
    }
}
