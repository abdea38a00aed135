use serde::{Deserialize, Serialize};

use crate::services::stopwords::StopwordList;

/// How raw term counts are turned into vector weights
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum WeightingScheme {
    /// Raw term count
    Tf,
    /// Count scaled by `ln(N / (1 + df))`, floored at zero
    Tfidf,
    /// Count scaled by `ln((1 + N) / (1 + df)) + 1`
    SmoothTfidf,
}

/// Which similarity structure to build
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SimilarityMode {
    /// Eager up to `similarity_mode_threshold` records, lazy above it
    Auto,
    Eager,
    Lazy,
}

/// Which raw fields make up a record's text
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TextComposition {
    /// Synopsis only
    Overview,
    /// Genres, synopsis, tagline and title
    Tags,
}

/// Configuration of one build generation
///
/// Two builds from the same raw records and an equal `BuildConfig` produce
/// the same build id and the same rankings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BuildConfig {
    pub vocabulary_cap: usize,
    pub stopwords: StopwordList,
    pub weighting_scheme: WeightingScheme,
    /// Keep only the first K normalized records; `None` keeps everything
    pub corpus_size_cap: Option<usize>,
    pub similarity_mode: SimilarityMode,
    pub similarity_mode_threshold: usize,
    pub text_composition: TextComposition,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            vocabulary_cap: default_vocabulary_cap(),
            stopwords: StopwordList::English,
            weighting_scheme: default_weighting_scheme(),
            corpus_size_cap: Some(default_corpus_size_cap()),
            similarity_mode: default_similarity_mode(),
            similarity_mode_threshold: default_similarity_mode_threshold(),
            text_composition: default_text_composition(),
        }
    }
}

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// CSV, JSON or JSON-lines file holding the movie catalog
    #[serde(default = "default_dataset_path")]
    pub dataset_path: String,

    /// TMDb API key; details enrichment is disabled without it
    #[serde(default)]
    pub tmdb_api_key: Option<String>,

    /// TMDb API base URL
    #[serde(default = "default_tmdb_api_url")]
    pub tmdb_api_url: String,

    /// Redis connection URL for caching movie details
    #[serde(default)]
    pub redis_url: Option<String>,

    #[serde(default = "default_vocabulary_cap")]
    pub vocabulary_cap: usize,

    /// `english`, `none`, or a comma separated list of words
    #[serde(default = "default_stopwords")]
    pub stopwords: String,

    #[serde(default = "default_weighting_scheme")]
    pub weighting_scheme: WeightingScheme,

    /// 0 disables the cap
    #[serde(default = "default_corpus_size_cap")]
    pub corpus_size_cap: usize,

    #[serde(default = "default_similarity_mode")]
    pub similarity_mode: SimilarityMode,

    #[serde(default = "default_similarity_mode_threshold")]
    pub similarity_mode_threshold: usize,

    #[serde(default = "default_text_composition")]
    pub text_composition: TextComposition,

    /// Number of recommendations when the client does not ask for a count
    #[serde(default = "default_top_n")]
    pub default_top_n: usize,

    /// Upper bound on the count a client may ask for
    #[serde(default = "default_max_top_n")]
    pub max_top_n: usize,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_dataset_path() -> String {
    "data/movies.json".to_string()
}

fn default_tmdb_api_url() -> String {
    "https://api.themoviedb.org".to_string()
}

fn default_vocabulary_cap() -> usize {
    5000
}

fn default_stopwords() -> String {
    "english".to_string()
}

fn default_weighting_scheme() -> WeightingScheme {
    WeightingScheme::SmoothTfidf
}

fn default_corpus_size_cap() -> usize {
    3000
}

fn default_similarity_mode() -> SimilarityMode {
    SimilarityMode::Auto
}

fn default_similarity_mode_threshold() -> usize {
    5000
}

fn default_text_composition() -> TextComposition {
    TextComposition::Overview
}

fn default_top_n() -> usize {
    5
}

fn default_max_top_n() -> usize {
    50
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            dataset_path: default_dataset_path(),
            tmdb_api_key: None,
            tmdb_api_url: default_tmdb_api_url(),
            redis_url: None,
            vocabulary_cap: default_vocabulary_cap(),
            stopwords: default_stopwords(),
            weighting_scheme: default_weighting_scheme(),
            corpus_size_cap: default_corpus_size_cap(),
            similarity_mode: default_similarity_mode(),
            similarity_mode_threshold: default_similarity_mode_threshold(),
            text_composition: default_text_composition(),
            default_top_n: default_top_n(),
            max_top_n: default_max_top_n(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }

    /// Core build settings derived from this configuration
    pub fn build_config(&self) -> BuildConfig {
        BuildConfig {
            vocabulary_cap: self.vocabulary_cap,
            stopwords: StopwordList::parse(&self.stopwords),
            weighting_scheme: self.weighting_scheme,
            corpus_size_cap: (self.corpus_size_cap > 0).then_some(self.corpus_size_cap),
            similarity_mode: self.similarity_mode,
            similarity_mode_threshold: self.similarity_mode_threshold,
            text_composition: self.text_composition,
        }
    }
}
