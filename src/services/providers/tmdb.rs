//! TMDb metadata provider
//!
//! One call per movie: `/3/movie/{id}?append_to_response=credits` returns the
//! poster, rating, overview and credits in a single response. Responses are
//! cached in Redis for a week when a cache is configured.
use reqwest::Client as HttpClient;

use crate::{
    cached,
    db::{Cache, CacheKey},
    error::{AppError, AppResult},
    models::{MovieDetails, TmdbMovie},
    services::providers::MetadataProvider,
};

const DETAILS_CACHE_TTL: u64 = 604800; // 1 week
const REQUEST_TIMEOUT_SECS: u64 = 10;

#[derive(Clone)]
pub struct TmdbProvider {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
    cache: Option<Cache>,
}

impl TmdbProvider {
    pub fn new(api_key: String, api_url: String, cache: Option<Cache>) -> AppResult<Self> {
        let http_client = HttpClient::builder()
            .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            http_client,
            api_key,
            api_url: api_url.trim_end_matches('/').to_string(),
            cache,
        })
    }

    fn details_url(&self, movie_id: i64) -> String {
        format!("{}/3/movie/{}", self.api_url, movie_id)
    }

    async fn fetch_uncached(&self, movie_id: i64) -> AppResult<MovieDetails> {
        let response = self
            .http_client
            .get(self.details_url(movie_id))
            .query(&[
                ("api_key", self.api_key.as_str()),
                ("language", "en-US"),
                ("append_to_response", "credits"),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApi(format!(
                "TMDb API returned status {} for movie {}: {}",
                status, movie_id, body
            )));
        }

        let movie: TmdbMovie = response.json().await?;
        let details = MovieDetails::from_tmdb(movie_id, movie);

        tracing::info!(
            movie_id,
            title = %details.title,
            provider = "tmdb",
            "Movie details fetched"
        );

        Ok(details)
    }
}

#[async_trait::async_trait]
impl MetadataProvider for TmdbProvider {
    async fn fetch_details(&self, movie_id: i64) -> AppResult<MovieDetails> {
        match &self.cache {
            Some(cache) => cached!(
                cache,
                CacheKey::MovieDetails(movie_id),
                DETAILS_CACHE_TTL,
                self.fetch_uncached(movie_id)
            ),
            None => self.fetch_uncached(movie_id).await,
        }
    }

    fn name(&self) -> &'static str {
        "tmdb"
    }
}
