//! Movie metadata provider abstraction
//!
//! Providers supply presentation details (poster, rating, credits) for a
//! corpus id. They are consulted only after ranking, so a provider outage
//! never changes which movies are recommended.

use futures::future::join_all;

use crate::{
    error::AppResult,
    models::{DetailsStatus, EnrichedRecommendation, MovieDetails, Recommendation},
};

pub mod tmdb;

pub use tmdb::TmdbProvider;

/// Trait for movie metadata providers
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait MetadataProvider: Send + Sync {
    /// Fetch presentation details for a movie id
    async fn fetch_details(&self, movie_id: i64) -> AppResult<MovieDetails>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}

/// Attaches provider details to each recommendation, preserving order
///
/// Lookups run concurrently. An entry whose lookup fails is kept and marked
/// [`DetailsStatus::Unavailable`].
pub async fn enrich(
    provider: &dyn MetadataProvider,
    recommendations: &[Recommendation],
) -> Vec<EnrichedRecommendation> {
    let lookups = recommendations
        .iter()
        .map(|rec| provider.fetch_details(rec.record.id));
    let results = join_all(lookups).await;

    let mut failures = 0usize;
    let enriched: Vec<EnrichedRecommendation> = recommendations
        .iter()
        .zip(results)
        .map(|(rec, result)| match result {
            Ok(details) => EnrichedRecommendation::with_details(rec, details),
            Err(e) => {
                failures += 1;
                tracing::warn!(
                    movie_id = rec.record.id,
                    provider = provider.name(),
                    error = %e,
                    "Details unavailable"
                );
                EnrichedRecommendation::without_details(rec, DetailsStatus::Unavailable)
            }
        })
        .collect();

    if failures > 0 {
        tracing::warn!(
            success_count = enriched.len() - failures,
            error_count = failures,
            "Partial details enrichment failure"
        );
    }

    enriched
}
