use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::{
    error::{AppError, AppResult},
    models::{DetailsStatus, EnrichedRecommendation, Recommendation},
    services::{
        catalog::BuildInfo,
        providers::enrich,
        recommendations::{recommend_by_id, recommend_by_title},
    },
};

use super::AppState;

const DEFAULT_TITLE_LIMIT: usize = 100;

// Request/Response types

#[derive(Debug, Deserialize)]
pub struct TitleQuery {
    pub q: Option<String>,
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct TitleEntry {
    pub id: i64,
    pub title: String,
}

#[derive(Debug, Deserialize)]
pub struct RecommendByTitleQuery {
    pub title: Option<String>,
    pub n: Option<usize>,
    #[serde(default)]
    pub details: bool,
}

#[derive(Debug, Deserialize)]
pub struct RecommendOptions {
    pub n: Option<usize>,
    #[serde(default)]
    pub details: bool,
}

#[derive(Debug, Serialize)]
pub struct RecommendationResponse {
    pub build_id: String,
    pub results: Vec<EnrichedRecommendation>,
}

// Handlers

/// Health check endpoint
pub async fn health_check() -> Json<Value> {
    Json(json!({ "status": "healthy" }))
}

/// Describe the live build
pub async fn get_build(State(state): State<AppState>) -> AppResult<Json<BuildInfo>> {
    let handle = state.catalog.current().await?;
    Ok(Json(handle.info()))
}

/// Reload the dataset and rebuild the index
pub async fn rebuild(State(state): State<AppState>) -> AppResult<Json<BuildInfo>> {
    tracing::info!(source = state.dataset.name(), "Rebuild requested");
    let raw = state.dataset.load().await?;
    let handle = state
        .catalog
        .rebuild(raw, state.build_config.as_ref().clone())
        .await?;
    Ok(Json(handle.info()))
}

/// List corpus titles, optionally filtered by a case-insensitive substring
pub async fn list_titles(
    State(state): State<AppState>,
    Query(params): Query<TitleQuery>,
) -> AppResult<Json<Vec<TitleEntry>>> {
    let handle = state.catalog.current().await?;
    let needle = params.q.as_deref().map(|q| q.trim().to_lowercase());
    let limit = params.limit.unwrap_or(DEFAULT_TITLE_LIMIT);

    let titles = handle
        .corpus
        .records()
        .iter()
        .filter(|r| match &needle {
            Some(needle) => r.title.to_lowercase().contains(needle.as_str()),
            None => true,
        })
        .take(limit)
        .map(|r| TitleEntry {
            id: r.id,
            title: r.title.clone(),
        })
        .collect();

    Ok(Json(titles))
}

/// Recommend movies similar to a title
pub async fn recommend_title(
    State(state): State<AppState>,
    Query(params): Query<RecommendByTitleQuery>,
) -> AppResult<Json<RecommendationResponse>> {
    let title = match params.title.as_deref().map(str::trim) {
        Some(title) if !title.is_empty() => title,
        Some(_) => return Err(AppError::InvalidInput("title cannot be empty".to_string())),
        None => return Err(AppError::InvalidInput("title is required".to_string())),
    };

    let handle = state.catalog.current().await?;
    let n = state.top_n(params.n);
    let recommendations = recommend_by_title(&handle, title, n);

    tracing::info!(
        title = %title,
        requested = n,
        returned = recommendations.len(),
        build_id = %handle.build_id,
        "Recommendations by title"
    );

    let results = present(&state, &recommendations, params.details).await;
    Ok(Json(RecommendationResponse {
        build_id: handle.build_id.clone(),
        results,
    }))
}

/// Recommend movies similar to a movie id
pub async fn recommend_movie(
    State(state): State<AppState>,
    Path(movie_id): Path<i64>,
    Query(params): Query<RecommendOptions>,
) -> AppResult<Json<RecommendationResponse>> {
    let handle = state.catalog.current().await?;
    let n = state.top_n(params.n);
    let recommendations = recommend_by_id(&handle, movie_id, n);

    tracing::info!(
        movie_id,
        requested = n,
        returned = recommendations.len(),
        build_id = %handle.build_id,
        "Recommendations by id"
    );

    let results = present(&state, &recommendations, params.details).await;
    Ok(Json(RecommendationResponse {
        build_id: handle.build_id.clone(),
        results,
    }))
}

async fn present(
    state: &AppState,
    recommendations: &[Recommendation],
    with_details: bool,
) -> Vec<EnrichedRecommendation> {
    match (&state.metadata, with_details) {
        (Some(provider), true) => enrich(provider.as_ref(), recommendations).await,
        _ => recommendations
            .iter()
            .map(|rec| EnrichedRecommendation::without_details(rec, DetailsStatus::Skipped))
            .collect(),
    }
}
