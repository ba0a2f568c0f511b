//! Library and catalog API routes.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use std::sync::Arc;

use super::{error::AppError, AppContext};
use crate::catalog::{CatalogMovie, CatalogProvider};
use crate::error::Error;
use crate::library::{indexer, MediaRecord};

/// `GET /api/library` — fresh scan of the media root.
pub async fn list_library(
    State(ctx): State<AppContext>,
) -> Result<Json<Vec<MediaRecord>>, AppError> {
    Ok(Json(scan_snapshot(&ctx).await?))
}

/// `GET /api/library/categories` — distinct categories, sorted.
pub async fn list_categories(
    State(ctx): State<AppContext>,
) -> Result<Json<Vec<String>>, AppError> {
    let records = scan_snapshot(&ctx).await?;
    Ok(Json(indexer::categories(&records)))
}

/// Directory walks are blocking; run each scan on the blocking pool so it
/// cannot stall the request executor.
async fn scan_snapshot(ctx: &AppContext) -> Result<Vec<MediaRecord>, Error> {
    let store = ctx.store.clone();
    tokio::task::spawn_blocking(move || indexer::scan(&store))
        .await
        .map_err(|e| Error::Internal(format!("scan task failed: {e}")))
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
}

/// `GET /api/trending` — movies trending this week on the remote catalog.
pub async fn trending(State(ctx): State<AppContext>) -> Result<Json<Vec<CatalogMovie>>, AppError> {
    let catalog = require_catalog(&ctx)?;
    Ok(Json(catalog.trending().await?))
}

/// `GET /api/search?q=` — catalog title search. An empty or missing query
/// falls back to trending.
pub async fn search(
    State(ctx): State<AppContext>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<CatalogMovie>>, AppError> {
    let catalog = require_catalog(&ctx)?;
    let query = params.q.trim();

    let movies = if query.is_empty() {
        catalog.trending().await?
    } else {
        catalog.search(query).await?
    };

    Ok(Json(movies))
}

/// `GET /api/movies/{id}` — full catalog details for one movie.
pub async fn movie_detail(
    State(ctx): State<AppContext>,
    Path(id): Path<u64>,
) -> Result<Json<CatalogMovie>, AppError> {
    let catalog = require_catalog(&ctx)?;
    Ok(Json(catalog.movie_details(id).await?))
}

/// Cap on the recommendation list shown beside a movie's details.
const MAX_RECOMMENDATIONS: usize = 8;

/// `GET /api/movies/{id}/recommendations` — trending movies with the movie
/// itself filtered out, capped at [`MAX_RECOMMENDATIONS`].
pub async fn movie_recommendations(
    State(ctx): State<AppContext>,
    Path(id): Path<u64>,
) -> Result<Json<Vec<CatalogMovie>>, AppError> {
    let catalog = require_catalog(&ctx)?;
    let movies = catalog
        .trending()
        .await?
        .into_iter()
        .filter(|m| m.id != id)
        .take(MAX_RECOMMENDATIONS)
        .collect();
    Ok(Json(movies))
}

fn require_catalog(ctx: &AppContext) -> Result<Arc<dyn CatalogProvider>, Error> {
    ctx.catalog
        .clone()
        .ok_or_else(|| Error::Unavailable("no catalog provider configured".into()))
}
