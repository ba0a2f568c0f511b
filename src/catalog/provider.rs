//! Trait definition and types for catalog providers.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// A movie as presented by the remote catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogMovie {
    /// Provider-specific numeric identifier.
    pub id: u64,
    /// Display title.
    pub title: String,
    /// Synopsis; a placeholder when the provider has none.
    pub overview: String,
    /// Fully-qualified poster URL, if the provider has artwork.
    pub poster: Option<String>,
    /// Release date as an ISO-8601 string (YYYY-MM-DD), if known.
    pub release_date: Option<String>,
    /// Community rating (typically 0.0 - 10.0).
    pub vote_average: Option<f64>,
    /// Genre labels. Empty for list endpoints that omit genres.
    pub genres: Vec<String>,
}

/// Async interface for a remote movie catalog.
///
/// Providers wrap a single external API and are shared across request tasks
/// behind an `Arc`.
#[async_trait]
pub trait CatalogProvider: Send + Sync {
    /// Short, lowercase identifier for this provider (e.g. `"tmdb"`).
    fn name(&self) -> &'static str;

    /// Movies trending this week.
    async fn trending(&self) -> Result<Vec<CatalogMovie>>;

    /// Search the catalog by title.
    async fn search(&self, query: &str) -> Result<Vec<CatalogMovie>>;

    /// Full details for a single movie. Fails with NotFound when the catalog
    /// has no such id.
    async fn movie_details(&self, id: u64) -> Result<CatalogMovie>;
}
