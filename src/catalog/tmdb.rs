//! TMDB (The Movie Database) catalog provider.
//!
//! Implements [`CatalogProvider`] by querying the TMDB v3 REST API.
//!
//! Features:
//! - Token-bucket rate limiting at 4 requests / second via [`governor`].
//! - Automatic retry on HTTP 429 with `Retry-After` header support (max 3 retries).
//! - 30-second request timeout.

use std::num::NonZeroU32;
use std::time::Duration;

use async_trait::async_trait;
use governor::{Quota, RateLimiter};
use reqwest::StatusCode;
use serde::Deserialize;
use tracing::warn;

use crate::catalog::provider::{CatalogMovie, CatalogProvider};
use crate::error::{Error, Result};

const TMDB_BASE_URL: &str = "https://api.themoviedb.org/3";
const TMDB_IMAGE_BASE: &str = "https://image.tmdb.org/t/p/w500";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const MAX_RETRIES: u32 = 3;

const NO_OVERVIEW: &str = "No description available.";

// ---------------------------------------------------------------------------
// TMDB API response types (private)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct TmdbListResponse {
    results: Vec<TmdbMovie>,
}

#[derive(Debug, Deserialize)]
struct TmdbMovie {
    id: u64,
    title: Option<String>,
    overview: Option<String>,
    poster_path: Option<String>,
    release_date: Option<String>,
    vote_average: Option<f64>,
    genres: Option<Vec<TmdbGenre>>,
}

#[derive(Debug, Deserialize)]
struct TmdbGenre {
    name: String,
}

// ---------------------------------------------------------------------------
// Provider implementation
// ---------------------------------------------------------------------------

type DirectRateLimiter = RateLimiter<
    governor::state::NotKeyed,
    governor::state::InMemoryState,
    governor::clock::DefaultClock,
>;

/// TMDB catalog provider.
///
/// Wraps the TMDB v3 REST API with built-in rate limiting and retry logic.
pub struct TmdbCatalog {
    client: reqwest::Client,
    api_key: String,
    language: String,
    base_url: String,
    image_base: String,
    rate_limiter: DirectRateLimiter,
}

impl TmdbCatalog {
    /// Create a new provider with the given API key and ISO-639-1 language
    /// tag (e.g. `"en-US"`). Rate limiting is 4 requests per second.
    pub fn new(api_key: String, language: String) -> Self {
        Self::with_base_url(
            api_key,
            language,
            TMDB_BASE_URL.to_string(),
            TMDB_IMAGE_BASE.to_string(),
        )
    }

    /// Create a provider pointed at a custom API base URL. Tests use this to
    /// route requests to a mock server.
    pub fn with_base_url(
        api_key: String,
        language: String,
        base_url: String,
        image_base: String,
    ) -> Self {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("failed to build reqwest client");

        let quota = Quota::per_second(NonZeroU32::new(4).unwrap());
        let rate_limiter = RateLimiter::direct(quota);

        Self {
            client,
            api_key,
            language,
            base_url,
            image_base,
            rate_limiter,
        }
    }

    /// Execute a GET request with rate limiting and 429-retry logic.
    ///
    /// Returns the response without checking the status code; callers decide
    /// how non-success statuses map to errors.
    async fn get(&self, path: &str, params: &[(&str, &str)]) -> Result<reqwest::Response> {
        let url = format!("{}{}", self.base_url, path);
        let mut retries = 0u32;
        loop {
            self.rate_limiter.until_ready().await;

            let resp = self
                .client
                .get(&url)
                .query(&[
                    ("api_key", self.api_key.as_str()),
                    ("language", self.language.as_str()),
                ])
                .query(params)
                .send()
                .await
                .map_err(|e| Error::Catalog(format!("TMDB request failed: {e}")))?;

            if resp.status() == StatusCode::TOO_MANY_REQUESTS && retries < MAX_RETRIES {
                retries += 1;
                let wait = resp
                    .headers()
                    .get("retry-after")
                    .and_then(|v| v.to_str().ok())
                    .and_then(|v| v.parse::<u64>().ok())
                    .unwrap_or(1);
                warn!(
                    retry = retries,
                    wait_secs = wait,
                    "TMDB returned 429, backing off"
                );
                tokio::time::sleep(Duration::from_secs(wait)).await;
                continue;
            }

            return Ok(resp);
        }
    }

    async fn movie_list(&self, path: &str, params: &[(&str, &str)]) -> Result<Vec<CatalogMovie>> {
        let resp = self.get(path, params).await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(Error::Catalog(format!("TMDB returned {status} for {path}")));
        }

        let list: TmdbListResponse = resp
            .json()
            .await
            .map_err(|e| Error::Catalog(format!("TMDB response malformed: {e}")))?;

        Ok(list
            .results
            .into_iter()
            .map(|m| format_movie(m, &self.image_base))
            .collect())
    }
}

#[async_trait]
impl CatalogProvider for TmdbCatalog {
    fn name(&self) -> &'static str {
        "tmdb"
    }

    async fn trending(&self) -> Result<Vec<CatalogMovie>> {
        self.movie_list("/trending/movie/week", &[]).await
    }

    async fn search(&self, query: &str) -> Result<Vec<CatalogMovie>> {
        self.movie_list("/search/movie", &[("query", query)]).await
    }

    async fn movie_details(&self, id: u64) -> Result<CatalogMovie> {
        let path = format!("/movie/{id}");
        let resp = self.get(&path, &[]).await?;
        let status = resp.status();

        if status == StatusCode::NOT_FOUND {
            return Err(Error::not_found("movie", id));
        }
        if !status.is_success() {
            return Err(Error::Catalog(format!("TMDB returned {status} for {path}")));
        }

        let movie: TmdbMovie = resp
            .json()
            .await
            .map_err(|e| Error::Catalog(format!("TMDB response malformed: {e}")))?;

        Ok(format_movie(movie, &self.image_base))
    }
}

/// Shape a raw TMDB record into the catalog's presentation type.
fn format_movie(m: TmdbMovie, image_base: &str) -> CatalogMovie {
    let overview = match m.overview {
        Some(o) if !o.trim().is_empty() => o,
        _ => NO_OVERVIEW.to_string(),
    };

    CatalogMovie {
        id: m.id,
        title: m.title.unwrap_or_default(),
        overview,
        poster: m.poster_path.map(|p| format!("{image_base}{p}")),
        release_date: m.release_date.filter(|d| !d.is_empty()),
        vote_average: m.vote_average,
        genres: m
            .genres
            .unwrap_or_default()
            .into_iter()
            .map(|g| g.name)
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(overview: Option<&str>, poster: Option<&str>) -> TmdbMovie {
        TmdbMovie {
            id: 42,
            title: Some("Blow-Up".to_string()),
            overview: overview.map(String::from),
            poster_path: poster.map(String::from),
            release_date: Some("1966-12-18".to_string()),
            vote_average: Some(7.3),
            genres: Some(vec![TmdbGenre {
                name: "Mystery".to_string(),
            }]),
        }
    }

    #[test]
    fn poster_url_is_joined_with_image_base() {
        let movie = format_movie(raw(Some("plot"), Some("/abc.jpg")), "https://img/t/p/w500");
        assert_eq!(movie.poster.as_deref(), Some("https://img/t/p/w500/abc.jpg"));
    }

    #[test]
    fn missing_poster_stays_none() {
        let movie = format_movie(raw(Some("plot"), None), "https://img");
        assert!(movie.poster.is_none());
    }

    #[test]
    fn empty_overview_gets_placeholder() {
        let movie = format_movie(raw(None, None), "https://img");
        assert_eq!(movie.overview, NO_OVERVIEW);

        let movie = format_movie(raw(Some("  "), None), "https://img");
        assert_eq!(movie.overview, NO_OVERVIEW);
    }

    #[test]
    fn genres_flatten_to_names() {
        let movie = format_movie(raw(Some("plot"), None), "https://img");
        assert_eq!(movie.genres, vec!["Mystery"]);
    }
}
