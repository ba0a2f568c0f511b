//! Remote movie catalog lookups.
//!
//! [`provider`] defines the [`CatalogProvider`] trait and shared result
//! types; [`tmdb`] implements it against the TMDB v3 REST API.

pub mod provider;
pub mod tmdb;

pub use provider::{CatalogMovie, CatalogProvider};
pub use tmdb::TmdbCatalog;
