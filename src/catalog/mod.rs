//! Outbound client for the external movie-metadata catalog.
//!
//! The catalog is a black-box lookup service with two endpoints: free-text
//! search and detail-by-id. Provider failures surface as [`CatalogError`]
//! and never corrupt persisted state; callers fetch details before they
//! write anything.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

pub mod tmdb;

pub use tmdb::TmdbCatalog;

/// Errors from the catalog provider that handlers can turn into responses.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The provider failed, timed out, or returned an unusable payload
    #[error("Catalog provider unavailable: {message}")]
    Unavailable { message: String },

    /// The provider has no record with the given id
    #[error("Catalog record {id} not found")]
    NotFound { id: i64 },
}

/// Type alias for catalog operation results
pub type Result<T> = std::result::Result<T, CatalogError>;

/// A candidate record returned by a title search.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CatalogSearchResult {
    /// The provider's id for this record, used for the detail lookup
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
}

/// The full record behind a search candidate.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CatalogMovieDetails {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
    /// Provider-relative poster path, joined onto the configured image base URL
    #[serde(default)]
    pub poster_path: Option<String>,
}

impl CatalogMovieDetails {
    /// Release year, the leading segment of the provider's `YYYY-MM-DD` date.
    pub fn release_year(&self) -> Option<String> {
        self.release_date
            .as_deref()
            .and_then(|date| date.split('-').next())
            .filter(|year| !year.is_empty())
            .map(str::to_string)
    }
}

/// A source of movie metadata.
///
/// In practice this is the HTTP provider behind [`TmdbCatalog`]; tests
/// substitute canned implementations.
#[async_trait::async_trait]
pub trait CatalogSource: Send + Sync {
    /// Search the catalog by title, returning candidate records.
    async fn search(&self, query: &str) -> Result<Vec<CatalogSearchResult>>;

    /// Fetch the full record for a candidate by its provider id.
    async fn fetch_details(&self, external_id: i64) -> Result<CatalogMovieDetails>;
}
