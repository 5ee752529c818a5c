//! API request/response models for movies.

use crate::api::models::{lists::ListResponse, users::CurrentUser};
use crate::catalog::CatalogSearchResult;
use crate::db::models::movies::MovieDBResponse;
use crate::types::{ListId, MovieId, UserId};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

/// Category tag attached to a movie when it is added to a list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum Category {
    Horror,
    Action,
    Comedy,
}

impl Category {
    /// The fixed set offered by the add-movie form.
    pub const ALL: [Category; 3] = [Category::Horror, Category::Action, Category::Comedy];
}

/// Form submitted to search the catalog for a movie to add
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AddMovieRequest {
    /// Title query sent to the catalog
    pub title: String,
    /// Category the movie will be tagged with once confirmed
    pub category: Category,
}

/// Form submitted to rate and review a movie.
///
/// The rating arrives as text and is validated as a number before it is
/// stored; garbage input re-renders the form instead of persisting.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RateMovieRequest {
    pub rating: String,
    pub review: String,
}

/// Query parameter naming a movie, e.g. `/edit?id=5`
#[derive(Debug, Clone, Deserialize, IntoParams)]
pub struct IdQuery {
    pub id: MovieId,
}

/// Query parameters confirming a catalog candidate, e.g.
/// `/find/3?id=603&category=action`
#[derive(Debug, Clone, Deserialize, IntoParams)]
pub struct FindMovieQuery {
    /// The catalog's external id for the selected candidate
    pub id: i64,
    pub category: Category,
}

/// Query parameter filtering the feed by category
#[derive(Debug, Clone, Deserialize, IntoParams)]
pub struct CategoryQuery {
    pub category: Category,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MovieResponse {
    pub id: MovieId,
    pub title: String,
    pub year: Option<String>,
    pub description: Option<String>,
    pub rating: Option<f64>,
    pub review: Option<String>,
    pub img_url: Option<String>,
    pub category: Category,
    pub list_id: ListId,
    pub author_id: UserId,
}

impl From<MovieDBResponse> for MovieResponse {
    fn from(db: MovieDBResponse) -> Self {
        Self {
            id: db.id,
            title: db.title,
            year: db.year,
            description: db.description,
            // The column is text; anything unparseable reads as unrated
            rating: db.rating.as_deref().and_then(|r| r.parse().ok()),
            review: db.review,
            img_url: db.img_url,
            category: db.category,
            list_id: db.list_id,
            author_id: db.author_id,
        }
    }
}

/// The home feed: every movie (newest first) plus every list.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HomeView {
    /// The session's user, absent for anonymous visitors
    pub user: Option<CurrentUser>,
    pub movies: Vec<MovieResponse>,
    pub lists: Vec<ListResponse>,
}

/// View model behind the add-movie form.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AddMovieInfo {
    pub list: ListResponse,
    pub categories: Vec<Category>,
}

/// Candidate-selection view rendered after a catalog search.
///
/// Echoes the target list and category so the confirmation link can carry
/// them through to `/find/{list_id}`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MovieCandidatesView {
    pub list: ListResponse,
    pub category: Category,
    pub options: Vec<CatalogSearchResult>,
}
