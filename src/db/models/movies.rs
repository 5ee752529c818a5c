//! Database models for movies.

use crate::api::models::movies::Category;
use crate::types::{ListId, MovieId, UserId};
use chrono::{DateTime, Utc};

/// Database request for creating a new movie.
///
/// A movie is only created after a catalog detail lookup succeeded, so
/// title/year/description/poster come from the catalog record while the
/// category and both owners come from the confirming request.
#[derive(Debug, Clone)]
pub struct MovieCreateDBRequest {
    pub title: String,
    pub year: Option<String>,
    pub description: Option<String>,
    pub img_url: Option<String>,
    pub category: Category,
    pub list_id: ListId,
    pub author_id: UserId,
}

/// Database request for updating a movie's rating and review.
///
/// The rating is already validated and formatted by the caller; the
/// column stores it as text.
#[derive(Debug, Clone, Default)]
pub struct MovieUpdateDBRequest {
    pub rating: Option<String>,
    pub review: Option<String>,
}

/// Database response for a movie
#[derive(Debug, Clone)]
pub struct MovieDBResponse {
    pub id: MovieId,
    pub title: String,
    pub year: Option<String>,
    pub description: Option<String>,
    pub rating: Option<String>,
    pub review: Option<String>,
    pub img_url: Option<String>,
    pub category: Category,
    pub list_id: ListId,
    pub author_id: UserId,
    pub created_at: DateTime<Utc>,
}
