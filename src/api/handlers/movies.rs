use axum::{
    Form, Json,
    extract::{Path, Query, State},
    response::Redirect,
};
use tracing::debug;

use crate::{
    AppState,
    api::models::{
        movies::{AddMovieInfo, AddMovieRequest, Category, FindMovieQuery, IdQuery, MovieCandidatesView, MovieResponse, RateMovieRequest},
        users::CurrentUser,
    },
    db::{
        errors::DbError,
        handlers::{Lists, Movies, Repository},
        models::movies::{MovieCreateDBRequest, MovieUpdateDBRequest},
    },
    errors::Error,
    types::ListId,
};

/// Fetch a list or fail with a user-visible 404.
async fn require_list(state: &AppState, list_id: ListId) -> Result<crate::db::models::lists::ListDBResponse, Error> {
    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    Lists::new(&mut conn)
        .get_by_id(list_id)
        .await?
        .ok_or_else(|| Error::NotFound {
            resource: "List".to_string(),
            id: list_id.to_string(),
        })
}

/// Add-movie form information for a list
#[utoipa::path(
    get,
    path = "/add/{list_id}",
    tag = "movies",
    params(("list_id" = i64, Path, description = "List receiving the movie")),
    responses(
        (status = 200, description = "Add-movie form info", body = AddMovieInfo),
        (status = 404, description = "Unknown list"),
    )
)]
#[tracing::instrument(skip_all, fields(list_id = list_id))]
pub async fn get_add_movie_info(State(state): State<AppState>, Path(list_id): Path<ListId>) -> Result<Json<AddMovieInfo>, Error> {
    let list = require_list(&state, list_id).await?;

    Ok(Json(AddMovieInfo {
        list: list.into(),
        categories: Category::ALL.to_vec(),
    }))
}

/// Search the catalog for candidates to add to a list
#[utoipa::path(
    post,
    path = "/add/{list_id}",
    request_body = AddMovieRequest,
    tag = "movies",
    params(("list_id" = i64, Path, description = "List receiving the movie")),
    responses(
        (status = 200, description = "Candidate records from the catalog", body = MovieCandidatesView),
        (status = 400, description = "Invalid input"),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "Unknown list"),
        (status = 502, description = "Catalog unavailable"),
    )
)]
#[tracing::instrument(skip_all, fields(list_id = list_id, user_id = current_user.id))]
pub async fn add_movie(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(list_id): Path<ListId>,
    Form(request): Form<AddMovieRequest>,
) -> Result<Json<MovieCandidatesView>, Error> {
    if request.title.trim().is_empty() {
        return Err(Error::Validation {
            message: "Movie title is required".to_string(),
        });
    }

    let list = require_list(&state, list_id).await?;

    let options = state.catalog.search(&request.title).await?;

    Ok(Json(MovieCandidatesView {
        list: list.into(),
        category: request.category,
        options,
    }))
}

/// Confirm a catalog candidate and persist it as a movie.
///
/// The detail fetch happens before any write: a provider failure leaves
/// the store untouched.
#[utoipa::path(
    get,
    path = "/find/{list_id}",
    tag = "movies",
    params(
        ("list_id" = i64, Path, description = "List receiving the movie"),
        FindMovieQuery,
    ),
    responses(
        (status = 303, description = "Movie persisted, redirected to the rate form"),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "Unknown list or catalog record"),
        (status = 502, description = "Catalog unavailable"),
    )
)]
#[tracing::instrument(skip_all, fields(list_id = list_id, external_id = query.id, user_id = current_user.id))]
pub async fn find_movie(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(list_id): Path<ListId>,
    Query(query): Query<FindMovieQuery>,
) -> Result<Redirect, Error> {
    require_list(&state, list_id).await?;

    let details = state.catalog.fetch_details(query.id).await?;

    let img_url = details
        .poster_path
        .as_deref()
        .map(|path| format!("{}{}", state.config.catalog.image_base_url, path));

    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let movie = Movies::new(&mut conn)
        .create(&MovieCreateDBRequest {
            title: details.title.clone(),
            year: details.release_year(),
            description: details.overview.clone(),
            img_url,
            category: query.category,
            list_id,
            author_id: current_user.id,
        })
        .await?;

    Ok(Redirect::to(&format!("/edit?id={}", movie.id)))
}

/// The rate/review form's view of a movie
#[utoipa::path(
    get,
    path = "/edit",
    tag = "movies",
    params(IdQuery),
    responses(
        (status = 200, description = "The movie to rate", body = MovieResponse),
        (status = 404, description = "Unknown movie"),
    )
)]
#[tracing::instrument(skip_all, fields(movie_id = query.id))]
pub async fn get_rate_movie(State(state): State<AppState>, Query(query): Query<IdQuery>) -> Result<Json<MovieResponse>, Error> {
    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;

    let movie = Movies::new(&mut conn)
        .get_by_id(query.id)
        .await?
        .ok_or_else(|| Error::NotFound {
            resource: "Movie".to_string(),
            id: query.id.to_string(),
        })?;

    Ok(Json(movie.into()))
}

/// Set a movie's rating and review. Re-submission overwrites.
#[utoipa::path(
    post,
    path = "/edit",
    request_body = RateMovieRequest,
    tag = "movies",
    params(IdQuery),
    responses(
        (status = 303, description = "Rating stored, redirected home"),
        (status = 400, description = "Rating is not numeric"),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "Unknown movie"),
    )
)]
#[tracing::instrument(skip_all, fields(movie_id = query.id, user_id = current_user.id))]
pub async fn rate_movie(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Query(query): Query<IdQuery>,
    Form(request): Form<RateMovieRequest>,
) -> Result<Redirect, Error> {
    let rating: f64 = request.rating.trim().parse().map_err(|_| Error::Validation {
        message: format!("Rating must be a number, got {:?}", request.rating),
    })?;

    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    Movies::new(&mut conn)
        .update(
            query.id,
            &MovieUpdateDBRequest {
                rating: Some(rating.to_string()),
                review: Some(request.review),
            },
        )
        .await
        .map_err(|e| match e {
            DbError::NotFound => Error::NotFound {
                resource: "Movie".to_string(),
                id: query.id.to_string(),
            },
            other => Error::Database(other),
        })?;

    Ok(Redirect::to("/"))
}

/// Delete a movie
#[utoipa::path(
    get,
    path = "/delete",
    tag = "movies",
    params(IdQuery),
    responses(
        (status = 303, description = "Movie deleted (or already absent), redirected home"),
        (status = 401, description = "Not authenticated"),
    )
)]
#[tracing::instrument(skip_all, fields(movie_id = query.id, user_id = current_user.id))]
pub async fn delete_movie(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Query(query): Query<IdQuery>,
) -> Result<Redirect, Error> {
    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;

    // Deleting an unknown id is a no-op
    let removed = Movies::new(&mut conn).delete(query.id).await?;
    if !removed {
        debug!("Delete of unknown movie {} ignored", query.id);
    }

    Ok(Redirect::to("/"))
}
