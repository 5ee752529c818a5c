use axum::{
    Json,
    extract::{Path, Query, State},
};

use crate::{
    AppState,
    api::models::movies::{CategoryQuery, HomeView, MovieResponse},
    auth::MaybeUser,
    db::handlers::{Lists, Movies, Repository, lists::ListFilter, movies::MovieFilter},
    errors::Error,
    types::ListId,
};

/// The home feed: all movies in reverse insertion order, plus all lists.
#[utoipa::path(
    get,
    path = "/",
    tag = "home",
    responses(
        (status = 200, description = "Home feed", body = HomeView),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn home(State(state): State<AppState>, MaybeUser(user): MaybeUser) -> Result<Json<HomeView>, Error> {
    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;

    let movies = Movies::new(&mut conn).list(&MovieFilter::default()).await?;
    let lists = Lists::new(&mut conn).list(&ListFilter::default()).await?;

    Ok(Json(HomeView {
        user,
        movies: movies.into_iter().map(MovieResponse::from).collect(),
        lists: lists.into_iter().map(Into::into).collect(),
    }))
}

/// The movies belonging to one list.
#[utoipa::path(
    get,
    path = "/show_list/{list_id}",
    tag = "lists",
    params(("list_id" = i64, Path, description = "List to show")),
    responses(
        (status = 200, description = "Movies in the list", body = Vec<MovieResponse>),
        (status = 404, description = "Unknown list"),
    )
)]
#[tracing::instrument(skip_all, fields(list_id = list_id))]
pub async fn show_list(State(state): State<AppState>, Path(list_id): Path<ListId>) -> Result<Json<Vec<MovieResponse>>, Error> {
    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;

    Lists::new(&mut conn)
        .get_by_id(list_id)
        .await?
        .ok_or_else(|| Error::NotFound {
            resource: "List".to_string(),
            id: list_id.to_string(),
        })?;

    let movies = Movies::new(&mut conn)
        .list(&MovieFilter {
            list_id: Some(list_id),
            category: None,
        })
        .await?;

    Ok(Json(movies.into_iter().map(MovieResponse::from).collect()))
}

/// The movies tagged with one category, across all lists.
#[utoipa::path(
    get,
    path = "/find_category",
    tag = "movies",
    params(CategoryQuery),
    responses(
        (status = 200, description = "Movies in the category", body = Vec<MovieResponse>),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn find_category(
    State(state): State<AppState>,
    Query(query): Query<CategoryQuery>,
) -> Result<Json<Vec<MovieResponse>>, Error> {
    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;

    let movies = Movies::new(&mut conn)
        .list(&MovieFilter {
            list_id: None,
            category: Some(query.category),
        })
        .await?;

    Ok(Json(movies.into_iter().map(MovieResponse::from).collect()))
}
