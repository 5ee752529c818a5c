use axum::{
    Form, Json,
    extract::{Query, State},
    response::Redirect,
};
use tracing::debug;

use crate::{
    AppState,
    api::models::{
        lists::{CreateListInfo, CreateListRequest, ListResponse},
        movies::IdQuery,
        users::CurrentUser,
    },
    db::{
        handlers::{Lists, Repository, lists::ListFilter},
        models::lists::ListCreateDBRequest,
    },
    errors::Error,
};

/// Create-list form information
#[utoipa::path(
    get,
    path = "/create_list",
    tag = "lists",
    responses(
        (status = 200, description = "Create-list info", body = CreateListInfo),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn get_create_list_info() -> Json<CreateListInfo> {
    Json(CreateListInfo {
        message: "Provide a name to create a new list".to_string(),
    })
}

/// Create a list owned by the session's user
#[utoipa::path(
    post,
    path = "/create_list",
    request_body = CreateListRequest,
    tag = "lists",
    responses(
        (status = 303, description = "List created, redirected to the list index"),
        (status = 400, description = "Invalid input"),
        (status = 401, description = "Not authenticated"),
    )
)]
#[tracing::instrument(skip_all, fields(user_id = current_user.id))]
pub async fn create_list(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Form(request): Form<CreateListRequest>,
) -> Result<Redirect, Error> {
    if request.name.trim().is_empty() {
        return Err(Error::Validation {
            message: "List name is required".to_string(),
        });
    }

    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    Lists::new(&mut conn)
        .create(&ListCreateDBRequest::new(current_user.id, request))
        .await?;

    Ok(Redirect::to("/list"))
}

/// All lists
#[utoipa::path(
    get,
    path = "/list",
    tag = "lists",
    responses(
        (status = 200, description = "All lists", body = Vec<ListResponse>),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn show_all_list(State(state): State<AppState>) -> Result<Json<Vec<ListResponse>>, Error> {
    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;

    let lists = Lists::new(&mut conn).list(&ListFilter::default()).await?;

    Ok(Json(lists.into_iter().map(ListResponse::from).collect()))
}

/// Delete a list and the movies it owns
#[utoipa::path(
    get,
    path = "/delete_list",
    tag = "lists",
    params(IdQuery),
    responses(
        (status = 303, description = "List deleted (or already absent), redirected home"),
        (status = 401, description = "Not authenticated"),
    )
)]
#[tracing::instrument(skip_all, fields(list_id = query.id, user_id = current_user.id))]
pub async fn delete_list(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Query(query): Query<IdQuery>,
) -> Result<Redirect, Error> {
    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;

    // Deleting an unknown id is a no-op
    let removed = Lists::new(&mut conn).delete(query.id).await?;
    if !removed {
        debug!("Delete of unknown list {} ignored", query.id);
    }

    Ok(Redirect::to("/"))
}
