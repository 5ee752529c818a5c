//! OpenAPI documentation for the HTTP surface, served at `/docs`.

use utoipa::OpenApi;

use crate::api::handlers;
use crate::api::models::{
    auth::{LoginInfo, LoginRequest, RegisterRequest, RegistrationInfo},
    lists::{CreateListInfo, CreateListRequest, ListResponse},
    movies::{AddMovieInfo, AddMovieRequest, Category, HomeView, MovieCandidatesView, MovieResponse, RateMovieRequest},
    users::{CurrentUser, UserResponse},
};
use crate::catalog::{CatalogMovieDetails, CatalogSearchResult};

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::home::home,
        handlers::home::show_list,
        handlers::home::find_category,
        handlers::auth::get_registration_info,
        handlers::auth::register,
        handlers::auth::get_login_info,
        handlers::auth::login,
        handlers::auth::logout,
        handlers::auth::me,
        handlers::lists::get_create_list_info,
        handlers::lists::create_list,
        handlers::lists::show_all_list,
        handlers::lists::delete_list,
        handlers::movies::get_add_movie_info,
        handlers::movies::add_movie,
        handlers::movies::find_movie,
        handlers::movies::get_rate_movie,
        handlers::movies::rate_movie,
        handlers::movies::delete_movie,
    ),
    components(schemas(
        RegistrationInfo,
        LoginInfo,
        RegisterRequest,
        LoginRequest,
        UserResponse,
        CurrentUser,
        CreateListInfo,
        CreateListRequest,
        ListResponse,
        Category,
        AddMovieRequest,
        RateMovieRequest,
        MovieResponse,
        HomeView,
        AddMovieInfo,
        MovieCandidatesView,
        CatalogSearchResult,
        CatalogMovieDetails,
    )),
    tags(
        (name = "home", description = "The movie feed"),
        (name = "authentication", description = "Registration, login, and sessions"),
        (name = "lists", description = "Named collections of movies"),
        (name = "movies", description = "Catalog search, ratings, and reviews"),
    )
)]
pub struct ApiDoc;
