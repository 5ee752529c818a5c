//! Test utilities shared by the in-module test suites.

use crate::api::models::auth::RegisterRequest;
use crate::api::models::movies::Category;
use crate::api::models::users::CurrentUser;
use crate::catalog::{CatalogError, CatalogMovieDetails, CatalogSearchResult, CatalogSource};
use crate::config::{CatalogConfig, Config};
use crate::db::handlers::{Lists, Movies, Repository, Users};
use crate::db::models::{
    lists::{ListCreateDBRequest, ListDBResponse},
    movies::{MovieCreateDBRequest, MovieDBResponse},
    users::{UserCreateDBRequest, UserDBResponse},
};
use crate::types::{ListId, UserId};
use crate::{AppState, build_router};
use axum_test::{TestResponse, TestServer};
use sqlx::SqlitePool;
use std::sync::Arc;

pub fn create_test_config() -> Config {
    Config {
        secret_key: Some("test-secret-key-for-testing-only".to_string()),
        catalog: CatalogConfig {
            api_key: Some("test-api-key".to_string()),
            ..Default::default()
        },
        ..Default::default()
    }
}

/// A catalog returning a fixed candidate set, for handler tests that
/// should not touch the network.
pub struct StaticCatalog;

#[async_trait::async_trait]
impl CatalogSource for StaticCatalog {
    async fn search(&self, _query: &str) -> crate::catalog::Result<Vec<CatalogSearchResult>> {
        Ok(vec![
            CatalogSearchResult {
                id: 603,
                title: "The Matrix".to_string(),
                release_date: Some("1999-03-30".to_string()),
                overview: Some("A computer hacker learns about the true nature of reality.".to_string()),
            },
            CatalogSearchResult {
                id: 604,
                title: "The Matrix Reloaded".to_string(),
                release_date: Some("2003-05-15".to_string()),
                overview: None,
            },
        ])
    }

    async fn fetch_details(&self, external_id: i64) -> crate::catalog::Result<CatalogMovieDetails> {
        Ok(CatalogMovieDetails {
            id: external_id,
            title: "The Matrix".to_string(),
            release_date: Some("1999-03-30".to_string()),
            overview: Some("A computer hacker learns about the true nature of reality.".to_string()),
            poster_path: Some("/matrix.jpg".to_string()),
        })
    }
}

/// A catalog that is always down.
pub struct FailingCatalog;

#[async_trait::async_trait]
impl CatalogSource for FailingCatalog {
    async fn search(&self, _query: &str) -> crate::catalog::Result<Vec<CatalogSearchResult>> {
        Err(CatalogError::Unavailable {
            message: "connection refused".to_string(),
        })
    }

    async fn fetch_details(&self, _external_id: i64) -> crate::catalog::Result<CatalogMovieDetails> {
        Err(CatalogError::Unavailable {
            message: "connection refused".to_string(),
        })
    }
}

pub fn create_test_state(pool: SqlitePool, config: Config) -> AppState {
    AppState::builder().db(pool).config(config).catalog(Arc::new(StaticCatalog)).build()
}

pub fn create_test_app(pool: SqlitePool) -> TestServer {
    create_test_app_with_catalog(pool, Arc::new(StaticCatalog))
}

pub fn create_test_app_with_catalog(pool: SqlitePool, catalog: Arc<dyn CatalogSource>) -> TestServer {
    let state = AppState::builder()
        .db(pool)
        .config(create_test_config())
        .catalog(catalog)
        .build();

    let router = build_router(state).expect("Failed to build router");
    TestServer::new(router).expect("Failed to create test server")
}

pub async fn register_user(server: &TestServer, email: &str, password: &str) -> TestResponse {
    server
        .post("/register")
        .form(&RegisterRequest {
            email: email.to_string(),
            name: "Test User".to_string(),
            password: password.to_string(),
        })
        .await
}

/// The `name=token` pair from a Set-Cookie header, ready to send back.
pub fn session_cookie_from(response: &TestResponse) -> String {
    let set_cookie = response
        .headers()
        .get("set-cookie")
        .expect("expected a session cookie")
        .to_str()
        .expect("cookie should be valid ASCII");

    set_cookie.split(';').next().expect("cookie has a name=value pair").to_string()
}

/// Register a fresh user and return it along with a ready-to-send cookie.
pub async fn logged_in_user(server: &TestServer, email: &str) -> (CurrentUser, String) {
    let response = register_user(server, email, "password123").await;
    let cookie = session_cookie_from(&response);
    let user: CurrentUser = server.get("/me").add_header("cookie", &cookie).await.json();
    (user, cookie)
}

pub async fn create_test_user(pool: &SqlitePool, email: &str) -> UserDBResponse {
    let mut conn = pool.acquire().await.expect("Failed to acquire connection");
    Users::new(&mut conn)
        .create(&UserCreateDBRequest {
            email: email.to_string(),
            name: "Test User".to_string(),
            password_hash: crate::auth::password::hash_string("password123").expect("Failed to hash test password"),
        })
        .await
        .expect("Failed to create test user")
}

pub async fn create_test_list(pool: &SqlitePool, author_id: UserId, name: &str) -> ListDBResponse {
    let mut conn = pool.acquire().await.expect("Failed to acquire connection");
    Lists::new(&mut conn)
        .create(&ListCreateDBRequest {
            name: name.to_string(),
            author_id,
        })
        .await
        .expect("Failed to create test list")
}

pub async fn create_test_movie(pool: &SqlitePool, list_id: ListId, author_id: UserId, title: &str, category: Category) -> MovieDBResponse {
    let mut conn = pool.acquire().await.expect("Failed to acquire connection");
    Movies::new(&mut conn)
        .create(&MovieCreateDBRequest {
            title: title.to_string(),
            year: Some("1999".to_string()),
            description: Some("A film.".to_string()),
            img_url: None,
            category,
            list_id,
            author_id,
        })
        .await
        .expect("Failed to create test movie")
}
