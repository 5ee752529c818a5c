//! # reelist: a personal movie-list service
//!
//! `reelist` is the backend for a personal movie-list application: users
//! register and log in, create named lists, search an external movie
//! catalog, add selected movies to a list with a category tag, and rate
//! and review them. Handlers return JSON view models (or redirects after
//! mutations); rendering is left to the frontend.
//!
//! ## Architecture
//!
//! The application is built on [Axum](https://github.com/tokio-rs/axum)
//! for the HTTP layer and uses SQLite (via SQLx) for persistence.
//!
//! The **API layer** ([`api`]) has one handler per user-facing action:
//! the home feed, list management, catalog search and confirmation, and
//! rating. Each handler composes the layers below behind [`AppState`]
//! and converts failures to HTTP responses at the boundary via the
//! [`errors::Error`] taxonomy.
//!
//! The **authentication layer** ([`auth`]) hashes passwords with Argon2id
//! and carries the session as a signed JWT in an HttpOnly cookie. The
//! `CurrentUser` extractor guards every mutating route; `MaybeUser` is
//! the anonymous-tolerant variant for public pages.
//!
//! The **database layer** ([`db`]) uses the repository pattern: each
//! entity (users, lists, movies) has a repository handling queries and
//! mutations over a pooled connection, with migrations applied on
//! startup. Deleting a list cascades to its movies inside a transaction.
//!
//! The **catalog layer** ([`catalog`]) is a thin reqwest client for a
//! TMDB-style metadata provider with bounded timeouts. Details are
//! fetched before anything is persisted, so provider failures never
//! leave partial state behind.
//!
//! ## Quick Start
//!
//! ```no_run
//! use clap::Parser;
//! use reelist::{Application, Config};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let args = reelist::config::Args::parse();
//!     let config = Config::load(&args)?;
//!
//!     reelist::telemetry::init_telemetry()?;
//!
//!     let app = Application::new(config).await?;
//!     app.serve(async {
//!         tokio::signal::ctrl_c().await.expect("Failed to listen for Ctrl+C");
//!     })
//!     .await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Configuration
//!
//! See the [`config`] module for configuration options. The session
//! signing key and the catalog API key must be supplied via config file
//! or environment; startup fails without them.

pub mod api;
pub mod auth;
pub mod catalog;
pub mod config;
pub mod db;
pub mod errors;
mod openapi;
pub mod telemetry;
mod types;

#[cfg(test)]
pub mod test_utils;

use crate::catalog::{CatalogSource, TmdbCatalog};
use crate::openapi::ApiDoc;
use axum::{Router, routing::get};
use bon::Builder;
pub use config::Config;
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::str::FromStr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::{Level, info, instrument};
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable as _};

pub use types::{ListId, MovieId, UserId};

/// Application state shared across all request handlers.
///
/// # Fields
///
/// - `db`: SQLite connection pool for application data
/// - `config`: Application configuration loaded from file/environment
/// - `catalog`: Outbound client for the external movie-metadata provider
#[derive(Clone, Builder)]
pub struct AppState {
    pub db: SqlitePool,
    pub config: Config,
    pub catalog: Arc<dyn CatalogSource>,
}

/// Get the reelist database migrator
pub fn migrator() -> sqlx::migrate::Migrator {
    sqlx::migrate!("./migrations")
}

/// Create CORS layer from configuration
fn create_cors_layer(config: &Config) -> anyhow::Result<CorsLayer> {
    let mut origins = Vec::new();
    for origin in &config.cors.allowed_origins {
        origins.push(origin.parse::<axum::http::HeaderValue>()?);
    }

    Ok(CorsLayer::new()
        .allow_origin(origins)
        .allow_credentials(config.cors.allow_credentials))
}

/// Build the application router with all endpoints and middleware.
///
/// Mutating routes (create/delete list, add/find movie, rate, delete)
/// require a session; reads are public. Several routes accept both GET
/// and POST because the browser flow reaches them through plain links as
/// well as form submissions.
#[instrument(skip_all)]
pub fn build_router(state: AppState) -> anyhow::Result<Router> {
    let cors_layer = create_cors_layer(&state.config)?;

    let router = Router::new()
        .route("/healthz", get(|| async { "OK" }))
        .route("/", get(api::handlers::home::home))
        .route(
            "/show_list/{list_id}",
            get(api::handlers::home::show_list).post(api::handlers::home::show_list),
        )
        .route("/find_category", get(api::handlers::home::find_category))
        // Authentication
        .route(
            "/register",
            get(api::handlers::auth::get_registration_info).post(api::handlers::auth::register),
        )
        .route("/login", get(api::handlers::auth::get_login_info).post(api::handlers::auth::login))
        .route("/logout", get(api::handlers::auth::logout))
        .route("/me", get(api::handlers::auth::me))
        // Lists
        .route(
            "/create_list",
            get(api::handlers::lists::get_create_list_info).post(api::handlers::lists::create_list),
        )
        .route(
            "/list",
            get(api::handlers::lists::show_all_list).post(api::handlers::lists::show_all_list),
        )
        .route(
            "/delete_list",
            get(api::handlers::lists::delete_list).post(api::handlers::lists::delete_list),
        )
        // Movies
        .route(
            "/add/{list_id}",
            get(api::handlers::movies::get_add_movie_info).post(api::handlers::movies::add_movie),
        )
        .route(
            "/find/{list_id}",
            get(api::handlers::movies::find_movie).post(api::handlers::movies::find_movie),
        )
        .route(
            "/edit",
            get(api::handlers::movies::get_rate_movie).post(api::handlers::movies::rate_movie),
        )
        .route(
            "/delete",
            get(api::handlers::movies::delete_movie).post(api::handlers::movies::delete_movie),
        )
        .with_state(state)
        .merge(Scalar::with_url("/docs", ApiDoc::openapi()))
        .layer(cors_layer)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        );

    Ok(router)
}

/// Main application struct that owns all resources and lifecycle.
///
/// # Lifecycle
///
/// 1. **Create**: [`Application::new`] connects the pool, runs
///    migrations, and builds the router
/// 2. **Serve**: [`Application::serve`] binds a TCP port and handles
///    requests until the shutdown future resolves
/// 3. **Shutdown**: the server drains, then database connections close
pub struct Application {
    router: Router,
    config: Config,
    pool: SqlitePool,
}

impl Application {
    /// Create a new application instance with all resources initialized
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let connect_options = SqliteConnectOptions::from_str(&config.database.url)?.create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(config.database.max_connections)
            .connect_with(connect_options)
            .await?;

        migrator().run(&pool).await?;

        let catalog: Arc<dyn CatalogSource> = Arc::new(TmdbCatalog::new(&config.catalog)?);

        let state = AppState::builder()
            .db(pool.clone())
            .config(config.clone())
            .catalog(catalog)
            .build();

        let router = build_router(state)?;

        Ok(Self { router, config, pool })
    }

    /// Start serving the application
    pub async fn serve<F>(self, shutdown: F) -> anyhow::Result<()>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let bind_addr = self.config.bind_address();
        let listener = TcpListener::bind(&bind_addr).await?;
        info!("reelist listening on http://{}", bind_addr);

        axum::serve(listener, self.router).with_graceful_shutdown(shutdown).await?;

        info!("Closing database connections...");
        self.pool.close().await;

        Ok(())
    }
}
