use axum::{Form, Json, extract::State};

use crate::{
    AppState,
    api::models::{
        auth::{LoginInfo, LoginRequest, LoginResponse, LogoutResponse, RegisterRequest, RegisterResponse, RegistrationInfo},
        users::CurrentUser,
    },
    auth::{password, session},
    db::{
        handlers::{Repository, Users},
        models::users::UserCreateDBRequest,
    },
    errors::Error,
};

/// Get registration information
#[utoipa::path(
    get,
    path = "/register",
    tag = "authentication",
    responses(
        (status = 200, description = "Registration info", body = RegistrationInfo),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn get_registration_info() -> Json<RegistrationInfo> {
    Json(RegistrationInfo {
        message: "Register with an email address, a display name, and a password".to_string(),
    })
}

/// Register a new user account and establish a session
#[utoipa::path(
    post,
    path = "/register",
    request_body = RegisterRequest,
    tag = "authentication",
    responses(
        (status = 303, description = "User registered, session established, redirected home"),
        (status = 400, description = "Invalid input"),
        (status = 409, description = "An account with this email already exists"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn register(State(state): State<AppState>, Form(request): Form<RegisterRequest>) -> Result<RegisterResponse, Error> {
    if request.email.trim().is_empty() || request.name.trim().is_empty() {
        return Err(Error::Validation {
            message: "Email and name are required".to_string(),
        });
    }

    // Validate password length
    let password_config = &state.config.auth.password;
    if request.password.len() < password_config.min_length {
        return Err(Error::Validation {
            message: format!("Password must be at least {} characters", password_config.min_length),
        });
    }
    if request.password.len() > password_config.max_length {
        return Err(Error::Validation {
            message: format!("Password must be no more than {} characters", password_config.max_length),
        });
    }

    let mut tx = state.db.begin().await.map_err(|e| Error::Database(e.into()))?;

    // Check if a user with this email already exists
    let mut user_repo = Users::new(&mut tx);
    if user_repo.get_user_by_email(&request.email).await?.is_some() {
        return Err(Error::DuplicateEmail { email: request.email });
    }

    // Hash the password on a blocking thread to avoid blocking the async runtime
    let password = request.password.clone();
    let password_hash = tokio::task::spawn_blocking(move || password::hash_string(&password))
        .await
        .map_err(|e| Error::Internal {
            operation: format!("spawn password hashing task: {e}"),
        })??;

    let created_user = user_repo
        .create(&UserCreateDBRequest {
            email: request.email,
            name: request.name,
            password_hash,
        })
        .await?;

    tx.commit().await.map_err(|e| Error::Database(e.into()))?;

    // Establish the session for the new user
    let current_user = CurrentUser::from(created_user);
    let token = session::create_session_token(&current_user, &state.config)?;
    let cookie = session::session_cookie(&token, &state.config);

    Ok(RegisterResponse { cookie })
}

/// Get login information
#[utoipa::path(
    get,
    path = "/login",
    tag = "authentication",
    responses(
        (status = 200, description = "Login info", body = LoginInfo),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn get_login_info() -> Json<LoginInfo> {
    Json(LoginInfo {
        message: "Login with your email address and password".to_string(),
    })
}

/// Login with email and password
#[utoipa::path(
    post,
    path = "/login",
    request_body = LoginRequest,
    tag = "authentication",
    responses(
        (status = 303, description = "Login successful, session established, redirected home"),
        (status = 401, description = "Invalid credentials"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn login(State(state): State<AppState>, Form(request): Form<LoginRequest>) -> Result<LoginResponse, Error> {
    let mut pool_conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let mut user_repo = Users::new(&mut pool_conn);

    // Find user by email; an unknown address reads the same as a bad password
    let user = user_repo.get_user_by_email(&request.email).await?.ok_or(Error::AuthFailure)?;

    // Verify password on a blocking thread to avoid blocking the async runtime
    let password = request.password.clone();
    let hash = user.password_hash.clone();
    let is_valid = tokio::task::spawn_blocking(move || password::verify_string(&password, &hash))
        .await
        .map_err(|e| Error::Internal {
            operation: format!("spawn password verification task: {e}"),
        })??;

    if !is_valid {
        return Err(Error::AuthFailure);
    }

    let current_user = CurrentUser::from(user);
    let token = session::create_session_token(&current_user, &state.config)?;
    let cookie = session::session_cookie(&token, &state.config);

    Ok(LoginResponse { cookie })
}

/// Logout (clear session)
#[utoipa::path(
    get,
    path = "/logout",
    tag = "authentication",
    responses(
        (status = 303, description = "Session cleared, redirected home"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn logout(State(state): State<AppState>) -> LogoutResponse {
    LogoutResponse {
        cookie: session::clear_session_cookie(&state.config),
    }
}

/// The current session's user
#[utoipa::path(
    get,
    path = "/me",
    tag = "authentication",
    responses(
        (status = 200, description = "Current user", body = CurrentUser),
        (status = 401, description = "Not authenticated"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn me(current_user: CurrentUser) -> Json<CurrentUser> {
    Json(current_user)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{create_test_app, register_user, session_cookie_from};
    use axum::http::StatusCode;
    use sqlx::SqlitePool;

    #[sqlx::test]
    async fn test_register_establishes_session(pool: SqlitePool) {
        let server = create_test_app(pool);

        let response = server
            .post("/register")
            .form(&RegisterRequest {
                email: "new@example.com".to_string(),
                name: "New User".to_string(),
                password: "password123".to_string(),
            })
            .await;

        response.assert_status(StatusCode::SEE_OTHER);
        assert_eq!(response.headers().get("location").unwrap(), "/");

        let cookie = session_cookie_from(&response);
        let me = server.get("/me").add_header("cookie", &cookie).await;
        me.assert_status_ok();
        let user: CurrentUser = me.json();
        assert_eq!(user.email, "new@example.com");
        assert_eq!(user.name, "New User");
    }

    #[sqlx::test]
    async fn test_register_duplicate_email_conflicts(pool: SqlitePool) {
        let server = create_test_app(pool.clone());

        register_user(&server, "dup@example.com", "password123").await;

        let response = server
            .post("/register")
            .form(&RegisterRequest {
                email: "dup@example.com".to_string(),
                name: "Someone Else".to_string(),
                password: "password456".to_string(),
            })
            .await;

        response.assert_status(StatusCode::CONFLICT);
        assert!(response.text().contains("already exists"));

        // Only one row persists
        let mut conn = pool.acquire().await.unwrap();
        let users = Users::new(&mut conn).list(&()).await.unwrap();
        assert_eq!(users.len(), 1);
    }

    #[sqlx::test]
    async fn test_register_short_password_rejected(pool: SqlitePool) {
        let server = create_test_app(pool);

        let response = server
            .post("/register")
            .form(&RegisterRequest {
                email: "short@example.com".to_string(),
                name: "Short".to_string(),
                password: "tiny".to_string(),
            })
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
    }

    #[sqlx::test]
    async fn test_password_is_stored_hashed(pool: SqlitePool) {
        let server = create_test_app(pool.clone());

        register_user(&server, "hash@example.com", "secret123").await;

        let mut conn = pool.acquire().await.unwrap();
        let user = Users::new(&mut conn)
            .get_user_by_email("hash@example.com")
            .await
            .unwrap()
            .unwrap();

        assert_ne!(user.password_hash, "secret123");
        assert!(password::verify_string("secret123", &user.password_hash).unwrap());
    }

    #[sqlx::test]
    async fn test_login_with_correct_credentials(pool: SqlitePool) {
        let server = create_test_app(pool);
        register_user(&server, "login@example.com", "password123").await;

        let response = server
            .post("/login")
            .form(&LoginRequest {
                email: "login@example.com".to_string(),
                password: "password123".to_string(),
            })
            .await;

        response.assert_status(StatusCode::SEE_OTHER);

        let cookie = session_cookie_from(&response);
        let me = server.get("/me").add_header("cookie", &cookie).await;
        let user: CurrentUser = me.json();
        assert_eq!(user.email, "login@example.com");
    }

    #[sqlx::test]
    async fn test_login_wrong_password_never_succeeds(pool: SqlitePool) {
        let server = create_test_app(pool);
        register_user(&server, "victim@example.com", "password123").await;

        for _ in 0..3 {
            let response = server
                .post("/login")
                .form(&LoginRequest {
                    email: "victim@example.com".to_string(),
                    password: "wrong-password".to_string(),
                })
                .await;

            response.assert_status(StatusCode::UNAUTHORIZED);
            assert!(response.text().contains("Invalid email or password"));
            assert!(response.headers().get("set-cookie").is_none());
        }
    }

    #[sqlx::test]
    async fn test_login_unknown_email_fails(pool: SqlitePool) {
        let server = create_test_app(pool);

        let response = server
            .post("/login")
            .form(&LoginRequest {
                email: "ghost@example.com".to_string(),
                password: "whatever1".to_string(),
            })
            .await;

        response.assert_status(StatusCode::UNAUTHORIZED);
    }

    #[sqlx::test]
    async fn test_logout_clears_cookie(pool: SqlitePool) {
        let server = create_test_app(pool);
        register_user(&server, "bye@example.com", "password123").await;

        let response = server.get("/logout").await;
        response.assert_status(StatusCode::SEE_OTHER);

        let cookie = response.headers().get("set-cookie").unwrap().to_str().unwrap();
        assert!(cookie.contains("Max-Age=0"));
    }

    #[sqlx::test]
    async fn test_me_requires_session(pool: SqlitePool) {
        let server = create_test_app(pool);

        let response = server.get("/me").await;
        response.assert_status(StatusCode::UNAUTHORIZED);
    }
}
