//! API request/response models for authentication.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Registration information
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RegistrationInfo {
    /// Status message
    pub message: String,
}

/// Login information
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LoginInfo {
    /// Status message
    pub message: String,
}

/// Form submitted to register a new user
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RegisterRequest {
    /// Email address (must be unique)
    pub email: String,
    /// Display name
    pub name: String,
    /// Password (will be hashed)
    pub password: String,
}

/// Form submitted to login
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LoginRequest {
    /// Email address
    pub email: String,
    /// Password
    pub password: String,
}

/// Response models that implement IntoResponse for cleaner handler code
use axum::{
    http::{HeaderMap, header},
    response::{IntoResponse, Redirect, Response},
};

/// Successful registration: session established, browser sent home.
pub struct RegisterResponse {
    pub cookie: String,
}

impl IntoResponse for RegisterResponse {
    fn into_response(self) -> Response {
        let mut headers = HeaderMap::new();
        headers.insert(header::SET_COOKIE, self.cookie.parse().unwrap());
        (headers, Redirect::to("/")).into_response()
    }
}

/// Successful login: session established, browser sent home.
pub struct LoginResponse {
    pub cookie: String,
}

impl IntoResponse for LoginResponse {
    fn into_response(self) -> Response {
        let mut headers = HeaderMap::new();
        headers.insert(header::SET_COOKIE, self.cookie.parse().unwrap());
        (headers, Redirect::to("/")).into_response()
    }
}

/// Logout: session cleared, browser sent home.
pub struct LogoutResponse {
    pub cookie: String,
}

impl IntoResponse for LogoutResponse {
    fn into_response(self) -> Response {
        let mut headers = HeaderMap::new();
        headers.insert(header::SET_COOKIE, self.cookie.parse().unwrap());
        (headers, Redirect::to("/")).into_response()
    }
}
