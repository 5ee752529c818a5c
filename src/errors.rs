use crate::catalog::CatalogError;
use crate::db::errors::DbError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error as ThisError;

#[derive(ThisError, Debug)]
pub enum Error {
    /// Malformed form input or business rule violation
    #[error("{message}")]
    Validation { message: String },

    /// Registration conflict on an existing email address
    #[error("An account with the email address {email} already exists")]
    DuplicateEmail { email: String },

    /// Bad credentials on login
    #[error("Invalid email or password")]
    AuthFailure,

    /// Authentication required but not provided
    #[error("Not authenticated")]
    Unauthenticated { message: Option<String> },

    /// Requested resource not found
    #[error("{resource} with ID {id} not found")]
    NotFound { resource: String, id: String },

    /// External catalog lookup failure
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// Database operation error
    #[error(transparent)]
    Database(#[from] DbError),

    /// Generic internal service error
    #[error("Failed to {operation}")]
    Internal { operation: String },

    /// Unexpected error with full context chain
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl Error {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::Validation { .. } => StatusCode::BAD_REQUEST,
            Error::DuplicateEmail { .. } => StatusCode::CONFLICT,
            Error::AuthFailure => StatusCode::UNAUTHORIZED,
            Error::Unauthenticated { .. } => StatusCode::UNAUTHORIZED,
            Error::NotFound { .. } => StatusCode::NOT_FOUND,
            Error::Catalog(catalog_err) => match catalog_err {
                CatalogError::Unavailable { .. } => StatusCode::BAD_GATEWAY,
                CatalogError::NotFound { .. } => StatusCode::NOT_FOUND,
            },
            Error::Database(db_err) => match db_err {
                DbError::NotFound => StatusCode::NOT_FOUND,
                DbError::UniqueViolation { .. } => StatusCode::CONFLICT,
                DbError::ForeignKeyViolation { .. } => StatusCode::BAD_REQUEST,
                DbError::Other(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Error::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            Error::Other(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Returns a user-safe error message, without leaking internal implementation details
    pub fn user_message(&self) -> String {
        match self {
            Error::Validation { message } => message.clone(),
            Error::DuplicateEmail { .. } => "An account with this email address already exists".to_string(),
            Error::AuthFailure => "Invalid email or password".to_string(),
            Error::Unauthenticated { message } => message.clone().unwrap_or_else(|| "Authentication required".to_string()),
            Error::NotFound { resource, id } => format!("{resource} with ID {id} not found"),
            Error::Catalog(catalog_err) => match catalog_err {
                CatalogError::Unavailable { .. } => "The movie catalog is currently unavailable. Please try again later.".to_string(),
                CatalogError::NotFound { id } => format!("Movie {id} not found in the catalog"),
            },
            Error::Database(db_err) => match db_err {
                DbError::NotFound => "Resource not found".to_string(),
                DbError::UniqueViolation { table, column, .. } => {
                    match (table.as_deref(), column.as_deref()) {
                        (Some("users"), Some("email")) => "An account with this email address already exists".to_string(),
                        _ => "Resource already exists".to_string(),
                    }
                }
                DbError::ForeignKeyViolation { .. } => "Invalid reference to related resource".to_string(),
                DbError::Other(_) => "Database error occurred".to_string(),
            },
            Error::Internal { .. } => "Internal server error".to_string(),
            Error::Other(_) => "Internal server error".to_string(),
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        // Log full error details for debugging - different log levels based on severity
        match &self {
            Error::Database(DbError::Other(_)) | Error::Internal { .. } | Error::Other(_) => {
                tracing::error!("Internal service error: {:#}", self);
            }
            Error::Catalog(_) => {
                tracing::warn!("Catalog error: {}", self);
            }
            Error::Database(_) | Error::DuplicateEmail { .. } => {
                tracing::warn!("Database constraint error: {}", self);
            }
            Error::AuthFailure | Error::Unauthenticated { .. } => {
                tracing::info!("Authentication error: {}", self);
            }
            Error::Validation { .. } | Error::NotFound { .. } => {
                tracing::debug!("Client error: {}", self);
            }
        }

        let status = self.status_code();
        let user_message = self.user_message();

        (status, user_message).into_response()
    }
}

/// Convert from String errors (e.g., from external functions)
impl From<String> for Error {
    fn from(msg: String) -> Self {
        Error::Internal { operation: msg }
    }
}

/// Type alias for service operation results
pub type Result<T> = std::result::Result<T, Error>;
