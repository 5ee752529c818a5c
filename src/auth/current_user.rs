//! Request-scoped authentication context.
//!
//! The session travels as a JWT in a cookie; these extractors turn it into
//! a typed user injected per request, so handlers never consult ambient
//! global state. [`CurrentUser`] rejects unauthenticated requests and
//! guards every mutating route; [`MaybeUser`] is the anonymous-tolerant
//! variant for public pages.

use crate::{
    AppState,
    api::models::users::CurrentUser,
    auth::session,
    errors::{Error, Result},
};
use axum::{extract::FromRequestParts, http::request::Parts};
use tracing::trace;

/// Extract user from the session cookie if present and valid.
///
/// Returns:
/// - None: No session cookie present
/// - Some(Ok(user)): Valid session found and verified
/// - Some(Err(error)): Cookie header present but unreadable
fn try_session_auth(parts: &Parts, config: &crate::config::Config) -> Option<Result<CurrentUser>> {
    let cookie_header = parts.headers.get(axum::http::header::COOKIE)?;

    let cookie_str = match cookie_header.to_str() {
        Ok(s) => s,
        Err(e) => {
            return Some(Err(Error::Validation {
                message: format!("Invalid cookie header: {e}"),
            }));
        }
    };
    let cookie_name = &config.auth.session.cookie_name;

    for cookie in cookie_str.split(';') {
        let cookie = cookie.trim();
        if let Some((name, value)) = cookie.split_once('=')
            && name == cookie_name
        {
            match session::verify_session_token(value, config) {
                Ok(user) => return Some(Ok(user)),
                Err(_) => {
                    // Expired or invalid token; keep scanning other cookies
                    continue;
                }
            }
        }
    }
    None
}

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self> {
        match try_session_auth(parts, &state.config) {
            Some(Ok(user)) => {
                trace!("Found session authenticated user: {}", user.id);
                Ok(user)
            }
            Some(Err(e)) => Err(e),
            None => Err(Error::Unauthenticated { message: None }),
        }
    }
}

/// The anonymous sentinel: `MaybeUser(None)` for requests without a valid
/// session, used by read-only routes that render for both audiences.
#[derive(Debug, Clone)]
pub struct MaybeUser(pub Option<CurrentUser>);

impl FromRequestParts<AppState> for MaybeUser {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> std::result::Result<Self, Self::Rejection> {
        let user = match try_session_auth(parts, &state.config) {
            Some(Ok(user)) => Some(user),
            _ => None,
        };
        Ok(Self(user))
    }
}
