use std::error::Error as StdError;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use log::*;

pub type Result<T> = core::result::Result<T, Error>;

/// Errors surfaced by the web layer.
///
/// Holds the kind of failure, which decides the HTTP status, and the
/// underlying error from `pkce_auth` or the session store, which is only logged.
#[derive(Debug)]
pub struct Error {
    pub source: Option<Box<dyn StdError + Send + Sync>>,
    pub error_kind: WebErrorKind,
}

#[derive(Debug, PartialEq)]
pub enum WebErrorKind {
    /// No access token in the caller's session.
    Unauthenticated,
    /// The callback could not turn its code into an access token.
    TokenExchange,
    /// The provider's user-info endpoint could not be read.
    Profile,
    /// The session store failed.
    Session,
}

impl Error {
    pub fn token_exchange(err: impl Into<Box<dyn StdError + Send + Sync>>) -> Self {
        Self {
            source: Some(err.into()),
            error_kind: WebErrorKind::TokenExchange,
        }
    }

    pub fn profile(err: impl Into<Box<dyn StdError + Send + Sync>>) -> Self {
        Self {
            source: Some(err.into()),
            error_kind: WebErrorKind::Profile,
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn StdError + 'static))
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, fmt: &mut std::fmt::Formatter) -> core::result::Result<(), std::fmt::Error> {
        match &self.source {
            Some(source) => write!(fmt, "{:?}: {}", self.error_kind, source),
            None => write!(fmt, "{:?}", self.error_kind),
        }
    }
}

impl From<tower_sessions::session::Error> for Error {
    fn from(err: tower_sessions::session::Error) -> Self {
        Self {
            source: Some(Box::new(err)),
            error_kind: WebErrorKind::Session,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self.error_kind {
            WebErrorKind::Unauthenticated => {
                (StatusCode::UNAUTHORIZED, "Not logged in").into_response()
            }
            WebErrorKind::TokenExchange => {
                error!("Token exchange failed: {}", self);
                (StatusCode::INTERNAL_SERVER_ERROR, "Token exchange failed.").into_response()
            }
            WebErrorKind::Profile => {
                error!("Failed to fetch profile: {}", self);
                (StatusCode::INTERNAL_SERVER_ERROR, "Failed to fetch profile").into_response()
            }
            WebErrorKind::Session => {
                error!("Session store error: {}", self);
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL SERVER ERROR").into_response()
            }
        }
    }
}
