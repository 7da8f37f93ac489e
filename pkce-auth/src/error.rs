//! Error types for the `pkce-auth` crate.
//!
//! A root Error struct holding an error kind tree and an optional source for error chaining.

use std::error::Error as StdError;
use std::fmt;

/// Top-level error type for pkce-auth crate.
/// Holds error kind and optional source for error chaining.
#[derive(Debug)]
pub struct Error {
    pub source: Option<Box<dyn StdError + Send + Sync>>,
    pub error_kind: ErrorKind,
}

/// Major categories of errors in pkce-auth.
#[derive(Debug, PartialEq)]
pub enum ErrorKind {
    OAuth(OAuthErrorKind),
    Http(HttpErrorKind),
}

/// Errors from OAuth operations against the identity provider.
#[derive(Debug, PartialEq)]
pub enum OAuthErrorKind {
    /// The provider redirected back with an error instead of a code.
    AuthorizationFailed,
    /// The token endpoint rejected the code exchange.
    TokenExchangeFailed,
    /// The user-info endpoint rejected the request.
    UserInfoFailed,
    /// The provider answered 2xx with a body we could not decode.
    InvalidResponse,
    /// Provider settings could not be turned into endpoint URLs.
    InvalidConfiguration,
}

/// Errors from HTTP client operations.
#[derive(Debug, PartialEq)]
pub enum HttpErrorKind {
    BuilderFailed,
    RequestFailed,
    Network,
}

impl Error {
    /// True when the error came from the provider's token endpoint.
    pub fn is_token_exchange(&self) -> bool {
        self.error_kind == ErrorKind::OAuth(OAuthErrorKind::TokenExchangeFailed)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self.error_kind {
            ErrorKind::OAuth(kind) => write!(f, "OAuth error: {:?}", kind)?,
            ErrorKind::Http(kind) => write!(f, "HTTP error: {:?}", kind)?,
        }
        if let Some(source) = &self.source {
            write!(f, " ({})", source)?;
        }
        Ok(())
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn StdError + 'static))
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        let error_kind = if err.is_builder() {
            ErrorKind::Http(HttpErrorKind::BuilderFailed)
        } else if err.is_request() {
            ErrorKind::Http(HttpErrorKind::RequestFailed)
        } else {
            ErrorKind::Http(HttpErrorKind::Network)
        };

        Error {
            source: Some(Box::new(err)),
            error_kind,
        }
    }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Self {
        Error {
            source: Some(Box::new(err)),
            error_kind: ErrorKind::OAuth(OAuthErrorKind::InvalidConfiguration),
        }
    }
}

/// Helper function to create OAuth errors.
pub fn oauth_error(kind: OAuthErrorKind, message: &str) -> Error {
    Error {
        source: Some(message.to_string().into()),
        error_kind: ErrorKind::OAuth(kind),
    }
}
