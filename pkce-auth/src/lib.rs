//! # pkce-auth
//!
//! Everything the backend needs to talk to an OAuth 2.0 identity provider
//! as a public client:
//! - PKCE verifier/challenge generation (RFC 7636, `S256`)
//! - The identity provider trait and an Auth0 implementation
//!   (authorization URL, authorization code exchange, user info)
//! - HTTP client building
//!
//! ## Usage
//!
//! ```rust,ignore
//! use pkce_auth::oauth::{providers::auth0, PkceVerifier, Provider};
//!
//! let provider = auth0::Provider::new(settings, http_client)?;
//! let verifier = PkceVerifier::generate();
//! let request = provider.authorization_url(&verifier.challenge());
//! ```

pub mod error;
pub mod http;
pub mod oauth;

// Re-export commonly used types
pub use error::{Error, ErrorKind};
