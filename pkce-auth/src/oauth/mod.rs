//! OAuth 2.0 authorization code flow with PKCE.

mod pkce;
mod provider;
mod tokens;

pub mod providers;

pub use pkce::{PkceChallenge, PkceVerifier};
pub use provider::{AuthorizationRequest, Profile, Provider};
pub use tokens::Tokens;
