//! Identity provider trait and types.

use async_trait::async_trait;
use secrecy::SecretString;

use super::{PkceChallenge, PkceVerifier, Tokens};
use crate::error::Error;

/// User profile as returned by the provider's user-info endpoint.
///
/// Holds the provider's JSON text exactly as received. Key order, number
/// formatting and the top-level type are never touched.
pub type Profile = Box<serde_json::value::RawValue>;

/// Authorization request the browser is sent to.
#[derive(Debug, Clone)]
pub struct AuthorizationRequest {
    /// Authorization URL to redirect the user to.
    pub url: String,
    /// The challenge embedded in `url`.
    pub code_challenge: PkceChallenge,
}

/// Trait for OAuth 2.0 identity providers used by a public client.
///
/// Implementations handle:
/// - Authorization URL generation with a PKCE challenge
/// - Authorization code exchange using the matching verifier
/// - User info retrieval with a bearer access token
#[async_trait]
pub trait Provider: Send + Sync {
    /// Build the authorization URL carrying `code_challenge`.
    fn authorization_url(&self, code_challenge: &PkceChallenge) -> AuthorizationRequest;

    /// Exchange an authorization code for tokens.
    ///
    /// # Arguments
    ///
    /// * `code` - Authorization code from the OAuth callback
    /// * `pkce_verifier` - Verifier whose challenge was sent with the authorization request
    async fn exchange_code(&self, code: &str, pkce_verifier: &PkceVerifier)
        -> Result<Tokens, Error>;

    /// Get the user's profile using an access token.
    async fn get_user_info(&self, access_token: &SecretString) -> Result<Profile, Error>;
}
