//! OAuth token types.

use secrecy::SecretString;
use serde::Deserialize;

/// Tokens issued by the provider's token endpoint.
///
/// Secrets are wrapped so they never show up in `Debug` output.
#[derive(Debug, Deserialize)]
pub struct Tokens {
    /// Access token for the user-info endpoint.
    pub access_token: SecretString,
    /// Token type (usually "Bearer").
    #[serde(default)]
    pub token_type: Option<String>,
    /// Lifetime of the access token in seconds.
    #[serde(default)]
    pub expires_in: Option<u64>,
    /// Granted scopes, space separated.
    #[serde(default)]
    pub scope: Option<String>,
    /// OpenID Connect ID token, when `openid` was requested.
    #[serde(default)]
    pub id_token: Option<SecretString>,
}

impl Tokens {
    /// Granted scopes as a list.
    pub fn scopes(&self) -> Vec<&str> {
        self.scope
            .as_deref()
            .map(|scope| scope.split_whitespace().collect())
            .unwrap_or_default()
    }
}
