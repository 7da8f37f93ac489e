//! Auth0 identity provider implementation.

use async_trait::async_trait;
use log::*;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde_json::value::RawValue;
use url::Url;

use crate::error::{oauth_error, Error, OAuthErrorKind};
use crate::oauth::{AuthorizationRequest, PkceChallenge, PkceVerifier, Profile, Tokens};

/// Scopes requested when none are configured.
pub const DEFAULT_SCOPES: &str = "openid profile email";

/// Settings needed to talk to an Auth0 tenant as a public client.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Tenant base URL, e.g. `https://example.us.auth0.com`.
    pub base_url: String,
    /// Application client identifier.
    pub client_id: String,
    /// Redirect URI registered with the application.
    pub redirect_uri: String,
    /// Space separated scopes to request.
    pub scopes: String,
}

/// Tenant base URL for a bare Auth0 domain.
pub fn base_url_for_domain(domain: &str) -> String {
    format!("https://{}", domain.trim_end_matches('/'))
}

/// Form body sent to the token endpoint.
#[derive(Serialize)]
struct TokenExchangeRequest<'a> {
    grant_type: &'static str,
    client_id: &'a str,
    code: &'a str,
    code_verifier: &'a str,
    redirect_uri: &'a str,
}

/// Auth0 provider.
///
/// Handles the authorization code flow with PKCE for an Auth0 tenant:
/// - `/authorize` URL generation
/// - code exchange at `/oauth/token`
/// - user info retrieval from `/userinfo`
pub struct Provider {
    client_id: String,
    redirect_uri: String,
    scopes: String,
    authorize_url: Url,
    token_url: Url,
    userinfo_url: Url,
    http_client: reqwest::Client,
}

impl Provider {
    /// Create a new Auth0 provider.
    ///
    /// Fails if `settings.base_url` is not an absolute URL.
    pub fn new(settings: Settings, http_client: reqwest::Client) -> Result<Self, Error> {
        let base = Url::parse(&format!("{}/", settings.base_url.trim_end_matches('/')))?;

        Ok(Self {
            authorize_url: base.join("authorize")?,
            token_url: base.join("oauth/token")?,
            userinfo_url: base.join("userinfo")?,
            client_id: settings.client_id,
            redirect_uri: settings.redirect_uri,
            scopes: settings.scopes,
            http_client,
        })
    }
}

#[async_trait]
impl crate::oauth::Provider for Provider {
    fn authorization_url(&self, code_challenge: &PkceChallenge) -> AuthorizationRequest {
        let mut url = self.authorize_url.clone();
        url.query_pairs_mut()
            .append_pair("response_type", "code")
            .append_pair("client_id", &self.client_id)
            .append_pair("redirect_uri", &self.redirect_uri)
            .append_pair("scope", &self.scopes)
            .append_pair("code_challenge", code_challenge.as_str())
            .append_pair("code_challenge_method", code_challenge.method());

        AuthorizationRequest {
            url: url.into(),
            code_challenge: code_challenge.clone(),
        }
    }

    async fn exchange_code(
        &self,
        code: &str,
        pkce_verifier: &PkceVerifier,
    ) -> Result<Tokens, Error> {
        let request = TokenExchangeRequest {
            grant_type: "authorization_code",
            client_id: &self.client_id,
            code,
            code_verifier: pkce_verifier.as_str(),
            redirect_uri: &self.redirect_uri,
        };

        debug!("Exchanging authorization code at {}", self.token_url);

        let response = self
            .http_client
            .post(self.token_url.clone())
            .form(&request)
            .send()
            .await
            .inspect_err(|e| warn!("Failed to reach token endpoint: {:?}", e))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            warn!("Token endpoint returned {}: {}", status, error_text);
            return Err(oauth_error(
                OAuthErrorKind::TokenExchangeFailed,
                &format!("{}: {}", status, error_text),
            ));
        }

        let tokens: Tokens = response.json().await.map_err(|e| {
            warn!("Failed to parse token response: {:?}", e);
            Error {
                source: Some(Box::new(e)),
                error_kind: crate::ErrorKind::OAuth(OAuthErrorKind::InvalidResponse),
            }
        })?;

        info!("Successfully exchanged authorization code for tokens");
        Ok(tokens)
    }

    async fn get_user_info(&self, access_token: &SecretString) -> Result<Profile, Error> {
        debug!("Fetching user info from {}", self.userinfo_url);

        let response = self
            .http_client
            .get(self.userinfo_url.clone())
            .bearer_auth(access_token.expose_secret())
            .send()
            .await
            .inspect_err(|e| warn!("Failed to reach user-info endpoint: {:?}", e))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            warn!("User-info endpoint returned {}: {}", status, error_text);
            return Err(oauth_error(
                OAuthErrorKind::UserInfoFailed,
                &format!("{}: {}", status, error_text),
            ));
        }

        let body = response.text().await?;

        RawValue::from_string(body).map_err(|e| {
            warn!("User-info response is not JSON: {:?}", e);
            Error {
                source: Some(Box::new(e)),
                error_kind: crate::ErrorKind::OAuth(OAuthErrorKind::InvalidResponse),
            }
        })
    }
}
