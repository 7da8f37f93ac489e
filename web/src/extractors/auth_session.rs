//! Per-browser login state kept in the server-side session.
//!
//! Each browser is keyed by the session cookie, so concurrent logins from
//! different browsers never see each other's verifier or token.

use crate::extractors::RejectionType;
use axum::{extract::FromRequestParts, http::request::Parts};
use pkce_auth::oauth::PkceVerifier;
use secrecy::{ExposeSecret, SecretString};
use tower_sessions::{session, Session};

const PKCE_VERIFIER_KEY: &str = "pkce_verifier";
const ACCESS_TOKEN_KEY: &str = "access_token";

pub(crate) struct AuthSession(Session);

impl AuthSession {
    /// Remember the verifier for the callback, replacing any earlier one.
    pub async fn store_verifier(&self, verifier: &PkceVerifier) -> Result<(), session::Error> {
        self.0.insert(PKCE_VERIFIER_KEY, verifier.as_str()).await
    }

    /// Remove and return the verifier. A verifier is only ever used once.
    pub async fn take_verifier(&self) -> Result<Option<PkceVerifier>, session::Error> {
        Ok(self
            .0
            .remove::<String>(PKCE_VERIFIER_KEY)
            .await?
            .map(PkceVerifier::from_string))
    }

    pub async fn store_access_token(&self, token: &SecretString) -> Result<(), session::Error> {
        self.0
            .insert(ACCESS_TOKEN_KEY, token.expose_secret().as_str())
            .await
    }

    pub async fn access_token(&self) -> Result<Option<SecretString>, session::Error> {
        Ok(self
            .0
            .get::<String>(ACCESS_TOKEN_KEY)
            .await?
            .map(SecretString::new))
    }

    /// Forget the access token. The verifier slot is left alone.
    pub async fn clear_access_token(&self) -> Result<(), session::Error> {
        self.0.remove::<String>(ACCESS_TOKEN_KEY).await.map(|_| ())
    }
}

impl<S> FromRequestParts<S> for AuthSession
where
    S: Send + Sync,
{
    type Rejection = RejectionType;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let session = Session::from_request_parts(parts, state)
            .await
            .map_err(|(status, msg)| (status, msg.to_string()))?;

        Ok(AuthSession(session))
    }
}
