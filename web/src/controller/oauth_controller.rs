//! Controller for the OAuth 2.0 authorization code flow with PKCE.
//!
//! All three endpoints are reached through browser navigation, so they answer
//! with redirects rather than JSON.

use crate::controller::found;
use crate::extractors::auth_session::AuthSession;
use crate::{AppState, Error};

use axum::extract::{Query, State};
use axum::response::{IntoResponse, Redirect};
use log::*;
use pkce_auth::error::{oauth_error, OAuthErrorKind};
use pkce_auth::oauth::PkceVerifier;
use serde::Deserialize;

/// Query parameters the identity provider appends to the redirect URI.
#[derive(Debug, Deserialize)]
pub struct OAuthCallback {
    pub code: Option<String>,
    pub error: Option<String>,
    pub error_description: Option<String>,
}

/// GET /login
///
/// Starts a login: generates a PKCE pair, keeps the verifier in the caller's
/// session and redirects the browser to the provider's authorization endpoint.
#[utoipa::path(
    get,
    path = "/login",
    responses(
        (status = 307, description = "Redirect to the identity provider's /authorize endpoint"),
        (status = 500, description = "Session store failure"),
    )
)]
pub async fn login(
    State(app_state): State<AppState>,
    session: AuthSession,
) -> Result<impl IntoResponse, Error> {
    let verifier = PkceVerifier::generate();
    let auth_request = app_state
        .provider_ref()
        .authorization_url(&verifier.challenge());

    session.store_verifier(&verifier).await?;

    debug!(
        "Login started with {} challenge {}",
        auth_request.code_challenge.method(),
        auth_request.code_challenge.as_str()
    );
    info!("Redirecting browser to identity provider for login");
    Ok(Redirect::temporary(&auth_request.url))
}

/// GET /callback
///
/// Exchanges the authorization code, together with the session's verifier,
/// for an access token and sends the browser back to the client.
#[utoipa::path(
    get,
    path = "/callback",
    params(
        ("code" = Option<String>, Query, description = "Authorization code from the identity provider"),
        ("error" = Option<String>, Query, description = "Error code when the user denied or the provider failed"),
    ),
    responses(
        (status = 302, description = "Redirect to the client with ?auth=success"),
        (status = 500, description = "Token exchange failed"),
    )
)]
pub async fn callback(
    State(app_state): State<AppState>,
    session: AuthSession,
    Query(params): Query<OAuthCallback>,
) -> Result<impl IntoResponse, Error> {
    if let Some(error) = params.error {
        return Err(Error::token_exchange(oauth_error(
            OAuthErrorKind::AuthorizationFailed,
            &format!(
                "provider returned {}: {}",
                error,
                params.error_description.unwrap_or_default()
            ),
        )));
    }

    let code = params
        .code
        .ok_or_else(|| Error::token_exchange("callback is missing the authorization code"))?;

    let verifier = session
        .take_verifier()
        .await?
        .ok_or_else(|| Error::token_exchange("no PKCE verifier in session, login not started"))?;

    let tokens = app_state
        .provider_ref()
        .exchange_code(&code, &verifier)
        .await
        .map_err(|e| {
            if !e.is_token_exchange() {
                warn!("Token endpoint unreachable or returned garbage: {}", e);
            }
            Error::token_exchange(e)
        })?;

    session.store_access_token(&tokens.access_token).await?;

    info!(
        "Login completed, access token stored in session (scopes: {:?})",
        tokens.scopes()
    );
    Ok(found(&app_state.config.login_success_url()))
}

/// GET /logout
///
/// Forgets the session's access token and sends the browser back to the client.
#[utoipa::path(
    get,
    path = "/logout",
    responses(
        (status = 302, description = "Redirect to the client base URL"),
    )
)]
pub async fn logout(
    State(app_state): State<AppState>,
    session: AuthSession,
) -> Result<impl IntoResponse, Error> {
    session.clear_access_token().await?;

    info!("Logged out, access token cleared");
    Ok(found(app_state.config.client_base_url()))
}
