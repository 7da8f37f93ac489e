use crate::error::{Error, WebErrorKind};
use crate::extractors::auth_session::AuthSession;
use axum::{
    extract::FromRequestParts,
    http::request::Parts,
    response::{IntoResponse, Response},
};
use secrecy::SecretString;

/// The caller's access token. Rejects with 401 when the session holds none.
pub(crate) struct AccessToken(pub SecretString);

impl<S> FromRequestParts<S> for AccessToken
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let session = AuthSession::from_request_parts(parts, state)
            .await
            .map_err(IntoResponse::into_response)?;

        match session.access_token().await {
            Ok(Some(token)) => Ok(AccessToken(token)),
            Ok(None) => Err(Error {
                source: None,
                error_kind: WebErrorKind::Unauthenticated,
            }
            .into_response()),
            Err(e) => Err(Error::from(e).into_response()),
        }
    }
}
