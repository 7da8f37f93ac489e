use crate::extractors::access_token::AccessToken;
use crate::{AppState, Error};

use axum::extract::State;
use axum::http::header;
use axum::response::IntoResponse;
use log::*;

/// GET /profile
///
/// Returns the provider's user-info document for the session's access token, unchanged.
#[utoipa::path(
    get,
    path = "/profile",
    responses(
        (status = 200, description = "User profile as returned by the identity provider"),
        (status = 401, description = "Not logged in"),
        (status = 500, description = "Failed to fetch profile"),
    ),
    security(
        ("cookie_auth" = [])
    )
)]
pub async fn read(
    State(app_state): State<AppState>,
    AccessToken(access_token): AccessToken,
) -> Result<impl IntoResponse, Error> {
    debug!("GET profile");

    let profile = app_state
        .provider_ref()
        .get_user_info(&access_token)
        .await
        .map_err(Error::profile)?;

    Ok((
        [(header::CONTENT_TYPE, "application/json")],
        profile.get().to_owned(),
    ))
}
