pub(crate) mod access_token;
pub(crate) mod auth_session;

use axum::http::StatusCode;

type RejectionType = (StatusCode, String);
