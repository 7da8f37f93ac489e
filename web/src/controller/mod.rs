use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};

pub(crate) mod health_check_controller;
pub(crate) mod oauth_controller;
pub(crate) mod profile_controller;

#[cfg(test)]
mod session_flow_tests;

/// `302 Found` to `location`, the status browsers and the client view expect
/// after the callback and logout.
fn found(location: &str) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, location.to_string())]).into_response()
}
