use crate::AppState;
use axum::{
    http::{HeaderValue, Method},
    routing::get,
    Router,
};
use log::*;
use service::config::Config;
use time::Duration;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_sessions::{cookie::SameSite, Expiry, MemoryStore, SessionManagerLayer};

use crate::controller::{health_check_controller, oauth_controller, profile_controller};

use utoipa::{
    openapi::security::{ApiKey, ApiKeyValue, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_rapidoc::RapiDoc;

/// Name of the cookie carrying the session id.
pub const SESSION_COOKIE_NAME: &str = "pawkce.sid";

// This is the global definition of our OpenAPI document. To be a part
// of the rendered document, a path and schema must be listed here.
#[derive(OpenApi)]
#[openapi(
        info(
            title = "PawKCE Auth API"
        ),
        paths(
            health_check_controller::health_check,
            oauth_controller::login,
            oauth_controller::callback,
            oauth_controller::logout,
            profile_controller::read,
        ),
        modifiers(&SecurityAddon),
        tags(
            (name = "pawkce", description = "OAuth 2.0 authorization code flow with PKCE")
        )
    )]
struct ApiDoc;

struct SecurityAddon;

// Defines the cookie session that carries the login state for OpenAPI.
impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "cookie_auth",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                SESSION_COOKIE_NAME,
                "Session id value set by /login via Set-Cookie header",
            ))),
        )
    }
}

pub fn define_routes(app_state: AppState) -> Router {
    let session_layer = session_layer(&app_state.config);
    let cors_layer = cors_layer(&app_state.config);

    Router::new()
        .merge(health_routes())
        .merge(oauth_routes(app_state.clone()))
        .merge(profile_routes(app_state))
        .merge(RapiDoc::with_openapi("/api-docs/openapi.json", ApiDoc::openapi()).path("/rapidoc"))
        .layer(session_layer)
        .layer(cors_layer)
}

fn health_routes() -> Router {
    Router::new().route("/health", get(health_check_controller::health_check))
}

/// Routes for the login flow. None require a session: `/login` creates it.
fn oauth_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/login", get(oauth_controller::login))
        .route("/callback", get(oauth_controller::callback))
        .route("/logout", get(oauth_controller::logout))
        .with_state(app_state)
}

fn profile_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/profile", get(profile_controller::read))
        .with_state(app_state)
}

/// In-memory, cookie keyed session store holding each browser's verifier and token.
fn session_layer(config: &Config) -> SessionManagerLayer<MemoryStore> {
    let expiry_seconds = i64::try_from(config.session_expiry_seconds).unwrap_or(i64::MAX);

    SessionManagerLayer::new(MemoryStore::default())
        .with_name(SESSION_COOKIE_NAME)
        .with_secure(config.is_production())
        .with_same_site(SameSite::Lax)
        .with_expiry(Expiry::OnInactivity(Duration::seconds(expiry_seconds)))
}

/// Only the client origins may read responses, and they may send the session cookie.
fn cors_layer(config: &Config) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET])
        .allow_credentials(true)
}
