use config::Config;
use log::info;
use pkce_auth::http::HttpClientBuilder;
use pkce_auth::oauth::{providers::auth0, Provider};
use std::sync::Arc;

pub mod config;
pub mod logging;

/// Builds the Auth0 provider described by `config`, sharing one HTTP client.
pub fn init_provider(config: &Config) -> Result<Arc<dyn Provider>, pkce_auth::Error> {
    let settings = config.auth0_settings();
    info!(
        "Identity provider: base_url={}, client_id={}, redirect_uri={}, scopes=\"{}\"",
        settings.base_url, settings.client_id, settings.redirect_uri, settings.scopes,
    );

    let http_client = HttpClientBuilder::new()
        .with_timeout(config.http_timeout())
        .with_user_agent(format!("pawkce/{}", env!("CARGO_PKG_VERSION")))
        .build()?;

    Ok(Arc::new(auth0::Provider::new(settings, http_client)?))
}

// Service-level state containing only infrastructure concerns
// Needs to implement Clone to be able to be passed into Router as State
#[derive(Clone)]
pub struct AppState {
    pub provider: Arc<dyn Provider>,
    pub config: Config,
}

impl AppState {
    pub fn new(app_config: Config, provider: &Arc<dyn Provider>) -> Self {
        Self {
            provider: Arc::clone(provider),
            config: app_config,
        }
    }

    pub fn provider_ref(&self) -> &dyn Provider {
        self.provider.as_ref()
    }
}
