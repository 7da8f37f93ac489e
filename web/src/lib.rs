//! HTTP surface of the PKCE login demo: routes, controllers and server bootstrap.

use log::*;

mod controller;
mod error;
mod extractors;
pub mod router;

pub use error::{Error, Result, WebErrorKind};
pub use service::AppState;

/// Binds the configured interface and port and serves the router until shutdown.
pub async fn init_server(app_state: AppState) -> std::io::Result<()> {
    let host = format!("{}:{}", app_state.config.interface, app_state.config.port);

    let listener = tokio::net::TcpListener::bind(&host).await?;
    info!("PKCE demo server running on http://{}", host);
    info!("Start login flow at: http://{}/login", host);

    axum::serve(listener, router::define_routes(app_state)).await
}
