use client::{define_routes, Config};
use log::*;
use service::logging::Logger;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::new();
    Logger::init_logger(config.log_level_filter)?;

    let host = format!("{}:{}", config.interface, config.port);
    let listener = tokio::net::TcpListener::bind(&host).await?;
    info!("PawKCE client running on http://{}", host);
    info!("Auth backend expected at {}", config.backend_url);

    axum::serve(listener, define_routes(&config)).await?;

    Ok(())
}
