use log::*;
use service::{config::Config, logging::Logger, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::new();
    Logger::init_logger(config.log_level_filter)?;

    info!(
        "Starting PawKCE auth backend ({} environment)",
        config.runtime_env()
    );

    let provider = service::init_provider(&config)?;
    let app_state = AppState::new(config, &provider);

    web::init_server(app_state).await?;

    Ok(())
}
