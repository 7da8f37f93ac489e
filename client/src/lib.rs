//! Serves the browser view of the PKCE login demo.
//!
//! The view itself is static HTML and JavaScript under `static/`. The only
//! dynamic piece is `/config.js`, which tells the page where the auth backend lives.

use axum::{http::header, response::IntoResponse, routing::get, Router};
use clap::builder::TypedValueParser as _;
use clap::Parser;
use log::LevelFilter;
use std::path::PathBuf;
use tower_http::services::ServeDir;

const DEFAULT_STATIC_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/static");

#[derive(Clone, Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Config {
    /// Base URL of the auth backend the page sends the browser to.
    #[arg(long, env, default_value = "http://localhost:3001")]
    pub backend_url: String,

    /// The host interface to listen for incoming connections
    #[arg(short, long, env = "CLIENT_INTERFACE", default_value = "127.0.0.1")]
    pub interface: String,

    /// The host TCP port to listen for incoming connections
    #[arg(short, long, env = "CLIENT_PORT", default_value_t = 3000)]
    pub port: u16,

    /// Directory holding index.html and its assets.
    #[arg(long, env, default_value = DEFAULT_STATIC_DIR)]
    pub static_dir: PathBuf,

    /// Set the log level verbosity threshold (level) to control what gets displayed on console output
    #[arg(
        short,
        long,
        env,
        default_value_t = LevelFilter::Info,
        value_parser = clap::builder::PossibleValuesParser::new(["OFF", "ERROR", "WARN", "INFO", "DEBUG", "TRACE"])
            .map(|s| s.parse::<LevelFilter>().unwrap()),
        )]
    pub log_level_filter: LevelFilter,
}

impl Config {
    pub fn new() -> Self {
        dotenvy::dotenv().ok();
        Config::parse()
    }
}

/// Script that publishes the backend location to the page as `window.PAWKCE_CONFIG`.
pub fn config_script(backend_url: &str) -> String {
    let config = serde_json::json!({ "backendUrl": backend_url.trim_end_matches('/') });
    format!("window.PAWKCE_CONFIG = {};\n", config)
}

pub fn define_routes(config: &Config) -> Router {
    let script = config_script(&config.backend_url);

    Router::new()
        .route(
            "/config.js",
            get(move || {
                let script = script.clone();
                async move {
                    (
                        [(header::CONTENT_TYPE, "application/javascript; charset=utf-8")],
                        script,
                    )
                        .into_response()
                }
            }),
        )
        .fallback_service(ServeDir::new(&config.static_dir))
}
