use clap::builder::TypedValueParser as _;
use clap::Parser;
use dotenvy::dotenv;
use log::LevelFilter;
use pkce_auth::oauth::providers::auth0;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

#[derive(Clone, Debug, PartialEq)]
pub enum RustEnv {
    Development,
    Production,
    Staging,
}

#[derive(Debug, PartialEq, Eq)]
pub struct RustEnvParseError;

impl FromStr for RustEnv {
    type Err = RustEnvParseError;
    fn from_str(level: &str) -> Result<RustEnv, Self::Err> {
        match level.to_lowercase().as_str() {
            "development" => Ok(RustEnv::Development),
            "production" => Ok(RustEnv::Production),
            "staging" => Ok(RustEnv::Staging),
            _ => Err(RustEnvParseError),
        }
    }
}

impl fmt::Display for RustEnv {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            RustEnv::Development => write!(f, "development"),
            RustEnv::Production => write!(f, "production"),
            RustEnv::Staging => write!(f, "staging"),
        }
    }
}

#[derive(Clone, Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Config {
    /// The Auth0 tenant domain, e.g. `example.us.auth0.com`.
    #[arg(long, env = "AUTH0_DOMAIN")]
    auth0_domain: String,

    /// The client identifier of the Auth0 application (a public client, no secret).
    #[arg(long, env = "AUTH0_CLIENT_ID")]
    auth0_client_id: String,

    /// The redirect URI registered with the Auth0 application. Must point at `/callback`.
    #[arg(long, env = "AUTH0_REDIRECT_URI")]
    auth0_redirect_uri: String,

    /// Overrides the `https://{AUTH0_DOMAIN}` base URL of the identity provider.
    /// Override in tests to point at a mock server.
    #[arg(long, env = "AUTH0_BASE_URL")]
    auth0_base_url: Option<String>,

    /// Space separated scopes requested during login.
    #[arg(long, env = "AUTH0_SCOPES", default_value = auth0::DEFAULT_SCOPES)]
    auth0_scopes: String,

    /// The base URL of the browser client. Login and logout redirect back here.
    /// The session cookie is `SameSite=Lax`, so the browser only sends it on the
    /// client's credentialed fetches when this URL is same-site with the backend
    /// (same scheme and registrable domain, e.g. two `localhost` ports).
    #[arg(long, env, default_value = "http://localhost:3000")]
    client_base_url: String,

    /// A list of full CORS origin URLs that allowed to receive server responses.
    /// Credentialed requests from these origins carry the session cookie only when
    /// the origin is same-site with the backend.
    #[arg(
        long,
        env,
        value_delimiter = ',',
        use_value_delimiter = true,
        default_value = "http://localhost:3000"
    )]
    pub allowed_origins: Vec<String>,

    /// The host interface to listen for incoming connections
    #[arg(short, long, env, default_value = "127.0.0.1")]
    pub interface: String,

    /// The host TCP port to listen for incoming connections
    #[arg(short, long, env, default_value_t = 3001)]
    pub port: u16,

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

    /// Set the Rust runtime environment to use.
    #[arg(
    short,
    long,
    env,
    default_value_t = RustEnv::Development,
    value_parser = clap::builder::PossibleValuesParser::new([
        "DEVELOPMENT", "PRODUCTION", "STAGING",
        "development", "production", "staging"
    ])
        .map(|s| s.parse::<RustEnv>().unwrap()),
    )]
    pub runtime_env: RustEnv,

    /// Session expiry after inactivity, in seconds (default: 1 hour)
    #[arg(long, env, default_value_t = 3600)]
    pub session_expiry_seconds: u64,

    /// Timeout in seconds for calls to the identity provider
    #[arg(long, env, default_value_t = 30)]
    pub http_timeout_seconds: u64,
}

impl Config {
    pub fn new() -> Self {
        // Load .env file first
        dotenv().ok();
        // Then parse the command line parameters and flags
        Config::parse()
    }

    pub fn auth0_domain(&self) -> &str {
        &self.auth0_domain
    }

    pub fn auth0_client_id(&self) -> &str {
        &self.auth0_client_id
    }

    pub fn auth0_redirect_uri(&self) -> &str {
        &self.auth0_redirect_uri
    }

    /// Returns the identity provider base URL, derived from the domain unless overridden.
    pub fn auth0_base_url(&self) -> String {
        self.auth0_base_url
            .clone()
            .unwrap_or_else(|| auth0::base_url_for_domain(&self.auth0_domain))
    }

    pub fn auth0_scopes(&self) -> &str {
        &self.auth0_scopes
    }

    /// Provider settings assembled from the `AUTH0_*` values.
    pub fn auth0_settings(&self) -> auth0::Settings {
        auth0::Settings {
            base_url: self.auth0_base_url(),
            client_id: self.auth0_client_id.clone(),
            redirect_uri: self.auth0_redirect_uri.clone(),
            scopes: self.auth0_scopes.clone(),
        }
    }

    pub fn client_base_url(&self) -> &str {
        &self.client_base_url
    }

    /// Where the browser lands after a successful callback.
    pub fn login_success_url(&self) -> String {
        format!("{}?auth=success", self.client_base_url)
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_seconds)
    }

    pub fn runtime_env(&self) -> RustEnv {
        self.runtime_env.clone()
    }

    pub fn is_production(&self) -> bool {
        self.runtime_env() == RustEnv::Production
    }
}
