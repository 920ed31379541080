//! Configuration module for the dashboard backend.
//!
//! All configuration is loaded from environment variables with sensible defaults.

use std::env;
use std::net::SocketAddr;
use std::time::Duration;

use thiserror::Error;

/// Secret used when `JWT_SECRET` is not set. Only suitable for local development.
pub const DEV_JWT_SECRET: &str = "quizdash-dev-secret-change-me";

/// Error raised when an environment variable holds an unusable value.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {name}: {value}")]
    InvalidValue { name: &'static str, value: String },
}

/// Output format for log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

/// Credentials for the admin account created at startup.
#[derive(Debug, Clone)]
pub struct AdminBootstrap {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Address to bind the server to
    pub bind_addr: SocketAddr,
    /// Store connection string
    pub database_url: String,
    /// Allowed CORS origins; `None` allows any origin
    pub cors_origins: Option<Vec<String>>,
    /// Secret used to sign bearer tokens
    pub jwt_secret: String,
    /// Lifetime of issued tokens
    pub jwt_expires_in_secs: i64,
    /// Upper bound on the time spent handling one request
    pub request_timeout: Duration,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    pub log_format: LogFormat,
    /// Admin account to create on startup, if configured
    pub admin_bootstrap: Option<AdminBootstrap>,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port: u16 = parse_var("PORT", 5000)?;
        let bind_addr = format!("{}:{}", host, port)
            .parse()
            .map_err(|_| ConfigError::InvalidValue {
                name: "HOST",
                value: host.clone(),
            })?;

        let database_url = env::var("DATABASE_URL")
            .unwrap_or_else(|_| "sqlite:./data/dashboard.sqlite".to_string());

        let cors_origins = env::var("CORS_ORIGIN").ok().and_then(|raw| {
            let origins: Vec<String> = raw
                .split(',')
                .map(|o| o.trim().to_string())
                .filter(|o| !o.is_empty() && o != "*")
                .collect();
            (!origins.is_empty()).then_some(origins)
        });

        let jwt_secret = env::var("JWT_SECRET")
            .ok()
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEV_JWT_SECRET.to_string());
        let jwt_expires_in_secs: i64 = parse_var("JWT_EXPIRES_IN_SECS", 30 * 24 * 60 * 60)?;
        let request_timeout = Duration::from_secs(parse_var("REQUEST_TIMEOUT_SECS", 30)?);

        let log_level = env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
        let log_format = match env::var("LOG_FORMAT").as_deref() {
            Ok("json") => LogFormat::Json,
            Ok("pretty") | Err(_) => LogFormat::Pretty,
            Ok(other) => {
                return Err(ConfigError::InvalidValue {
                    name: "LOG_FORMAT",
                    value: other.to_string(),
                })
            }
        };

        let admin_bootstrap = match (env::var("ADMIN_EMAIL"), env::var("ADMIN_PASSWORD")) {
            (Ok(email), Ok(password)) if !email.is_empty() && !password.is_empty() => {
                Some(AdminBootstrap {
                    name: env::var("ADMIN_NAME").unwrap_or_else(|_| "Admin".to_string()),
                    email,
                    password,
                })
            }
            _ => None,
        };

        Ok(Self {
            bind_addr,
            database_url,
            cors_origins,
            jwt_secret,
            jwt_expires_in_secs,
            request_timeout,
            log_level,
            log_format,
            admin_bootstrap,
        })
    }

    /// Whether tokens are signed with the built-in development secret.
    pub fn uses_dev_secret(&self) -> bool {
        self.jwt_secret == DEV_JWT_SECRET
    }
}

fn parse_var<T: std::str::FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue { name, value }),
        Err(_) => Ok(default),
    }
}
