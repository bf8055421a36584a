use std::env;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;

use custodian_core::AppError;
use tracing_subscriber::EnvFilter;

const DEFAULT_FRONTEND_URL: &str = "http://localhost:3000";
const DEFAULT_API_HOST: &str = "127.0.0.1";
const DEFAULT_API_PORT: u16 = 3001;
const DEFAULT_DATABASE_MAX_CONNECTIONS: u32 = 10;
const MIN_SESSION_SECRET_LENGTH: usize = 32;

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub migrate_only: bool,
    pub database_url: String,
    pub database_max_connections: u32,
    pub frontend_url: String,
    pub bootstrap_token: String,
    pub _session_secret: String,
    pub api_host: String,
    pub api_port: u16,
    pub cookie_secure: bool,
}

impl ApiConfig {
    pub fn load() -> Result<Self, AppError> {
        let migrate_only = env::args().nth(1).as_deref() == Some("migrate");

        let database_url = required_non_empty_env("DATABASE_URL")?;
        let database_max_connections = parse_or_default(
            "DATABASE_MAX_CONNECTIONS",
            env::var("DATABASE_MAX_CONNECTIONS").ok(),
            DEFAULT_DATABASE_MAX_CONNECTIONS,
        )?;
        let frontend_url =
            env::var("FRONTEND_URL").unwrap_or_else(|_| DEFAULT_FRONTEND_URL.to_owned());
        let bootstrap_token = required_non_empty_env("AUTH_BOOTSTRAP_TOKEN")?;
        let session_secret = required_env("SESSION_SECRET")?;
        validate_session_secret(session_secret.as_str())?;

        let api_host = env::var("API_HOST").unwrap_or_else(|_| DEFAULT_API_HOST.to_owned());
        let api_port = parse_or_default("API_PORT", env::var("API_PORT").ok(), DEFAULT_API_PORT)?;
        let cookie_secure = env::var("SESSION_COOKIE_SECURE")
            .unwrap_or_else(|_| "false".to_owned())
            .eq_ignore_ascii_case("true");

        Ok(Self {
            migrate_only,
            database_url,
            database_max_connections,
            frontend_url,
            bootstrap_token,
            _session_secret: session_secret,
            api_host,
            api_port,
            cookie_secure,
        })
    }

    pub fn socket_address(&self) -> Result<SocketAddr, AppError> {
        let host = IpAddr::from_str(&self.api_host).map_err(|error| {
            AppError::InvalidArgument(format!("invalid API_HOST '{}': {error}", self.api_host))
        })?;
        Ok(SocketAddr::from((host, self.api_port)))
    }
}

pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}

fn validate_session_secret(value: &str) -> Result<(), AppError> {
    if value.len() < MIN_SESSION_SECRET_LENGTH {
        return Err(AppError::InvalidArgument(format!(
            "SESSION_SECRET must be at least {MIN_SESSION_SECRET_LENGTH} characters"
        )));
    }

    Ok(())
}

fn parse_or_default<T>(name: &str, value: Option<String>, default: T) -> Result<T, AppError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match value.filter(|value| !value.trim().is_empty()) {
        Some(value) => value
            .trim()
            .parse::<T>()
            .map_err(|error| AppError::InvalidArgument(format!("invalid {name}: {error}"))),
        None => Ok(default),
    }
}

fn required_env(name: &str) -> Result<String, AppError> {
    env::var(name).map_err(|_| AppError::InvalidArgument(format!("{name} is required")))
}

fn required_non_empty_env(name: &str) -> Result<String, AppError> {
    let value = required_env(name)?;
    if value.trim().is_empty() {
        return Err(AppError::InvalidArgument(format!("{name} must not be empty")));
    }

    Ok(value)
}
