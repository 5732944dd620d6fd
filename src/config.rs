/*
 * Responsibility
 * - Load settings from the environment (.env via dotenvy)
 * - Validate them; a missing or malformed value fails startup
 */
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;

/// HS256 secrets shorter than this are refused.
pub const MIN_TOKEN_SECRET_BYTES: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    fn parse(value: Option<String>) -> Self {
        match value
            .unwrap_or_else(|| "development".to_string())
            .to_ascii_lowercase()
            .as_str()
        {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "missing configuration: {}", key),
            ConfigError::Invalid(key) => write!(f, "invalid configuration: {}", key),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Account created at startup with the ADMIN role if it does not exist yet.
#[derive(Clone)]
pub struct BootstrapAdmin {
    pub login: String,
    pub password: String,
}

impl fmt::Debug for BootstrapAdmin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BootstrapAdmin")
            .field("login", &self.login)
            .finish_non_exhaustive()
    }
}

#[derive(Clone)]
pub struct Config {
    pub addr: SocketAddr,
    pub app_env: AppEnv,

    pub database_url: String,
    pub database_max_connections: u32,
    pub database_acquire_timeout: Duration,

    pub auth_token_secret: Vec<u8>,
    pub auth_issuer: String,
    pub access_token_ttl_seconds: u64,
    pub access_token_leeway_seconds: u64,

    pub request_timeout: Duration,
    pub request_body_limit_bytes: usize,

    pub bootstrap_admin: Option<BootstrapAdmin>,
}

// Secrets and the database URL (may carry a password) stay out of logs.
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("addr", &self.addr)
            .field("app_env", &self.app_env)
            .field("database_max_connections", &self.database_max_connections)
            .field("database_acquire_timeout", &self.database_acquire_timeout)
            .field("auth_issuer", &self.auth_issuer)
            .field("access_token_ttl_seconds", &self.access_token_ttl_seconds)
            .field(
                "access_token_leeway_seconds",
                &self.access_token_leeway_seconds,
            )
            .field("request_timeout", &self.request_timeout)
            .field("request_body_limit_bytes", &self.request_body_limit_bytes)
            .field("bootstrap_admin", &self.bootstrap_admin)
            .finish_non_exhaustive()
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let host = lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let host = IpAddr::from_str(host.trim()).map_err(|_| ConfigError::Invalid("HOST"))?;
        let port: u16 = parse_or(&lookup, "PORT", 9999)?;
        let addr = SocketAddr::new(host, port);

        let app_env = AppEnv::parse(lookup("APP_ENV"));

        let database_url = required(&lookup, "DATABASE_URL")?;
        let database_max_connections: u32 = parse_or(&lookup, "DATABASE_MAX_CONNECTIONS", 10)?;
        if database_max_connections == 0 {
            return Err(ConfigError::Invalid("DATABASE_MAX_CONNECTIONS"));
        }
        let database_acquire_timeout = Duration::from_secs(parse_or(
            &lookup,
            "DATABASE_ACQUIRE_TIMEOUT_SECONDS",
            5,
        )?);

        let auth_token_secret = required(&lookup, "AUTH_TOKEN_SECRET")?.into_bytes();
        if auth_token_secret.len() < MIN_TOKEN_SECRET_BYTES {
            return Err(ConfigError::Invalid("AUTH_TOKEN_SECRET"));
        }
        let auth_issuer = lookup("AUTH_ISSUER")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| "payments-api".to_string());
        let access_token_ttl_seconds: u64 = parse_or(&lookup, "ACCESS_TOKEN_TTL_SECONDS", 3600)?;
        if access_token_ttl_seconds == 0 {
            return Err(ConfigError::Invalid("ACCESS_TOKEN_TTL_SECONDS"));
        }
        let access_token_leeway_seconds = parse_or(&lookup, "ACCESS_TOKEN_LEEWAY_SECONDS", 60)?;

        let request_timeout =
            Duration::from_secs(parse_or(&lookup, "REQUEST_TIMEOUT_SECONDS", 30)?);
        if request_timeout.is_zero() {
            return Err(ConfigError::Invalid("REQUEST_TIMEOUT_SECONDS"));
        }
        let request_body_limit_bytes = parse_or(&lookup, "REQUEST_BODY_LIMIT_BYTES", 64 * 1024)?;

        let bootstrap_admin = match (
            non_empty(&lookup, "BOOTSTRAP_ADMIN_LOGIN"),
            non_empty(&lookup, "BOOTSTRAP_ADMIN_PASSWORD"),
        ) {
            (Some(login), Some(password)) => Some(BootstrapAdmin { login, password }),
            (None, None) => None,
            (Some(_), None) => return Err(ConfigError::Missing("BOOTSTRAP_ADMIN_PASSWORD")),
            (None, Some(_)) => return Err(ConfigError::Missing("BOOTSTRAP_ADMIN_LOGIN")),
        };

        Ok(Self {
            addr,
            app_env,
            database_url,
            database_max_connections,
            database_acquire_timeout,
            auth_token_secret,
            auth_issuer,
            access_token_ttl_seconds,
            access_token_leeway_seconds,
            request_timeout,
            request_body_limit_bytes,
            bootstrap_admin,
        })
    }
}

fn non_empty(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<String> {
    lookup(key).filter(|v| !v.trim().is_empty())
}

fn required(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
) -> Result<String, ConfigError> {
    non_empty(lookup, key).ok_or(ConfigError::Missing(key))
}

/// Unset means `default`; set but unparsable is an error, not a silent fallback.
fn parse_or<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid(key)),
    }
}
