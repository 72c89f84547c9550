//! Application configuration loaded from environment variables.
//!
//! Everything is read and validated once at startup; a missing or empty
//! signing secret stops the process before any route is served.

use std::env;

use crate::auth::ttl::{TokenTtl, MAX_TOKEN_TTL};
use crate::error::AppError;
use crate::state::security_config::{SecurityConfig, DEFAULT_COOKIE_NAME};

#[derive(Debug, Clone)]
pub struct Config {
    // Server configuration
    pub host: String,
    pub port: u16,

    // Security configuration
    pub security: SecurityConfig,
}

impl Config {
    /// Load and validate configuration from the process environment.
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load configuration through `lookup`, which maps a variable name to
    /// its value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup("BACKEND_HOST").unwrap_or_else(|| "0.0.0.0".to_string());

        let port_str = lookup("BACKEND_PORT").unwrap_or_else(|| "5000".to_string());
        let port = port_str.parse::<u16>().map_err(|_| {
            AppError::config(format!(
                "BACKEND_PORT must be a valid port number, got '{port_str}'"
            ))
        })?;

        let jwt_secret = lookup("JWT_SECRET")
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| AppError::config("JWT_SECRET must be set"))?;

        let cookie_secret = lookup("COOKIE_SECRET")
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| AppError::config("COOKIE_SECRET must be set"))?;

        let cookie_name = lookup("AUTH_COOKIE_NAME")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_COOKIE_NAME.to_string());

        let cookie_domain = lookup("AUTH_COOKIE_DOMAIN")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        let token_ttl = match lookup("AUTH_TOKEN_TTL") {
            Some(raw) => raw.parse::<TokenTtl>().map_err(|_| {
                AppError::config(format!("AUTH_TOKEN_TTL is not a valid duration: '{raw}'"))
            })?,
            None => TokenTtl::default(),
        };
        if token_ttl.as_secs() == 0 {
            return Err(AppError::config("AUTH_TOKEN_TTL must be at least one second"));
        }
        if token_ttl.as_secs() > MAX_TOKEN_TTL.as_secs() {
            return Err(AppError::config(format!(
                "AUTH_TOKEN_TTL must not exceed {MAX_TOKEN_TTL}"
            )));
        }

        let security = SecurityConfig::new(jwt_secret.into_bytes(), cookie_secret.as_bytes())?
            .with_cookie_name(cookie_name)
            .with_cookie_domain(cookie_domain)
            .with_token_ttl(token_ttl);

        Ok(Config {
            host,
            port,
            security,
        })
    }
}
