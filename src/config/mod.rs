//! Configuration module for the blog server.
//!
//! All configuration is loaded from environment variables with sensible defaults.

use std::env;
use std::net::{AddrParseError, SocketAddr};
use std::path::PathBuf;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Key used to sign the session cookie
    pub secret_key: String,
    /// Path to SQLite database file
    pub db_path: PathBuf,
    /// Admin login token; empty means admin login is closed
    pub admin_token: String,
    /// Public URL prefix for generated links, without trailing slash
    pub base_url: String,
    /// Address to bind the server to
    pub bind_addr: SocketAddr,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, AddrParseError> {
        dotenvy::dotenv().ok();

        let secret_key = env::var("SECRET_KEY").unwrap_or_else(|_| "dev-secret".to_string());

        let db_path = env::var("DATABASE_URL")
            .unwrap_or_else(|_| "blog.db".to_string())
            .into();

        let admin_token = env::var("ADMIN_TOKEN").unwrap_or_default();

        let base_url = normalize_base_url(&env::var("BASE_URL").unwrap_or_default());

        let bind_addr = resolve_bind_addr(env::var("BIND_ADDR").ok(), env::var("PORT").ok())?;

        let log_level = env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            secret_key,
            db_path,
            admin_token,
            base_url,
            bind_addr,
            log_level,
        })
    }

    /// Prefix an absolute path with the public base URL.
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

/// `BIND_ADDR` wins; otherwise listen on all interfaces at `PORT` (default 1000).
fn resolve_bind_addr(
    bind_addr: Option<String>,
    port: Option<String>,
) -> Result<SocketAddr, AddrParseError> {
    match bind_addr {
        Some(addr) => addr.parse(),
        None => format!("0.0.0.0:{}", port.as_deref().unwrap_or("1000")).parse(),
    }
}

fn normalize_base_url(raw: &str) -> String {
    raw.trim_end_matches('/').to_string()
}
