use std::env;

use anyhow::Context;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub session_ttl_hours: i64,
    pub admin_username: String,
    pub admin_password: String,
    pub admin_email: String,
    pub cors_allow_origin: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
            session_ttl_hours: 24,
            admin_username: "admin".to_string(),
            admin_password: "admin123".to_string(),
            admin_email: "admin@techstore.local".to_string(),
            cors_allow_origin: None,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let defaults = Self::default();

        let host = env::var("APP_HOST").unwrap_or(defaults.host);
        let port = match env::var("APP_PORT") {
            Ok(p) => p.parse::<u16>().context("APP_PORT must be a port number")?,
            Err(_) => defaults.port,
        };
        let session_ttl_hours = match env::var("SESSION_TTL_HOURS") {
            Ok(h) => h
                .parse::<i64>()
                .ok()
                .filter(|h| *h > 0)
                .context("SESSION_TTL_HOURS must be a positive integer")?,
            Err(_) => defaults.session_ttl_hours,
        };

        Ok(Self {
            host,
            port,
            session_ttl_hours,
            admin_username: env::var("ADMIN_USERNAME").unwrap_or(defaults.admin_username),
            admin_password: env::var("ADMIN_PASSWORD").unwrap_or(defaults.admin_password),
            admin_email: env::var("ADMIN_EMAIL").unwrap_or(defaults.admin_email),
            cors_allow_origin: env::var("CORS_ALLOW_ORIGIN").ok().filter(|o| !o.is_empty()),
        })
    }
}
