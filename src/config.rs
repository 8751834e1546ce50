// src/config.rs

use std::{env, path::PathBuf};
use dotenvy::dotenv;

/// Default session lifetime: one day.
const DEFAULT_SESSION_TTL: u64 = 86_400;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub session_secret: String,
    pub session_ttl: u64,
    /// Directory holding `lessons.json` and `modules.json`; bundled content when unset.
    pub content_dir: Option<PathBuf>,
    /// Sessions started with this email get the admin role.
    pub admin_email: Option<String>,
    pub bind_addr: String,
    pub log_dir: String,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        let database_url = env::var("DATABASE_URL")
            .unwrap_or_else(|_| "sqlite://nextmimo.db?mode=rwc".to_string());

        let session_secret = env::var("SESSION_SECRET")
            .expect("SESSION_SECRET must be set");

        let session_ttl = env::var("SESSION_TTL_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_SESSION_TTL);

        let content_dir = env::var("CONTENT_DIR").ok().map(PathBuf::from);

        let admin_email = env::var("ADMIN_EMAIL").ok();

        let bind_addr = env::var("BIND_ADDR")
            .unwrap_or_else(|_| "0.0.0.0:3000".to_string());

        let log_dir = env::var("LOG_DIR")
            .unwrap_or_else(|_| "logs".to_string());

        let rust_log = env::var("RUST_LOG")
            .unwrap_or_else(|_| "info".to_string());

        Self {
            database_url,
            session_secret,
            session_ttl,
            content_dir,
            admin_email,
            bind_addr,
            log_dir,
            rust_log,
        }
    }

    pub fn is_admin_email(&self, email: &str) -> bool {
        self.admin_email
            .as_deref()
            .is_some_and(|admin| admin.eq_ignore_ascii_case(email))
    }
}
