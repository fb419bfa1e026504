//! Authentication configuration

use chrono::Duration;
use foodhub_common::{Config, LocaleConfig};

/// Name of the session cookie
pub const SESSION_COOKIE: &str = "foodhub_session";

/// Authentication configuration
#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub session_ttl: Duration,
    pub cookie_secure: bool,
    pub locale: LocaleConfig,
}

impl AuthConfig {
    pub fn from_config(config: &Config) -> Self {
        Self {
            session_ttl: Duration::hours(config.session_ttl_hours),
            cookie_secure: config.cookie_secure,
            locale: config.locale.clone(),
        }
    }
}
