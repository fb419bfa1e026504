//! Configuration management following 12-factor app principles
//!
//! All configuration is loaded from environment variables to ensure
//! clean separation between code and config.

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::locale::LocaleConfig;
use crate::money::{CurrencyConfig, SymbolPosition};

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// SQLite connection URL
    pub database_url: String,
    pub database_max_connections: u32,

    /// Locale negotiation
    pub locale: LocaleConfig,

    /// Instance-wide currency display
    pub currency: CurrencyConfig,

    /// Enterprise limit given to newly created users
    pub default_enterprise_limit: i64,

    /// Session lifetime and cookie flags
    pub session_ttl_hours: i64,
    pub cookie_secure: bool,

    /// Runtime configuration
    pub rust_log: String,
    pub log_format: LogFormat,
    pub port: u16,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // Load .env file if it exists
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let available_locales: Vec<String> = var("AVAILABLE_LOCALES", "en")
            .split(',')
            .map(|l| l.trim().to_string())
            .filter(|l| !l.is_empty())
            .collect();
        let locale = LocaleConfig::new(var("DEFAULT_LOCALE", "en"), available_locales)?;

        let symbol_position = match var("CURRENCY_SYMBOL_POSITION", "before").as_str() {
            "before" => SymbolPosition::Before,
            "after" => SymbolPosition::After,
            other => anyhow::bail!(
                "CURRENCY_SYMBOL_POSITION must be 'before' or 'after', got '{}'",
                other
            ),
        };

        let currency = CurrencyConfig {
            code: var("CURRENCY", "USD"),
            symbol: var("CURRENCY_SYMBOL", "$"),
            symbol_position,
            thousands_separator: var("CURRENCY_THOUSANDS_SEPARATOR", ","),
            decimal_mark: var("CURRENCY_DECIMAL_MARK", "."),
        };

        let log_format = match var("LOG_FORMAT", "pretty").as_str() {
            "json" => LogFormat::Json,
            _ => LogFormat::Pretty,
        };

        Ok(Self {
            database_url: var("DATABASE_URL", "sqlite://foodhub.db?mode=rwc"),
            database_max_connections: var("DATABASE_MAX_CONNECTIONS", "5")
                .parse()
                .map_err(|_| anyhow::anyhow!("DATABASE_MAX_CONNECTIONS must be a number"))?,
            locale,
            currency,
            default_enterprise_limit: var("DEFAULT_ENTERPRISE_LIMIT", "5")
                .parse()
                .map_err(|_| anyhow::anyhow!("DEFAULT_ENTERPRISE_LIMIT must be a number"))?,
            session_ttl_hours: var("SESSION_TTL_HOURS", "12")
                .parse()
                .map_err(|_| anyhow::anyhow!("SESSION_TTL_HOURS must be a number"))?,
            cookie_secure: var("COOKIE_SECURE", "false") == "true",
            rust_log: var("RUST_LOG", "foodhub=debug,tower_http=info"),
            log_format,
            port: var("PORT", "3000").parse().unwrap_or(3000),
        })
    }
}
