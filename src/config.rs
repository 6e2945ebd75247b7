use std::{env, str::FromStr, time::Duration};

use anyhow::{Context, anyhow};
use secrecy::SecretString;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub host: String,
    pub port: u16,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database = DatabaseConfig::from_env()?;
        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env_or("APP_PORT", 3000);
        Ok(Self {
            port,
            database,
            host,
        })
    }
}

/// Connection settings for the shared pool.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout: Duration,
}

impl DatabaseConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            max_connections: 20,
            min_connections: 5,
            acquire_timeout: Duration::from_secs(30),
        }
    }

    /// `DATABASE_URL` wins; otherwise the URL is assembled from the
    /// `DB_HOST`/`DB_PORT`/`DB_NAME`/`DB_USER`/`DB_PASSWORD`/`DB_SSL` parts.
    pub fn from_env() -> anyhow::Result<Self> {
        let url = match env::var("DATABASE_URL") {
            Ok(url) => url,
            Err(_) => {
                let host = env::var("DB_HOST").context("DATABASE_URL or DB_HOST must be set")?;
                let port = env_or("DB_PORT", 5432_u16);
                let name = env::var("DB_NAME").context("DB_NAME must be set")?;
                let user = env::var("DB_USER").context("DB_USER must be set")?;
                let password = env::var("DB_PASSWORD").unwrap_or_default();
                let ssl = env_or("DB_SSL", false);
                let mode = if ssl { "require" } else { "prefer" };
                format!("postgres://{user}:{password}@{host}:{port}/{name}?sslmode={mode}")
            }
        };

        let mut config = Self::new(url);
        config.max_connections = env_or("DB_MAX_CONNECTIONS", config.max_connections);
        config.min_connections = env_or("DB_MIN_CONNECTIONS", config.min_connections);
        config.acquire_timeout =
            Duration::from_secs(env_or("DB_ACQUIRE_TIMEOUT_SECS", config.acquire_timeout.as_secs()));
        Ok(config)
    }
}

/// Settings for the Shopify Admin REST client.
#[derive(Debug, Clone)]
pub struct ShopifyConfig {
    pub shop_url: String,
    pub access_token: SecretString,
    pub api_version: String,
    pub timeout: Duration,
    pub page_delay: Duration,
    pub page_limit: u32,
    /// Shopify customer ids walked by the full sync.
    pub sync_customer_ids: Vec<i64>,
}

impl ShopifyConfig {
    pub fn new(shop_url: impl Into<String>, access_token: impl Into<String>) -> Self {
        Self {
            shop_url: shop_url.into(),
            access_token: SecretString::from(access_token.into()),
            api_version: "2024-01".to_string(),
            timeout: Duration::from_secs(30),
            page_delay: Duration::from_millis(100),
            page_limit: 250,
            sync_customer_ids: Vec::new(),
        }
    }

    /// Shop URL and token are mandatory; everything else has a default.
    pub fn from_env() -> anyhow::Result<Self> {
        let shop_url = env::var("SHOPIFY_SHOP_URL")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| anyhow!("SHOPIFY_SHOP_URL must be set"))?;
        let access_token = env::var("SHOPIFY_ACCESS_TOKEN")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| anyhow!("SHOPIFY_ACCESS_TOKEN must be set"))?;

        let mut config = Self::new(shop_url, access_token);
        if let Ok(version) = env::var("SHOPIFY_API_VERSION") {
            config.api_version = version;
        }
        config.timeout = Duration::from_secs(env_or("SHOPIFY_TIMEOUT_SECS", 30));
        config.page_delay = Duration::from_millis(env_or("SHOPIFY_PAGE_DELAY_MS", 100));
        config.page_limit = env_or("SHOPIFY_PAGE_LIMIT", config.page_limit);
        config.sync_customer_ids = match env::var("SHOPIFY_SYNC_CUSTOMER_IDS") {
            Ok(raw) => parse_id_list(&raw)
                .context("SHOPIFY_SYNC_CUSTOMER_IDS must be a comma separated list of ids")?,
            Err(_) => Vec::new(),
        };
        Ok(config)
    }
}

fn parse_id_list(raw: &str) -> anyhow::Result<Vec<i64>> {
    raw.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| part.parse::<i64>().with_context(|| format!("invalid id {part:?}")))
        .collect()
}

fn env_or<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}
