// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Project configuration management.
//!
//! Configuration is stored in `.ordersync/config.toml` and includes:
//! - `[shop]`: which store to mirror and how to page through its orders
//! - `[sync]`: lock staleness, polling cadence and request timeout
//! - `[retry]`: transient-failure and rate-limit policy
//! - `database`: optional path for the SQLite file
//!
//! Credentials never live in the config file. They come from the
//! environment, optionally seeded from a `.env` file in the project root.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

use crate::env;
use crate::error::{Error, Result};

const WORK_DIR_NAME: &str = ".ordersync";
const CONFIG_FILE_NAME: &str = "config.toml";
const DB_FILE_NAME: &str = "orders.db";
const GITIGNORE_FILE_NAME: &str = ".gitignore";
const DOTENV_FILE_NAME: &str = ".env";

/// Largest page size the order API accepts.
pub const MAX_PAGE_LIMIT: u32 = 250;

/// Project configuration stored in `.ordersync/config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub shop: ShopConfig,
    #[serde(default)]
    pub sync: SyncConfig,
    #[serde(default)]
    pub retry: RetryConfig,
    /// Optional path for the database (relative to project root or absolute).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database: Option<String>,
}

/// The store being mirrored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShopConfig {
    /// Shop host or URL (`example.myshopify.com` or `https://...`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default = "default_api_version")]
    pub api_version: String,
    #[serde(default = "default_page_limit")]
    pub page_limit: u32,
    /// Value of the `status` filter on order queries.
    #[serde(default = "default_order_status")]
    pub order_status: String,
}

impl Default for ShopConfig {
    fn default() -> Self {
        ShopConfig {
            url: None,
            api_version: default_api_version(),
            page_limit: default_page_limit(),
            order_status: default_order_status(),
        }
    }
}

fn default_api_version() -> String {
    "2024-10".to_string()
}

fn default_page_limit() -> u32 {
    MAX_PAGE_LIMIT
}

fn default_order_status() -> String {
    "any".to_string()
}

/// Lock and scheduling settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Idle time after which a running sync's lock may be reclaimed.
    #[serde(default = "default_stale_after", with = "humantime_serde")]
    pub stale_after: Duration,
    /// Delay between incremental runs of `ordersync watch`.
    #[serde(default = "default_poll_interval", with = "humantime_serde")]
    pub poll_interval: Duration,
    /// Interval between reconciliation sweeps of `ordersync watch`.
    #[serde(default = "default_reconcile_every", with = "humantime_serde")]
    pub reconcile_every: Duration,
    #[serde(default = "default_request_timeout", with = "humantime_serde")]
    pub request_timeout: Duration,
}

impl Default for SyncConfig {
    fn default() -> Self {
        SyncConfig {
            stale_after: default_stale_after(),
            poll_interval: default_poll_interval(),
            reconcile_every: default_reconcile_every(),
            request_timeout: default_request_timeout(),
        }
    }
}

fn default_stale_after() -> Duration {
    ordersync_core::DEFAULT_STALE_AFTER
}

fn default_poll_interval() -> Duration {
    Duration::from_secs(5 * 60)
}

fn default_reconcile_every() -> Duration {
    Duration::from_secs(24 * 60 * 60)
}

fn default_request_timeout() -> Duration {
    Duration::from_secs(30)
}

/// Retry policy settings for page fetches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Attempts per page for transient network errors, the first included.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    /// Linear backoff step: attempt `n` failing waits `n * base_delay`.
    #[serde(default = "default_base_delay", with = "humantime_serde")]
    pub base_delay: Duration,
    /// Fixed wait after an HTTP 429. Never counts as an attempt.
    #[serde(default = "default_rate_limit_cooldown", with = "humantime_serde")]
    pub rate_limit_cooldown: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        RetryConfig {
            max_attempts: default_max_attempts(),
            base_delay: default_base_delay(),
            rate_limit_cooldown: default_rate_limit_cooldown(),
        }
    }
}

fn default_max_attempts() -> u32 {
    5
}

fn default_base_delay() -> Duration {
    Duration::from_secs(10)
}

fn default_rate_limit_cooldown() -> Duration {
    Duration::from_secs(30)
}

impl Config {
    /// Creates a default config for the given shop.
    pub fn new(shop_url: Option<String>) -> Self {
        Config {
            shop: ShopConfig {
                url: shop_url,
                ..ShopConfig::default()
            },
            ..Config::default()
        }
    }

    /// Loads configuration from the given `.ordersync/` directory.
    pub fn load(work_dir: &Path) -> Result<Self> {
        let config_path = work_dir.join(CONFIG_FILE_NAME);
        let content = fs::read_to_string(&config_path)
            .map_err(|e| Error::Config(format!("failed to read config: {}", e)))?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Saves configuration to the given `.ordersync/` directory.
    pub fn save(&self, work_dir: &Path) -> Result<()> {
        let config_path = work_dir.join(CONFIG_FILE_NAME);
        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("failed to serialize config: {}", e)))?;
        fs::write(&config_path, content)?;
        Ok(())
    }

    /// Rejects values the order API or the retry loop cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.shop.page_limit == 0 || self.shop.page_limit > MAX_PAGE_LIMIT {
            return Err(Error::Config(format!(
                "shop.page_limit must be between 1 and {MAX_PAGE_LIMIT}, got {}",
                self.shop.page_limit
            )));
        }
        if self.retry.max_attempts == 0 {
            return Err(Error::Config("retry.max_attempts must be at least 1".into()));
        }
        if self.shop.api_version.trim().is_empty() {
            return Err(Error::Config("shop.api_version cannot be empty".into()));
        }
        Ok(())
    }

    /// The shop base URL, with `ORDERSYNC_SHOP_URL` taking precedence.
    pub fn shop_url(&self) -> Result<Url> {
        let raw = env::shop_url()
            .or_else(|| self.shop.url.clone())
            .ok_or(Error::MissingShopUrl)?;
        normalize_shop_url(&raw)
    }
}

/// Parse a shop host or URL into its base URL.
///
/// A bare host gets `https://`. Any path, query or fragment is dropped.
pub fn normalize_shop_url(raw: &str) -> Result<Url> {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return Err(Error::MissingShopUrl);
    }
    let with_scheme = if trimmed.contains("://") {
        trimmed.to_string()
    } else {
        format!("https://{trimmed}")
    };

    let mut url = Url::parse(&with_scheme).map_err(|e| Error::InvalidShopUrl {
        url: raw.to_string(),
        reason: e.to_string(),
    })?;
    if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
        return Err(Error::InvalidShopUrl {
            url: raw.to_string(),
            reason: "expected an http(s) host".to_string(),
        });
    }
    url.set_path("/");
    url.set_query(None);
    url.set_fragment(None);
    Ok(url)
}

/// API client credentials for the client-credentials token exchange.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub client_id: String,
    pub client_secret: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .finish()
    }
}

impl Credentials {
    /// Reads `ORDERSYNC_CLIENT_ID` and `ORDERSYNC_CLIENT_SECRET`.
    pub fn from_env() -> Result<Self> {
        Ok(Credentials {
            client_id: env::client_id().ok_or(Error::MissingCredential {
                var: env::vars::ORDERSYNC_CLIENT_ID,
            })?,
            client_secret: env::client_secret().ok_or(Error::MissingCredential {
                var: env::vars::ORDERSYNC_CLIENT_SECRET,
            })?,
        })
    }
}

/// Load `.env` from the project root into the process environment.
///
/// Variables already set in the environment win. A missing file is not an error.
pub fn load_dotenv(work_dir: &Path) -> Result<()> {
    let path = project_root(work_dir).join(DOTENV_FILE_NAME);
    if !path.is_file() {
        return Ok(());
    }
    dotenvy::from_path(&path)
        .map_err(|e| Error::Config(format!("failed to load {}: {}", path.display(), e)))?;
    tracing::debug!(path = %path.display(), "loaded environment file");
    Ok(())
}

/// Find the .ordersync directory by walking up from the current directory
pub fn find_work_dir() -> Result<PathBuf> {
    find_work_dir_from(&std::env::current_dir()?)
}

/// Find the .ordersync directory by walking up from `start`
pub fn find_work_dir_from(start: &Path) -> Result<PathBuf> {
    let mut current = start.to_path_buf();
    loop {
        let work_dir = current.join(WORK_DIR_NAME);
        if work_dir.is_dir() {
            return Ok(work_dir);
        }
        if !current.pop() {
            return Err(Error::NotInitialized);
        }
    }
}

/// The directory containing `.ordersync/`.
pub fn project_root(work_dir: &Path) -> &Path {
    work_dir.parent().unwrap_or(work_dir)
}

/// Get the database path from config
pub fn get_db_path(work_dir: &Path, config: &Config) -> PathBuf {
    match &config.database {
        Some(database) => {
            let database_path = Path::new(database);
            if database_path.is_absolute() {
                database_path.to_path_buf()
            } else {
                project_root(work_dir).join(database_path)
            }
        }
        None => work_dir.join(DB_FILE_NAME),
    }
}

/// Path of the file lock held by a running `ordersync watch`.
pub fn get_watch_lock_path(work_dir: &Path) -> PathBuf {
    work_dir.join("watch.lock")
}

/// Initialize a new .ordersync directory at the given path
pub fn init_work_dir(path: &Path, shop_url: Option<&str>) -> Result<PathBuf> {
    let work_dir = path.join(WORK_DIR_NAME);

    if work_dir.exists() {
        return Err(Error::AlreadyInitialized(work_dir.display().to_string()));
    }

    if let Some(url) = shop_url {
        normalize_shop_url(url)?;
    }

    fs::create_dir_all(&work_dir)?;

    let config = Config::new(shop_url.map(String::from));
    config.save(&work_dir)?;
    write_gitignore(&work_dir)?;

    Ok(work_dir)
}

/// Write a .gitignore file to the work directory.
///
/// The database and its WAL files are machine-local state.
pub fn write_gitignore(work_dir: &Path) -> Result<()> {
    let gitignore_path = work_dir.join(GITIGNORE_FILE_NAME);
    let content = "# Local order mirror\norders.db\norders.db-wal\norders.db-shm\n\n# Watch loop lock\nwatch.lock\n";
    fs::write(&gitignore_path, content)?;
    Ok(())
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
