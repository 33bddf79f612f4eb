use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use secrecy::SecretString;
use serde::{Deserialize, Deserializer};

use crate::duration::deserialize_duration;
use crate::models::BankAccount;

fn default_table() -> String {
    "investments".to_string()
}

fn default_store_timeout() -> Duration {
    Duration::from_secs(10)
}

/// Hosted investments table (Supabase / PostgREST).
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Project URL, e.g. `https://xyz.supabase.co`.
    pub url: Option<String>,

    /// Service or anon key. Prefer `SUPABASE_KEY` over writing it to the file.
    #[serde(deserialize_with = "deserialize_secret")]
    pub key: Option<SecretString>,

    #[serde(default = "default_table")]
    pub table: String,

    #[serde(
        default = "default_store_timeout",
        deserialize_with = "deserialize_duration"
    )]
    pub timeout: Duration,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            url: None,
            key: None,
            table: default_table(),
            timeout: default_store_timeout(),
        }
    }
}

fn default_yahoo_base_url() -> String {
    "https://query1.finance.yahoo.com".to_string()
}

fn default_user_agent() -> String {
    concat!("cartera/", env!("CARGO_PKG_VERSION")).to_string()
}

fn default_market_timeout() -> Duration {
    Duration::from_secs(10)
}

/// Live price lookups.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MarketDataConfig {
    /// When false every lookup reports `0.0`.
    pub enabled: bool,

    #[serde(default = "default_yahoo_base_url")]
    pub yahoo_base_url: String,

    #[serde(
        default = "default_market_timeout",
        deserialize_with = "deserialize_duration"
    )]
    pub timeout: Duration,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for MarketDataConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            yahoo_base_url: default_yahoo_base_url(),
            timeout: default_market_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

fn default_listen_addr() -> String {
    "0.0.0.0:3000".to_string()
}

fn default_cors_origins() -> Vec<String> {
    vec!["*".to_string()]
}

/// HTTP server settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,

    /// `["*"]` allows any origin.
    #[serde(default = "default_cors_origins")]
    pub cors_allow_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_addr(),
            cors_allow_origins: default_cors_origins(),
        }
    }
}

/// Application configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub store: StoreConfig,
    pub market_data: MarketDataConfig,
    pub server: ServerConfig,
    /// Cash accounts reported by the bank summary.
    pub banks: Vec<BankAccount>,
}

impl Config {
    /// Load config from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Load config from a file, or return default config if file doesn't exist.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Override file values from the process environment.
    pub fn apply_env(&mut self) {
        self.apply_env_from(|name| std::env::var(name).ok());
    }

    /// Override file values using `lookup` for `SUPABASE_URL`, `SUPABASE_KEY`
    /// and `CARTERA_LISTEN_ADDR`. Empty values are ignored.
    pub fn apply_env_from(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(url) = get("SUPABASE_URL") {
            self.store.url = Some(url);
        }
        if let Some(key) = get("SUPABASE_KEY") {
            self.store.key = Some(SecretString::from(key));
        }
        if let Some(addr) = get("CARTERA_LISTEN_ADDR") {
            self.server.listen_addr = addr;
        }
    }

    /// URL and key for the hosted store, or an error naming what is missing.
    pub fn store_credentials(&self) -> Result<(&str, &SecretString)> {
        let url = self
            .store
            .url
            .as_deref()
            .filter(|u| !u.trim().is_empty())
            .context("Store URL is not configured (set SUPABASE_URL or [store].url)")?;
        let key = self
            .store
            .key
            .as_ref()
            .context("Store key is not configured (set SUPABASE_KEY or [store].key)")?;
        Ok((url, key))
    }
}

fn deserialize_secret<'de, D>(deserializer: D) -> Result<Option<SecretString>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.map(SecretString::from))
}

/// Returns the default config file path.
///
/// Resolution order:
/// 1. `./cartera.toml` if it exists in current directory
/// 2. `~/.local/share/cartera/cartera.toml` (XDG data directory)
pub fn default_config_path() -> PathBuf {
    let local_config = PathBuf::from("cartera.toml");
    if local_config.exists() {
        return local_config;
    }

    if let Some(data_dir) = dirs::data_dir() {
        return data_dir.join("cartera").join("cartera.toml");
    }

    local_config
}
