//! # Cart Configuration
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     ROCKETSHOES_API_URL=http://localhost:3333                          │
//! │     ROCKETSHOES_CATALOG=remote | fixture                               │
//! │     ROCKETSHOES_FIXTURE=./fixtures/server.json                         │
//! │     ROCKETSHOES_TIMEOUT_SECS=10                                        │
//! │     ROCKETSHOES_DATA_DIR=/var/lib/rocketshoes                          │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     --config PATH, or                                                  │
//! │     ~/.config/rocketshoes/cart.toml (Linux)                            │
//! │     ~/Library/Application Support/com.rocketshoes.rocketshoes/...      │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     remote catalog at http://localhost:3333, no timeout,               │
//! │     key "@RocketShoes:cart" in the platform data dir                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # cart.toml
//! [api]
//! catalog = "remote"   # remote | fixture
//! base_url = "http://localhost:3333"
//! timeout_secs = 10
//! fixture_path = "fixtures/server.json"
//!
//! [storage]
//! data_dir = "/var/lib/rocketshoes"
//! cart_key = "@RocketShoes:cart"
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use rocketshoes_core::{CART_STORAGE_KEY, DEFAULT_API_URL};

use crate::error::{StoreError, StoreResult};

const DATABASE_FILE: &str = "cart.db";

// =============================================================================
// Catalog Source
// =============================================================================

/// Where product and stock lookups are answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CatalogSource {
    /// HTTP catalog at `base_url`.
    #[default]
    Remote,

    /// In-process catalog read from `fixture_path`.
    Fixture,
}

impl std::fmt::Display for CatalogSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CatalogSource::Remote => write!(f, "remote"),
            CatalogSource::Fixture => write!(f, "fixture"),
        }
    }
}

impl std::str::FromStr for CatalogSource {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "remote" | "http" => Ok(CatalogSource::Remote),
            "fixture" | "offline" => Ok(CatalogSource::Fixture),
            other => Err(StoreError::InvalidConfig(format!(
                "Unknown catalog source: '{}'. Valid options: remote, fixture",
                other
            ))),
        }
    }
}

// =============================================================================
// API Settings
// =============================================================================

/// Catalog access settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiSettings {
    /// Which catalog backend to use.
    #[serde(default)]
    pub catalog: CatalogSource,

    /// Base URL of the remote catalog.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout. Unset means wait indefinitely.
    #[serde(default)]
    pub timeout_secs: Option<u64>,

    /// Fixture document for `catalog = "fixture"`.
    #[serde(default)]
    pub fixture_path: Option<PathBuf>,
}

fn default_base_url() -> String {
    DEFAULT_API_URL.to_string()
}

impl Default for ApiSettings {
    fn default() -> Self {
        ApiSettings {
            catalog: CatalogSource::default(),
            base_url: default_base_url(),
            timeout_secs: None,
            fixture_path: None,
        }
    }
}

impl ApiSettings {
    /// Request timeout as a Duration.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

// =============================================================================
// Storage Settings
// =============================================================================

/// Snapshot persistence settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageSettings {
    /// Directory holding the cart database. Defaults to the platform data dir.
    #[serde(default)]
    pub data_dir: Option<PathBuf>,

    /// Key the snapshot is stored under.
    #[serde(default = "default_cart_key")]
    pub cart_key: String,
}

fn default_cart_key() -> String {
    CART_STORAGE_KEY.to_string()
}

impl Default for StorageSettings {
    fn default() -> Self {
        StorageSettings {
            data_dir: None,
            cart_key: default_cart_key(),
        }
    }
}

// =============================================================================
// Main Configuration
// =============================================================================

/// Complete cart configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CartConfig {
    #[serde(default)]
    pub api: ApiSettings,

    #[serde(default)]
    pub storage: StorageSettings,
}

impl CartConfig {
    /// Creates a config with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (cart.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> StoreResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading cart config from file");
                let contents = std::fs::read_to_string(&path)
                    .map_err(|e| StoreError::ConfigLoadFailed(format!("{}: {}", path.display(), e)))?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_overrides(|name| std::env::var(name).ok());
        config.validate()?;

        Ok(config)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> StoreResult<()> {
        let url = url::Url::parse(&self.api.base_url)?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(StoreError::InvalidConfig(format!(
                "API URL must start with http:// or https://, got: {}",
                self.api.base_url
            )));
        }

        if self.api.timeout_secs == Some(0) {
            return Err(StoreError::InvalidConfig(
                "timeout_secs must be greater than 0".into(),
            ));
        }

        if self.api.catalog == CatalogSource::Fixture && self.api.fixture_path.is_none() {
            return Err(StoreError::InvalidConfig(
                "catalog = \"fixture\" requires fixture_path".into(),
            ));
        }

        if self.storage.cart_key.trim().is_empty() {
            return Err(StoreError::InvalidConfig("cart_key must not be empty".into()));
        }

        Ok(())
    }

    /// Applies overrides from a variable lookup (the process environment in
    /// [`load`](Self::load)).
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("ROCKETSHOES_API_URL") {
            debug!(url = %url, "Overriding API URL from environment");
            self.api.base_url = url;
        }

        if let Some(source) = lookup("ROCKETSHOES_CATALOG") {
            match source.parse() {
                Ok(parsed) => self.api.catalog = parsed,
                Err(_) => warn!(source = %source, "Unknown catalog source in environment"),
            }
        }

        if let Some(path) = lookup("ROCKETSHOES_FIXTURE") {
            self.api.fixture_path = Some(PathBuf::from(path));
        }

        if let Some(secs) = lookup("ROCKETSHOES_TIMEOUT_SECS") {
            match secs.parse::<u64>() {
                Ok(s) => self.api.timeout_secs = Some(s),
                Err(_) => warn!(value = %secs, "Ignoring non-numeric ROCKETSHOES_TIMEOUT_SECS"),
            }
        }

        if let Some(dir) = lookup("ROCKETSHOES_DATA_DIR") {
            debug!(dir = %dir, "Overriding data dir from environment");
            self.storage.data_dir = Some(PathBuf::from(dir));
        }
    }

    /// Returns the default config file path.
    pub fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "rocketshoes", "rocketshoes")
            .map(|dirs| dirs.config_dir().join("cart.toml"))
    }

    /// Path of the SQLite file backing the cart slot.
    pub fn database_path(&self) -> StoreResult<PathBuf> {
        if let Some(dir) = &self.storage.data_dir {
            return Ok(dir.join(DATABASE_FILE));
        }

        directories::ProjectDirs::from("com", "rocketshoes", "rocketshoes")
            .map(|dirs| dirs.data_dir().join(DATABASE_FILE))
            .ok_or_else(|| StoreError::InvalidConfig("No data directory available; set storage.data_dir".into()))
    }

    /// Fixture path, resolved against `base` when relative.
    pub fn fixture_path(&self, base: &Path) -> Option<PathBuf> {
        self.api.fixture_path.as_ref().map(|p| {
            if p.is_absolute() {
                p.clone()
            } else {
                base.join(p)
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config() {
        let config = CartConfig::default();
        assert_eq!(config.api.base_url, "http://localhost:3333");
        assert_eq!(config.api.catalog, CatalogSource::Remote);
        assert_eq!(config.api.timeout(), None);
        assert_eq!(config.storage.cart_key, "@RocketShoes:cart");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_catalog_source_parsing() {
        assert_eq!("remote".parse::<CatalogSource>().unwrap(), CatalogSource::Remote);
        assert_eq!("OFFLINE".parse::<CatalogSource>().unwrap(), CatalogSource::Fixture);
        assert!("carrier-pigeon".parse::<CatalogSource>().is_err());
    }

    #[test]
    fn test_config_validation() {
        let mut config = CartConfig::default();

        config.api.base_url = "ftp://example.com".to_string();
        assert!(config.validate().is_err());

        config.api.base_url = "not a url".to_string();
        assert!(config.validate().is_err());

        config.api.base_url = "https://api.example.com/v1".to_string();
        assert!(config.validate().is_ok());

        config.api.timeout_secs = Some(0);
        assert!(config.validate().is_err());
        config.api.timeout_secs = Some(3);

        config.api.catalog = CatalogSource::Fixture;
        assert!(config.validate().is_err());
        config.api.fixture_path = Some(PathBuf::from("server.json"));
        assert!(config.validate().is_ok());

        config.storage.cart_key = " ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_overrides() {
        let env: HashMap<&str, &str> = [
            ("ROCKETSHOES_API_URL", "http://catalog:8080"),
            ("ROCKETSHOES_CATALOG", "fixture"),
            ("ROCKETSHOES_FIXTURE", "/srv/server.json"),
            ("ROCKETSHOES_TIMEOUT_SECS", "7"),
            ("ROCKETSHOES_DATA_DIR", "/tmp/rocketshoes"),
        ]
        .into_iter()
        .collect();

        let mut config = CartConfig::default();
        config.apply_overrides(|name| env.get(name).map(|v| v.to_string()));

        assert_eq!(config.api.base_url, "http://catalog:8080");
        assert_eq!(config.api.catalog, CatalogSource::Fixture);
        assert_eq!(config.api.timeout(), Some(Duration::from_secs(7)));
        assert_eq!(
            config.database_path().unwrap(),
            PathBuf::from("/tmp/rocketshoes").join("cart.db")
        );
        assert_eq!(
            config.fixture_path(Path::new("/ignored")),
            Some(PathBuf::from("/srv/server.json"))
        );
    }

    #[test]
    fn test_bad_timeout_override_is_ignored() {
        let mut config = CartConfig::default();
        config.apply_overrides(|name| (name == "ROCKETSHOES_TIMEOUT_SECS").then(|| "soon".to_string()));
        assert_eq!(config.api.timeout_secs, None);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cart.toml");
        std::fs::write(
            &path,
            "[api]\ntimeout_secs = 15\n\n[storage]\ncart_key = \"test:cart\"\n",
        )
        .unwrap();

        let config = CartConfig::load(Some(path)).unwrap();
        assert_eq!(config.api.timeout_secs, Some(15));
        assert_eq!(config.storage.cart_key, "test:cart");
    }

    #[test]
    fn test_load_rejects_malformed_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cart.toml");
        std::fs::write(&path, "[api\nbase_url = ").unwrap();

        assert!(matches!(
            CartConfig::load(Some(path)),
            Err(StoreError::ConfigLoadFailed(_))
        ));
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config: CartConfig = toml::from_str("[api]\ntimeout_secs = 2\n").unwrap();
        assert_eq!(config.api.base_url, "http://localhost:3333");
        assert_eq!(config.storage.cart_key, "@RocketShoes:cart");
    }
}
