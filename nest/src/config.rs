//! Service configuration loaded from `nest.toml`.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::store::{MemoryStore, PropertyStore, RedisStore, read_seed_file};

pub const DEFAULT_CONFIG_FILE: &str = "nest.toml";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NestConfig {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub store: StoreSettings,
    #[serde(default)]
    pub redis: RedisSettings,
    #[serde(default)]
    pub cors: CorsSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "localhost".to_string()
}

fn default_port() -> u16 {
    5000
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    #[default]
    Memory,
    Redis,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreSettings {
    #[serde(default)]
    pub backend: StoreBackend,
    #[serde(default = "default_prefix")]
    pub prefix: String,
    /// JSON seed loaded into the memory backend at startup.
    #[serde(default)]
    pub seed_file: Option<PathBuf>,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            backend: StoreBackend::default(),
            prefix: default_prefix(),
            seed_file: None,
        }
    }
}

fn default_prefix() -> String {
    "hn".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedisSettings {
    #[serde(default = "default_redis_url")]
    pub url: String,
}

impl Default for RedisSettings {
    fn default() -> Self {
        Self {
            url: default_redis_url(),
        }
    }
}

fn default_redis_url() -> String {
    "${REDIS_URL}".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsSettings {
    /// Only this origin may call the API from a browser. Unset disables CORS headers.
    #[serde(default = "default_frontend_url")]
    pub frontend_url: Option<String>,
}

impl Default for CorsSettings {
    fn default() -> Self {
        Self {
            frontend_url: default_frontend_url(),
        }
    }
}

fn default_frontend_url() -> Option<String> {
    Some("${FRONTEND_URL}".to_string())
}

impl NestConfig {
    /// Load configuration from `path`. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let mut config = if path.exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            let mut config = toml::from_str::<NestConfig>(&content)
                .with_context(|| format!("Failed to parse {}", path.display()))?;
            config.resolve_relative_paths(path);
            config
        } else {
            log::debug!("no config at {}, using defaults", path.display());
            NestConfig::default()
        };
        config.apply_env_overrides();
        Ok(config)
    }

    /// Relative `seed_file` paths are relative to the directory holding the config file.
    fn resolve_relative_paths(&mut self, config_path: &Path) {
        if let Some(seed_file) = &self.store.seed_file
            && seed_file.is_relative()
            && let Some(dir) = config_path.parent()
        {
            self.store.seed_file = Some(dir.join(seed_file));
        }
    }

    /// `HOST` and `PORT` take precedence over the file.
    fn apply_env_overrides(&mut self) {
        if let Ok(host) = std::env::var("HOST")
            && !host.trim().is_empty()
        {
            self.server.host = host;
        }
        if let Ok(port) = std::env::var("PORT") {
            match port.trim().parse::<u16>() {
                Ok(port) => self.server.port = port,
                Err(_) => log::warn!("ignoring invalid PORT value {port:?}"),
            }
        }
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Get the Redis URL, expanding environment variables.
    pub fn redis_url(&self) -> Result<String> {
        expand_env(&self.redis.url)
    }

    /// The allowed browser origin, if configured and its variable is set.
    pub fn frontend_url(&self) -> Option<String> {
        let raw = self.cors.frontend_url.as_deref()?;
        expand_env(raw).ok().filter(|url| !url.trim().is_empty())
    }

    /// Build the configured store backend, seeding the memory backend when a seed file is set.
    pub async fn open_store(&self) -> Result<PropertyStore> {
        let store = match self.store.backend {
            StoreBackend::Memory => {
                let store = PropertyStore::Memory(MemoryStore::new());
                if let Some(seed_file) = &self.store.seed_file {
                    let records = read_seed_file(seed_file)
                        .await
                        .with_context(|| format!("Failed to load seed file {}", seed_file.display()))?;
                    store.seed(records).await.context("Seed file contains an invalid listing")?;
                }
                store
            }
            StoreBackend::Redis => {
                let url = self.redis_url()?;
                let store = RedisStore::connect(&url, self.store.prefix.clone())
                    .await
                    .context("Failed to connect to Redis")?;
                PropertyStore::Redis(store)
            }
        };
        store.ensure_ready().await.context("Failed to prepare the listing store")?;
        Ok(store)
    }
}

/// Expand a value of the form `${VAR}` from the environment; other values pass through.
pub fn expand_env(value: &str) -> Result<String> {
    if value.starts_with("${") && value.ends_with('}') {
        let var_name = &value[2..value.len() - 1];
        std::env::var(var_name).with_context(|| format!("Environment variable {var_name} not set"))
    } else {
        Ok(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = NestConfig::default();
        assert_eq!(config.server.host, "localhost");
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.store.backend, StoreBackend::Memory);
        assert_eq!(config.store.prefix, "hn");
        assert_eq!(config.redis.url, "${REDIS_URL}");
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config: NestConfig = toml::from_str(
            r#"
            [store]
            backend = "redis"

            [server]
            port = 8080
            "#,
        )
        .unwrap();
        assert_eq!(config.store.backend, StoreBackend::Redis);
        assert_eq!(config.store.prefix, "hn");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host, "localhost");
    }

    #[test]
    fn test_config_serialization() {
        let toml_str = toml::to_string_pretty(&NestConfig::default()).unwrap();
        assert!(toml_str.contains("backend = \"memory\""));
        assert!(toml_str.contains("port = 5000"));
    }

    #[test]
    fn test_expand_env_passthrough() {
        assert_eq!(expand_env("redis://127.0.0.1:6379").unwrap(), "redis://127.0.0.1:6379");
        assert!(expand_env("${NEST_TEST_SURELY_UNSET_VARIABLE}").is_err());
    }

    #[test]
    fn test_literal_frontend_url() {
        let mut config = NestConfig::default();
        config.cors.frontend_url = Some("http://localhost:3000".to_string());
        assert_eq!(config.frontend_url().as_deref(), Some("http://localhost:3000"));
        config.cors.frontend_url = None;
        assert_eq!(config.frontend_url(), None);
    }
}
