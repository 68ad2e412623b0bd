use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct KindredConfig {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub conversation: ConversationConfig,
    pub memory: MemoryConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub log_level: String,
    pub docs_dir: String,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct StorageConfig {
    pub db_path: String,
}

/// Timing of the simulated conversation turn. All values are milliseconds.
///
/// The defaults reproduce the prototype's feel: a beat of "thinking", a
/// typewriter reveal, and a short hold in the speaking state before the
/// pixel settles back to idle. Tests shrink these to zero.
#[derive(Debug, Deserialize, Clone, Copy)]
#[serde(default)]
pub struct ConversationConfig {
    pub thinking_delay_ms: u64,
    pub reveal_char_delay_ms: u64,
    pub speaking_hold_ms: u64,
    pub welcome_delay_ms: u64,
    pub welcome_hold_ms: u64,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct MemoryConfig {
    /// Install the demonstration graph when no memory data has been persisted yet.
    pub seed_sample: bool,
}

impl Default for KindredConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            storage: StorageConfig::default(),
            conversation: ConversationConfig::default(),
            memory: MemoryConfig::default(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: 3000,
            log_level: "info".into(),
            docs_dir: "docs".into(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        let db_path = default_kindred_dir()
            .join("companion.db")
            .to_string_lossy()
            .into_owned();
        Self { db_path }
    }
}

impl Default for ConversationConfig {
    fn default() -> Self {
        Self {
            thinking_delay_ms: 1500,
            reveal_char_delay_ms: 30,
            speaking_hold_ms: 500,
            welcome_delay_ms: 1000,
            welcome_hold_ms: 2000,
        }
    }
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self { seed_sample: true }
    }
}

/// Returns `~/.kindred/`
pub fn default_kindred_dir() -> PathBuf {
    dirs::home_dir()
        .expect("home directory must exist")
        .join(".kindred")
}

/// Returns the default config file path: `~/.kindred/config.toml`
pub fn default_config_path() -> PathBuf {
    default_kindred_dir().join("config.toml")
}

impl KindredConfig {
    /// Load config from TOML file (if it exists) then apply env var overrides.
    pub fn load() -> Result<Self> {
        Self::load_from(default_config_path())
    }

    /// Load from a specific path, then apply env var overrides.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut config = if path.exists() {
            let contents =
                std::fs::read_to_string(path).context("failed to read config file")?;
            toml::from_str(&contents).context("failed to parse config TOML")?
        } else {
            info!("no config file at {}, using defaults", path.display());
            KindredConfig::default()
        };

        config.apply_env_overrides();
        Ok(config)
    }

    /// Apply environment variable overrides (KINDRED_DB, KINDRED_PORT, KINDRED_LOG_LEVEL).
    fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("KINDRED_DB") {
            self.storage.db_path = val;
        }
        if let Ok(val) = std::env::var("KINDRED_PORT") {
            if let Ok(port) = val.parse() {
                self.server.port = port;
            }
        }
        if let Ok(val) = std::env::var("KINDRED_LOG_LEVEL") {
            self.server.log_level = val;
        }
    }

    /// Resolve the database path, expanding `~` if needed.
    pub fn resolved_db_path(&self) -> PathBuf {
        expand_tilde(&self.storage.db_path)
    }

    /// Resolve the documentation content directory, expanding `~` if needed.
    pub fn resolved_docs_dir(&self) -> PathBuf {
        expand_tilde(&self.server.docs_dir)
    }
}

pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        dirs::home_dir()
            .expect("home directory must exist")
            .join(rest)
    } else {
        PathBuf::from(path)
    }
}
