//! Registry configuration
//!
//! Declares sources in a TOML file instead of code:
//!
//! ```toml
//! allow_cache = true
//!
//! [sources.A]
//! kind = "static"
//! value = { UserId = 100 }
//!
//! [sources.B]
//! kind = "file"
//! path = "user.json"
//! ```
//!
//! ## Priority Order (highest to lowest)
//!
//! 1. Environment variable `BIGMODEL_ALLOW_CACHE`
//! 2. Config file
//! 3. Defaults (`allow_cache = false`, no sources)

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{BindError, Result};
use crate::factory::SourceFactory;
use crate::registry::FactoryRegistry;
use crate::source::Source;

/// Environment variable overriding `allow_cache`
pub const ALLOW_CACHE_ENV: &str = "BIGMODEL_ALLOW_CACHE";

/// Top-level registry configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegistryConfig {
    #[serde(default)]
    pub allow_cache: bool,

    /// Sources by name
    #[serde(default)]
    pub sources: BTreeMap<String, SourceConfig>,
}

/// One declared source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SourceConfig {
    /// A fixed record, resolved once at bind time
    Static { value: Value },
    /// A JSON file, read again every time the factory produces
    File { path: PathBuf },
}

impl RegistryConfig {
    /// Parse a TOML document
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| BindError::ConfigError {
            reason: format!("Failed to parse config: {}", e),
        })
    }

    /// Load a config file
    ///
    /// Relative `file` source paths are resolved against the config file's
    /// directory.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| BindError::ConfigError {
            reason: format!("Failed to read config file {}: {}", path.display(), e),
        })?;
        let mut config = Self::from_toml_str(&content)?;
        if let Some(base) = path.parent() {
            config.resolve_paths(base);
        }
        debug!(path = %path.display(), sources = config.sources.len(), "config loaded");
        Ok(config)
    }

    /// Apply the `BIGMODEL_ALLOW_CACHE` override, if set
    pub fn with_env(self) -> Result<Self> {
        match std::env::var(ALLOW_CACHE_ENV) {
            Ok(raw) => self.with_allow_cache_override(&raw),
            Err(_) => Ok(self),
        }
    }

    fn with_allow_cache_override(mut self, raw: &str) -> Result<Self> {
        self.allow_cache = parse_flag(raw).ok_or_else(|| BindError::ConfigError {
            reason: format!("{} must be true/false/1/0, got '{}'", ALLOW_CACHE_ENV, raw),
        })?;
        Ok(self)
    }

    fn resolve_paths(&mut self, base: &Path) {
        for source in self.sources.values_mut() {
            if let SourceConfig::File { path } = source {
                if path.is_relative() {
                    *path = base.join(&*path);
                }
            }
        }
    }

    /// Build a registry from this config
    pub fn into_registry(self) -> FactoryRegistry {
        self.sources.into_iter().fold(
            FactoryRegistry::new().set_allow_cache(self.allow_cache),
            |registry, (name, source)| registry.with(name, source.into_factory()),
        )
    }
}

impl SourceConfig {
    fn into_factory(self) -> SourceFactory {
        match self {
            SourceConfig::Static { value } => SourceFactory::from_source(value),
            SourceConfig::File { path } => {
                SourceFactory::from_producer(move || read_json(&path))
            }
        }
    }
}

impl FactoryRegistry {
    /// Build a registry from a config
    pub fn from_config(config: RegistryConfig) -> Self {
        config.into_registry()
    }
}

/// Unreadable or malformed files produce an unavailable source carrying
/// the path and cause
fn read_json(path: &Path) -> Source {
    let parsed = fs::read_to_string(path)
        .map_err(|e| e.to_string())
        .and_then(|content| serde_json::from_str::<Value>(&content).map_err(|e| e.to_string()));
    match parsed {
        Ok(value) => Source::record(value),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "failed to read file source");
            Source::unavailable(format!("{}: {}", path.display(), e))
        }
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" => Some(true),
        "false" | "0" => Some(false),
        _ => None,
    }
}
