use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};
use serde::Deserialize;

/// Config file consulted when neither `--config` nor `CONFIG_PATH` is given.
pub const DEFAULT_CONFIG_FILE: &str = "ingest.toml";

#[derive(Debug, Clone, Deserialize, Default)]
pub struct IngestConfig {
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub event: EventConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    #[serde(default = "default_store_path")]
    pub path: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self { Self { path: default_store_path() } }
}

#[derive(Debug, Clone, Deserialize)]
pub struct EventConfig {
    /// Name of the environment variable holding the event document path.
    #[serde(default = "default_event_env")]
    pub path_env: String,
}

impl Default for EventConfig {
    fn default() -> Self { Self { path_env: default_event_env() } }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    #[serde(default = "default_enforce_trip_key")]
    pub enforce_trip_key: bool,
}

impl Default for AuthConfig {
    fn default() -> Self { Self { enforce_trip_key: default_enforce_trip_key() } }
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct LoggingConfig {
    #[serde(default)]
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

impl std::str::FromStr for LogFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "compact" => Ok(LogFormat::Compact),
            "json" => Ok(LogFormat::Json),
            other => Err(anyhow!("unknown log format `{other}` (expected compact|json)")),
        }
    }
}

fn default_store_path() -> PathBuf { PathBuf::from("data/posts.json") }
fn default_event_env() -> String { "GITHUB_EVENT_PATH".to_string() }
fn default_enforce_trip_key() -> bool { true }

/// Load configuration from `CONFIG_PATH`, falling back to `ingest.toml`.
/// A missing default file yields built-in defaults; an explicitly named
/// file must exist.
pub fn load_default() -> Result<IngestConfig> {
    match std::env::var("CONFIG_PATH") {
        Ok(path) => load_from_file(&path),
        Err(_) => load_optional(DEFAULT_CONFIG_FILE),
    }
}

pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<IngestConfig> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)
        .map_err(|e| anyhow!("cannot read config {}: {e}", path.display()))?;
    parse(&content)
}

fn load_optional<P: AsRef<Path>>(path: P) -> Result<IngestConfig> {
    if path.as_ref().exists() {
        load_from_file(path)
    } else {
        Ok(IngestConfig::default())
    }
}

pub fn parse(content: &str) -> Result<IngestConfig> {
    let cfg: IngestConfig = toml::from_str(content)?;
    Ok(cfg)
}

impl IngestConfig {
    /// Load from `explicit` when given, else from the default location,
    /// then apply environment overrides and validate.
    pub fn load_and_validate(explicit: Option<&Path>) -> Result<Self> {
        let mut cfg = match explicit {
            Some(path) => load_from_file(path)?,
            None => load_default()?,
        };
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        self.apply_env_overrides(|key| std::env::var(key).ok())?;
        self.validate()
    }

    /// Override fields from `POSTS_PATH` and `INGEST_LOG_FORMAT`.
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = lookup("POSTS_PATH").filter(|p| !p.trim().is_empty()) {
            self.store.path = PathBuf::from(path);
        }
        if let Some(format) = lookup("INGEST_LOG_FORMAT") {
            self.logging.format = format.parse()?;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.store.path.as_os_str().is_empty() || self.store.path.to_string_lossy().trim().is_empty() {
            return Err(anyhow!("store.path must not be empty"));
        }
        if self.event.path_env.trim().is_empty() {
            return Err(anyhow!("event.path_env must name an environment variable"));
        }
        Ok(())
    }
}
