use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

const CONFIG_ENV: &str = "SEARCH_CORE_CONFIG";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Defaults, then one config file, then environment overrides.
    ///
    /// The file is `explicit_path`, else `$SEARCH_CORE_CONFIG`, else
    /// `<config dir>/search-core/config.toml`. A missing file is not an error.
    ///
    /// # Errors
    ///
    /// `INTERNAL` if the file cannot be read or parsed, or an environment
    /// override holds an invalid value.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        let mut config = Self::default();

        let path = explicit_path
            .map(PathBuf::from)
            .or_else(|| std::env::var(CONFIG_ENV).ok().map(PathBuf::from))
            .or_else(global_config_path);

        if let Some(path) = path {
            if let Some(patch) = Self::load_patch(&path)? {
                config.merge_patch(patch);
            }
        }

        config.apply_env_overrides()?;

        Ok(config)
    }

    /// Defaults overlaid with a single file, no environment.
    ///
    /// # Errors
    ///
    /// `INTERNAL` if the file exists but cannot be read or parsed.
    pub fn load_file(path: &Path) -> Result<Self> {
        let mut config = Self::default();
        if let Some(patch) = Self::load_patch(path)? {
            config.merge_patch(patch);
        }
        Ok(config)
    }

    fn load_patch(path: &Path) -> Result<Option<ConfigPatch>> {
        if !path.exists() {
            return Ok(None);
        }

        let raw = std::fs::read_to_string(path)
            .map_err(|err| AppError::internal(format!("read config {}: {err}", path.display())))?;
        let patch = toml::from_str(&raw)
            .map_err(|err| AppError::internal(format!("parse config {}: {err}", path.display())))?;
        Ok(Some(patch))
    }

    fn merge_patch(&mut self, patch: ConfigPatch) {
        if let Some(patch) = patch.search {
            self.search.merge(patch);
        }
        if let Some(patch) = patch.logging {
            self.logging.merge(patch);
        }
    }

    fn apply_env_overrides(&mut self) -> Result<()> {
        if let Some(value) = env_bool("SEARCH_CORE_LOG_QUERY_TEXT") {
            self.search.log_query_text = value;
        }
        if let Some(value) = env_string("SEARCH_CORE_LOG") {
            self.logging.filter = value;
        }
        if let Some(value) = env_string("SEARCH_CORE_LOG_FORMAT") {
            self.logging.format = parse_log_format(&value)
                .map_err(|err| AppError::internal(format!("invalid SEARCH_CORE_LOG_FORMAT: {err}")))?;
        }
        Ok(())
    }
}

fn global_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("search-core/config.toml"))
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Include the raw query text in debug logs.
    #[serde(default)]
    pub log_query_text: bool,
}

impl SearchConfig {
    fn merge(&mut self, patch: SearchPatch) {
        if let Some(value) = patch.log_query_text {
            self.log_query_text = value;
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// `EnvFilter` directives, used when `RUST_LOG` is unset.
    #[serde(default = "default_log_filter")]
    pub filter: String,
    #[serde(default)]
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
            format: LogFormat::Text,
        }
    }
}

impl LoggingConfig {
    fn merge(&mut self, patch: LoggingPatch) {
        if let Some(value) = patch.filter {
            self.filter = value;
        }
        if let Some(value) = patch.format {
            self.format = value;
        }
    }
}

fn default_log_filter() -> String {
    "warn,search_core=info".to_string()
}

#[derive(Debug, Clone, Default, Deserialize)]
struct ConfigPatch {
    pub search: Option<SearchPatch>,
    pub logging: Option<LoggingPatch>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct SearchPatch {
    pub log_query_text: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct LoggingPatch {
    pub filter: Option<String>,
    pub format: Option<LogFormat>,
}

fn parse_log_format(value: &str) -> std::result::Result<LogFormat, String> {
    match value.trim().to_lowercase().as_str() {
        "text" | "pretty" | "human" => Ok(LogFormat::Text),
        "json" => Ok(LogFormat::Json),
        other => Err(format!("{other} (expected text|json)")),
    }
}

fn parse_bool(value: &str) -> bool {
    matches!(value.to_lowercase().as_str(), "1" | "true" | "yes" | "on")
}

fn env_string(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

fn env_bool(key: &str) -> Option<bool> {
    std::env::var(key).ok().map(|value| parse_bool(&value))
}
