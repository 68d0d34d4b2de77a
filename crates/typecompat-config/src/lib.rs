//! Configuration and tracing setup for the `type-compat` tool.
//!
//! Settings come from built-in defaults, then an optional TOML file, then
//! command-line flags (applied by the caller on the returned [`CompatConfig`]).

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::Once;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing_subscriber::prelude::*;
use typecompat_catalog::{CatalogOptions, DuplicatePolicy};
use typecompat_hierarchy::{ResolverOptions, DEFAULT_MAX_VISITED};

/// Environment variable naming a config file when `--config` is not given.
pub const TYPE_COMPAT_CONFIG_ENV_VAR: &str = "TYPE_COMPAT_CONFIG";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CompatConfig {
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub resolver: ResolverConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// A simple level (`warn`, `debug`, ...) or a full `EnvFilter` directive string.
    #[serde(default = "LoggingConfig::default_level")]
    pub level: String,

    /// Emit logs as JSON lines.
    #[serde(default)]
    pub json: bool,
}

impl LoggingConfig {
    fn default_level() -> String {
        "warn".to_owned()
    }

    pub(crate) fn normalize_level_directives(input: &str) -> String {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Self::default_level();
        }

        match trimmed.to_ascii_lowercase().as_str() {
            "trace" => "trace".to_owned(),
            "debug" => "debug".to_owned(),
            "info" => "info".to_owned(),
            "warn" | "warning" => "warn".to_owned(),
            "error" => "error".to_owned(),
            "off" | "quiet" => "off".to_owned(),
            _ => trimmed.to_owned(),
        }
    }

    fn config_env_filter(&self) -> tracing_subscriber::EnvFilter {
        let directives = Self::normalize_level_directives(&self.level);
        tracing_subscriber::EnvFilter::try_new(directives).unwrap_or_else(|_| {
            tracing_subscriber::EnvFilter::default()
                .add_directive(tracing_subscriber::filter::LevelFilter::WARN.into())
        })
    }

    /// The effective filter: the configured level, with `RUST_LOG` merged on top.
    pub fn env_filter(&self) -> tracing_subscriber::EnvFilter {
        self.env_filter_with(std::env::var("RUST_LOG").ok())
    }

    fn env_filter_with(&self, rust_log: Option<String>) -> tracing_subscriber::EnvFilter {
        let env_directives = rust_log
            .map(|value| value.trim().to_owned())
            .filter(|value| !value.is_empty());
        let config_directives = Self::normalize_level_directives(&self.level);

        match env_directives {
            Some(env_directives) => {
                let combined = format!("{config_directives},{env_directives}");
                tracing_subscriber::EnvFilter::try_new(combined)
                    .or_else(|_| tracing_subscriber::EnvFilter::try_new(env_directives))
                    .unwrap_or_else(|_| self.config_env_filter())
            }
            None => self.config_env_filter(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: Self::default_level(),
            json: false,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DuplicateMode {
    #[default]
    LastWins,
    Error,
}

impl From<DuplicateMode> for DuplicatePolicy {
    fn from(mode: DuplicateMode) -> Self {
        match mode {
            DuplicateMode::LastWins => DuplicatePolicy::LastWins,
            DuplicateMode::Error => DuplicatePolicy::Error,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CatalogConfig {
    /// Seed the catalog with the built-in `java.base` slice.
    #[serde(default = "CatalogConfig::default_stdlib_stub")]
    pub stdlib_stub: bool,

    #[serde(default)]
    pub duplicates: DuplicateMode,
}

impl CatalogConfig {
    fn default_stdlib_stub() -> bool {
        true
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            stdlib_stub: Self::default_stdlib_stub(),
            duplicates: DuplicateMode::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ResolverConfig {
    /// Maximum number of types expanded for a single query.
    #[serde(default = "ResolverConfig::default_max_visited")]
    pub max_visited: usize,
}

impl ResolverConfig {
    fn default_max_visited() -> usize {
        DEFAULT_MAX_VISITED
    }
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            max_visited: Self::default_max_visited(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse toml config: {0}")]
    Toml(String),
    #[error("invalid config: {0}")]
    Invalid(String),
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        // The default `Display` quotes the offending input; keep only the message.
        ConfigError::Toml(err.message().to_owned())
    }
}

impl CompatConfig {
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::load_from_str(&text)
    }

    pub fn load_from_str(text: &str) -> Result<Self, ConfigError> {
        let config: CompatConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load the file named by `explicit`, falling back to
    /// [`TYPE_COMPAT_CONFIG_ENV_VAR`], then to defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        match config_path(explicit, std::env::var_os(TYPE_COMPAT_CONFIG_ENV_VAR)) {
            Some(path) => Self::load_from_path(path),
            None => Ok(Self::default()),
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.resolver.max_visited == 0 {
            return Err(ConfigError::Invalid(
                "resolver.max_visited must be at least 1".to_owned(),
            ));
        }
        Ok(())
    }

    pub fn catalog_options(&self) -> CatalogOptions {
        CatalogOptions {
            include_stdlib_stub: self.catalog.stdlib_stub,
            duplicates: self.catalog.duplicates.into(),
        }
    }

    pub fn resolver_options(&self) -> ResolverOptions {
        ResolverOptions {
            max_visited: self.resolver.max_visited,
        }
    }
}

fn config_path(explicit: Option<&Path>, env_value: Option<OsString>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }
    env_value
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
}

static TRACING_INIT: Once = Once::new();

/// Install the global subscriber, writing to stderr.
///
/// Only the first call has any effect.
pub fn init_tracing(config: &LoggingConfig) {
    TRACING_INIT.call_once(|| {
        let filter = config.env_filter();
        let layer: Box<dyn tracing_subscriber::Layer<_> + Send + Sync> = if config.json {
            tracing_subscriber::fmt::layer()
                .json()
                .with_writer(std::io::stderr)
                .with_ansi(false)
                .boxed()
        } else {
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(false)
                .with_target(true)
                .boxed()
        };

        let subscriber = tracing_subscriber::registry().with(filter).with(layer);
        if tracing::subscriber::set_global_default(subscriber).is_err() {
            tracing::debug!(
                target: "typecompat.config",
                "a global tracing subscriber is already installed"
            );
        }
    });
}
