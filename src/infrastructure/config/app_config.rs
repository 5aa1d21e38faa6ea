//! Application configuration.

use std::path::PathBuf;
use std::time::Duration;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use super::args::CliArgs;
use crate::application::ResolverConfig;

pub(crate) const APP_NAME: &str = "avatar-resolver";
pub(crate) const APP_QUALIFIER: &str = "com";
pub(crate) const APP_ORGANIZATION: &str = "linuxmobile";

const CACHE_FILE_NAME: &str = "avatar-cache.json";

/// Log level configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Trace level.
    Trace,
    /// Debug level.
    Debug,
    /// Info level.
    #[default]
    Info,
    /// Warning level.
    Warn,
    /// Error level.
    Error,
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Trace => write!(f, "trace"),
            Self::Debug => write!(f, "debug"),
            Self::Info => write!(f, "info"),
            Self::Warn => write!(f, "warn"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// Application configuration, read from `config.toml` and overridden by CLI
/// flags.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Log file path.
    #[serde(skip)]
    pub log_path: Option<PathBuf>,

    /// Log verbosity level.
    #[serde(default)]
    pub log_level: LogLevel,

    /// Resolution settings.
    #[serde(default)]
    pub resolver: ResolverSection,

    /// Storage settings.
    #[serde(default)]
    pub storage: StorageSection,
}

/// `[resolver]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolverSection {
    /// Deadline for one provider probe, in milliseconds.
    #[serde(default = "default_probe_timeout_ms")]
    pub probe_timeout_ms: u64,

    /// Hours a cached provider stays a priming hint.
    #[serde(default = "default_freshness_hours")]
    pub freshness_hours: u64,

    /// Avatar edge length used when none is given.
    #[serde(default = "default_size")]
    pub default_size: u32,

    /// Render the outer skin layer by default.
    #[serde(default = "default_true")]
    pub overlay: bool,
}

impl Default for ResolverSection {
    fn default() -> Self {
        Self {
            probe_timeout_ms: default_probe_timeout_ms(),
            freshness_hours: default_freshness_hours(),
            default_size: default_size(),
            overlay: true,
        }
    }
}

impl ResolverSection {
    /// Converts to the resolver's runtime configuration.
    #[must_use]
    pub const fn to_resolver_config(&self) -> ResolverConfig {
        ResolverConfig {
            probe_timeout: Duration::from_millis(self.probe_timeout_ms),
            freshness_window: Duration::from_secs(self.freshness_hours.saturating_mul(60 * 60)),
        }
    }
}

/// `[storage]` section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageSection {
    /// Preference cache file. Defaults to the platform data directory.
    #[serde(default)]
    pub cache_path: Option<PathBuf>,

    /// Keep the preference cache in memory only.
    #[serde(default)]
    pub ephemeral: bool,
}

const fn default_probe_timeout_ms() -> u64 {
    3000
}

const fn default_freshness_hours() -> u64 {
    24
}

const fn default_size() -> u32 {
    64
}

const fn default_true() -> bool {
    true
}

impl AppConfig {
    /// Merges CLI arguments into the configuration.
    pub fn merge_with_args(&mut self, args: &CliArgs) {
        if let Some(log_path) = &args.log_path {
            self.log_path = Some(log_path.clone());
        }
        if let Some(log_level) = args.log_level {
            self.log_level = log_level;
        }
        if let Some(timeout) = args.probe_timeout_ms {
            self.resolver.probe_timeout_ms = timeout;
        }
        if let Some(hours) = args.freshness_hours {
            self.resolver.freshness_hours = hours;
        }
        if let Some(cache_path) = &args.cache_path {
            self.storage.cache_path = Some(cache_path.clone());
        }
        if args.ephemeral {
            self.storage.ephemeral = true;
        }
    }

    /// Returns default preference cache path.
    #[must_use]
    pub fn default_cache_path() -> PathBuf {
        ProjectDirs::from(APP_QUALIFIER, APP_ORGANIZATION, APP_NAME).map_or_else(
            || std::env::temp_dir().join(APP_NAME).join(CACHE_FILE_NAME),
            |dirs| dirs.data_dir().join(CACHE_FILE_NAME),
        )
    }

    /// Returns effective log path. Logging goes to a file only when a path
    /// was configured.
    #[must_use]
    pub fn effective_log_path(&self) -> Option<PathBuf> {
        self.log_path.clone()
    }

    /// Returns effective preference cache path.
    #[must_use]
    pub fn effective_cache_path(&self) -> PathBuf {
        self.storage
            .cache_path
            .clone()
            .unwrap_or_else(Self::default_cache_path)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_path: None,
            log_level: LogLevel::Info,
            resolver: ResolverSection::default(),
            storage: StorageSection::default(),
        }
    }
}
