use super::app_config::LogLevel;
use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "avatar-resolver",
    version,
    about = "Resolve a player identity to an avatar URL",
    long_about = None
)]
pub struct CliArgs {
    /// Player identity (UUID).
    #[arg(value_name = "IDENTITY")]
    pub identity: String,

    /// Display name used for the placeholder glyph.
    #[arg(short, long, default_value = "")]
    pub label: String,

    /// Avatar size in pixels.
    #[arg(short, long)]
    pub size: Option<u32>,

    /// Render without the outer skin layer.
    #[arg(long)]
    pub no_overlay: bool,

    /// Drop all cached provider preferences before resolving.
    #[arg(long)]
    pub clear_cache: bool,

    /// Configuration file path.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Log file path.
    #[arg(long, value_name = "PATH")]
    pub log_path: Option<PathBuf>,

    /// Log verbosity level.
    #[arg(long, value_enum)]
    pub log_level: Option<LogLevel>,

    /// Preference cache file path.
    #[arg(long, value_name = "PATH")]
    pub cache_path: Option<PathBuf>,

    /// Keep the preference cache in memory only.
    #[arg(long)]
    pub ephemeral: bool,

    /// Deadline for one provider probe, in milliseconds.
    #[arg(long, env = "AVATAR_PROBE_TIMEOUT_MS")]
    pub probe_timeout_ms: Option<u64>,

    /// Hours a cached provider stays a priming hint.
    #[arg(long)]
    pub freshness_hours: Option<u64>,
}
