//! Infrastructure layer with external service adapters.

/// System clock.
pub mod clock;
/// Application configuration.
pub mod config;
/// Provider existence checks over HTTP.
pub mod probe;
/// Key-value storage adapters.
pub mod storage;

pub use clock::SystemClock;
pub use config::{AppConfig, CliArgs, ConfigError, LogLevel, StorageManager};
pub use probe::{HttpCheckConfig, HttpExistenceCheck};
pub use storage::{JsonFileStore, MemoryStore};
