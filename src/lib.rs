//! avatar-resolver - Player avatar resolution for a game launcher.
//!
//! Given a player identity, races a fixed set of public skin renderers,
//! remembers which one last worked for that player, and falls back to a
//! locally generated placeholder when none answer in time.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

/// Application layer containing use cases and services.
pub mod application;
/// Domain layer containing entities, errors, and port definitions.
pub mod domain;
/// Infrastructure layer containing adapters for external services.
pub mod infrastructure;

pub use application::{AvatarLoader, AvatarResolver, ResolverConfig};
pub use domain::services::generate_placeholder;
pub use domain::{AvatarProvider, AvatarRequest, AvatarSource, PlayerId, ResolvedAvatar};

/// Current version of the application.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name.
pub const NAME: &str = "avatar-resolver";
