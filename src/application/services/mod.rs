pub mod avatar_loader;
pub mod preference_cache;
pub mod provider_probe;

pub use avatar_loader::{AvatarLoader, AvatarResolvedEvent, AvatarTicket};
pub use preference_cache::PreferenceCache;
pub use provider_probe::ProviderProbe;
