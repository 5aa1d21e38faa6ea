//! Domain entity definitions.

mod avatar;
mod player;
mod preference;
mod provider;

pub use avatar::{AvatarSource, ResolvedAvatar};
pub use player::{AvatarRequest, PlayerId};
pub use preference::{PreferenceEntry, PreferenceTable};
pub use provider::{AvatarProvider, UnknownProvider, list_providers};
