//! Use case implementations.

mod resolve_avatar_use_case;

pub use resolve_avatar_use_case::{AvatarResolver, ResolverConfig, candidate_order};
