//! Pure domain services.

pub mod placeholder;

pub use placeholder::{generate_placeholder, placeholder_color, placeholder_glyph};
