//! Offline placeholder avatars.
//!
//! Produces a square SVG with a single centered letter on a colored
//! background, encoded as a `data:` URL so it renders without any fetch.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

/// Background colors, indexed by the label's first code point.
pub const PALETTE: [&str; 6] = [
    "#e57373", "#64b5f6", "#81c784", "#ffb74d", "#ba68c8", "#4db6ac",
];

/// Glyph used when the label is empty.
pub const DEFAULT_GLYPH: char = '?';

/// Prefix of every generated placeholder URL.
pub const DATA_URL_PREFIX: &str = "data:image/svg+xml;base64,";

/// Picks the background color for a label.
#[must_use]
pub fn placeholder_color(label: &str) -> &'static str {
    let first = label.trim().chars().next().unwrap_or(DEFAULT_GLYPH);
    PALETTE[first as usize % PALETTE.len()]
}

/// Returns the uppercase glyph shown for a label.
#[must_use]
pub fn placeholder_glyph(label: &str) -> char {
    let first = label.trim().chars().next().unwrap_or(DEFAULT_GLYPH);
    first.to_uppercase().next().unwrap_or(first)
}

/// Builds the raw SVG document for a label.
#[must_use]
pub fn placeholder_svg(label: &str, size: u32) -> String {
    let color = placeholder_color(label);
    let glyph = escape_xml(placeholder_glyph(label));
    let font_size = size / 2;

    format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{size}\" height=\"{size}\" \
         viewBox=\"0 0 {size} {size}\">\
         <rect width=\"100%\" height=\"100%\" fill=\"{color}\"/>\
         <text x=\"50%\" y=\"50%\" dominant-baseline=\"central\" text-anchor=\"middle\" \
         font-family=\"sans-serif\" font-weight=\"bold\" font-size=\"{font_size}\" \
         fill=\"#ffffff\">{glyph}</text></svg>"
    )
}

/// Generates a self-contained placeholder image URL.
#[must_use]
pub fn generate_placeholder(label: &str, size: u32) -> String {
    let svg = placeholder_svg(label, size);
    format!("{DATA_URL_PREFIX}{}", STANDARD.encode(svg))
}

fn escape_xml(c: char) -> String {
    match c {
        '<' => "&lt;".to_string(),
        '>' => "&gt;".to_string(),
        '&' => "&amp;".to_string(),
        '"' => "&quot;".to_string(),
        '\'' => "&apos;".to_string(),
        other => other.to_string(),
    }
}
