//! Custom cursor CSS codec.
//!
//! The overlay installs its own SVG cursor on the page. When the tracker looks
//! at the element under the pointer it must tell that cursor apart from a
//! custom cursor set by the page itself, otherwise it would broadcast its own
//! overlay icon as a "foreign" pointer. Every overlay cursor URL starts with
//! [`canonical_prefix`], which is what makes the distinction possible.

use std::sync::OnceLock;

use super::pointer::Pointer;

/// Scheme and media type of every encoded icon.
pub const SVG_DATA_URI_PREFIX: &str = "data:image/svg+xml,";

/// Fixed head of the overlay arrow, up to (not including) the fill colour.
const OVERLAY_SVG_HEAD: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" width="32" height="32" viewBox="0 0 32 32" fill="none"><path d="M5 3 L5 25 L11 19 L15 29 L19 27 L15 18 L23 18 Z" fill=""#;

const OVERLAY_SVG_TAIL: &str = r#"" stroke="white" stroke-width="2" stroke-linejoin="round"/></svg>"#;

static CANONICAL_PREFIX: OnceLock<String> = OnceLock::new();

/// Encode SVG markup for embedding in a CSS `url("...")`.
///
/// Whitespace runs collapse to one space and double quotes become single
/// quotes before percent-encoding, so the result never contains a `"` that
/// would terminate the surrounding `url("...")`.
pub fn encode_icon(svg: &str) -> String {
    let collapsed = svg
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .replace('"', "'");
    urlencoding::encode(&collapsed).into_owned()
}

/// Full CSS `cursor` value for an SVG icon.
pub fn cursor_css(svg: &str) -> String {
    format!("url(\"{}{}\"), auto", SVG_DATA_URI_PREFIX, encode_icon(svg))
}

/// The overlay's own arrow icon, filled with the user's colour.
pub fn overlay_cursor_svg(color: &str) -> String {
    format!("{}{}{}", OVERLAY_SVG_HEAD, color, OVERLAY_SVG_TAIL)
}

/// Encoded prefix shared by every cursor the overlay generates.
pub fn canonical_prefix() -> &'static str {
    CANONICAL_PREFIX.get_or_init(|| {
        format!("{}{}", SVG_DATA_URI_PREFIX, encode_icon(OVERLAY_SVG_HEAD))
    })
}

/// Pull the icon URL out of `url("..."), auto` or `url("...")`.
///
/// Anything else (keywords, unquoted urls, multiple fallbacks) is treated as
/// "no custom cursor".
pub fn extract_icon_ref(css: &str) -> Option<&str> {
    let rest = css.trim().strip_prefix("url(\"")?;
    let inner = rest
        .strip_suffix("\"), auto")
        .or_else(|| rest.strip_suffix("\")"))?;
    if inner.is_empty() {
        return None;
    }
    Some(inner)
}

/// Pointer to report for a mouse move, given the resolved cursor style of the
/// element under it.
pub fn detect_pointer(cursor_style: Option<&str>) -> Pointer {
    match cursor_style.and_then(extract_icon_ref) {
        Some(icon) if !icon.starts_with(canonical_prefix()) => Pointer::Custom(icon.to_string()),
        _ => Pointer::Mouse,
    }
}
