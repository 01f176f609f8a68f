//! Output format mapping.

/// Formats accepted as a configured default (`auto` = let Gumlet decide).
pub const SUPPORTED_FORMATS: &[&str] = &[
    "auto", "webp", "avif", "jpg", "png", "gif", "svg", "ico", "pdf",
];

/// Maps a host format name to Gumlet's `f` value.
///
/// Case-insensitive. `jpeg` becomes `jpg`; anything else is passed through
/// lowercased, even if Gumlet does not list it. Returns `None` only for an
/// empty input.
pub fn map_format(format: &str) -> Option<String> {
    if format.is_empty() {
        return None;
    }
    let lower = format.to_ascii_lowercase();
    let mapped = match lower.as_str() {
        "jpg" | "jpeg" => "jpg",
        "png" => "png",
        "gif" => "gif",
        "webp" => "webp",
        "avif" => "avif",
        other => other,
    };
    Some(mapped.to_string())
}
