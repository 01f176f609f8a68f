//! Resize mode and focal position lookups.
//!
//! Not applied by `build_url` unless `emit_geometry` is enabled in the config.

/// Maps a host resize mode to Gumlet's `fit` value. Unknown or absent → `clip`.
pub fn map_mode(mode: Option<&str>) -> &'static str {
    let Some(mode) = mode else {
        return "clip";
    };
    match mode.to_ascii_lowercase().as_str() {
        "crop" => "crop",
        "fit" => "clip",
        "stretch" => "scale",
        "letterbox" => "clip",
        _ => "clip",
    }
}

/// Maps a host focal position to Gumlet's `crop` anchor. Unknown or absent → `center`.
pub fn map_position(position: Option<&str>) -> &'static str {
    let Some(position) = position else {
        return "center";
    };
    match position.to_ascii_lowercase().as_str() {
        "top-left" => "top-left",
        "top-center" => "top",
        "top-right" => "top-right",
        "center-left" => "left",
        "center-center" => "center",
        "center-right" => "right",
        "bottom-left" => "bottom-left",
        "bottom-center" => "bottom",
        "bottom-right" => "bottom-right",
        _ => "center",
    }
}
