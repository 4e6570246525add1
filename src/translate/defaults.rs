// src/translate/defaults.rs

//! Defaulting for optional config scalars

use tracing::warn;

/// Resolve a permission mode, falling back to `default` when absent
///
/// A stored mode's decimal digits are read as octal digits, so `644`
/// resolves to `0o644` (420). Values whose digits are not valid octal are
/// taken as already numeric. The default is used as-is.
pub fn resolve_mode(mode: Option<u32>, default: u32) -> u32 {
    let Some(mode) = mode else {
        return default;
    };

    match u32::from_str_radix(&mode.to_string(), 8) {
        Ok(octal) => octal,
        Err(_) => {
            warn!("Mode {} is not octal digits, using it as a numeric mode", mode);
            mode
        }
    }
}

/// Resolve an optional string, falling back to `default`
pub fn resolve_string<'a>(value: Option<&'a str>, default: &'a str) -> &'a str {
    value.unwrap_or(default)
}

/// Resolve an optional flag, falling back to `default`
pub fn resolve_bool(value: Option<bool>, default: bool) -> bool {
    value.unwrap_or(default)
}
