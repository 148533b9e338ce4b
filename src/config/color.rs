use crate::foundation::core::Rgb8;

/// Parse `#rrggbb` / `rrggbb`; `#rrggbbaa` is accepted with its alpha dropped.
///
/// Returns `None` for any other input.
pub fn parse_color(input: &str) -> Option<Rgb8> {
    let hex = input.strip_prefix('#').unwrap_or(input);
    if !(hex.len() == 6 || hex.len() == 8) || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        tracing::debug!(color = input, "invalid color");
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    Some(Rgb8::new(channel(0)?, channel(2)?, channel(4)?))
}

/// [`parse_color`], falling back to opaque white.
pub fn parse_color_or_white(input: &str) -> Rgb8 {
    parse_color(input).unwrap_or_else(|| {
        tracing::debug!(color = input, "defaulting to white");
        Rgb8::WHITE
    })
}

/// Strict `#rrggbb` check applied to user-supplied colors.
pub fn is_valid_color(input: &str) -> bool {
    input.len() == 7
        && input.starts_with('#')
        && input.bytes().skip(1).all(|b| b.is_ascii_hexdigit())
}
