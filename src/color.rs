//! Group color normalization and the default palette.

#[cfg(test)]
#[path = "color_test.rs"]
mod color_test;

use crate::consts::GROUP_PALETTE;

/// Parse `#RGB` or `#RRGGBB` values into RGB channels.
#[must_use]
pub fn parse_hex_rgb(raw: &str) -> Option<(u8, u8, u8)> {
    let hex = raw.trim().strip_prefix('#')?;
    let digits: Vec<u8> = hex.bytes().map(nibble).collect::<Option<_>>()?;
    match *digits.as_slice() {
        [r, g, b] => Some((r * 17, g * 17, b * 17)),
        [r1, r0, g1, g0, b1, b0] => Some(((r1 << 4) | r0, (g1 << 4) | g0, (b1 << 4) | b0)),
        _ => None,
    }
}

/// Value of one hex digit.
fn nibble(byte: u8) -> Option<u8> {
    match byte {
        b'0'..=b'9' => Some(byte - b'0'),
        b'a'..=b'f' => Some(byte - b'a' + 10),
        b'A'..=b'F' => Some(byte - b'A' + 10),
        _ => None,
    }
}

/// Canonical lowercase `#rrggbb`, or `None` when `value` is not a hex color.
#[must_use]
pub fn normalize_hex_color(value: &str) -> Option<String> {
    let (r, g, b) = parse_hex_rgb(value)?;
    Some(format!("#{r:02x}{g:02x}{b:02x}"))
}

/// Palette entry for the `index`-th group, wrapping around.
#[must_use]
pub fn palette_color(index: usize) -> &'static str {
    GROUP_PALETTE[index % GROUP_PALETTE.len()]
}
