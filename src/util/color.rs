// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Hex colour strings.
//!
//! Colours are stored as `#rrggbb` strings in analysis files so that they
//! stay readable and portable; the UI converts them when painting.

/// Colour used when a stored string cannot be parsed.
pub const FALLBACK_COLOR: egui::Color32 = egui::Color32::from_rgb(0xef, 0x44, 0x44);

/// Parse a `#rrggbb` (or `rrggbb`) string.
pub fn parse_hex(hex: &str) -> Option<egui::Color32> {
    let digits = hex.strip_prefix('#').unwrap_or(hex);
    if digits.len() != 6 || !digits.is_ascii() {
        return None;
    }
    let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&digits[range], 16).ok();
    Some(egui::Color32::from_rgb(
        channel(0..2)?,
        channel(2..4)?,
        channel(4..6)?,
    ))
}

/// Parse a stored colour, falling back to the default marker red.
pub fn to_color32(hex: &str) -> egui::Color32 {
    parse_hex(hex).unwrap_or(FALLBACK_COLOR)
}

/// Render a colour as `#rrggbb`.
pub fn to_hex(color: egui::Color32) -> String {
    format!("#{:02x}{:02x}{:02x}", color.r(), color.g(), color.b())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex() {
        assert_eq!(parse_hex("#22c55e"), Some(egui::Color32::from_rgb(0x22, 0xc5, 0x5e)));
        assert_eq!(parse_hex("3B82F6"), Some(egui::Color32::from_rgb(0x3b, 0x82, 0xf6)));
        assert_eq!(parse_hex("red"), None);
        assert_eq!(parse_hex("#12345"), None);
    }

    #[test]
    fn test_hex_roundtrip_and_fallback() {
        let color = egui::Color32::from_rgb(1, 2, 255);
        assert_eq!(to_hex(color), "#0102ff");
        assert_eq!(to_color32(&to_hex(color)), color);
        assert_eq!(to_color32("not a colour"), FALLBACK_COLOR);
    }
}
