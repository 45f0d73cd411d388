use anyhow::{anyhow, bail, Result};
use once_cell::sync::Lazy;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashMap;

/// 8-bit RGBA color.
///
/// On the wire colors travel as CSS-style strings (`"black"`, `"#ff8800"`,
/// `"rgb(255, 136, 0)"`), matching what the command producer emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::rgba(r, g, b, 255)
    }

    pub const BLACK: Self = Self::rgb(0, 0, 0);
    pub const WHITE: Self = Self::rgb(255, 255, 255);
    pub const TRANSPARENT: Self = Self::rgba(0, 0, 0, 0);

    /// Parse a CSS-style color string: a named color, `#rgb`, `#rrggbb`,
    /// `#rrggbbaa`, `rgb(r, g, b)` or `rgba(r, g, b, a)` with the alpha in
    /// `0.0..=1.0`.
    pub fn parse(input: &str) -> Result<Self> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            bail!("empty color string");
        }
        if let Some(hex) = trimmed.strip_prefix('#') {
            return parse_hex(hex).ok_or_else(|| anyhow!("invalid hex color {trimmed:?}"));
        }
        let lower = trimmed.to_ascii_lowercase();
        if let Some(args) = lower
            .strip_prefix("rgba(")
            .and_then(|rest| rest.strip_suffix(')'))
        {
            return parse_rgba_args(args, true)
                .ok_or_else(|| anyhow!("invalid rgba() color {trimmed:?}"));
        }
        if let Some(args) = lower
            .strip_prefix("rgb(")
            .and_then(|rest| rest.strip_suffix(')'))
        {
            return parse_rgba_args(args, false)
                .ok_or_else(|| anyhow!("invalid rgb() color {trimmed:?}"));
        }
        NAMED_COLORS
            .get(lower.as_str())
            .copied()
            .ok_or_else(|| anyhow!("unknown color name {trimmed:?}"))
    }
}

fn parse_hex(hex: &str) -> Option<Color> {
    let nibble = |c: u8| char::from(c).to_digit(16).map(|v| v as u8);
    let byte = |pair: &[u8]| Some(nibble(pair[0])? * 16 + nibble(pair[1])?);
    let bytes = hex.as_bytes();
    match bytes.len() {
        3 => {
            let r = nibble(bytes[0])?;
            let g = nibble(bytes[1])?;
            let b = nibble(bytes[2])?;
            Some(Color::rgb(r * 17, g * 17, b * 17))
        }
        6 => Some(Color::rgb(
            byte(&bytes[0..2])?,
            byte(&bytes[2..4])?,
            byte(&bytes[4..6])?,
        )),
        8 => Some(Color::rgba(
            byte(&bytes[0..2])?,
            byte(&bytes[2..4])?,
            byte(&bytes[4..6])?,
            byte(&bytes[6..8])?,
        )),
        _ => None,
    }
}

fn parse_rgba_args(args: &str, with_alpha: bool) -> Option<Color> {
    let parts: Vec<&str> = args.split(',').map(str::trim).collect();
    if parts.len() != if with_alpha { 4 } else { 3 } {
        return None;
    }
    let channel = |s: &str| -> Option<u8> {
        let v: f64 = s.parse().ok()?;
        if !(0.0..=255.0).contains(&v) {
            return None;
        }
        Some(v.round() as u8)
    };
    let r = channel(parts[0])?;
    let g = channel(parts[1])?;
    let b = channel(parts[2])?;
    let a = if with_alpha {
        let v: f64 = parts[3].parse().ok()?;
        if !(0.0..=1.0).contains(&v) {
            return None;
        }
        (v * 255.0).round() as u8
    } else {
        255
    };
    Some(Color::rgba(r, g, b, a))
}

static NAMED_COLORS: Lazy<HashMap<&'static str, Color>> = Lazy::new(|| {
    HashMap::from([
        ("black", Color::rgb(0, 0, 0)),
        ("white", Color::rgb(255, 255, 255)),
        ("red", Color::rgb(255, 0, 0)),
        ("green", Color::rgb(0, 128, 0)),
        ("blue", Color::rgb(0, 0, 255)),
        ("yellow", Color::rgb(255, 255, 0)),
        ("cyan", Color::rgb(0, 255, 255)),
        ("magenta", Color::rgb(255, 0, 255)),
        ("orange", Color::rgb(255, 165, 0)),
        ("purple", Color::rgb(128, 0, 128)),
        ("brown", Color::rgb(165, 42, 42)),
        ("pink", Color::rgb(255, 192, 203)),
        ("gray", Color::rgb(128, 128, 128)),
        ("grey", Color::rgb(128, 128, 128)),
        ("lime", Color::rgb(0, 255, 0)),
        ("navy", Color::rgb(0, 0, 128)),
        ("teal", Color::rgb(0, 128, 128)),
        ("olive", Color::rgb(128, 128, 0)),
        ("maroon", Color::rgb(128, 0, 0)),
        ("silver", Color::rgb(192, 192, 192)),
        ("gold", Color::rgb(255, 215, 0)),
        ("violet", Color::rgb(238, 130, 238)),
        ("indigo", Color::rgb(75, 0, 130)),
    ])
});

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.a == 255 {
            serializer.serialize_str(&format!("rgb({}, {}, {})", self.r, self.g, self.b))
        } else {
            let alpha = f64::from(self.a) / 255.0;
            serializer.serialize_str(&format!(
                "rgba({}, {}, {}, {:.3})",
                self.r, self.g, self.b, alpha
            ))
        }
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Color::parse(&raw).map_err(D::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::Color;

    #[test]
    fn named_colors_resolve_case_insensitively() {
        assert_eq!(Color::parse("black").unwrap(), Color::BLACK);
        assert_eq!(Color::parse("Red").unwrap(), Color::rgb(255, 0, 0));
        assert_eq!(Color::parse("GREY").unwrap(), Color::parse("gray").unwrap());
    }

    #[test]
    fn hex_forms_parse() {
        assert_eq!(Color::parse("#fff").unwrap(), Color::WHITE);
        assert_eq!(Color::parse("#ff8800").unwrap(), Color::rgb(255, 136, 0));
        assert_eq!(
            Color::parse("#ff880080").unwrap(),
            Color::rgba(255, 136, 0, 128)
        );
    }

    #[test]
    fn rgb_functional_forms_parse() {
        assert_eq!(
            Color::parse("rgb(12, 34, 56)").unwrap(),
            Color::rgb(12, 34, 56)
        );
        assert_eq!(
            Color::parse("rgba(12, 34, 56, 0.5)").unwrap(),
            Color::rgba(12, 34, 56, 128)
        );
    }

    #[test]
    fn junk_is_rejected() {
        assert!(Color::parse("").is_err());
        assert!(Color::parse("#12345").is_err());
        assert!(Color::parse("rgb(1, 2)").is_err());
        assert!(Color::parse("rgb(999, 0, 0)").is_err());
        assert!(Color::parse("blurple").is_err());
    }

    #[test]
    fn wire_round_trip_through_serde() {
        let color: Color = serde_json::from_str("\"rgb(10, 20, 30)\"").unwrap();
        assert_eq!(color, Color::rgb(10, 20, 30));
        let encoded = serde_json::to_string(&color).unwrap();
        assert_eq!(encoded, "\"rgb(10, 20, 30)\"");
    }
}
