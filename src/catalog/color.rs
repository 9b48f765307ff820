//! Entity color parsing.
//!
//! Catalog colors arrive as CSS hex strings (`#3776ab`, `#f80`). Each hex
//! digit is decoded with a lookup-free arithmetic select:
//!
//!   is_digit = (b - '0') < 10
//!   is_lower = (b - 'a') < 6
//!   is_upper = (b - 'A') < 6
//!   value    = is_digit * (b - '0') + is_lower * (b - 'a' + 10) + is_upper * (b - 'A' + 10)
//!
//! A byte matching none of the three ranges marks the whole color invalid.

use serde::{Deserialize, Deserializer};

/// Opaque RGB color (0-255 per channel).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const WHITE: Self = Self { r: 255, g: 255, b: 255 };

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Normalized `[r, g, b, alpha]` for rendering.
    #[inline(always)]
    pub fn to_f32(self, alpha: f32) -> [f32; 4] {
        const INV_255: f32 = 1.0 / 255.0;
        [
            self.r as f32 * INV_255,
            self.g as f32 * INV_255,
            self.b as f32 * INV_255,
            alpha,
        ]
    }

    /// Mix toward white by `t` (0 = unchanged, 1 = white).
    pub fn lighten(self, t: f32) -> Self {
        let t = t.clamp(0.0, 1.0);
        let m = |c: u8| (c as f32 + (255.0 - c as f32) * t).round() as u8;
        Self::new(m(self.r), m(self.g), m(self.b))
    }

    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Hex character → (value, valid).
#[inline(always)]
fn hex_digit(b: u8) -> (u8, bool) {
    let is_digit = (b.wrapping_sub(b'0') < 10) as u8;
    let is_lower = (b.wrapping_sub(b'a') < 6) as u8;
    let is_upper = (b.wrapping_sub(b'A') < 6) as u8;

    let value = is_digit
        .wrapping_mul(b.wrapping_sub(b'0'))
        .wrapping_add(is_lower.wrapping_mul(b.wrapping_sub(b'a').wrapping_add(10)))
        .wrapping_add(is_upper.wrapping_mul(b.wrapping_sub(b'A').wrapping_add(10)));

    (value, (is_digit | is_lower | is_upper) == 1)
}

/// Parse `#RGB` or `#RRGGBB`. Anything else is `None`.
pub fn parse_hex_color(s: &str) -> Option<Rgb> {
    let bytes = s.trim().as_bytes();
    if bytes.first() != Some(&b'#') {
        return None;
    }

    let mut digits = [0u8; 6];
    let mut valid = true;
    for (slot, &b) in digits.iter_mut().zip(&bytes[1..]) {
        let (v, ok) = hex_digit(b);
        *slot = v;
        valid &= ok;
    }
    if !valid {
        return None;
    }

    match bytes.len() {
        4 => Some(Rgb::new(
            digits[0] << 4 | digits[0],
            digits[1] << 4 | digits[1],
            digits[2] << 4 | digits[2],
        )),
        7 => Some(Rgb::new(
            digits[0] << 4 | digits[1],
            digits[2] << 4 | digits[3],
            digits[4] << 4 | digits[5],
        )),
        _ => None,
    }
}

impl<'de> Deserialize<'de> for Rgb {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        parse_hex_color(&s)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid hex color `{s}`")))
    }
}
