//! Color model: hex strings <-> RGB components, plus the HSL sweep used by the picker.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// An opaque 8-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Lowercase `#rrggbb`.
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Parse `#rrggbb` or `#rgb`. The leading `#` is optional and digits are case-insensitive.
    pub fn from_hex(text: &str) -> Result<Self, ColorError> {
        let trimmed = text.trim();
        let digits = trimmed.strip_prefix('#').unwrap_or(trimmed);

        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(ColorError::InvalidHex {
                input: text.to_string(),
            });
        }

        let parse = |s: &str| u8::from_str_radix(s, 16);
        let rgb = match digits.len() {
            6 => (parse(&digits[0..2]), parse(&digits[2..4]), parse(&digits[4..6])),
            3 => {
                // #abc is shorthand for #aabbcc
                let expand = |s: &str| parse(s).map(|v| v * 17);
                (expand(&digits[0..1]), expand(&digits[1..2]), expand(&digits[2..3]))
            }
            _ => {
                return Err(ColorError::InvalidHex {
                    input: text.to_string(),
                })
            }
        };

        match rgb {
            (Ok(r), Ok(g), Ok(b)) => Ok(Self { r, g, b }),
            _ => Err(ColorError::InvalidHex {
                input: text.to_string(),
            }),
        }
    }

    /// Linear interpolation in sRGB space, rounding to the nearest integer.
    pub fn lerp(self, other: Rgb, t: f32) -> Rgb {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t).round() as u8;
        Rgb {
            r: mix(self.r, other.r),
            g: mix(self.g, other.g),
            b: mix(self.b, other.b),
        }
    }

    pub fn to_array(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for Rgb {
    type Err = ColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Rgb::from_hex(s)
    }
}

/// Hue/saturation/lightness with CSS semantics: hue in degrees, s and l in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsl {
    pub h: f32,
    pub s: f32,
    pub l: f32,
}

impl Hsl {
    pub fn new(h: f32, s: f32, l: f32) -> Self {
        Self { h, s, l }
    }

    pub fn to_rgb(self) -> Rgb {
        let h = self.h.rem_euclid(360.0);
        let s = self.s.clamp(0.0, 1.0);
        let l = self.l.clamp(0.0, 1.0);

        let a = s * l.min(1.0 - l);
        let channel = |n: f32| {
            let k = (n + h / 30.0) % 12.0;
            let v = l - a * (k - 3.0).min(9.0 - k).clamp(-1.0, 1.0);
            (v * 255.0).round() as u8
        };

        Rgb::new(channel(0.0), channel(8.0), channel(4.0))
    }
}

/// Case-insensitive comparison of two hex color strings.
pub fn hex_eq(a: &str, b: &str) -> bool {
    a.eq_ignore_ascii_case(b)
}

/// Parse a single channel from free text the way a numeric entry field does:
/// optional sign, then the leading run of decimal digits. Anything without a
/// digit prefix counts as 0; the result is clamped to [0, 255].
pub fn parse_channel(text: &str) -> u8 {
    let s = text.trim_start();
    let (negative, rest) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let digits: &str = {
        let end = rest
            .char_indices()
            .find(|(_, c)| !c.is_ascii_digit())
            .map(|(i, _)| i)
            .unwrap_or(rest.len());
        &rest[..end]
    };

    if digits.is_empty() {
        return 0;
    }

    // Saturate instead of overflowing on absurdly long input.
    let magnitude = digits.parse::<i64>().unwrap_or(i64::MAX);
    clamp_channel(if negative { -magnitude } else { magnitude })
}

fn clamp_channel(v: i64) -> u8 {
    v.clamp(0, 255) as u8
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ColorError {
    #[error("invalid hex color: {input:?}")]
    InvalidHex { input: String },
}
