//! RGBA colors, hex notation and deterministic hue stepping.
//!
//! Colors are written as `#AARRGGBB` in scheme files so that the alpha
//! channel of no-data colors survives a round trip. Reading also accepts
//! `#RRGGBB` and a handful of named colors.

use std::fmt;
use std::str::FromStr;

use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize, Serializer};

use crate::error::{Error, Result};

/// Hue step between the color seeds of different parameters.
pub const HUE_STEP_CATEGORICAL: i32 = 100;

/// Hue step between the states of one parameter.
pub const HUE_STEP_SEQUENTIAL: i32 = 10;

/// An 8-bit RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

/// Mode for [`next_color`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HueStep {
    /// Large hue jump, for visually distinct colors.
    Categorical,
    /// Small hue jump, for colors similar to the input.
    Sequential,
}

impl HueStep {
    pub fn degrees(self) -> i32 {
        match self {
            Self::Categorical => HUE_STEP_CATEGORICAL,
            Self::Sequential => HUE_STEP_SEQUENTIAL,
        }
    }
}

const NAMED_COLORS: &[(&str, Rgba)] = &[
    ("white", Rgba::rgb(255, 255, 255)),
    ("black", Rgba::rgb(0, 0, 0)),
    ("red", Rgba::rgb(255, 0, 0)),
    ("green", Rgba::rgb(0, 128, 0)),
    ("blue", Rgba::rgb(0, 0, 255)),
    ("yellow", Rgba::rgb(255, 255, 0)),
    ("orange", Rgba::rgb(255, 165, 0)),
    ("grey", Rgba::rgb(128, 128, 128)),
    ("gray", Rgba::rgb(128, 128, 128)),
    ("cyan", Rgba::rgb(0, 255, 255)),
    ("magenta", Rgba::rgb(255, 0, 255)),
    ("transparent", Rgba::TRANSPARENT),
];

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Opaque color.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Transparent black (default no-data color).
    pub const TRANSPARENT: Self = Self::new(0, 0, 0, 0);
    pub const WHITE: Self = Self::rgb(255, 255, 255);
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    pub const BLUE: Self = Self::rgb(0, 0, 255);
    pub const YELLOW: Self = Self::rgb(255, 255, 0);

    /// Look up a named color (case-insensitive).
    pub fn named(name: &str) -> Option<Self> {
        let name = name.trim().to_ascii_lowercase();
        NAMED_COLORS
            .iter()
            .find(|(n, _)| *n == name)
            .map(|&(_, c)| c)
    }

    /// Bytes in output buffer order.
    pub fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// `#rrggbb`, alpha dropped.
    pub fn name(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// `#aarrggbb`.
    pub fn hex_argb(&self) -> String {
        format!("#{:02x}{:02x}{:02x}{:02x}", self.a, self.r, self.g, self.b)
    }

    /// Hue in degrees (`-1` for achromatic colors), saturation, lightness
    /// and alpha, all but hue in `0..=255`.
    pub fn to_hsl(&self) -> (i32, u8, u8, u8) {
        let r = self.r as f64 / 255.0;
        let g = self.g as f64 / 255.0;
        let b = self.b as f64 / 255.0;
        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let l = (max + min) / 2.0;
        let lightness = (l * 255.0).round() as u8;

        let delta = max - min;
        if delta <= f64::EPSILON {
            return (-1, 0, lightness, self.a);
        }

        let s = if l < 0.5 {
            delta / (max + min)
        } else {
            delta / (2.0 - max - min)
        };

        let mut h = if (max - r).abs() <= f64::EPSILON {
            (g - b) / delta
        } else if (max - g).abs() <= f64::EPSILON {
            2.0 + (b - r) / delta
        } else {
            4.0 + (r - g) / delta
        };
        h *= 60.0;
        if h < 0.0 {
            h += 360.0;
        }

        (
            (h.floor() as i32).rem_euclid(360),
            (s * 255.0).round() as u8,
            lightness,
            self.a,
        )
    }

    /// Inverse of [`Rgba::to_hsl`]. A negative hue yields a gray.
    pub fn from_hsl(hue: i32, saturation: u8, lightness: u8, alpha: u8) -> Self {
        let s = saturation as f64 / 255.0;
        let l = lightness as f64 / 255.0;
        if hue < 0 || saturation == 0 {
            let v = lightness;
            return Self::new(v, v, v, alpha);
        }

        let h = hue.rem_euclid(360) as f64;
        let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
        let x = c * (1.0 - ((h / 60.0) % 2.0 - 1.0).abs());
        let m = l - c / 2.0;

        let (r, g, b) = if h < 60.0 {
            (c, x, 0.0)
        } else if h < 120.0 {
            (x, c, 0.0)
        } else if h < 180.0 {
            (0.0, c, x)
        } else if h < 240.0 {
            (0.0, x, c)
        } else if h < 300.0 {
            (x, 0.0, c)
        } else {
            (c, 0.0, x)
        };

        let to_u8 = |v: f64| ((v + m).clamp(0.0, 1.0) * 255.0).round() as u8;
        Self::new(to_u8(r), to_u8(g), to_u8(b), alpha)
    }

    /// HSL lightness in `0..=255`.
    pub fn lightness(&self) -> u8 {
        self.to_hsl().2
    }
}

impl Default for Rgba {
    fn default() -> Self {
        Self::TRANSPARENT
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.hex_argb())
    }
}

fn parse_hex_byte(s: &str) -> Option<u8> {
    u8::from_str_radix(s, 16).ok()
}

impl FromStr for Rgba {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let text = s.trim();
        if let Some(c) = Self::named(text) {
            return Ok(c);
        }
        let invalid = || Error::InvalidColor(s.to_string());
        let hex = text.strip_prefix('#').ok_or_else(invalid)?;
        if !hex.is_ascii() {
            return Err(invalid());
        }
        match hex.len() {
            6 => Ok(Self::rgb(
                parse_hex_byte(&hex[0..2]).ok_or_else(invalid)?,
                parse_hex_byte(&hex[2..4]).ok_or_else(invalid)?,
                parse_hex_byte(&hex[4..6]).ok_or_else(invalid)?,
            )),
            8 => Ok(Self::new(
                parse_hex_byte(&hex[2..4]).ok_or_else(invalid)?,
                parse_hex_byte(&hex[4..6]).ok_or_else(invalid)?,
                parse_hex_byte(&hex[6..8]).ok_or_else(invalid)?,
                parse_hex_byte(&hex[0..2]).ok_or_else(invalid)?,
            )),
            _ => Err(invalid()),
        }
    }
}

impl Serialize for Rgba {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.hex_argb())
    }
}

impl<'de> Deserialize<'de> for Rgba {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct RgbaVisitor;

        impl Visitor<'_> for RgbaVisitor {
            type Value = Rgba;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a color like \"#RRGGBB\", \"#AARRGGBB\" or a color name")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> std::result::Result<Rgba, E> {
                v.parse().map_err(E::custom)
            }
        }

        deserializer.deserialize_str(RgbaVisitor)
    }
}

/// Step `color` around the hue circle.
///
/// Achromatic input is first lifted to a fully saturated, mid-lightness,
/// opaque color so that repeated stepping from black or white still yields
/// distinct hues. The hue wraps modulo 360.
pub fn next_color(color: Rgba, step: HueStep) -> Rgba {
    let (mut hue, mut sat, mut light, mut alpha) = color.to_hsl();
    hue += step.degrees();
    if sat == 0 {
        sat = 255;
        light = 128;
        alpha = 255;
    }
    Rgba::from_hsl(hue.rem_euclid(360), sat, light, alpha)
}

/// Black or white, whichever reads better on top of `color`.
pub fn contrast_color(color: Rgba) -> Rgba {
    if color.lightness() < 128 {
        Rgba::WHITE
    } else {
        Rgba::BLACK
    }
}
