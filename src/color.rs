// src/color.rs

//! Defines the `Rgb` color triple and conversions from the `#RRGGBB`
//! notation used by palette entries.

use serde::{Deserialize, Serialize};

use crate::error::XpmError;

/// An RGB true color, with each component from 0 to 255.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Rgb { r, g, b }
    }

    /// Decodes a `#RRGGBB` color specification.
    ///
    /// The three 2-hex-digit substrings after the leading `#` (positions
    /// 1-2, 3-4 and 5-6) are parsed as base-16 integers 0-255.
    pub fn from_hex(spec: &str) -> Result<Self, XpmError> {
        let digits = spec
            .strip_prefix('#')
            .ok_or_else(|| XpmError::Format(format!("color {:?} does not start with '#'", spec)))?;
        if digits.len() != 6 || !digits.is_ascii() {
            return Err(XpmError::Format(format!(
                "color {:?} is not a 6-hex-digit specification",
                spec
            )));
        }
        let channel = |lo: usize, hi: usize| {
            u8::from_str_radix(&digits[lo..hi], 16)
                .map_err(|_| XpmError::Format(format!("color {:?} contains non-hex digits", spec)))
        };
        Ok(Rgb {
            r: channel(0, 2)?,
            g: channel(2, 4)?,
            b: channel(4, 6)?,
        })
    }

    /// Linear interpolation between `self` and `other`; `t` is clamped to
    /// [0, 1].
    pub fn lerp(self, other: Rgb, t: f64) -> Rgb {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * t).round() as u8;
        Rgb {
            r: mix(self.r, other.r),
            g: mix(self.g, other.g),
            b: mix(self.b, other.b),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_hex_triples() {
        assert_eq!(Rgb::from_hex("#FF0000").unwrap(), Rgb::new(255, 0, 0));
        assert_eq!(Rgb::from_hex("#00ff7f").unwrap(), Rgb::new(0, 255, 127));
        assert_eq!(Rgb::from_hex("#000000").unwrap(), Rgb::new(0, 0, 0));
    }

    #[test]
    fn rejects_malformed_specifications() {
        assert!(Rgb::from_hex("FF0000").is_err());
        assert!(Rgb::from_hex("#FF00").is_err());
        assert!(Rgb::from_hex("#GG0000").is_err());
        assert!(Rgb::from_hex("#FF00001").is_err());
    }

    #[test]
    fn lerp_midpoint_and_clamping() {
        let black = Rgb::new(0, 0, 0);
        let white = Rgb::new(255, 255, 255);
        assert_eq!(black.lerp(white, 0.5), Rgb::new(128, 128, 128));
        assert_eq!(black.lerp(white, -1.0), black);
        assert_eq!(black.lerp(white, 2.0), white);
    }
}
