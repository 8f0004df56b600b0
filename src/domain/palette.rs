// SPDX-License-Identifier: MPL-2.0
//! Tint tables for body colors and hardware finishes.

use super::configuration::{Color, Hardware};
use crate::error::{Error, Result};
use std::fmt;

/// An 8-bit sRGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const WHITE: Rgb = Rgb::new(0xFF, 0xFF, 0xFF);

    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parses `#RRGGBB` (the leading `#` is optional).
    pub fn from_hex(hex: &str) -> Result<Self> {
        let digits = hex.trim().trim_start_matches('#');
        if digits.len() != 6 || !digits.is_ascii() {
            return Err(Error::Config(format!("invalid hex color: {hex}")));
        }
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&digits[range], 16)
                .map_err(|_| Error::Config(format!("invalid hex color: {hex}")))
        };
        Ok(Self::new(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }

    /// Formats as uppercase `#RRGGBB`.
    #[must_use]
    pub fn to_hex(self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }

    /// Converts to linear-light floats for shading.
    #[must_use]
    pub fn to_linear(self) -> [f32; 3] {
        [
            srgb_to_linear(self.r),
            srgb_to_linear(self.g),
            srgb_to_linear(self.b),
        ]
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

fn srgb_to_linear(channel: u8) -> f32 {
    let c = f32::from(channel) / 255.0;
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

/// Body tint for a color option.
#[must_use]
pub fn body_tint(color: Color) -> Rgb {
    match color {
        Color::Brown => Rgb::new(0x8B, 0x45, 0x13),
        Color::Black => Rgb::new(0x00, 0x00, 0x00),
        Color::DarkBlue => Rgb::new(0x00, 0x00, 0x8B),
    }
}

/// Hardware tint for a finish option.
#[must_use]
pub fn hardware_tint(hardware: Hardware) -> Rgb {
    match hardware {
        Hardware::Silver => Rgb::new(0xC0, 0xC0, 0xC0),
        Hardware::Black => Rgb::new(0x00, 0x00, 0x00),
        Hardware::Gold => Rgb::new(0xFF, 0xD7, 0x00),
    }
}
