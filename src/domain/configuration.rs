// SPDX-License-Identifier: MPL-2.0
//! The backpack configuration record.
//!
//! A [`Configuration`] is a small `Copy` value replaced wholesale on every
//! change. Each field is a closed enum, so a configuration can never hold
//! an option outside its table. Strings coming from the command line, the
//! settings file or a hand-off URL go through [`ConfigOption::parse`],
//! which rejects unknown values instead of letting them through untinted.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Shared behavior of the three option enums.
pub trait ConfigOption: Copy + Eq + Sized + 'static {
    /// Field name used in URLs, settings and error messages.
    const FIELD: &'static str;

    /// Every option, in display order.
    const ALL: &'static [Self];

    /// Stable lowercase name used on the wire.
    fn wire_name(self) -> &'static str;

    /// Fluent key of the human-readable label.
    fn label_key(self) -> &'static str;

    /// Parses a wire name, ignoring case and surrounding whitespace.
    fn parse(raw: &str) -> Result<Self> {
        let needle = raw.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|option| option.wire_name().eq_ignore_ascii_case(needle))
            .ok_or_else(|| Error::InvalidOption {
                field: Self::FIELD,
                value: raw.to_string(),
            })
    }
}

/// Body material, which selects the body texture set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Material {
    #[default]
    Denim,
    Fabric,
    Leather,
}

impl ConfigOption for Material {
    const FIELD: &'static str = "material";
    const ALL: &'static [Self] = &[Material::Denim, Material::Fabric, Material::Leather];

    fn wire_name(self) -> &'static str {
        match self {
            Material::Denim => "denim",
            Material::Fabric => "fabric",
            Material::Leather => "leather",
        }
    }

    fn label_key(self) -> &'static str {
        match self {
            Material::Denim => "material-denim",
            Material::Fabric => "material-fabric",
            Material::Leather => "material-leather",
        }
    }
}

/// Body color, which tints every non-hardware mesh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    #[default]
    Brown,
    Black,
    DarkBlue,
}

impl ConfigOption for Color {
    const FIELD: &'static str = "color";
    const ALL: &'static [Self] = &[Color::Brown, Color::Black, Color::DarkBlue];

    fn wire_name(self) -> &'static str {
        match self {
            Color::Brown => "brown",
            Color::Black => "black",
            Color::DarkBlue => "darkblue",
        }
    }

    fn label_key(self) -> &'static str {
        match self {
            Color::Brown => "color-brown",
            Color::Black => "color-black",
            Color::DarkBlue => "color-darkblue",
        }
    }
}

/// Hardware finish, which tints the hardware mesh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Hardware {
    #[default]
    Silver,
    Black,
    Gold,
}

impl ConfigOption for Hardware {
    const FIELD: &'static str = "hardware";
    const ALL: &'static [Self] = &[Hardware::Silver, Hardware::Black, Hardware::Gold];

    fn wire_name(self) -> &'static str {
        match self {
            Hardware::Silver => "silver",
            Hardware::Black => "black",
            Hardware::Gold => "gold",
        }
    }

    fn label_key(self) -> &'static str {
        match self {
            Hardware::Silver => "hardware-silver",
            Hardware::Black => "hardware-black",
            Hardware::Gold => "hardware-gold",
        }
    }
}

macro_rules! wire_traits {
    ($($ty:ty),*) => {
        $(
            impl fmt::Display for $ty {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str(self.wire_name())
                }
            }

            impl FromStr for $ty {
                type Err = Error;

                fn from_str(s: &str) -> Result<Self> {
                    <$ty as ConfigOption>::parse(s)
                }
            }
        )*
    };
}

wire_traits!(Material, Color, Hardware);

/// A single-field edit of a [`Configuration`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigChange {
    Material(Material),
    Color(Color),
    Hardware(Hardware),
}

/// The full product configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Configuration {
    #[serde(default)]
    pub material: Material,
    #[serde(default)]
    pub color: Color,
    #[serde(default)]
    pub hardware: Hardware,
}

impl Configuration {
    #[must_use]
    pub fn new(material: Material, color: Color, hardware: Hardware) -> Self {
        Self {
            material,
            color,
            hardware,
        }
    }

    /// Returns a new configuration with one field replaced.
    #[must_use]
    pub fn with(self, change: ConfigChange) -> Self {
        match change {
            ConfigChange::Material(material) => Self { material, ..self },
            ConfigChange::Color(color) => Self { color, ..self },
            ConfigChange::Hardware(hardware) => Self { hardware, ..self },
        }
    }

    /// Builds a configuration from raw strings, validating each field.
    ///
    /// Missing fields take their default option.
    pub fn from_parts(
        material: Option<&str>,
        color: Option<&str>,
        hardware: Option<&str>,
    ) -> Result<Self> {
        Ok(Self::from_options(
            material.map(Material::parse).transpose()?,
            color.map(Color::parse).transpose()?,
            hardware.map(Hardware::parse).transpose()?,
        ))
    }

    /// Fills unset fields with their default option.
    #[must_use]
    pub fn from_options(
        material: Option<Material>,
        color: Option<Color>,
        hardware: Option<Hardware>,
    ) -> Self {
        Self {
            material: material.unwrap_or_default(),
            color: color.unwrap_or_default(),
            hardware: hardware.unwrap_or_default(),
        }
    }
}

impl fmt::Display for Configuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.material, self.color, self.hardware)
    }
}
