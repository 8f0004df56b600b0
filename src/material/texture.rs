// SPDX-License-Identifier: MPL-2.0
//! Texture identities and decoded texture images.
//!
//! Texture files follow a fixed naming convention under the assets root:
//! `textures/<set>_<channel>.jpg`, e.g. `textures/denim_baseColor.jpg`.

use crate::domain::Material;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Directory, relative to the assets root, holding texture files.
pub const TEXTURE_DIR: &str = "textures";

/// A family of textures sharing a file prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TextureSet {
    Denim,
    Fabric,
    Leather,
    /// The hardware set. The spelling matches the shipped asset files.
    Metall,
}

impl TextureSet {
    /// Body texture set for a material option.
    #[must_use]
    pub fn for_material(material: Material) -> Self {
        match material {
            Material::Denim => TextureSet::Denim,
            Material::Fabric => TextureSet::Fabric,
            Material::Leather => TextureSet::Leather,
        }
    }

    #[must_use]
    pub fn prefix(self) -> &'static str {
        match self {
            TextureSet::Denim => "denim",
            TextureSet::Fabric => "fabric",
            TextureSet::Leather => "leather",
            TextureSet::Metall => "metall",
        }
    }

    /// The three keys of this set, in channel order.
    #[must_use]
    pub fn keys(self) -> [TextureKey; 3] {
        TextureChannel::ALL.map(|channel| TextureKey::new(self, channel))
    }
}

/// Which PBR input a texture feeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TextureChannel {
    BaseColor,
    Normal,
    /// Packed occlusion (R), roughness (G), metalness (B).
    OcclusionRoughnessMetallic,
}

impl TextureChannel {
    pub const ALL: [TextureChannel; 3] = [
        TextureChannel::BaseColor,
        TextureChannel::Normal,
        TextureChannel::OcclusionRoughnessMetallic,
    ];

    #[must_use]
    pub fn suffix(self) -> &'static str {
        match self {
            TextureChannel::BaseColor => "baseColor",
            TextureChannel::Normal => "normal",
            TextureChannel::OcclusionRoughnessMetallic => "occlusionRoughnessMetallic",
        }
    }

    /// Whether the texels are sRGB-encoded color rather than linear data.
    #[must_use]
    pub fn is_color(self) -> bool {
        matches!(self, TextureChannel::BaseColor)
    }
}

/// Identity of a texture file. Two keys are equal iff they name the same file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TextureKey {
    pub set: TextureSet,
    pub channel: TextureChannel,
}

impl TextureKey {
    #[must_use]
    pub const fn new(set: TextureSet, channel: TextureChannel) -> Self {
        Self { set, channel }
    }

    #[must_use]
    pub fn file_name(self) -> String {
        format!("{}_{}.jpg", self.set.prefix(), self.channel.suffix())
    }

    /// Absolute path of this texture under an assets root.
    #[must_use]
    pub fn path(self, assets_root: &Path) -> PathBuf {
        assets_root.join(TEXTURE_DIR).join(self.file_name())
    }
}

impl fmt::Display for TextureKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.set.prefix(), self.channel.suffix())
    }
}

/// A decoded RGBA8 texture.
#[derive(Debug, Clone, PartialEq)]
pub struct TextureImage {
    pub width: u32,
    pub height: u32,
    pub rgba: Arc<Vec<u8>>,
}

impl TextureImage {
    /// Wraps RGBA8 pixels. Returns `None` when the buffer size does not
    /// match the dimensions.
    #[must_use]
    pub fn new(width: u32, height: u32, rgba: Vec<u8>) -> Option<Self> {
        (rgba.len() == width as usize * height as usize * 4).then(|| Self {
            width,
            height,
            rgba: Arc::new(rgba),
        })
    }

    /// A single-texel texture.
    #[must_use]
    pub fn solid(rgba: [u8; 4]) -> Self {
        Self {
            width: 1,
            height: 1,
            rgba: Arc::new(rgba.to_vec()),
        }
    }

    #[must_use]
    pub fn byte_len(&self) -> usize {
        self.rgba.len()
    }
}
