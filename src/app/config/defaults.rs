// SPDX-License-Identifier: MPL-2.0
//! Centralized default values for all configuration constants.
//!
//! # Categories
//!
//! - **Assets**: Asset root and model location
//! - **Model**: Mesh that receives the hardware material
//! - **Textures**: Decoded texture cache size
//! - **Hand-off**: Origin of the AR hand-off link

// ==========================================================================
// Asset Defaults
// ==========================================================================

/// Asset root used when neither CLI, environment nor settings name one.
pub const DEFAULT_ASSETS_DIR: &str = "assets";

/// Model file, relative to the asset root.
pub const MODEL_FILE: &str = "models/backpack.glb";

// ==========================================================================
// Model Defaults
// ==========================================================================

pub use crate::material::synthesis::DEFAULT_HARDWARE_MESH;

// ==========================================================================
// Texture Cache Defaults
// ==========================================================================

/// Default number of decoded textures kept in memory.
pub const DEFAULT_TEXTURE_CACHE_CAPACITY: usize = crate::material::cache::DEFAULT_CAPACITY;

/// Smallest accepted cache capacity (one body set plus the metal set).
pub const MIN_TEXTURE_CACHE_CAPACITY: usize = crate::material::cache::MIN_CAPACITY;

/// Largest accepted cache capacity.
pub const MAX_TEXTURE_CACHE_CAPACITY: usize = 256;

// ==========================================================================
// Hand-off Defaults
// ==========================================================================

/// Origin the hand-off link points at.
pub const DEFAULT_HANDOFF_ORIGIN: &str = "http://localhost:3000";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cache_capacity_bounds_are_consistent() {
        assert!(MIN_TEXTURE_CACHE_CAPACITY <= DEFAULT_TEXTURE_CACHE_CAPACITY);
        assert!(DEFAULT_TEXTURE_CACHE_CAPACITY <= MAX_TEXTURE_CACHE_CAPACITY);
        // All four texture sets fit by default.
        assert!(DEFAULT_TEXTURE_CACHE_CAPACITY >= 12);
    }

    #[test]
    fn handoff_origin_has_no_trailing_slash() {
        assert!(!DEFAULT_HANDOFF_ORIGIN.ends_with('/'));
    }
}
