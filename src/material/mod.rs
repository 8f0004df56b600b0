// SPDX-License-Identifier: MPL-2.0
//! Configuration-driven materials.
//!
//! [`synthesis`] turns a [`Configuration`](crate::domain::Configuration)
//! into a [`PbrMaterial`] per mesh. Materials reference textures by
//! [`TextureKey`] only; decoded images live in the [`cache`] and are read
//! from disk by the [`loader`].

pub mod cache;
pub mod loader;
pub mod synthesis;
pub mod texture;

pub use cache::{LoadOutcome, LoadRequest, TextureCache};
pub use synthesis::{
    MaterialRole, MaterialSynthesizer, PbrMaterial, SynthesisReport, DEFAULT_HARDWARE_MESH,
};
pub use texture::{TextureChannel, TextureImage, TextureKey, TextureSet};
