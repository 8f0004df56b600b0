// SPDX-License-Identifier: MPL-2.0
//! Material synthesis: configuration in, one material per mesh out.
//!
//! Every pass rebuilds the material of every mesh. The mesh whose name
//! equals the hardware mesh name gets the metal texture set tinted by the
//! hardware finish; every other mesh gets the texture set of the selected
//! body material tinted by the body color.

use super::texture::{TextureChannel, TextureKey, TextureSet};
use crate::domain::palette::{body_tint, hardware_tint};
use crate::domain::{Configuration, Rgb};
use crate::scene::SceneGraph;
use std::collections::BTreeSet;

/// Mesh name that receives the hardware material in the shipped model.
pub const DEFAULT_HARDWARE_MESH: &str = "Mesh_1";

pub const BODY_METALNESS: f32 = 0.5;
pub const BODY_ROUGHNESS: f32 = 0.5;
pub const HARDWARE_METALNESS: f32 = 0.8;
pub const HARDWARE_ROUGHNESS: f32 = 0.2;

/// Which rule produced a material.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaterialRole {
    Body,
    Hardware,
}

/// Physically based material with a base color, normal and ORM texture.
#[derive(Debug, Clone, PartialEq)]
pub struct PbrMaterial {
    pub role: MaterialRole,
    pub base_color: TextureKey,
    pub normal: TextureKey,
    pub occlusion_roughness_metallic: TextureKey,
    pub tint: Rgb,
    pub metalness: f32,
    pub roughness: f32,
    pub normal_scale: [f32; 2],
    /// Synthesis pass that created this material.
    pub pass: u64,
}

impl PbrMaterial {
    fn from_set(role: MaterialRole, set: TextureSet, tint: Rgb, pass: u64) -> Self {
        let (metalness, roughness) = match role {
            MaterialRole::Body => (BODY_METALNESS, BODY_ROUGHNESS),
            MaterialRole::Hardware => (HARDWARE_METALNESS, HARDWARE_ROUGHNESS),
        };
        Self {
            role,
            base_color: TextureKey::new(set, TextureChannel::BaseColor),
            normal: TextureKey::new(set, TextureChannel::Normal),
            occlusion_roughness_metallic: TextureKey::new(
                set,
                TextureChannel::OcclusionRoughnessMetallic,
            ),
            tint,
            metalness,
            roughness,
            normal_scale: [1.0, 1.0],
            pass,
        }
    }

    /// The three textures this material samples.
    pub fn textures(&self) -> [TextureKey; 3] {
        [
            self.base_color,
            self.normal,
            self.occlusion_roughness_metallic,
        ]
    }
}

/// Summary of one synthesis pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynthesisReport {
    pub pass: u64,
    /// Number of meshes that received a new material.
    pub assigned: usize,
    /// Textures referenced by the materials of this pass.
    pub textures: BTreeSet<TextureKey>,
}

/// Builds materials from a configuration.
#[derive(Debug, Clone)]
pub struct MaterialSynthesizer {
    hardware_mesh: String,
    passes: u64,
}

impl Default for MaterialSynthesizer {
    fn default() -> Self {
        Self::new(DEFAULT_HARDWARE_MESH)
    }
}

impl MaterialSynthesizer {
    pub fn new(hardware_mesh: impl Into<String>) -> Self {
        Self {
            hardware_mesh: hardware_mesh.into(),
            passes: 0,
        }
    }

    pub fn hardware_mesh(&self) -> &str {
        &self.hardware_mesh
    }

    /// Number of passes run so far.
    pub fn passes(&self) -> u64 {
        self.passes
    }

    #[must_use]
    pub fn body_material(config: &Configuration, pass: u64) -> PbrMaterial {
        PbrMaterial::from_set(
            MaterialRole::Body,
            TextureSet::for_material(config.material),
            body_tint(config.color),
            pass,
        )
    }

    #[must_use]
    pub fn hardware_material(config: &Configuration, pass: u64) -> PbrMaterial {
        PbrMaterial::from_set(
            MaterialRole::Hardware,
            TextureSet::Metall,
            hardware_tint(config.hardware),
            pass,
        )
    }

    /// Assigns a fresh material to every mesh of `scene`.
    pub fn synthesize(&mut self, config: &Configuration, scene: &mut SceneGraph) -> SynthesisReport {
        self.passes += 1;
        let pass = self.passes;
        let body = Self::body_material(config, pass);
        let hardware = Self::hardware_material(config, pass);

        let mut assigned = 0;
        let mut textures = BTreeSet::new();
        let hardware_mesh = self.hardware_mesh.as_str();
        scene.traverse_meshes_mut(|mesh| {
            let material = if mesh.name() == hardware_mesh {
                hardware.clone()
            } else {
                body.clone()
            };
            textures.extend(material.textures());
            mesh.set_material(material);
            assigned += 1;
        });

        tracing::debug!(pass, assigned, config = %config, "material synthesis pass");
        SynthesisReport {
            pass,
            assigned,
            textures,
        }
    }
}
