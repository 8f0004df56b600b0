// SPDX-License-Identifier: MPL-2.0
//! Configurator state: the current configuration, the loaded scene, and the
//! texture bookkeeping that follows both.
//!
//! This is the single owner of the [`Configuration`]. Every effective
//! change runs exactly one synthesis pass over all meshes and opens a new
//! texture load generation; the caller turns the returned
//! [`LoadRequest`]s into asynchronous reads and feeds the results back
//! through [`Configurator::texture_loaded`].

use crate::domain::{ConfigChange, Configuration};
use crate::error::Error;
use crate::material::{
    LoadOutcome, LoadRequest, MaterialSynthesizer, SynthesisReport, TextureCache, TextureImage,
    TextureKey,
};
use crate::scene::SceneGraph;
use std::collections::BTreeSet;

/// Result of a synthesis pass together with the reads it requires.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Update {
    pub report: SynthesisReport,
    pub loads: Vec<LoadRequest>,
}

#[derive(Debug)]
pub struct Configurator {
    configuration: Configuration,
    scene: Option<SceneGraph>,
    synthesizer: MaterialSynthesizer,
    textures: TextureCache,
    /// Textures referenced by the latest pass.
    referenced: BTreeSet<TextureKey>,
    /// Bumped whenever the set of ready textures changes.
    texture_revision: u64,
}

impl Configurator {
    pub fn new(
        configuration: Configuration,
        hardware_mesh: impl Into<String>,
        cache_capacity: usize,
    ) -> Self {
        Self {
            configuration,
            scene: None,
            synthesizer: MaterialSynthesizer::new(hardware_mesh),
            textures: TextureCache::new(cache_capacity),
            referenced: BTreeSet::new(),
            texture_revision: 0,
        }
    }

    pub fn configuration(&self) -> Configuration {
        self.configuration
    }

    pub fn scene(&self) -> Option<&SceneGraph> {
        self.scene.as_ref()
    }

    pub fn synthesizer(&self) -> &MaterialSynthesizer {
        &self.synthesizer
    }

    pub fn texture_cache(&self) -> &TextureCache {
        &self.textures
    }

    /// Number of texture reads started but not yet completed.
    pub fn pending_loads(&self) -> usize {
        self.textures.pending()
    }

    pub fn texture_revision(&self) -> u64 {
        self.texture_revision
    }

    /// Installs a freshly loaded scene and synthesizes its materials.
    pub fn set_scene(&mut self, scene: SceneGraph) -> Update {
        let scene = self.scene.insert(scene);
        let report = self.synthesizer.synthesize(&self.configuration, scene);
        self.track(report)
    }

    /// Applies a single-field change.
    ///
    /// Returns `None` when the value is unchanged or no scene is loaded yet;
    /// in the latter case the change is kept and used when the scene arrives.
    pub fn apply(&mut self, change: ConfigChange) -> Option<Update> {
        let next = self.configuration.with(change);
        if next == self.configuration {
            return None;
        }
        tracing::info!(from = %self.configuration, to = %next, "configuration changed");
        self.configuration = next;
        self.resynthesize()
    }

    /// Replaces the whole configuration, e.g. from a hand-off link.
    pub fn replace(&mut self, configuration: Configuration) -> Option<Update> {
        if configuration == self.configuration {
            return None;
        }
        self.configuration = configuration;
        self.resynthesize()
    }

    fn resynthesize(&mut self) -> Option<Update> {
        let scene = self.scene.as_mut()?;
        let report = self.synthesizer.synthesize(&self.configuration, scene);
        Some(self.track(report))
    }

    /// Opens a load generation for the textures of a finished pass.
    fn track(&mut self, report: SynthesisReport) -> Update {
        self.textures.begin_generation();
        let loads = self.textures.plan(report.textures.iter().copied());
        self.referenced = report.textures.clone();
        self.texture_revision += 1;
        Update { report, loads }
    }

    /// Records a finished texture read.
    pub fn texture_loaded(
        &mut self,
        generation: u64,
        key: TextureKey,
        result: Result<TextureImage, Error>,
    ) -> LoadOutcome {
        let outcome = self.textures.complete(generation, key, result);
        if matches!(outcome, LoadOutcome::Stored { .. }) && self.referenced.contains(&key) {
            self.texture_revision += 1;
        }
        outcome
    }

    /// Decoded images for the textures the current materials reference.
    pub fn ready_textures(&self) -> Vec<(TextureKey, TextureImage)> {
        self.referenced
            .iter()
            .filter_map(|key| self.textures.peek(key).map(|image| (*key, image.clone())))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::palette::{body_tint, hardware_tint};
    use crate::domain::{Color, Hardware, Material};
    use crate::material::DEFAULT_HARDWARE_MESH;
    use crate::material::cache::DEFAULT_CAPACITY;
    use crate::test_utils::backpack_scene;

    fn configurator() -> Configurator {
        Configurator::new(Configuration::default(), DEFAULT_HARDWARE_MESH, DEFAULT_CAPACITY)
    }

    #[test]
    fn one_pass_per_effective_change() {
        let mut c = configurator();
        let first = c.set_scene(backpack_scene());
        assert_eq!(first.report.pass, 1);

        let update = c.apply(ConfigChange::Color(Color::Black)).unwrap();
        assert_eq!(update.report.pass, 2);
        assert_eq!(update.report.assigned, 3);
        assert_eq!(c.synthesizer().passes(), 2);
    }

    #[test]
    fn unchanged_value_triggers_no_pass() {
        let mut c = configurator();
        c.set_scene(backpack_scene());
        assert!(c.apply(ConfigChange::Material(Material::Denim)).is_none());
        assert_eq!(c.synthesizer().passes(), 1);
    }

    #[test]
    fn change_before_scene_is_applied_on_load() {
        let mut c = configurator();
        assert!(c.apply(ConfigChange::Hardware(Hardware::Gold)).is_none());
        c.set_scene(backpack_scene());
        let hardware = c.scene().unwrap().find_mesh("Mesh_1").unwrap();
        assert_eq!(hardware.material().unwrap().tint, hardware_tint(Hardware::Gold));
    }

    #[test]
    fn switching_hardware_changes_only_hardware_tint() {
        let mut c = configurator();
        c.set_scene(backpack_scene());
        c.apply(ConfigChange::Hardware(Hardware::Gold));

        let scene = c.scene().unwrap();
        for mesh in scene.meshes() {
            let tint = mesh.material().unwrap().tint;
            if mesh.name() == "Mesh_1" {
                assert_eq!(tint.to_hex(), "#FFD700");
            } else {
                assert_eq!(tint, body_tint(Color::Brown));
            }
        }
    }

    #[test]
    fn reselecting_a_material_reuses_cached_textures() {
        let mut c = configurator();
        let first = c.set_scene(backpack_scene());
        assert_eq!(first.loads.len(), 6);
        assert_eq!(c.pending_loads(), 6);
        for load in &first.loads {
            c.texture_loaded(load.generation, load.key, Ok(TextureImage::solid([0, 0, 0, 255])));
        }

        let to_leather = c.apply(ConfigChange::Material(Material::Leather)).unwrap();
        assert_eq!(to_leather.loads.len(), 3);
        let back = c.apply(ConfigChange::Material(Material::Denim)).unwrap();
        assert!(back.loads.is_empty());
        assert_eq!(c.ready_textures().len(), 6);
    }

    #[test]
    fn late_load_from_superseded_pass_does_not_count_as_ready() {
        let mut c = configurator();
        let first = c.set_scene(backpack_scene());
        c.apply(ConfigChange::Material(Material::Fabric));

        let revision = c.texture_revision();
        let denim = first
            .loads
            .iter()
            .find(|l| l.key.set == crate::material::TextureSet::Denim)
            .unwrap();
        c.texture_loaded(denim.generation, denim.key, Ok(TextureImage::solid([1, 1, 1, 255])));

        assert_eq!(c.texture_revision(), revision);
        assert!(c
            .ready_textures()
            .iter()
            .all(|(key, _)| key.set != crate::material::TextureSet::Denim));
    }
}
