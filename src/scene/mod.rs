// SPDX-License-Identifier: MPL-2.0
//! In-memory scene graph of named mesh nodes.
//!
//! The graph is a tree of [`SceneNode`]s. Each node may carry mesh
//! primitives ([`MeshNode`]) whose names are what material synthesis
//! matches against. World transforms are resolved once when the graph is
//! built, since nothing moves nodes afterwards.

pub mod geometry;
pub mod glb;

pub use geometry::{Aabb, Geometry};

use crate::material::PbrMaterial;
use glam::{Mat4, Vec3};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Identity of a loaded scene, used by the renderer to know when to
/// re-upload geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SceneId(u64);

impl SceneId {
    fn next() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(1);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

/// A renderable mesh primitive with its assigned material.
#[derive(Debug, Clone)]
pub struct MeshNode {
    name: String,
    geometry: Arc<Geometry>,
    world: Mat4,
    material: Option<PbrMaterial>,
}

impl MeshNode {
    pub fn new(name: impl Into<String>, geometry: Geometry) -> Self {
        Self {
            name: name.into(),
            geometry: Arc::new(geometry),
            world: Mat4::IDENTITY,
            material: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn geometry(&self) -> &Arc<Geometry> {
        &self.geometry
    }

    /// World transform, valid once the node is part of a [`SceneGraph`].
    pub fn world(&self) -> Mat4 {
        self.world
    }

    pub fn material(&self) -> Option<&PbrMaterial> {
        self.material.as_ref()
    }

    pub fn set_material(&mut self, material: PbrMaterial) {
        self.material = Some(material);
    }
}

/// A transform node in the scene tree.
#[derive(Debug, Clone)]
pub struct SceneNode {
    pub name: String,
    pub local: Mat4,
    pub meshes: Vec<MeshNode>,
    pub children: Vec<SceneNode>,
}

impl SceneNode {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            local: Mat4::IDENTITY,
            meshes: Vec::new(),
            children: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_transform(mut self, local: Mat4) -> Self {
        self.local = local;
        self
    }

    #[must_use]
    pub fn with_mesh(mut self, mesh: MeshNode) -> Self {
        self.meshes.push(mesh);
        self
    }

    #[must_use]
    pub fn with_child(mut self, child: SceneNode) -> Self {
        self.children.push(child);
        self
    }

    fn resolve_world(&mut self, parent: Mat4) {
        let world = parent * self.local;
        for mesh in &mut self.meshes {
            mesh.world = world;
        }
        for child in &mut self.children {
            child.resolve_world(world);
        }
    }

    fn visit<'a>(&'a self, out: &mut Vec<&'a MeshNode>) {
        out.extend(self.meshes.iter());
        for child in &self.children {
            child.visit(out);
        }
    }

    fn collect_mut<'a>(&'a mut self, out: &mut Vec<&'a mut MeshNode>) {
        out.extend(self.meshes.iter_mut());
        for child in &mut self.children {
            child.collect_mut(out);
        }
    }

    fn visit_mut(&mut self, f: &mut impl FnMut(&mut MeshNode)) {
        for mesh in &mut self.meshes {
            f(mesh);
        }
        for child in &mut self.children {
            child.visit_mut(f);
        }
    }
}

/// A loaded scene.
#[derive(Debug, Clone)]
pub struct SceneGraph {
    id: SceneId,
    roots: Vec<SceneNode>,
}

impl SceneGraph {
    /// Builds a graph from root nodes and resolves world transforms.
    pub fn new(mut roots: Vec<SceneNode>) -> Self {
        for root in &mut roots {
            root.resolve_world(Mat4::IDENTITY);
        }
        Self {
            id: SceneId::next(),
            roots,
        }
    }

    pub fn id(&self) -> SceneId {
        self.id
    }

    pub fn roots(&self) -> &[SceneNode] {
        &self.roots
    }

    /// Every mesh in depth-first order.
    pub fn meshes(&self) -> Vec<&MeshNode> {
        let mut out = Vec::new();
        for root in &self.roots {
            root.visit(&mut out);
        }
        out
    }

    /// Calls `f` on every mesh in depth-first order.
    pub fn traverse_meshes_mut(&mut self, mut f: impl FnMut(&mut MeshNode)) {
        for root in &mut self.roots {
            root.visit_mut(&mut f);
        }
    }

    /// Mutable handles to every mesh in depth-first order.
    pub fn meshes_mut(&mut self) -> Vec<&mut MeshNode> {
        let mut out = Vec::new();
        for root in &mut self.roots {
            root.collect_mut(&mut out);
        }
        out
    }

    pub fn mesh_count(&self) -> usize {
        self.meshes().len()
    }

    pub fn find_mesh(&self, name: &str) -> Option<&MeshNode> {
        self.meshes().into_iter().find(|mesh| mesh.name == name)
    }

    /// World-space bounds of all geometry, `None` for an empty scene.
    pub fn bounds(&self) -> Option<Aabb> {
        self.meshes()
            .into_iter()
            .filter_map(|mesh| {
                let mut points = mesh
                    .geometry
                    .positions
                    .iter()
                    .map(|p| mesh.world.transform_point3(Vec3::from_array(*p)));
                let first = points.next()?;
                Some(points.fold(Aabb::point(first), Aabb::including))
            })
            .reduce(Aabb::union)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle() -> Geometry {
        Geometry::new(
            vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
            None,
            None,
            vec![0, 1, 2],
        )
    }

    #[test]
    fn meshes_are_visited_depth_first() {
        let scene = SceneGraph::new(vec![SceneNode::new("root")
            .with_mesh(MeshNode::new("a", triangle()))
            .with_child(SceneNode::new("child").with_mesh(MeshNode::new("b", triangle())))
            .with_mesh(MeshNode::new("c", triangle()))]);

        let names: Vec<&str> = scene.meshes().iter().map(|m| m.name()).collect();
        assert_eq!(names, vec!["a", "c", "b"]);
    }

    #[test]
    fn mutable_traversal_matches_shared_order() {
        let mut scene = SceneGraph::new(vec![SceneNode::new("root")
            .with_child(SceneNode::new("child").with_mesh(MeshNode::new("b", triangle())))
            .with_mesh(MeshNode::new("a", triangle()))]);

        let names: Vec<String> = scene
            .meshes_mut()
            .into_iter()
            .map(|m| m.name().to_string())
            .collect();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn world_transforms_compose_parent_first() {
        let scene = SceneGraph::new(vec![SceneNode::new("root")
            .with_transform(Mat4::from_translation(Vec3::X))
            .with_child(
                SceneNode::new("child")
                    .with_transform(Mat4::from_translation(Vec3::Y))
                    .with_mesh(MeshNode::new("m", triangle())),
            )]);

        let mesh = scene.find_mesh("m").unwrap();
        assert_eq!(mesh.world().transform_point3(Vec3::ZERO), Vec3::new(1.0, 1.0, 0.0));
    }

    #[test]
    fn bounds_cover_transformed_geometry() {
        let scene = SceneGraph::new(vec![SceneNode::new("root")
            .with_transform(Mat4::from_translation(Vec3::new(0.0, 0.0, 2.0)))
            .with_mesh(MeshNode::new("m", triangle()))]);

        let bounds = scene.bounds().unwrap();
        assert_eq!(bounds.min, Vec3::new(0.0, 0.0, 2.0));
        assert_eq!(bounds.max, Vec3::new(1.0, 1.0, 2.0));
    }

    #[test]
    fn empty_scene_has_no_bounds() {
        assert!(SceneGraph::new(Vec::new()).bounds().is_none());
    }

    #[test]
    fn each_graph_gets_a_fresh_id() {
        let a = SceneGraph::new(Vec::new());
        let b = SceneGraph::new(Vec::new());
        assert_ne!(a.id(), b.id());
    }
}
