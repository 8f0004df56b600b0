// SPDX-License-Identifier: MPL-2.0
//! Test utilities: float assertions and in-memory model fixtures.

// Re-export approx macros for convenient use in tests
pub use approx::{assert_abs_diff_eq, assert_relative_eq};

use crate::scene::{Geometry, MeshNode, SceneGraph, SceneNode};

/// Default epsilon for f32 comparisons.
pub const F32_EPSILON: f32 = 1e-6;

fn triangle() -> Geometry {
    Geometry::new(
        vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
        None,
        None,
        vec![0, 1, 2],
    )
}

/// A scene shaped like the shipped backpack model: two body meshes and
/// the hardware mesh `Mesh_1`.
pub fn backpack_scene() -> SceneGraph {
    SceneGraph::new(vec![SceneNode::new("Backpack")
        .with_mesh(MeshNode::new("Mesh", triangle()))
        .with_mesh(MeshNode::new("Mesh_1", triangle()))
        .with_child(SceneNode::new("Strap").with_mesh(MeshNode::new("Strap", triangle())))])
}

/// Builder for small `.glb` files.
pub struct GlbFixture {
    document: serde_json::Value,
    include_bin: bool,
}

impl GlbFixture {
    /// Node `Backpack` with a two-primitive mesh `Mesh`, and a child node
    /// `Strap` translated by (0, 2, 0) with a single-primitive mesh.
    ///
    /// The BIN chunk holds one triangle: 36 bytes of positions followed by
    /// three `u16` indices.
    pub fn backpack() -> Self {
        let document = serde_json::json!({
            "asset": { "version": "2.0" },
            "scene": 0,
            "scenes": [{ "nodes": [0] }],
            "nodes": [
                { "name": "Backpack", "mesh": 0, "children": [1] },
                { "name": "Strap", "mesh": 1, "translation": [0.0, 2.0, 0.0] }
            ],
            "meshes": [
                {
                    "name": "Mesh",
                    "primitives": [
                        { "attributes": { "POSITION": 0 }, "indices": 1 },
                        { "attributes": { "POSITION": 0 }, "indices": 1, "mode": 4 }
                    ]
                },
                {
                    "name": "StrapMesh",
                    "primitives": [{ "attributes": { "POSITION": 0 } }]
                }
            ],
            "accessors": [
                { "bufferView": 0, "componentType": 5126, "count": 3, "type": "VEC3" },
                { "bufferView": 1, "componentType": 5123, "count": 3, "type": "SCALAR" }
            ],
            "bufferViews": [
                { "buffer": 0, "byteOffset": 0, "byteLength": 36 },
                { "buffer": 0, "byteOffset": 36, "byteLength": 6 }
            ],
            "buffers": [{ "byteLength": 44 }]
        });
        Self {
            document,
            include_bin: true,
        }
    }

    pub fn without_bin(mut self) -> Self {
        self.include_bin = false;
        self
    }

    /// Applies `edit` to the JSON document before it is encoded.
    pub fn with_json(mut self, edit: impl FnOnce(&mut serde_json::Value)) -> Self {
        edit(&mut self.document);
        self
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bin = Vec::new();
        for p in [[0.0f32, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]] {
            for c in p {
                bin.extend_from_slice(&c.to_le_bytes());
            }
        }
        for i in [0u16, 1, 2] {
            bin.extend_from_slice(&i.to_le_bytes());
        }
        while bin.len() % 4 != 0 {
            bin.push(0);
        }

        let mut json = serde_json::to_vec(&self.document).expect("fixture JSON serializes");
        while json.len() % 4 != 0 {
            json.push(b' ');
        }

        let mut total = 12 + 8 + json.len();
        if self.include_bin {
            total += 8 + bin.len();
        }

        let mut out = Vec::with_capacity(total);
        out.extend_from_slice(b"glTF");
        out.extend_from_slice(&2u32.to_le_bytes());
        out.extend_from_slice(&(total as u32).to_le_bytes());
        out.extend_from_slice(&(json.len() as u32).to_le_bytes());
        out.extend_from_slice(&0x4E4F_534Au32.to_le_bytes());
        out.extend_from_slice(&json);
        if self.include_bin {
            out.extend_from_slice(&(bin.len() as u32).to_le_bytes());
            out.extend_from_slice(&0x004E_4942u32.to_le_bytes());
            out.extend_from_slice(&bin);
        }
        out
    }
}
