// SPDX-License-Identifier: MPL-2.0
//! Binary glTF 2.0 (`.glb`) reader.
//!
//! Only what the configurator renders is read: the node hierarchy with
//! names and transforms, and triangle primitives with positions, normals,
//! first UV set and indices. Materials, skins and animations in the file
//! are ignored; materials are synthesized from the configuration instead.
//!
//! Names follow the three.js `GLTFLoader` so that model authors can rely on
//! the names they see in web viewers:
//! - every name is sanitized (whitespace becomes `_`, and `[ ] . : /` are
//!   dropped) and made unique across the file: the second use of `Mesh`
//!   becomes `Mesh_1`, the third `Mesh_2`;
//! - each primitive claims the mesh name (or `mesh_<index>`), so a mesh with
//!   several primitives yields `Mesh`, `Mesh_1`, ...;
//! - a single primitive is renamed after its node when the node has a name.

use super::{Geometry, MeshNode, SceneGraph, SceneNode};
use crate::error::{Error, Result};
use glam::{Mat4, Quat, Vec3};
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

const GLB_MAGIC: &[u8; 4] = b"glTF";
const GLB_VERSION: u32 = 2;
const CHUNK_JSON: u32 = 0x4E4F_534A;
const CHUNK_BIN: u32 = 0x004E_4942;
const HEADER_LEN: usize = 12;
const CHUNK_HEADER_LEN: usize = 8;

const COMPONENT_U8: u32 = 5121;
const COMPONENT_U16: u32 = 5123;
const COMPONENT_U32: u32 = 5125;
const COMPONENT_F32: u32 = 5126;
const MODE_TRIANGLES: u32 = 4;

// =============================================================================
// JSON document
// =============================================================================

#[derive(Debug, Deserialize)]
struct Document {
    #[serde(default)]
    scene: Option<usize>,
    #[serde(default)]
    scenes: Vec<DocScene>,
    #[serde(default)]
    nodes: Vec<DocNode>,
    #[serde(default)]
    meshes: Vec<DocMesh>,
    #[serde(default)]
    accessors: Vec<DocAccessor>,
    #[serde(default, rename = "bufferViews")]
    buffer_views: Vec<DocBufferView>,
}

#[derive(Debug, Deserialize)]
struct DocScene {
    #[serde(default)]
    nodes: Vec<usize>,
}

#[derive(Debug, Deserialize)]
struct DocNode {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    mesh: Option<usize>,
    #[serde(default)]
    children: Vec<usize>,
    #[serde(default)]
    matrix: Option<[f32; 16]>,
    #[serde(default)]
    translation: Option<[f32; 3]>,
    #[serde(default)]
    rotation: Option<[f32; 4]>,
    #[serde(default)]
    scale: Option<[f32; 3]>,
}

#[derive(Debug, Deserialize)]
struct DocMesh {
    #[serde(default)]
    name: Option<String>,
    primitives: Vec<DocPrimitive>,
}

#[derive(Debug, Deserialize)]
struct DocPrimitive {
    attributes: HashMap<String, usize>,
    #[serde(default)]
    indices: Option<usize>,
    #[serde(default)]
    mode: Option<u32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DocAccessor {
    #[serde(default)]
    buffer_view: Option<usize>,
    #[serde(default)]
    byte_offset: usize,
    component_type: u32,
    count: usize,
    #[serde(rename = "type")]
    kind: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DocBufferView {
    #[serde(default)]
    buffer: usize,
    #[serde(default)]
    byte_offset: usize,
    byte_length: usize,
    #[serde(default)]
    byte_stride: Option<usize>,
}

impl DocNode {
    fn local_transform(&self) -> Mat4 {
        if let Some(matrix) = self.matrix {
            return Mat4::from_cols_array(&matrix);
        }
        let translation = self.translation.map_or(Vec3::ZERO, Vec3::from_array);
        let rotation = self.rotation.map_or(Quat::IDENTITY, Quat::from_array);
        let scale = self.scale.map_or(Vec3::ONE, Vec3::from_array);
        Mat4::from_scale_rotation_translation(scale, rotation, translation)
    }
}

// =============================================================================
// Container
// =============================================================================

/// Reads and parses a `.glb` file.
pub fn load(path: &Path) -> Result<SceneGraph> {
    let bytes = fs::read(path)?;
    parse(&bytes)
}

/// Reads a `.glb` file on the blocking thread pool.
pub async fn load_async(path: PathBuf) -> Result<SceneGraph> {
    tokio::task::spawn_blocking(move || {
        let result = load(&path);
        match &result {
            Ok(scene) => tracing::info!(
                path = %path.display(),
                meshes = scene.meshes().len(),
                "loaded model"
            ),
            Err(err) => tracing::error!(path = %path.display(), error = %err, "model load failed"),
        }
        result
    })
    .await
    .map_err(|e| Error::Model(e.to_string()))?
}

/// Parses a `.glb` container held in memory.
pub fn parse(bytes: &[u8]) -> Result<SceneGraph> {
    let (json, bin) = split_chunks(bytes)?;
    let document: Document = serde_json::from_slice(json)?;
    Reader {
        document: &document,
        bin,
        names: UniqueNames::default(),
    }
    .build()
}

fn read_u32(bytes: &[u8], offset: usize) -> Result<u32> {
    bytes
        .get(offset..offset + 4)
        .map(|b| u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
        .ok_or_else(|| Error::Model("unexpected end of file".into()))
}

/// Sanitized, file-wide unique names, claimed in document order.
#[derive(Debug, Default)]
struct UniqueNames {
    used: HashMap<String, usize>,
}

impl UniqueNames {
    fn claim(&mut self, raw: &str) -> String {
        let name = sanitize_name(raw);
        match self.used.get_mut(&name) {
            Some(count) => {
                *count += 1;
                format!("{name}_{count}")
            }
            None => {
                self.used.insert(name.clone(), 0);
                name
            }
        }
    }
}

fn sanitize_name(raw: &str) -> String {
    raw.chars()
        .filter_map(|c| match c {
            '[' | ']' | '.' | ':' | '/' => None,
            c if c.is_whitespace() => Some('_'),
            c => Some(c),
        })
        .collect()
}

fn split_chunks(bytes: &[u8]) -> Result<(&[u8], &[u8])> {
    if bytes.len() < HEADER_LEN || &bytes[0..4] != GLB_MAGIC {
        return Err(Error::Model("not a binary glTF file".into()));
    }
    let version = read_u32(bytes, 4)?;
    if version != GLB_VERSION {
        return Err(Error::Model(format!("unsupported glTF version {version}")));
    }
    let declared = read_u32(bytes, 8)? as usize;
    if declared > bytes.len() {
        return Err(Error::Model("file is truncated".into()));
    }

    let mut json = None;
    let mut bin: &[u8] = &[];
    let mut offset = HEADER_LEN;
    while offset + CHUNK_HEADER_LEN <= declared {
        let length = read_u32(bytes, offset)? as usize;
        let kind = read_u32(bytes, offset + 4)?;
        let start = offset + CHUNK_HEADER_LEN;
        let data = start
            .checked_add(length)
            .and_then(|end| bytes.get(start..end))
            .ok_or_else(|| Error::Model("chunk exceeds file length".into()))?;
        match kind {
            CHUNK_JSON if json.is_none() => json = Some(data),
            CHUNK_BIN if bin.is_empty() => bin = data,
            _ => {}
        }
        offset = start + length;
    }

    let json = json.ok_or_else(|| Error::Model("missing JSON chunk".into()))?;
    Ok((json, bin))
}

// =============================================================================
// Scene assembly
// =============================================================================

struct Reader<'a> {
    document: &'a Document,
    bin: &'a [u8],
    names: UniqueNames,
}

impl Reader<'_> {
    fn build(mut self) -> Result<SceneGraph> {
        let roots = self.root_indices();
        let mut nodes = Vec::with_capacity(roots.len());
        for index in roots {
            nodes.push(self.node(index, 0)?);
        }
        let scene = SceneGraph::new(nodes);
        tracing::debug!(meshes = scene.mesh_count(), "parsed glb scene");
        Ok(scene)
    }

    fn root_indices(&self) -> Vec<usize> {
        let doc = self.document;
        if let Some(scene) = doc.scene.and_then(|i| doc.scenes.get(i)).or(doc.scenes.first()) {
            return scene.nodes.clone();
        }
        // No scene list: every node that is nobody's child is a root.
        let mut is_child = vec![false; doc.nodes.len()];
        for node in &doc.nodes {
            for &child in &node.children {
                if let Some(flag) = is_child.get_mut(child) {
                    *flag = true;
                }
            }
        }
        (0..doc.nodes.len()).filter(|&i| !is_child[i]).collect()
    }

    fn node(&mut self, index: usize, depth: usize) -> Result<SceneNode> {
        let document = self.document;
        // glTF forbids cycles; the depth bound keeps a malformed file from
        // recursing forever.
        if depth > document.nodes.len() {
            return Err(Error::Model("node hierarchy contains a cycle".into()));
        }
        let doc_node = document
            .nodes
            .get(index)
            .ok_or_else(|| Error::Model(format!("node {index} out of range")))?;

        let node_name = doc_node
            .name
            .as_deref()
            .filter(|n| !n.is_empty())
            .map(|n| self.names.claim(n));
        let mut node = SceneNode::new(node_name.clone().unwrap_or_default())
            .with_transform(doc_node.local_transform());

        if let Some(mesh_index) = doc_node.mesh {
            node.meshes = self.meshes(mesh_index, node_name)?;
        }
        for &child in &doc_node.children {
            node.children.push(self.node(child, depth + 1)?);
        }
        Ok(node)
    }

    fn meshes(&mut self, mesh_index: usize, node_name: Option<String>) -> Result<Vec<MeshNode>> {
        let document = self.document;
        let mesh = document
            .meshes
            .get(mesh_index)
            .ok_or_else(|| Error::Model(format!("mesh {mesh_index} out of range")))?;
        let mesh_name = mesh
            .name
            .clone()
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| format!("mesh_{mesh_index}"));

        let mut out = Vec::with_capacity(mesh.primitives.len());
        for (i, primitive) in mesh.primitives.iter().enumerate() {
            if primitive.mode.unwrap_or(MODE_TRIANGLES) != MODE_TRIANGLES {
                tracing::warn!(mesh = %mesh_name, primitive = i, "skipping non-triangle primitive");
                continue;
            }
            let name = self.names.claim(&mesh_name);
            out.push(MeshNode::new(name, self.geometry(primitive)?));
        }

        // A lone primitive stands in for its node and takes the node's name.
        if let ([single], Some(node_name), 1) =
            (out.as_mut_slice(), node_name, mesh.primitives.len())
        {
            single.name = node_name;
        }
        Ok(out)
    }

    fn geometry(&self, primitive: &DocPrimitive) -> Result<Geometry> {
        let position = primitive
            .attributes
            .get("POSITION")
            .ok_or_else(|| Error::Model("primitive without POSITION".into()))?;
        let positions = self.read_floats::<3>(*position)?;
        let normals = primitive
            .attributes
            .get("NORMAL")
            .map(|&a| self.read_floats::<3>(a))
            .transpose()?;
        let uvs = primitive
            .attributes
            .get("TEXCOORD_0")
            .map(|&a| self.read_floats::<2>(a))
            .transpose()?;
        let indices = match primitive.indices {
            Some(accessor) => self.read_indices(accessor)?,
            None => (0..positions.len() as u32).collect(),
        };
        if let Some(bad) = indices.iter().find(|&&i| i as usize >= positions.len()) {
            return Err(Error::Model(format!("index {bad} out of range")));
        }
        Ok(Geometry::new(positions, normals, uvs, indices))
    }

    /// Resolves an accessor to `(bytes starting at the first element, stride)`.
    fn accessor_bytes(&self, index: usize, element_size: usize) -> Result<(&[u8], usize, &DocAccessor)> {
        let accessor = self
            .document
            .accessors
            .get(index)
            .ok_or_else(|| Error::Model(format!("accessor {index} out of range")))?;
        let view_index = accessor
            .buffer_view
            .ok_or_else(|| Error::Model(format!("accessor {index} has no buffer view")))?;
        let view = self
            .document
            .buffer_views
            .get(view_index)
            .ok_or_else(|| Error::Model(format!("buffer view {view_index} out of range")))?;
        if view.buffer != 0 {
            return Err(Error::Model("external buffers are not supported".into()));
        }
        if self.bin.is_empty() {
            return Err(Error::Model("missing BIN chunk".into()));
        }

        // Every offset comes from the file, so all arithmetic is checked.
        let exceeds_view = || Error::Model(format!("accessor {index} exceeds buffer view"));
        let stride = view.byte_stride.unwrap_or(element_size);
        if stride < element_size {
            return Err(Error::Model(format!(
                "accessor {index}: byte stride {stride} is smaller than its {element_size}-byte elements"
            )));
        }
        let needed = match accessor.count {
            0 => 0,
            n => (n - 1)
                .checked_mul(stride)
                .and_then(|span| span.checked_add(element_size))
                .ok_or_else(exceeds_view)?,
        };
        let view_bytes = view
            .byte_offset
            .checked_add(view.byte_length)
            .and_then(|end| self.bin.get(view.byte_offset..end))
            .ok_or_else(|| Error::Model(format!("buffer view {view_index} exceeds buffer")))?;
        let bytes = accessor
            .byte_offset
            .checked_add(needed)
            .and_then(|end| view_bytes.get(accessor.byte_offset..end))
            .ok_or_else(exceeds_view)?;
        Ok((bytes, stride, accessor))
    }

    fn read_floats<const N: usize>(&self, index: usize) -> Result<Vec<[f32; N]>> {
        let (bytes, stride, accessor) = self.accessor_bytes(index, N * 4)?;
        let expected = match N {
            2 => "VEC2",
            3 => "VEC3",
            _ => "SCALAR",
        };
        if accessor.component_type != COMPONENT_F32 || accessor.kind != expected {
            return Err(Error::Model(format!(
                "accessor {index}: expected float {expected}, found {} {}",
                accessor.component_type, accessor.kind
            )));
        }
        Ok((0..accessor.count)
            .map(|i| {
                let base = i * stride;
                std::array::from_fn(|c| {
                    let o = base + c * 4;
                    f32::from_le_bytes([bytes[o], bytes[o + 1], bytes[o + 2], bytes[o + 3]])
                })
            })
            .collect())
    }

    fn read_indices(&self, index: usize) -> Result<Vec<u32>> {
        let component_type = self
            .document
            .accessors
            .get(index)
            .map(|a| a.component_type)
            .ok_or_else(|| Error::Model(format!("accessor {index} out of range")))?;
        let size = match component_type {
            COMPONENT_U8 => 1,
            COMPONENT_U16 => 2,
            COMPONENT_U32 => 4,
            other => {
                return Err(Error::Model(format!(
                    "accessor {index}: unsupported index type {other}"
                )))
            }
        };
        let (bytes, stride, accessor) = self.accessor_bytes(index, size)?;
        Ok((0..accessor.count)
            .map(|i| {
                let o = i * stride;
                match size {
                    1 => u32::from(bytes[o]),
                    2 => u32::from(u16::from_le_bytes([bytes[o], bytes[o + 1]])),
                    _ => u32::from_le_bytes([bytes[o], bytes[o + 1], bytes[o + 2], bytes[o + 3]]),
                }
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::GlbFixture;

    fn mesh_names(fixture: GlbFixture) -> Vec<String> {
        let scene = parse(&fixture.to_bytes()).expect("fixture should parse");
        scene.meshes().iter().map(|m| m.name().to_string()).collect()
    }

    /// A scene whose root nodes each carry the single-primitive mesh 1.
    fn flat_nodes(names: &[&str]) -> GlbFixture {
        let nodes: Vec<serde_json::Value> = names
            .iter()
            .map(|name| serde_json::json!({ "name": name, "mesh": 1 }))
            .collect();
        let roots: Vec<usize> = (0..names.len()).collect();
        GlbFixture::backpack().with_json(|doc| {
            doc["nodes"] = serde_json::Value::from(nodes);
            doc["scenes"] = serde_json::json!([{ "nodes": roots }]);
        })
    }

    #[test]
    fn multi_primitive_mesh_names_repeat_with_counter() {
        assert_eq!(
            mesh_names(GlbFixture::backpack()),
            vec!["Mesh", "Mesh_1", "Strap"]
        );
    }

    #[test]
    fn duplicate_node_names_are_numbered() {
        assert_eq!(
            mesh_names(flat_nodes(&["Mesh", "Mesh", "Mesh"])),
            vec!["Mesh", "Mesh_1", "Mesh_2"]
        );
    }

    #[test]
    fn whitespace_in_names_becomes_underscore() {
        let scene = parse(&flat_nodes(&["Mesh 1"]).to_bytes()).unwrap();
        assert!(scene.find_mesh(crate::material::DEFAULT_HARDWARE_MESH).is_some());
    }

    #[test]
    fn reserved_characters_are_dropped_from_names() {
        assert_eq!(
            mesh_names(flat_nodes(&["Strap.Left:[0]/a"])),
            vec!["StrapLeft0a"]
        );
    }

    #[test]
    fn unnamed_node_keeps_unique_mesh_name() {
        let fixture = GlbFixture::backpack().with_json(|doc| {
            doc["nodes"] = serde_json::json!([{ "mesh": 1 }, { "mesh": 1 }]);
            doc["scenes"] = serde_json::json!([{ "nodes": [0, 1] }]);
        });
        assert_eq!(mesh_names(fixture), vec!["StrapMesh", "StrapMesh_1"]);
    }

    #[test]
    fn sanitize_name_matches_loader_rules() {
        assert_eq!(sanitize_name("a b\tc"), "a_b_c");
        assert_eq!(sanitize_name("[x].y:z/w"), "xyzw");
    }

    #[test]
    fn node_translation_is_applied() {
        let bytes = GlbFixture::backpack().to_bytes();
        let scene = parse(&bytes).unwrap();
        let strap = scene.find_mesh("Strap").unwrap();
        assert_eq!(strap.world().transform_point3(Vec3::ZERO), Vec3::new(0.0, 2.0, 0.0));
    }

    #[test]
    fn geometry_is_read_from_bin_chunk() {
        let bytes = GlbFixture::backpack().to_bytes();
        let scene = parse(&bytes).unwrap();
        let mesh = scene.find_mesh("Mesh").unwrap();
        assert_eq!(mesh.geometry().vertex_count(), 3);
        assert_eq!(mesh.geometry().indices, vec![0, 1, 2]);
        assert_eq!(mesh.geometry().positions[1], [1.0, 0.0, 0.0]);
    }

    #[test]
    fn rejects_bad_magic() {
        let mut bytes = GlbFixture::backpack().to_bytes();
        bytes[0] = b'X';
        assert!(matches!(parse(&bytes), Err(Error::Model(_))));
    }

    #[test]
    fn rejects_unsupported_version() {
        let mut bytes = GlbFixture::backpack().to_bytes();
        bytes[4] = 1;
        match parse(&bytes) {
            Err(Error::Model(message)) => assert!(message.contains("version")),
            other => panic!("expected Model error, got {:?}", other),
        }
    }

    #[test]
    fn rejects_truncated_file() {
        let bytes = GlbFixture::backpack().to_bytes();
        assert!(parse(&bytes[..bytes.len() - 8]).is_err());
    }

    fn expect_model_error(fixture: GlbFixture, needle: &str) {
        let result = std::panic::catch_unwind(|| parse(&fixture.to_bytes()))
            .expect("malformed input must not panic");
        match result {
            Err(Error::Model(message)) => assert!(
                message.contains(needle),
                "expected {needle:?} in {message:?}"
            ),
            other => panic!("expected Model error, got {:?}", other),
        }
    }

    #[test]
    fn rejects_stride_that_overflows_accessor_span() {
        let fixture = GlbFixture::backpack().with_json(|doc| {
            doc["accessors"][0]["count"] = 5.into();
            doc["bufferViews"][0]["byteStride"] = (1u64 << 62).into();
        });
        expect_model_error(fixture, "accessor 0 exceeds buffer view");
    }

    #[test]
    fn rejects_count_larger_than_buffer_view() {
        let fixture = GlbFixture::backpack().with_json(|doc| {
            doc["accessors"][0]["count"] = u64::MAX.into();
        });
        expect_model_error(fixture, "accessor 0 exceeds buffer view");
    }

    #[test]
    fn rejects_out_of_range_accessor_offset() {
        let fixture = GlbFixture::backpack().with_json(|doc| {
            doc["accessors"][1]["byteOffset"] = u64::MAX.into();
        });
        expect_model_error(fixture, "accessor 1 exceeds buffer view");
    }

    #[test]
    fn rejects_out_of_range_buffer_view_offset() {
        let fixture = GlbFixture::backpack().with_json(|doc| {
            doc["bufferViews"][0]["byteOffset"] = u64::MAX.into();
        });
        expect_model_error(fixture, "buffer view 0 exceeds buffer");
    }

    #[test]
    fn rejects_stride_smaller_than_element() {
        let fixture = GlbFixture::backpack().with_json(|doc| {
            doc["bufferViews"][0]["byteStride"] = 4.into();
        });
        expect_model_error(fixture, "byte stride 4");
    }

    #[test]
    fn missing_bin_chunk_is_an_error() {
        let bytes = GlbFixture::backpack().without_bin().to_bytes();
        match parse(&bytes) {
            Err(Error::Model(message)) => assert!(message.contains("BIN")),
            other => panic!("expected Model error, got {:?}", other),
        }
    }

    #[test]
    fn load_reads_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("backpack.glb");
        fs::write(&path, GlbFixture::backpack().to_bytes()).unwrap();
        let scene = load(&path).unwrap();
        assert_eq!(scene.mesh_count(), 3);
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(load(&dir.path().join("nope.glb")), Err(Error::Io(_))));
    }

    #[tokio::test]
    async fn load_async_reads_on_blocking_pool() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("backpack.glb");
        fs::write(&path, GlbFixture::backpack().to_bytes()).unwrap();
        let scene = load_async(path).await.unwrap();
        assert!(scene.find_mesh("Mesh_1").is_some());
    }
}
