// SPDX-License-Identifier: MPL-2.0
//! Indexed triangle geometry.

use glam::Vec3;

/// Triangle list with per-vertex attributes.
///
/// All attribute vectors have the same length; indices address them.
#[derive(Debug, Clone, PartialEq)]
pub struct Geometry {
    pub positions: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    pub uvs: Vec<[f32; 2]>,
    pub indices: Vec<u32>,
}

impl Geometry {
    /// Builds geometry, generating smooth normals and zero UVs when absent.
    ///
    /// Attribute vectors of the wrong length are treated as absent.
    pub fn new(
        positions: Vec<[f32; 3]>,
        normals: Option<Vec<[f32; 3]>>,
        uvs: Option<Vec<[f32; 2]>>,
        indices: Vec<u32>,
    ) -> Self {
        let count = positions.len();
        let normals = normals
            .filter(|n| n.len() == count)
            .unwrap_or_else(|| smooth_normals(&positions, &indices));
        let uvs = uvs
            .filter(|uv| uv.len() == count)
            .unwrap_or_else(|| vec![[0.0, 0.0]; count]);

        Self {
            positions,
            normals,
            uvs,
            indices,
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// A unit cube centered on the origin, used as the loading placeholder.
    pub fn cube(size: f32) -> Self {
        let h = size * 0.5;
        let faces: [([f32; 3], [f32; 3], [f32; 3]); 6] = [
            ([0.0, 0.0, 1.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
            ([0.0, 0.0, -1.0], [-1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
            ([1.0, 0.0, 0.0], [0.0, 0.0, -1.0], [0.0, 1.0, 0.0]),
            ([-1.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, 1.0, 0.0]),
            ([0.0, 1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, -1.0]),
            ([0.0, -1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]),
        ];

        let mut positions = Vec::with_capacity(24);
        let mut normals = Vec::with_capacity(24);
        let mut uvs = Vec::with_capacity(24);
        let mut indices = Vec::with_capacity(36);

        for (normal, u, v) in faces {
            let n = Vec3::from_array(normal);
            let u = Vec3::from_array(u);
            let v = Vec3::from_array(v);
            let base = positions.len() as u32;
            for (du, dv) in [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)] {
                let p = (n + u * du + v * dv) * h;
                positions.push(p.to_array());
                normals.push(normal);
                uvs.push([(du + 1.0) * 0.5, (1.0 - dv) * 0.5]);
            }
            indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
        }

        Self {
            positions,
            normals,
            uvs,
            indices,
        }
    }
}

/// Area-weighted vertex normals accumulated from faces.
fn smooth_normals(positions: &[[f32; 3]], indices: &[u32]) -> Vec<[f32; 3]> {
    let mut acc = vec![Vec3::ZERO; positions.len()];
    for tri in indices.chunks_exact(3) {
        let [a, b, c] = [tri[0] as usize, tri[1] as usize, tri[2] as usize];
        if a >= positions.len() || b >= positions.len() || c >= positions.len() {
            continue;
        }
        let pa = Vec3::from_array(positions[a]);
        let pb = Vec3::from_array(positions[b]);
        let pc = Vec3::from_array(positions[c]);
        let face = (pb - pa).cross(pc - pa);
        acc[a] += face;
        acc[b] += face;
        acc[c] += face;
    }
    acc.into_iter()
        .map(|n| n.try_normalize().unwrap_or(Vec3::Y).to_array())
        .collect()
}

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn point(p: Vec3) -> Self {
        Self { min: p, max: p }
    }

    #[must_use]
    pub fn including(self, p: Vec3) -> Self {
        Self {
            min: self.min.min(p),
            max: self.max.max(p),
        }
    }

    #[must_use]
    pub fn union(self, other: Aabb) -> Self {
        Self {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Radius of the bounding sphere around [`Self::center`].
    pub fn radius(&self) -> f32 {
        (self.max - self.min).length() * 0.5
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{assert_abs_diff_eq, F32_EPSILON};

    #[test]
    fn missing_normals_are_generated_from_faces() {
        let geometry = Geometry::new(
            vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
            None,
            None,
            vec![0, 1, 2],
        );
        for normal in &geometry.normals {
            assert_abs_diff_eq!(normal[2], 1.0, epsilon = F32_EPSILON);
        }
        assert_eq!(geometry.uvs, vec![[0.0, 0.0]; 3]);
    }

    #[test]
    fn mismatched_attribute_lengths_are_ignored() {
        let geometry = Geometry::new(
            vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
            Some(vec![[0.0, 1.0, 0.0]]),
            Some(vec![[0.5, 0.5]]),
            vec![0, 1, 2],
        );
        assert_eq!(geometry.normals.len(), 3);
        assert_eq!(geometry.uvs.len(), 3);
    }

    #[test]
    fn cube_has_six_quads() {
        let cube = Geometry::cube(1.0);
        assert_eq!(cube.vertex_count(), 24);
        assert_eq!(cube.triangle_count(), 12);
        for p in &cube.positions {
            for c in p {
                assert_abs_diff_eq!(c.abs(), 0.5, epsilon = F32_EPSILON);
            }
        }
    }

    #[test]
    fn aabb_union_and_radius() {
        let a = Aabb::point(Vec3::ZERO);
        let b = Aabb::point(Vec3::new(2.0, 0.0, 0.0));
        let u = a.union(b);
        assert_eq!(u.center(), Vec3::new(1.0, 0.0, 0.0));
        assert_abs_diff_eq!(u.radius(), 1.0, epsilon = F32_EPSILON);
    }
}
