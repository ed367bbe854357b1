//! Indexed triangle meshes with outward-facing winding.

use std::collections::HashMap;

use springcad_math::{is_finite3, Point3, Transform, Vec3};

use crate::Aabb3;

/// Indexed triangle mesh in f64.
///
/// Triangles are wound counter-clockwise when viewed from outside, so for
/// a closed mesh the signed volume is positive.
#[derive(Debug, Clone, Default)]
pub struct TriangleMesh {
    /// Vertex positions.
    pub positions: Vec<Point3>,
    /// Triangles as index triples into `positions`.
    pub triangles: Vec<[u32; 3]>,
}

impl TriangleMesh {
    /// Create an empty mesh.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of triangles.
    pub fn num_triangles(&self) -> usize {
        self.triangles.len()
    }

    /// Number of vertices.
    pub fn num_vertices(&self) -> usize {
        self.positions.len()
    }

    /// True when the mesh has no triangles.
    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    /// Append a vertex and return its index.
    pub fn add_vertex(&mut self, p: Point3) -> u32 {
        self.positions.push(p);
        (self.positions.len() - 1) as u32
    }

    /// Append a triangle.
    pub fn add_triangle(&mut self, a: u32, b: u32, c: u32) {
        self.triangles.push([a, b, c]);
    }

    /// Merge another mesh into this one.
    pub fn merge(&mut self, other: &TriangleMesh) {
        let offset = self.num_vertices() as u32;
        self.positions.extend_from_slice(&other.positions);
        self.triangles.extend(
            other
                .triangles
                .iter()
                .map(|t| [t[0] + offset, t[1] + offset, t[2] + offset]),
        );
    }

    /// Apply an affine transform, reversing windings if it mirrors.
    pub fn transform(&mut self, t: &Transform) {
        for p in &mut self.positions {
            *p = t.apply_point(p);
        }
        if t.is_mirroring() {
            for tri in &mut self.triangles {
                tri.swap(1, 2);
            }
        }
    }

    /// Corner positions of triangle `i`.
    pub fn triangle(&self, i: usize) -> [Point3; 3] {
        let [a, b, c] = self.triangles[i];
        [
            self.positions[a as usize],
            self.positions[b as usize],
            self.positions[c as usize],
        ]
    }

    /// Signed enclosed volume (positive for outward winding).
    pub fn signed_volume(&self) -> f64 {
        let mut vol = 0.0;
        for i in 0..self.triangles.len() {
            let [a, b, c] = self.triangle(i);
            vol += a.coords.dot(&b.coords.cross(&c.coords));
        }
        vol / 6.0
    }

    /// Total triangle area.
    pub fn surface_area(&self) -> f64 {
        (0..self.triangles.len())
            .map(|i| {
                let [a, b, c] = self.triangle(i);
                0.5 * (b - a).cross(&(c - a)).norm()
            })
            .sum()
    }

    /// Area-weighted sum of triangle normals; zero for a closed mesh.
    pub fn normal_sum(&self) -> Vec3 {
        (0..self.triangles.len())
            .map(|i| {
                let [a, b, c] = self.triangle(i);
                0.5 * (b - a).cross(&(c - a))
            })
            .sum()
    }

    /// Axis-aligned bounds of all vertices referenced by triangles.
    pub fn bounding_box(&self) -> Aabb3 {
        let mut bb = Aabb3::empty();
        for tri in &self.triangles {
            for &i in tri {
                bb.include_point(&self.positions[i as usize]);
            }
        }
        bb
    }

    /// Number of directed edges without an opposite partner.
    ///
    /// Zero means every edge is shared by exactly one pair of
    /// consistently-wound triangles: the mesh is closed and oriented.
    pub fn boundary_edge_count(&self) -> usize {
        let mut balance: HashMap<(u32, u32), i32> = HashMap::new();
        for tri in &self.triangles {
            for k in 0..3 {
                let (a, b) = (tri[k], tri[(k + 1) % 3]);
                if a < b {
                    *balance.entry((a, b)).or_insert(0) += 1;
                } else {
                    *balance.entry((b, a)).or_insert(0) -= 1;
                }
            }
        }
        balance.values().map(|v| v.unsigned_abs() as usize).sum()
    }

    /// True when every position is finite.
    pub fn is_finite(&self) -> bool {
        self.positions.iter().all(is_finite3)
    }
}
