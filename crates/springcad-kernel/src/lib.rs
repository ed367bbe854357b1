#![warn(missing_docs)]

//! Triangle-mesh solids for springcad.
//!
//! A [`Solid`] is a closed, consistently wound [`TriangleMesh`]. The kernel
//! offers the handful of operations spring modelling needs: primitive
//! solids, rigid transforms, half-space clipping with capping, subtraction
//! of axis-aligned slab cutters, and [`Shape`] compounds of several solids.

mod bbox;
mod clip;
mod mesh;
pub mod primitives;

pub use bbox::Aabb3;
pub use clip::{clip_half_space, Plane};
pub use mesh::TriangleMesh;

use springcad_math::{Point3, Transform, Vec3};
use thiserror::Error;

/// Errors from solid construction and modification.
#[derive(Debug, Clone, Error)]
pub enum KernelError {
    /// The mesh has no triangles.
    #[error("solid has no triangles")]
    EmptySolid,

    /// The mesh is not closed.
    #[error("mesh is not closed: {boundary_edges} boundary edges")]
    OpenMesh {
        /// Number of unmatched directed edges.
        boundary_edges: usize,
    },

    /// The mesh has NaN or infinite coordinates.
    #[error("mesh has non-finite coordinates")]
    NonFinite,

    /// A cutter box cannot be handled as a planar slab cut.
    #[error("unsupported cutter: {0}")]
    UnsupportedCutter(String),

    /// The rim left by a plane cut does not close into loops.
    #[error("cut rim is open at vertex {0}")]
    OpenRim(u32),
}

/// Result type for kernel operations.
pub type Result<T> = std::result::Result<T, KernelError>;

/// A closed triangle-mesh solid.
#[derive(Debug, Clone)]
pub struct Solid {
    mesh: TriangleMesh,
}

impl Solid {
    /// Wrap a mesh, checking that it is non-empty, finite and closed.
    pub fn from_mesh(mesh: TriangleMesh) -> Result<Self> {
        if mesh.is_empty() {
            return Err(KernelError::EmptySolid);
        }
        if !mesh.is_finite() {
            return Err(KernelError::NonFinite);
        }
        let boundary_edges = mesh.boundary_edge_count();
        if boundary_edges > 0 {
            return Err(KernelError::OpenMesh { boundary_edges });
        }
        Ok(Self { mesh })
    }

    /// Axis-aligned box with minimum corner `origin`.
    pub fn cuboid(origin: Point3, size: Vec3) -> Result<Self> {
        Self::from_mesh(primitives::make_cuboid(origin, size))
    }

    /// Cylinder from `base` along `axis`.
    pub fn cylinder(
        base: Point3,
        axis: Vec3,
        length: f64,
        radius: f64,
        segments: usize,
    ) -> Result<Self> {
        Self::from_mesh(primitives::make_cylinder(
            base, axis, length, radius, segments,
        ))
    }

    /// The underlying mesh.
    pub fn mesh(&self) -> &TriangleMesh {
        &self.mesh
    }

    /// Consume the solid, returning its mesh.
    pub fn into_mesh(self) -> TriangleMesh {
        self.mesh
    }

    /// Enclosed volume.
    pub fn volume(&self) -> f64 {
        self.mesh.signed_volume()
    }

    /// Boundary area.
    pub fn surface_area(&self) -> f64 {
        self.mesh.surface_area()
    }

    /// Axis-aligned bounds.
    pub fn bounding_box(&self) -> Aabb3 {
        self.mesh.bounding_box()
    }

    /// Number of triangles in the boundary.
    pub fn num_triangles(&self) -> usize {
        self.mesh.num_triangles()
    }

    /// Apply an affine transform.
    pub fn transform(&self, t: &Transform) -> Self {
        let mut mesh = self.mesh.clone();
        mesh.transform(t);
        Self { mesh }
    }

    /// Translate by `(dx, dy, dz)`.
    pub fn translate(&self, dx: f64, dy: f64, dz: f64) -> Self {
        self.transform(&Transform::translation(dx, dy, dz))
    }

    /// Keep the part on the positive side of `plane`.
    pub fn clip(&self, plane: &Plane, snap: f64) -> Result<Self> {
        Self::from_mesh(clip_half_space(&self.mesh, plane, snap)?)
    }

    /// Subtract axis-aligned box cutters.
    ///
    /// Each box must cover the solid's XY footprint and reach past the
    /// solid in -z or +z, so the subtraction is a single plane cut at the
    /// box's inner face. Boxes that miss the solid are ignored.
    pub fn difference(&self, cutters: &[Aabb3], snap: f64) -> Result<Self> {
        let mut out = self.clone();
        for (i, cutter) in cutters.iter().enumerate() {
            let bb = out.bounding_box();
            if !cutter.overlaps(&bb) {
                continue;
            }
            if !cutter.covers_footprint(&bb) {
                return Err(KernelError::UnsupportedCutter(format!(
                    "cutter {i} does not cover the solid footprint"
                )));
            }
            let plane = if cutter.min.z <= bb.min.z && cutter.max.z < bb.max.z {
                Plane::new(Point3::new(0.0, 0.0, cutter.max.z), Vec3::z())
            } else if cutter.max.z >= bb.max.z && cutter.min.z > bb.min.z {
                Plane::new(Point3::new(0.0, 0.0, cutter.min.z), -Vec3::z())
            } else {
                return Err(KernelError::UnsupportedCutter(format!(
                    "cutter {i} must reach past exactly one end of the solid in z"
                )));
            };
            out = out.clip(&plane, snap)?;
        }
        Ok(out)
    }
}

/// The output of a modelling operation: nothing, one solid, or several
/// solids kept side by side.
#[derive(Debug, Clone, Default)]
pub enum Shape {
    /// No geometry.
    #[default]
    Empty,
    /// A single solid.
    Solid(Solid),
    /// Several solids, not fused.
    Compound(Vec<Solid>),
}

impl Shape {
    /// Build a compound, collapsing to `Empty` or `Solid` where possible.
    pub fn compound(mut solids: Vec<Solid>) -> Self {
        match solids.len() {
            0 => Shape::Empty,
            1 => Shape::Solid(solids.remove(0)),
            _ => Shape::Compound(solids),
        }
    }

    /// The solids making up this shape.
    pub fn solids(&self) -> &[Solid] {
        match self {
            Shape::Empty => &[],
            Shape::Solid(s) => std::slice::from_ref(s),
            Shape::Compound(v) => v,
        }
    }

    /// True when the shape has no geometry.
    pub fn is_empty(&self) -> bool {
        self.solids().is_empty()
    }

    /// Sum of the solids' volumes.
    pub fn volume(&self) -> f64 {
        self.solids().iter().map(Solid::volume).sum()
    }

    /// Union of the solids' bounds.
    pub fn bounding_box(&self) -> Aabb3 {
        self.solids()
            .iter()
            .fold(Aabb3::empty(), |acc, s| acc.union(&s.bounding_box()))
    }

    /// Total triangle count.
    pub fn num_triangles(&self) -> usize {
        self.solids().iter().map(Solid::num_triangles).sum()
    }

    /// All solids merged into one mesh.
    pub fn to_mesh(&self) -> TriangleMesh {
        let mut mesh = TriangleMesh::new();
        for s in self.solids() {
            mesh.merge(s.mesh());
        }
        mesh
    }
}

impl From<Solid> for Shape {
    fn from(s: Solid) -> Self {
        Shape::Solid(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn unit_column() -> Solid {
        Solid::cuboid(Point3::new(-1.0, -1.0, 0.0), Vec3::new(2.0, 2.0, 10.0)).unwrap()
    }

    #[test]
    fn test_from_mesh_rejects_open_mesh() {
        let mut mesh = primitives::make_cuboid(Point3::origin(), Vec3::new(1.0, 1.0, 1.0));
        mesh.triangles.pop();
        assert!(matches!(
            Solid::from_mesh(mesh),
            Err(KernelError::OpenMesh { .. })
        ));
        assert!(matches!(
            Solid::from_mesh(TriangleMesh::new()),
            Err(KernelError::EmptySolid)
        ));
    }

    #[test]
    fn test_difference_with_bottom_and_top_slabs() {
        let col = unit_column();
        let bottom = Aabb3::new(Point3::new(-5.0, -5.0, -3.0), Point3::new(5.0, 5.0, 1.0));
        let top = Aabb3::new(Point3::new(-5.0, -5.0, 8.0), Point3::new(5.0, 5.0, 13.0));
        let cut = col.difference(&[bottom, top], 1e-9).unwrap();
        assert_abs_diff_eq!(cut.volume(), 4.0 * 7.0, epsilon = 1e-9);
        let bb = cut.bounding_box();
        assert_abs_diff_eq!(bb.min.z, 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(bb.max.z, 8.0, epsilon = 1e-12);
    }

    #[test]
    fn test_difference_ignores_distant_cutter() {
        let col = unit_column();
        let far = Aabb3::new(Point3::new(-5.0, -5.0, 20.0), Point3::new(5.0, 5.0, 30.0));
        let cut = col.difference(&[far], 1e-9).unwrap();
        assert_abs_diff_eq!(cut.volume(), 40.0, epsilon = 1e-12);
    }

    #[test]
    fn test_difference_rejects_narrow_cutter() {
        let col = unit_column();
        let narrow = Aabb3::new(Point3::new(0.0, -5.0, -1.0), Point3::new(5.0, 5.0, 2.0));
        assert!(matches!(
            col.difference(&[narrow], 1e-9),
            Err(KernelError::UnsupportedCutter(_))
        ));
    }

    #[test]
    fn test_difference_rejects_interior_slab() {
        let col = unit_column();
        let mid = Aabb3::new(Point3::new(-5.0, -5.0, 4.0), Point3::new(5.0, 5.0, 6.0));
        assert!(col.difference(&[mid], 1e-9).is_err());
    }

    #[test]
    fn test_compound_collapses() {
        assert!(Shape::compound(vec![]).is_empty());
        let one = Shape::compound(vec![unit_column()]);
        assert!(matches!(one, Shape::Solid(_)));
        let two = Shape::compound(vec![unit_column(), unit_column().translate(5.0, 0.0, 0.0)]);
        assert_eq!(two.solids().len(), 2);
        assert_abs_diff_eq!(two.volume(), 80.0, epsilon = 1e-9);
        assert_abs_diff_eq!(two.bounding_box().max.x, 6.0, epsilon = 1e-12);
        assert_eq!(two.to_mesh().boundary_edge_count(), 0);
    }
}
