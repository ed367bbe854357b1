#![warn(missing_docs)]

//! Math types for springcad geometry.
//!
//! Thin wrappers around nalgebra: points and vectors in the 3D model
//! space and in the 2D `(u, v)` chart of a helix-bearing surface, a 4x4
//! affine transform, and the tolerance bundle every construction step
//! compares against.

use nalgebra::{Matrix4, Unit, Vector2, Vector3};

/// A point in 3D space.
pub type Point3 = nalgebra::Point3<f64>;

/// A vector in 3D space.
pub type Vec3 = Vector3<f64>;

/// A unit (normalized) direction vector in 3D space.
pub type Dir3 = Unit<Vector3<f64>>;

/// A point in a 2D chart, `x = u` (angle) and `y = v` (height).
pub type Point2 = nalgebra::Point2<f64>;

/// A vector in 2D space.
pub type Vec2 = Vector2<f64>;

/// Z component of the cross product of two 2D vectors.
#[inline]
pub fn cross2(a: &Vec2, b: &Vec2) -> f64 {
    a.x * b.y - a.y * b.x
}

/// Left-hand perpendicular of a 2D vector, `(-y, x)`.
#[inline]
pub fn perp(v: &Vec2) -> Vec2 {
    Vec2::new(-v.y, v.x)
}

/// True when every coordinate of the point is finite.
#[inline]
pub fn is_finite2(p: &Point2) -> bool {
    p.x.is_finite() && p.y.is_finite()
}

/// True when every coordinate of the point is finite.
#[inline]
pub fn is_finite3(p: &Point3) -> bool {
    p.x.is_finite() && p.y.is_finite() && p.z.is_finite()
}

/// An affine map of model space, stored as a homogeneous matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct Transform {
    /// Homogeneous 4x4 matrix; the last row is `(0, 0, 0, 1)`.
    pub matrix: Matrix4<f64>,
}

impl Transform {
    /// The identity map.
    pub fn identity() -> Self {
        Self {
            matrix: Matrix4::identity(),
        }
    }

    /// Shift by `(dx, dy, dz)`.
    pub fn translation(dx: f64, dy: f64, dz: f64) -> Self {
        Self {
            matrix: Matrix4::new_translation(&Vec3::new(dx, dy, dz)),
        }
    }

    /// Map a point.
    pub fn apply_point(&self, p: &Point3) -> Point3 {
        self.matrix.transform_point(p)
    }

    /// True when the map reverses orientation; triangle windings must then
    /// be flipped.
    pub fn is_mirroring(&self) -> bool {
        self.matrix.fixed_view::<3, 3>(0, 0).determinant() < 0.0
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

/// Confusion tolerances shared by every construction step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tolerance {
    /// Distance below which two points coincide, in mm.
    pub linear: f64,
    /// Threshold on the cross product of unit directions below which they
    /// count as parallel.
    pub angular: f64,
}

impl Tolerance {
    /// 1e-7 mm linear, 1e-12 angular.
    pub const DEFAULT: Self = Self {
        linear: 1e-7,
        angular: 1e-12,
    };

    /// Given linear tolerance, default angular one.
    pub fn with_linear(linear: f64) -> Self {
        Self {
            linear,
            ..Self::DEFAULT
        }
    }

    /// True when `a` and `b` are closer than `linear`.
    pub fn points_equal(&self, a: &Point3, b: &Point3) -> bool {
        nalgebra::distance(a, b) < self.linear
    }
}

impl Default for Tolerance {
    fn default() -> Self {
        Self::DEFAULT
    }
}
