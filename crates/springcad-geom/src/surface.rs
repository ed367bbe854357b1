//! The helix-bearing surface that spring paths are drawn on.

use springcad_math::{Dir3, Point2, Point3, Vec3};

use crate::Surface;

/// The kind of a surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceKind {
    /// Cylindrical surface (zero taper).
    Cylinder,
    /// Conical surface with radius varying linearly along the axis.
    Cone,
}

/// Winding direction of a helix about its axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Handedness {
    /// Counter-clockwise when viewed from +axis looking down.
    #[default]
    Right,
    /// Clockwise when viewed from +axis looking down.
    Left,
}

impl Handedness {
    /// Sign applied to the chart angle when mapping to 3D.
    pub fn sign(self) -> f64 {
        match self {
            Handedness::Right => 1.0,
            Handedness::Left => -1.0,
        }
    }
}

/// A cylinder or cone about an axis, parameterized by angle and height.
///
/// `P(u, v) = center + r(v) * (cos(s*u) * ref_dir + sin(s*u) * y_dir) + v * axis`
///
/// with `r(v) = radius + v * taper` and `s = ±1` from the handedness, so
/// a left-handed spring is built from exactly the same chart geometry as
/// a right-handed one.
#[derive(Debug, Clone)]
pub struct HelixSurface {
    /// Point on the axis at `v = 0`.
    pub center: Point3,
    /// Unit direction along the axis.
    pub axis: Dir3,
    /// Reference direction for `u = 0` (perpendicular to axis).
    pub ref_dir: Dir3,
    /// Radius at `v = 0`.
    pub radius: f64,
    /// Radius change per unit height, `tan(cone half-angle)`.
    pub taper: f64,
    /// Winding direction.
    pub handedness: Handedness,
}

impl HelixSurface {
    /// Cylinder about +Z through the origin.
    pub fn cylinder(radius: f64, handedness: Handedness) -> Self {
        Self::cone(radius, 0.0, handedness)
    }

    /// Cone about +Z through the origin with the given half-angle (radians).
    pub fn cone(radius: f64, half_angle: f64, handedness: Handedness) -> Self {
        Self {
            center: Point3::origin(),
            axis: Dir3::new_normalize(Vec3::z()),
            ref_dir: Dir3::new_normalize(Vec3::x()),
            radius,
            taper: half_angle.tan(),
            handedness,
        }
    }

    /// Radius of the surface at height `v`.
    pub fn radius_at(&self, v: f64) -> f64 {
        self.radius + v * self.taper
    }

    fn y_dir(&self) -> Vec3 {
        self.axis.as_ref().cross(self.ref_dir.as_ref())
    }

    fn radial(&self, u: f64) -> Vec3 {
        let (sin_u, cos_u) = (self.handedness.sign() * u).sin_cos();
        cos_u * self.ref_dir.as_ref() + sin_u * self.y_dir()
    }
}

impl Surface for HelixSurface {
    fn evaluate(&self, uv: Point2) -> Point3 {
        self.center + self.radius_at(uv.y) * self.radial(uv.x) + uv.y * self.axis.as_ref()
    }

    fn normal(&self, uv: Point2) -> Dir3 {
        let n = self.d_du(uv).cross(&self.d_dv(uv)) * self.handedness.sign();
        Dir3::new_normalize(n)
    }

    fn d_du(&self, uv: Point2) -> Vec3 {
        let s = self.handedness.sign();
        let (sin_u, cos_u) = (s * uv.x).sin_cos();
        self.radius_at(uv.y) * s * (-sin_u * self.ref_dir.as_ref() + cos_u * self.y_dir())
    }

    fn d_dv(&self, uv: Point2) -> Vec3 {
        self.taper * self.radial(uv.x) + self.axis.as_ref()
    }

    fn surface_type(&self) -> SurfaceKind {
        if self.taper == 0.0 {
            SurfaceKind::Cylinder
        } else {
            SurfaceKind::Cone
        }
    }

    fn clone_box(&self) -> Box<dyn Surface> {
        Box::new(self.clone())
    }
}
