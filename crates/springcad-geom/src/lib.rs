#![warn(missing_docs)]

//! Curve and surface types for springcad.
//!
//! Spring paths are designed in the unrolled `(u, v)` chart of a
//! helix-bearing surface (u = angle traversed, v = height traversed) and
//! mapped onto that surface to produce 3D edges. This crate provides:
//!
//! - the [`Curve2d`], [`Curve3d`] and [`Surface`] traits,
//! - chart curves: [`Line2d`], [`Arc2d`], [`CubicBlend2d`], [`HermiteSpline2d`],
//! - the [`HelixSurface`] (cylinder or cone, either handedness),
//! - [`CurveOnSurface`] and [`Line3d`] 3D edges, assembled into a [`Wire`],
//! - the 2D construction helpers in [`primitives`].

mod curves;
pub mod primitives;
mod surface;
mod wire;

pub use curves::{Arc2d, CubicBlend2d, CurveOnSurface, HermiteSpline2d, Line2d, Line3d};
pub use primitives::{ChartLine, Intersection, TangentArc};
pub use surface::{Handedness, HelixSurface, SurfaceKind};
pub use wire::{Wire, WireSample};

use springcad_math::{Dir3, Point2, Point3, Vec2, Vec3};
use thiserror::Error;

/// Errors from curve and wire construction.
#[derive(Debug, Clone, Error)]
pub enum GeomError {
    /// Two points that must be distinct coincide.
    #[error("coincident points at ({0:.6}, {1:.6})")]
    CoincidentPoints(f64, f64),

    /// A direction vector has zero length.
    #[error("zero-length direction")]
    ZeroDirection,

    /// A computed coordinate is NaN or infinite.
    #[error("non-finite coordinate in {0}")]
    NonFinite(&'static str),

    /// Consecutive wire edges do not share an endpoint.
    #[error("wire is not continuous at edge {index}: gap of {gap:.3e} mm")]
    Gap {
        /// Index of the edge whose start misses the previous end.
        index: usize,
        /// Distance between the two endpoints.
        gap: f64,
    },

    /// A wire has no edges.
    #[error("wire has no edges")]
    EmptyWire,
}

/// Result type for geometry operations.
pub type Result<T> = std::result::Result<T, GeomError>;

// =============================================================================
// Curve traits
// =============================================================================

/// The kind of a 3D curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CurveKind {
    /// Straight line.
    Line,
    /// Chart curve mapped onto a surface.
    OnSurface,
}

/// A parametric curve in 3D space.
pub trait Curve3d: Send + Sync + std::fmt::Debug {
    /// Evaluate the curve at parameter `t` to get a 3D point.
    fn evaluate(&self, t: f64) -> Point3;

    /// Tangent vector at parameter `t` (derivative, not normalized).
    fn tangent(&self, t: f64) -> Vec3;

    /// Parameter domain `(t_min, t_max)`.
    fn domain(&self) -> (f64, f64);

    /// The kind of this curve.
    fn curve_type(&self) -> CurveKind;

    /// Clone into a boxed trait object.
    fn clone_box(&self) -> Box<dyn Curve3d>;

    /// Suggested number of segments for smooth sampling.
    ///
    /// Curves that wind around an axis override this. Default returns 32.
    fn suggested_segments(&self) -> usize {
        32
    }

    /// Arc length over the full domain.
    ///
    /// Composite 5-point Gauss-Legendre over `suggested_segments` spans,
    /// exact for lines and accurate to ~1e-10 relative for helices.
    fn length(&self) -> f64 {
        let (t0, t1) = self.domain();
        let n = self.suggested_segments().max(1);
        let h = (t1 - t0) / n as f64;
        let mut total = 0.0;
        for i in 0..n {
            let a = t0 + i as f64 * h;
            for (x, w) in GAUSS_5 {
                let t = a + 0.5 * h * (x + 1.0);
                total += 0.5 * h * w * self.tangent(t).norm();
            }
        }
        total
    }

    /// Point at the start of the domain.
    fn start_point(&self) -> Point3 {
        self.evaluate(self.domain().0)
    }

    /// Point at the end of the domain.
    fn end_point(&self) -> Point3 {
        self.evaluate(self.domain().1)
    }
}

impl Clone for Box<dyn Curve3d> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}

/// A parametric curve in a surface's 2D chart.
pub trait Curve2d: Send + Sync + std::fmt::Debug {
    /// Evaluate the curve at parameter `t` to get a chart point.
    fn evaluate(&self, t: f64) -> Point2;

    /// Tangent vector at parameter `t`.
    fn tangent(&self, t: f64) -> Vec2;

    /// Parameter domain `(t_min, t_max)`.
    fn domain(&self) -> (f64, f64);

    /// Clone into a boxed trait object.
    fn clone_box(&self) -> Box<dyn Curve2d>;

    /// Point at the start of the domain.
    fn start_point(&self) -> Point2 {
        self.evaluate(self.domain().0)
    }

    /// Point at the end of the domain.
    fn end_point(&self) -> Point2 {
        self.evaluate(self.domain().1)
    }
}

impl Clone for Box<dyn Curve2d> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}

/// A parametric surface in 3D space.
pub trait Surface: Send + Sync + std::fmt::Debug {
    /// Evaluate the surface at chart point `(u, v)`.
    fn evaluate(&self, uv: Point2) -> Point3;

    /// Unit surface normal at `(u, v)`.
    fn normal(&self, uv: Point2) -> Dir3;

    /// Partial derivative with respect to u at `(u, v)`.
    fn d_du(&self, uv: Point2) -> Vec3;

    /// Partial derivative with respect to v at `(u, v)`.
    fn d_dv(&self, uv: Point2) -> Vec3;

    /// The kind of this surface.
    fn surface_type(&self) -> SurfaceKind;

    /// Clone this surface into a boxed trait object.
    fn clone_box(&self) -> Box<dyn Surface>;
}

impl Clone for Box<dyn Surface> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}

/// Nodes and weights of 5-point Gauss-Legendre quadrature on `[-1, 1]`.
const GAUSS_5: [(f64, f64); 5] = [
    (0.0, 0.568_888_888_888_888_9),
    (-0.538_469_310_105_683_1, 0.478_628_670_499_366_5),
    (0.538_469_310_105_683_1, 0.478_628_670_499_366_5),
    (-0.906_179_845_938_664, 0.236_926_885_056_189_1),
    (0.906_179_845_938_664, 0.236_926_885_056_189_1),
];

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::PI;

    #[test]
    fn test_line_length_is_exact() {
        let line = Line3d::from_points(Point3::origin(), Point3::new(3.0, 4.0, 0.0));
        assert_relative_eq!(line.length(), 5.0, epsilon = 1e-12);
    }

    #[test]
    fn test_helix_length_matches_closed_form() {
        let surface = HelixSurface::cylinder(4.5, Handedness::Right);
        let chart = Line2d::from_points(Point2::new(0.0, 0.0), Point2::new(10.0 * 2.0 * PI, 49.0));
        let edge = CurveOnSurface::new(Box::new(chart), Box::new(surface));
        let expected = 10.0 * ((PI * 9.0).powi(2) + 4.9_f64.powi(2)).sqrt();
        assert_relative_eq!(edge.length(), expected, max_relative = 1e-9);
    }
}
