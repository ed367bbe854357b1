//! Concrete chart curves and 3D edges.

use std::f64::consts::PI;

use springcad_math::{Point2, Point3, Vec2, Vec3};

use crate::{Curve2d, Curve3d, CurveKind, Surface};

/// Samples per full turn used when sampling curves that wind about an axis.
pub(crate) const SEGMENTS_PER_TURN: usize = 48;

// =============================================================================
// Line2d
// =============================================================================

/// A chart line segment.
///
/// Parameterization: `P(t) = origin + t * direction`, `t ∈ [0, 1]`.
#[derive(Debug, Clone)]
pub struct Line2d {
    /// Starting point.
    pub origin: Point2,
    /// Direction (end minus start).
    pub direction: Vec2,
}

impl Line2d {
    /// Create from two endpoints.
    pub fn from_points(start: Point2, end: Point2) -> Self {
        Self {
            origin: start,
            direction: end - start,
        }
    }
}

impl Curve2d for Line2d {
    fn evaluate(&self, t: f64) -> Point2 {
        self.origin + t * self.direction
    }

    fn tangent(&self, _t: f64) -> Vec2 {
        self.direction
    }

    fn domain(&self) -> (f64, f64) {
        (0.0, 1.0)
    }

    fn clone_box(&self) -> Box<dyn Curve2d> {
        Box::new(self.clone())
    }
}

// =============================================================================
// Arc2d
// =============================================================================

/// A circular chart arc.
///
/// The angular range `first..last` is always increasing; `reversed`
/// records whether the curve runs from `last` back to `first`, so the
/// parameter `t ∈ [0, 1]` follows path order either way.
#[derive(Debug, Clone)]
pub struct Arc2d {
    /// Center of the circle.
    pub center: Point2,
    /// Radius.
    pub radius: f64,
    /// Lower end of the angular range (radians).
    pub first: f64,
    /// Upper end of the angular range (radians).
    pub last: f64,
    /// True when the curve runs from `last` to `first`.
    pub reversed: bool,
}

impl Arc2d {
    /// Angular extent of the arc (always non-negative).
    pub fn sweep_angle(&self) -> f64 {
        self.last - self.first
    }

    /// Curvature of the arc, `1 / radius`.
    pub fn curvature(&self) -> f64 {
        1.0 / self.radius
    }

    fn angle_at(&self, t: f64) -> f64 {
        if self.reversed {
            self.last - t * self.sweep_angle()
        } else {
            self.first + t * self.sweep_angle()
        }
    }
}

impl Curve2d for Arc2d {
    fn evaluate(&self, t: f64) -> Point2 {
        let (sin_a, cos_a) = self.angle_at(t).sin_cos();
        self.center + self.radius * Vec2::new(cos_a, sin_a)
    }

    fn tangent(&self, t: f64) -> Vec2 {
        let (sin_a, cos_a) = self.angle_at(t).sin_cos();
        let rate = if self.reversed {
            -self.sweep_angle()
        } else {
            self.sweep_angle()
        };
        self.radius * rate * Vec2::new(-sin_a, cos_a)
    }

    fn domain(&self) -> (f64, f64) {
        (0.0, 1.0)
    }

    fn clone_box(&self) -> Box<dyn Curve2d> {
        Box::new(self.clone())
    }
}

// =============================================================================
// Cubic pitch blend
// =============================================================================

/// A pitch-blending chart curve.
///
/// Over `turns` turns the local pitch eases from `start_pitch` to
/// `end_pitch` with a cubic profile, so the slope in the chart matches
/// both neighbours at the ends:
///
/// ```text
/// u(s) = u0 + s * turns * 2π
/// v(s) = v0 + turns * (p1 * s + (p2 - p1) * (s³ - s⁴ / 2))
/// ```
///
/// Total height gained is `turns * (p1 + p2) / 2`.
#[derive(Debug, Clone)]
pub struct CubicBlend2d {
    /// Chart point at `s = 0`.
    pub start: Point2,
    /// Turns covered by the blend.
    pub turns: f64,
    /// Pitch at `s = 0`.
    pub start_pitch: f64,
    /// Pitch at `s = 1`.
    pub end_pitch: f64,
}

impl CubicBlend2d {
    /// Height gained over the whole blend.
    pub fn height(&self) -> f64 {
        self.turns * 0.5 * (self.start_pitch + self.end_pitch)
    }

    /// Sample `samples` spans (`samples + 1` points) and fit a C¹ spline
    /// through them using the exact slopes at each sample.
    pub fn fit(&self, samples: usize) -> HermiteSpline2d {
        let n = samples.max(1);
        let mut points = Vec::with_capacity(n + 1);
        let mut tangents = Vec::with_capacity(n + 1);
        for i in 0..=n {
            let s = i as f64 / n as f64;
            points.push(self.evaluate(s));
            tangents.push(self.tangent(s));
        }
        HermiteSpline2d { points, tangents }
    }
}

impl Curve2d for CubicBlend2d {
    fn evaluate(&self, s: f64) -> Point2 {
        let dp = self.end_pitch - self.start_pitch;
        let rise = self.start_pitch * s + dp * (s.powi(3) - 0.5 * s.powi(4));
        Point2::new(
            self.start.x + s * self.turns * 2.0 * PI,
            self.start.y + self.turns * rise,
        )
    }

    fn tangent(&self, s: f64) -> Vec2 {
        let dp = self.end_pitch - self.start_pitch;
        let slope = self.start_pitch + dp * (3.0 * s * s - 2.0 * s.powi(3));
        Vec2::new(self.turns * 2.0 * PI, self.turns * slope)
    }

    fn domain(&self) -> (f64, f64) {
        (0.0, 1.0)
    }

    fn clone_box(&self) -> Box<dyn Curve2d> {
        Box::new(self.clone())
    }
}

/// Piecewise cubic Hermite chart curve over uniform knots on `[0, 1]`.
#[derive(Debug, Clone)]
pub struct HermiteSpline2d {
    /// Interpolated points, one per knot.
    pub points: Vec<Point2>,
    /// Derivatives with respect to the global parameter, one per knot.
    pub tangents: Vec<Vec2>,
}

impl HermiteSpline2d {
    fn span(&self, t: f64) -> (usize, f64, f64) {
        let spans = self.points.len().saturating_sub(1).max(1);
        let h = 1.0 / spans as f64;
        let scaled = t.clamp(0.0, 1.0) * spans as f64;
        let i = (scaled.floor() as usize).min(spans - 1);
        (i, scaled - i as f64, h)
    }
}

impl Curve2d for HermiteSpline2d {
    fn evaluate(&self, t: f64) -> Point2 {
        if self.points.len() < 2 {
            return self.points.first().copied().unwrap_or_else(Point2::origin);
        }
        let (i, s, h) = self.span(t);
        let (s2, s3) = (s * s, s * s * s);
        let h00 = 2.0 * s3 - 3.0 * s2 + 1.0;
        let h10 = s3 - 2.0 * s2 + s;
        let h01 = -2.0 * s3 + 3.0 * s2;
        let h11 = s3 - s2;
        let (p0, p1) = (self.points[i].coords, self.points[i + 1].coords);
        let (m0, m1) = (self.tangents[i] * h, self.tangents[i + 1] * h);
        Point2::from(h00 * p0 + h10 * m0 + h01 * p1 + h11 * m1)
    }

    fn tangent(&self, t: f64) -> Vec2 {
        if self.points.len() < 2 {
            return self.tangents.first().copied().unwrap_or_else(Vec2::zeros);
        }
        let (i, s, h) = self.span(t);
        let s2 = s * s;
        let d00 = 6.0 * s2 - 6.0 * s;
        let d10 = 3.0 * s2 - 4.0 * s + 1.0;
        let d01 = -6.0 * s2 + 6.0 * s;
        let d11 = 3.0 * s2 - 2.0 * s;
        let (p0, p1) = (self.points[i].coords, self.points[i + 1].coords);
        let (m0, m1) = (self.tangents[i] * h, self.tangents[i + 1] * h);
        (d00 * p0 + d10 * m0 + d01 * p1 + d11 * m1) / h
    }

    fn domain(&self) -> (f64, f64) {
        (0.0, 1.0)
    }

    fn clone_box(&self) -> Box<dyn Curve2d> {
        Box::new(self.clone())
    }
}

// =============================================================================
// Line3d
// =============================================================================

/// A 3D line segment.
///
/// Parameterization: `P(t) = origin + t * direction`, `t ∈ [0, 1]`.
#[derive(Debug, Clone)]
pub struct Line3d {
    /// Starting point.
    pub origin: Point3,
    /// Direction (end minus start).
    pub direction: Vec3,
}

impl Line3d {
    /// Create a line from two endpoints.
    pub fn from_points(start: Point3, end: Point3) -> Self {
        Self {
            origin: start,
            direction: end - start,
        }
    }
}

impl Curve3d for Line3d {
    fn evaluate(&self, t: f64) -> Point3 {
        self.origin + t * self.direction
    }

    fn tangent(&self, _t: f64) -> Vec3 {
        self.direction
    }

    fn domain(&self) -> (f64, f64) {
        (0.0, 1.0)
    }

    fn curve_type(&self) -> CurveKind {
        CurveKind::Line
    }

    fn clone_box(&self) -> Box<dyn Curve3d> {
        Box::new(self.clone())
    }

    fn suggested_segments(&self) -> usize {
        1
    }
}

// =============================================================================
// Curve on surface
// =============================================================================

/// A chart curve mapped onto a surface.
#[derive(Debug, Clone)]
pub struct CurveOnSurface {
    /// The curve in the surface's `(u, v)` chart.
    pub chart: Box<dyn Curve2d>,
    /// The carrying surface.
    pub surface: Box<dyn Surface>,
    segments: usize,
}

impl CurveOnSurface {
    /// Map `chart` onto `surface`.
    pub fn new(chart: Box<dyn Curve2d>, surface: Box<dyn Surface>) -> Self {
        let turns = (chart.end_point().x - chart.start_point().x).abs() / (2.0 * PI);
        let segments = ((turns * SEGMENTS_PER_TURN as f64).ceil() as usize).max(8);
        Self {
            chart,
            surface,
            segments,
        }
    }
}

impl Curve3d for CurveOnSurface {
    fn evaluate(&self, t: f64) -> Point3 {
        self.surface.evaluate(self.chart.evaluate(t))
    }

    fn tangent(&self, t: f64) -> Vec3 {
        let uv = self.chart.evaluate(t);
        let d = self.chart.tangent(t);
        self.surface.d_du(uv) * d.x + self.surface.d_dv(uv) * d.y
    }

    fn domain(&self) -> (f64, f64) {
        self.chart.domain()
    }

    fn curve_type(&self) -> CurveKind {
        CurveKind::OnSurface
    }

    fn clone_box(&self) -> Box<dyn Curve3d> {
        Box::new(self.clone())
    }

    fn suggested_segments(&self) -> usize {
        self.segments
    }
}
