//! 2D construction helpers in the `(u, v)` chart.
//!
//! Lines, line–line intersection, symmetric-point reflection and the
//! tangent arc used to round the corner between two helix slopes.
//! Parallel inputs are not errors here: they are reported through the
//! [`Intersection::Degenerate`] and [`TangentArc::Line`] variants so the
//! caller can branch on them explicitly.

use std::f64::consts::PI;

use springcad_math::{cross2, is_finite2, perp, Point2, Tolerance, Vec2};

use crate::{Arc2d, GeomError, Line2d, Result};

/// An infinite chart line with unit direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartLine {
    /// A point on the line.
    pub origin: Point2,
    /// Unit direction.
    pub direction: Vec2,
}

impl ChartLine {
    /// Line through `origin` along `direction` (normalized here).
    pub fn new(origin: Point2, direction: Vec2) -> Result<Self> {
        let len = direction.norm();
        if len <= 0.0 || !len.is_finite() {
            return Err(GeomError::ZeroDirection);
        }
        Ok(Self {
            origin,
            direction: direction / len,
        })
    }

    /// Point at signed distance `s` from the origin.
    pub fn point_at(&self, s: f64) -> Point2 {
        self.origin + s * self.direction
    }

    /// The line through `p` perpendicular to this one.
    pub fn normal_through(&self, p: Point2) -> ChartLine {
        ChartLine {
            origin: p,
            direction: perp(&self.direction),
        }
    }
}

/// Line through two points; direction is `normalize(p2 - p1)`.
pub fn line_through(p1: Point2, p2: Point2) -> Result<ChartLine> {
    if (p2 - p1).norm() < f64::EPSILON * (1.0 + p1.coords.norm()) {
        return Err(GeomError::CoincidentPoints(p1.x, p1.y));
    }
    ChartLine::new(p1, p2 - p1)
}

/// Outcome of intersecting two chart lines.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Intersection {
    /// The lines cross at `point`, which lies at distance `s` along the
    /// first line and `t` along the second.
    Point {
        /// Intersection point.
        point: Point2,
        /// Signed distance along the first line.
        s: f64,
        /// Signed distance along the second line.
        t: f64,
    },
    /// The lines are parallel (or coincident); join with a straight segment.
    Degenerate,
}

/// Intersect two infinite lines by solving
/// `a.origin + s * a.dir = b.origin + t * b.dir`.
///
/// The 2×2 determinant is `cross(a.dir, b.dir)`; below the angular
/// tolerance the lines count as parallel.
pub fn intersect(a: &ChartLine, b: &ChartLine, tol: &Tolerance) -> Intersection {
    let det = cross2(&a.direction, &b.direction);
    if det.abs() < tol.angular {
        return Intersection::Degenerate;
    }
    let w = b.origin - a.origin;
    let s = cross2(&w, &b.direction) / det;
    let t = cross2(&w, &a.direction) / det;
    let point = a.point_at(s);
    if !is_finite2(&point) {
        return Intersection::Degenerate;
    }
    Intersection::Point { point, s, t }
}

/// Mirror `p1` through `corner` onto the ray from `corner` along `dir2`.
///
/// The returned point lies at the same distance from `corner` as `p1`,
/// which is where a circle tangent to both rays must touch the second.
pub fn reflect_symmetric(p1: Point2, corner: Point2, dir2: &Vec2) -> Point2 {
    let d = dir2.normalize();
    corner + (corner - p1).norm() * d
}

/// Result of a tangent-arc construction.
#[derive(Debug, Clone)]
pub enum TangentArc {
    /// A circular arc tangent to both directions.
    Arc(Arc2d),
    /// The directions are parallel: a straight join with zero curvature.
    Line(Line2d),
    /// Radii measured from the two tangent points disagree, or the normals
    /// failed to meet. `fallback` is the straight chord between the points.
    Degenerate {
        /// Straight chord usable as a fallback.
        fallback: Line2d,
        /// Difference between the two radii (NaN when the normals were parallel).
        radius_gap: f64,
    },
}

impl TangentArc {
    /// Chart point where the construction ends.
    pub fn end_point(&self) -> Point2 {
        use crate::Curve2d;
        match self {
            TangentArc::Arc(arc) => arc.end_point(),
            TangentArc::Line(line) => line.end_point(),
            TangentArc::Degenerate { fallback, .. } => fallback.end_point(),
        }
    }
}

/// Build the arc tangent to `dir1` at `p1` that turns onto the line
/// through `p2` along `dir2`.
///
/// The true second tangent point is the reflection of `p1` through the
/// corner where the two lines meet; the center is where the normals at
/// the two tangent points cross. The arc always runs from `p1` toward the
/// second tangent point.
///
/// The construction runs in coordinates centered on the corner so nearly
/// parallel directions do not lose precision to the magnitude of the chart
/// coordinates. An arc whose sagitta is below the linear tolerance is
/// returned as a straight [`TangentArc::Line`].
///
/// When the arc's endpoints straddle a `π` jump in polar angle the second
/// angle is shifted by `±2π` so the shorter arc is taken, and the range is
/// stored increasing with a `reversed` flag.
pub fn tangent_arc(p1: Point2, dir1: Vec2, p2: Point2, dir2: Vec2, tol: &Tolerance) -> TangentArc {
    let straight = Line2d::from_points(p1, p2);
    let (line1, line2) = match (ChartLine::new(p1, dir1), ChartLine::new(p2, dir2)) {
        (Ok(a), Ok(b)) => (a, b),
        _ => return TangentArc::Line(straight),
    };
    if cross2(&line1.direction, &line2.direction).abs() < tol.angular {
        return TangentArc::Line(straight);
    }
    let corner = match intersect(&line1, &line2, tol) {
        Intersection::Point { point, .. } => point,
        Intersection::Degenerate => return TangentArc::Line(straight),
    };

    // Sagitta of the arc, R (1 - cos(θ/2)) = |p1 - corner| tan(θ/4).
    let deflection = cross2(&line1.direction, &line2.direction)
        .atan2(line1.direction.dot(&line2.direction))
        .abs();
    if (p1 - corner).norm() * (0.25 * deflection).tan() < tol.linear {
        return TangentArc::Line(straight);
    }

    // Corner-local frame.
    let origin = Point2::origin();
    let local1 = origin + (p1 - corner);
    let local_q = reflect_symmetric(local1, origin, &line2.direction);
    let q = corner + local_q.coords;
    let chord = Line2d::from_points(p1, q);

    let normal1 = line1.normal_through(local1);
    let normal2 = line2.normal_through(local_q);
    let local_center = match intersect(&normal1, &normal2, tol) {
        Intersection::Point { point, .. } => point,
        Intersection::Degenerate => {
            return TangentArc::Degenerate {
                fallback: chord,
                radius_gap: f64::NAN,
            }
        }
    };
    let to_p1 = local1 - local_center;
    let to_q = local_q - local_center;
    let r1 = to_p1.norm();
    let r2 = to_q.norm();
    if !r1.is_finite() || r1 <= tol.linear || (r1 - r2).abs() > tol.linear {
        return TangentArc::Degenerate {
            fallback: chord,
            radius_gap: r1 - r2,
        };
    }

    let a1 = to_p1.y.atan2(to_p1.x);
    let mut a2 = to_q.y.atan2(to_q.x);
    if a2 - a1 > PI {
        a2 -= 2.0 * PI;
    } else if a1 - a2 > PI {
        a2 += 2.0 * PI;
    }
    let (first, last, reversed) = if a2 >= a1 {
        (a1, a2, false)
    } else {
        (a2, a1, true)
    };
    TangentArc::Arc(Arc2d {
        center: corner + local_center.coords,
        radius: r1,
        first,
        last,
        reversed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Curve2d;
    use approx::assert_abs_diff_eq;

    fn tol() -> Tolerance {
        Tolerance::DEFAULT
    }

    #[test]
    fn test_line_through_normalizes() {
        let l = line_through(Point2::new(1.0, 1.0), Point2::new(4.0, 5.0)).unwrap();
        assert_abs_diff_eq!(l.direction.norm(), 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(l.direction.x, 0.6, epsilon = 1e-12);
    }

    #[test]
    fn test_line_through_rejects_coincident_points() {
        let p = Point2::new(2.0, 3.0);
        assert!(matches!(
            line_through(p, p),
            Err(GeomError::CoincidentPoints(..))
        ));
    }

    #[test]
    fn test_intersect_crossing_lines() {
        let a = ChartLine::new(Point2::origin(), Vec2::new(1.0, 0.0)).unwrap();
        let b = ChartLine::new(Point2::new(3.0, -2.0), Vec2::new(0.0, 1.0)).unwrap();
        match intersect(&a, &b, &tol()) {
            Intersection::Point { point, s, t } => {
                assert_abs_diff_eq!(point.x, 3.0, epsilon = 1e-12);
                assert_abs_diff_eq!(point.y, 0.0, epsilon = 1e-12);
                assert_abs_diff_eq!(s, 3.0, epsilon = 1e-12);
                assert_abs_diff_eq!(t, 2.0, epsilon = 1e-12);
            }
            Intersection::Degenerate => panic!("expected a crossing"),
        }
    }

    #[test]
    fn test_intersect_parallel_is_degenerate() {
        let a = ChartLine::new(Point2::origin(), Vec2::new(2.0 * PI, 1.0)).unwrap();
        let b = ChartLine::new(Point2::new(0.0, 5.0), Vec2::new(2.0 * PI, 1.0)).unwrap();
        assert_eq!(intersect(&a, &b, &tol()), Intersection::Degenerate);
    }

    #[test]
    fn test_reflect_symmetric_keeps_distance() {
        let q = reflect_symmetric(Point2::new(-2.0, 0.0), Point2::origin(), &Vec2::new(0.0, 3.0));
        assert_abs_diff_eq!(q.x, 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(q.y, 2.0, epsilon = 1e-12);
    }

    #[test]
    fn test_tangent_arc_quarter_turn() {
        // Rays along +x into the origin, then along +y out of it.
        let arc = tangent_arc(
            Point2::new(-1.0, 0.0),
            Vec2::new(1.0, 0.0),
            Point2::new(0.0, 5.0),
            Vec2::new(0.0, 1.0),
            &tol(),
        );
        match arc {
            TangentArc::Arc(a) => {
                assert_abs_diff_eq!(a.radius, 1.0, epsilon = 1e-12);
                assert_abs_diff_eq!(a.center.x, -1.0, epsilon = 1e-12);
                assert_abs_diff_eq!(a.center.y, 1.0, epsilon = 1e-12);
                assert_abs_diff_eq!(a.sweep_angle(), PI / 2.0, epsilon = 1e-12);
                let end = a.end_point();
                assert_abs_diff_eq!(end.x, 0.0, epsilon = 1e-12);
                assert_abs_diff_eq!(end.y, 1.0, epsilon = 1e-12);
                let t0 = a.tangent(0.0).normalize();
                let t1 = a.tangent(1.0).normalize();
                assert_abs_diff_eq!(t0.x, 1.0, epsilon = 1e-12);
                assert_abs_diff_eq!(t1.y, 1.0, epsilon = 1e-12);
            }
            other => panic!("expected an arc, got {other:?}"),
        }
    }

    #[test]
    fn test_tangent_arc_right_turn_is_reversed() {
        let arc = tangent_arc(
            Point2::new(-1.0, 0.0),
            Vec2::new(1.0, 0.0),
            Point2::new(0.0, -5.0),
            Vec2::new(0.0, -1.0),
            &tol(),
        );
        match arc {
            TangentArc::Arc(a) => {
                assert!(a.reversed);
                assert!(a.first < a.last);
                let start = a.start_point();
                assert_abs_diff_eq!(start.x, -1.0, epsilon = 1e-12);
                assert_abs_diff_eq!(start.y, 0.0, epsilon = 1e-12);
                let end = a.end_point();
                assert_abs_diff_eq!(end.y, -1.0, epsilon = 1e-12);
                assert!(a.tangent(1.0).normalize().y < -0.999);
            }
            other => panic!("expected an arc, got {other:?}"),
        }
    }

    #[test]
    fn test_tangent_arc_wraps_across_pi() {
        // Unit circle about the origin, counter-clockwise from 135° to 225°:
        // the polar angles straddle ±π and the shorter arc must be kept.
        let h = std::f64::consts::FRAC_1_SQRT_2;
        let p1 = Point2::new(-h, h);
        let q = Point2::new(-h, -h);
        let dir2 = Vec2::new(1.0, -1.0);
        let arc = tangent_arc(p1, Vec2::new(-1.0, -1.0), q + 3.0 * dir2, dir2, &tol());
        match arc {
            TangentArc::Arc(a) => {
                assert!(!a.reversed);
                assert_abs_diff_eq!(a.radius, 1.0, epsilon = 1e-9);
                assert_abs_diff_eq!(a.sweep_angle(), PI / 2.0, epsilon = 1e-9);
                assert_abs_diff_eq!(a.end_point().x, -h, epsilon = 1e-9);
                assert_abs_diff_eq!(a.end_point().y, -h, epsilon = 1e-9);
                assert!(a.evaluate(0.5).x < -0.999);
            }
            other => panic!("expected an arc, got {other:?}"),
        }
    }

    #[test]
    fn test_equal_pitches_degenerate_to_line() {
        let dir = Vec2::new(2.0 * PI, 3.0);
        let p1 = Point2::new(1.0, 1.0);
        let p2 = p1 + 0.5 * dir;
        match tangent_arc(p1, dir, p2, dir, &tol()) {
            TangentArc::Line(line) => {
                assert_abs_diff_eq!(line.end_point().x, p2.x, epsilon = 1e-12);
                assert_abs_diff_eq!(line.end_point().y, p2.y, epsilon = 1e-12);
                assert_abs_diff_eq!(cross2(&line.direction, &dir), 0.0, epsilon = 1e-12);
            }
            other => panic!("expected a line, got {other:?}"),
        }
    }

    #[test]
    fn test_nearly_equal_pitches_far_from_origin() {
        let corner = Point2::new(40.0 * PI, 30.0);
        let dir1 = Vec2::new(2.0 * PI, 1.0);
        for (delta, expect_arc) in [(1e-5, true), (1e-9, false), (1e-11, false)] {
            let dir2 = Vec2::new(2.0 * PI, 1.0 + delta);
            let p1 = corner - 0.25 * dir1;
            let p2 = corner + 0.25 * dir2;
            match tangent_arc(p1, dir1, p2, dir2, &tol()) {
                TangentArc::Arc(a) => {
                    assert!(expect_arc, "{delta}: imperceptible arc kept");
                    assert_abs_diff_eq!(a.start_point().x, p1.x, epsilon = 1e-8);
                    assert_abs_diff_eq!(a.start_point().y, p1.y, epsilon = 1e-8);
                    let t0 = a.tangent(0.0).normalize();
                    assert_abs_diff_eq!(cross2(&t0, &dir1.normalize()), 0.0, epsilon = 1e-9);
                }
                TangentArc::Line(line) => {
                    assert!(!expect_arc, "{delta}: visible arc flattened");
                    assert_eq!(line.start_point(), p1);
                    assert_abs_diff_eq!((line.end_point() - p2).norm(), 0.0, epsilon = 1e-12);
                }
                other => panic!("{delta}: unexpected {other:?}"),
            }
        }
    }
}
