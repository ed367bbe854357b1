//! Moving frames for orienting the wire profile along a path.

use springcad_geom::WireSample;
use springcad_math::{Dir3, Point2, Point3, Vec3};

/// An orthonormal frame at a point on a path.
///
/// - **Tangent**: the direction of travel
/// - **Normal**: the profile's local x axis
/// - **Binormal**: tangent × normal, the profile's local y axis
#[derive(Debug, Clone)]
pub struct FrenetFrame {
    /// Position on the path.
    pub position: Point3,
    /// Unit tangent vector.
    pub tangent: Dir3,
    /// Unit normal vector.
    pub normal: Dir3,
    /// Unit binormal vector.
    pub binormal: Dir3,
}

impl FrenetFrame {
    /// Frame at `position` with an arbitrary but consistent normal.
    pub fn with_arbitrary_normal(position: Point3, tangent: Dir3) -> Self {
        let arbitrary = if tangent.as_ref().x.abs() < 0.9 {
            Vec3::x()
        } else {
            Vec3::y()
        };
        let normal = Dir3::new_normalize(arbitrary.cross(tangent.as_ref()));
        let binormal = Dir3::new_normalize(tangent.as_ref().cross(normal.as_ref()));
        Self {
            position,
            tangent,
            normal,
            binormal,
        }
    }

    /// Same orientation, moved to `position`.
    pub fn moved_to(&self, position: Point3) -> Self {
        Self {
            position,
            ..self.clone()
        }
    }

    /// Rotate the frame by the fraction `f` of the minimal rotation that
    /// carries its tangent onto `target`.
    pub fn turned_toward(&self, target: &Dir3, f: f64) -> Self {
        let axis = self.tangent.as_ref().cross(target.as_ref());
        let sin = axis.norm();
        let cos = self.tangent.as_ref().dot(target.as_ref()).clamp(-1.0, 1.0);
        if sin < 1e-12 {
            return self.clone();
        }
        let k = axis / sin;
        let angle = f * sin.atan2(cos);
        let rotate = |v: &Vec3| -> Vec3 {
            let (s, c) = angle.sin_cos();
            c * v + s * k.cross(v) + (1.0 - c) * k.dot(v) * k
        };
        let tangent = Dir3::new_normalize(rotate(self.tangent.as_ref()));
        let normal = Dir3::new_normalize(rotate(self.normal.as_ref()));
        let binormal = Dir3::new_normalize(tangent.as_ref().cross(normal.as_ref()));
        Self {
            position: self.position,
            tangent,
            normal,
            binormal,
        }
    }

    /// Map a profile-plane point to world coordinates
    /// (x along the normal, y along the binormal).
    pub fn transform_point(&self, p: Point2) -> Point3 {
        self.position + p.x * self.normal.as_ref() + p.y * self.binormal.as_ref()
    }
}

/// Propagate rotation-minimizing frames over a sampled path using the
/// double reflection method.
///
/// Consecutive samples at the same position with different tangents
/// (a tangent break) get the minimal rotation between the two tangents
/// instead of a reflection.
pub fn rotation_minimizing_frames(samples: &[WireSample]) -> Vec<FrenetFrame> {
    let Some(first) = samples.first() else {
        return vec![];
    };
    let mut frames = Vec::with_capacity(samples.len());
    frames.push(FrenetFrame::with_arbitrary_normal(
        first.position,
        Dir3::new_normalize(first.tangent),
    ));

    for sample in &samples[1..] {
        let prev = &frames[frames.len() - 1];
        let xi = sample.position;
        let ti = Dir3::new_normalize(sample.tangent);

        let v1 = xi - prev.position;
        let c1 = v1.dot(&v1);
        if c1 < 1e-24 {
            let turned = prev.turned_toward(&ti, 1.0).moved_to(xi);
            frames.push(turned);
            continue;
        }

        // Reflect previous tangent and normal across the chord's bisector.
        let ri_l = prev.normal.as_ref() - (2.0 / c1) * v1.dot(prev.normal.as_ref()) * v1;
        let ti_l = prev.tangent.as_ref() - (2.0 / c1) * v1.dot(prev.tangent.as_ref()) * v1;

        // Second reflection to align with actual tangent.
        let v2 = ti.as_ref() - ti_l;
        let c2 = v2.dot(&v2);
        let ri = if c2 < 1e-24 {
            ri_l
        } else {
            ri_l - (2.0 / c2) * v2.dot(&ri_l) * v2
        };

        // Re-orthogonalize against drift.
        let ri = ri - ri.dot(ti.as_ref()) * ti.as_ref();
        let normal = Dir3::new_normalize(ri);
        let binormal = Dir3::new_normalize(ti.as_ref().cross(normal.as_ref()));
        frames.push(FrenetFrame {
            position: xi,
            tangent: ti,
            normal,
            binormal,
        });
    }
    frames
}

#[cfg(test)]
mod tests {
    use super::*;
    use springcad_geom::{CurveOnSurface, Handedness, HelixSurface, Line2d, Wire};
    use std::f64::consts::PI;

    fn sample(position: Point3, tangent: Vec3) -> WireSample {
        WireSample {
            position,
            tangent: tangent.normalize(),
            edge: 0,
        }
    }

    #[test]
    fn test_frames_on_straight_line_do_not_rotate() {
        let samples: Vec<_> = (0..5)
            .map(|i| sample(Point3::new(0.0, 0.0, i as f64), Vec3::z()))
            .collect();
        let frames = rotation_minimizing_frames(&samples);
        assert_eq!(frames.len(), 5);
        for f in &frames[1..] {
            assert!(f.normal.as_ref().dot(frames[0].normal.as_ref()) > 1.0 - 1e-12);
        }
    }

    #[test]
    fn test_frames_stay_orthonormal_on_helix() {
        let surface = HelixSurface::cylinder(5.0, Handedness::Right);
        let chart = Line2d::from_points(Point2::origin(), Point2::new(6.0 * PI, 12.0));
        let mut wire = Wire::new();
        wire.push(Box::new(CurveOnSurface::new(Box::new(chart), Box::new(surface))));
        let frames = rotation_minimizing_frames(&wire.sample(1.0));
        for f in &frames {
            assert!(f.tangent.as_ref().dot(f.normal.as_ref()).abs() < 1e-9);
            assert!(f.tangent.as_ref().dot(f.binormal.as_ref()).abs() < 1e-9);
            assert!(f.normal.as_ref().dot(f.binormal.as_ref()).abs() < 1e-9);
        }
    }

    #[test]
    fn test_tangent_break_turns_frame() {
        let samples = vec![
            sample(Point3::origin(), Vec3::x()),
            sample(Point3::new(1.0, 0.0, 0.0), Vec3::x()),
            sample(Point3::new(1.0, 0.0, 0.0), Vec3::y()),
        ];
        let frames = rotation_minimizing_frames(&samples);
        let last = &frames[2];
        assert!((last.tangent.as_ref() - Vec3::y()).norm() < 1e-12);
        assert!(last.tangent.as_ref().dot(last.normal.as_ref()).abs() < 1e-12);
    }

    #[test]
    fn test_turned_toward_half_way() {
        let f = FrenetFrame::with_arbitrary_normal(Point3::origin(), Dir3::new_normalize(Vec3::x()));
        let half = f.turned_toward(&Dir3::new_normalize(Vec3::y()), 0.5);
        let expected = Vec3::new(1.0, 1.0, 0.0).normalize();
        assert!((half.tangent.as_ref() - expected).norm() < 1e-12);
    }

    #[test]
    fn test_transform_point() {
        let frame = FrenetFrame {
            position: Point3::new(10.0, 0.0, 0.0),
            tangent: Dir3::new_normalize(Vec3::z()),
            normal: Dir3::new_normalize(Vec3::x()),
            binormal: Dir3::new_normalize(Vec3::y()),
        };
        let p = frame.transform_point(Point2::new(5.0, 3.0));
        assert!((p - Point3::new(15.0, 3.0, 0.0)).norm() < 1e-12);
    }
}
