//! Closed primitive solids: cuboid and cylinder.

use std::f64::consts::PI;

use springcad_math::{Point3, Vec3};

use crate::TriangleMesh;

/// Build a cuboid with minimum corner `origin` and edge lengths `size`.
///
/// Vertex layout:
/// ```text
///     v4----v5
///    /|    /|
///   v7----v6|    z
///   | v0--|-v1   | y
///   |/    |/     |/
///   v3----v2     +---x
/// ```
/// (v0 at `origin`, v1 along +x, v3 along +y.)
pub fn make_cuboid(origin: Point3, size: Vec3) -> TriangleMesh {
    let mut mesh = TriangleMesh::new();
    let (sx, sy, sz) = (size.x, size.y, size.z);
    let corners = [
        (0.0, 0.0, 0.0),
        (sx, 0.0, 0.0),
        (sx, sy, 0.0),
        (0.0, sy, 0.0),
        (0.0, 0.0, sz),
        (sx, 0.0, sz),
        (sx, sy, sz),
        (0.0, sy, sz),
    ];
    for (x, y, z) in corners {
        mesh.add_vertex(origin + Vec3::new(x, y, z));
    }

    // Counter-clockwise when viewed from outside.
    let faces: [[u32; 4]; 6] = [
        [0, 3, 2, 1], // bottom (-z)
        [4, 5, 6, 7], // top (+z)
        [0, 1, 5, 4], // front (-y)
        [2, 3, 7, 6], // back (+y)
        [0, 4, 7, 3], // left (-x)
        [1, 2, 6, 5], // right (+x)
    ];
    for [a, b, c, d] in faces {
        mesh.add_triangle(a, b, c);
        mesh.add_triangle(a, c, d);
    }
    mesh
}

/// Build a cylinder of `radius` from `base` along `axis` for `length`,
/// approximated by `segments` sides.
pub fn make_cylinder(
    base: Point3,
    axis: Vec3,
    length: f64,
    radius: f64,
    segments: usize,
) -> TriangleMesh {
    let n = segments.max(3);
    let dir = axis.normalize();
    let arbitrary = if dir.x.abs() < 0.9 { Vec3::x() } else { Vec3::y() };
    let e1 = arbitrary.cross(&dir).normalize();
    let e2 = dir.cross(&e1);
    let top = base + length * dir;

    let mut mesh = TriangleMesh::new();
    let ring = |center: Point3, mesh: &mut TriangleMesh| -> Vec<u32> {
        (0..n)
            .map(|j| {
                let (s, c) = (2.0 * PI * j as f64 / n as f64).sin_cos();
                mesh.add_vertex(center + radius * (c * e1 + s * e2))
            })
            .collect()
    };
    let bottom = ring(base, &mut mesh);
    let upper = ring(top, &mut mesh);
    let cb = mesh.add_vertex(base);
    let ct = mesh.add_vertex(top);

    for j in 0..n {
        let k = (j + 1) % n;
        mesh.add_triangle(bottom[j], bottom[k], upper[k]);
        mesh.add_triangle(bottom[j], upper[k], upper[j]);
        mesh.add_triangle(cb, bottom[k], bottom[j]);
        mesh.add_triangle(ct, upper[j], upper[k]);
    }
    mesh
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_cuboid_is_closed_with_exact_volume() {
        let m = make_cuboid(Point3::new(-1.0, 2.0, 3.0), Vec3::new(2.0, 3.0, 4.0));
        assert_eq!(m.num_triangles(), 12);
        assert_eq!(m.boundary_edge_count(), 0);
        assert_abs_diff_eq!(m.signed_volume(), 24.0, epsilon = 1e-12);
        let bb = m.bounding_box();
        assert_abs_diff_eq!(bb.max.z, 7.0, epsilon = 1e-12);
    }

    #[test]
    fn test_cylinder_volume_approaches_pi_r2_h() {
        let m = make_cylinder(Point3::origin(), Vec3::new(1.0, 1.0, 0.0), 10.0, 2.0, 128);
        assert_eq!(m.boundary_edge_count(), 0);
        let exact = PI * 4.0 * 10.0;
        let vol = m.signed_volume();
        assert!(vol > 0.0);
        assert!((vol - exact).abs() / exact < 1e-3, "volume {vol}");
    }

    #[test]
    fn test_cylinder_ends_at_base_plus_axis() {
        let m = make_cylinder(Point3::new(1.0, 0.0, 0.0), Vec3::z(), 5.0, 0.5, 16);
        let bb = m.bounding_box();
        assert_abs_diff_eq!(bb.min.z, 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(bb.max.z, 5.0, epsilon = 1e-12);
    }
}
