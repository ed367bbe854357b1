//! Half-space clipping of closed meshes with planar capping.
//!
//! Triangles straddling the plane are split; the open rim left behind is
//! chained into loops and each loop is triangulated in the plane, so a
//! closed input gives a closed output.

use std::collections::HashMap;

use springcad_math::{cross2, Point2, Point3, Vec3};

use crate::{KernelError, Result, TriangleMesh};

/// An oriented plane. Clipping keeps the side the normal points into.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    /// A point on the plane.
    pub origin: Point3,
    /// Unit normal, pointing into the kept half-space.
    pub normal: Vec3,
}

impl Plane {
    /// Plane through `origin` with the given normal (normalized here).
    pub fn new(origin: Point3, normal: Vec3) -> Self {
        Self {
            origin,
            normal: normal.normalize(),
        }
    }

    /// Signed distance from the plane (positive on the kept side).
    pub fn signed_distance(&self, p: &Point3) -> f64 {
        (p - self.origin).dot(&self.normal)
    }
}

/// Keep the part of `mesh` on the positive side of `plane` and cap the cut.
///
/// Vertices within `snap` of the plane are nudged onto the kept side so
/// every crossing lies strictly inside an edge.
pub fn clip_half_space(mesh: &TriangleMesh, plane: &Plane, snap: f64) -> Result<TriangleMesh> {
    let dist: Vec<f64> = mesh
        .positions
        .iter()
        .map(|p| {
            let d = plane.signed_distance(p);
            if d.abs() < snap {
                snap
            } else {
                d
            }
        })
        .collect();
    let inside = |i: u32| dist[i as usize] > 0.0;

    let mut out = TriangleMesh::new();
    let mut kept: HashMap<u32, u32> = HashMap::new();
    let mut crossings: HashMap<(u32, u32), u32> = HashMap::new();
    // Rim edges in the direction they run on the kept triangles.
    let mut rim: HashMap<u32, u32> = HashMap::new();

    let mut keep = |i: u32, out: &mut TriangleMesh| -> u32 {
        *kept
            .entry(i)
            .or_insert_with(|| out.add_vertex(mesh.positions[i as usize]))
    };
    let mut cross = |a: u32, b: u32, out: &mut TriangleMesh| -> u32 {
        let key = (a.min(b), a.max(b));
        *crossings.entry(key).or_insert_with(|| {
            let (p, q) = (mesh.positions[key.0 as usize], mesh.positions[key.1 as usize]);
            let (dp, dq) = (dist[key.0 as usize], dist[key.1 as usize]);
            let t = dp / (dp - dq);
            out.add_vertex(p + t * (q - p))
        })
    };

    for tri in &mesh.triangles {
        let flags = [inside(tri[0]), inside(tri[1]), inside(tri[2])];
        match flags.iter().filter(|&&f| f).count() {
            3 => {
                let a = keep(tri[0], &mut out);
                let b = keep(tri[1], &mut out);
                let c = keep(tri[2], &mut out);
                out.add_triangle(a, b, c);
            }
            0 => {}
            1 => {
                let k = flags.iter().position(|&f| f).unwrap_or(0);
                let (a, b, c) = (tri[k], tri[(k + 1) % 3], tri[(k + 2) % 3]);
                let ka = keep(a, &mut out);
                let xab = cross(a, b, &mut out);
                let xca = cross(c, a, &mut out);
                out.add_triangle(ka, xab, xca);
                rim.insert(xab, xca);
            }
            _ => {
                let k = flags.iter().position(|&f| !f).unwrap_or(0);
                let (c, a, b) = (tri[k], tri[(k + 1) % 3], tri[(k + 2) % 3]);
                let ka = keep(a, &mut out);
                let kb = keep(b, &mut out);
                let xbc = cross(b, c, &mut out);
                let xca = cross(c, a, &mut out);
                out.add_triangle(ka, kb, xbc);
                out.add_triangle(ka, xbc, xca);
                rim.insert(xbc, xca);
            }
        }
    }

    cap_rim(&mut out, &rim, plane)?;
    Ok(out)
}

/// Chain rim edges into loops and triangulate each one facing `-normal`.
fn cap_rim(out: &mut TriangleMesh, rim: &HashMap<u32, u32>, plane: &Plane) -> Result<()> {
    // The cap runs every rim edge backwards.
    let mut next: HashMap<u32, u32> = rim.iter().map(|(&a, &b)| (b, a)).collect();

    // Basis with e1 × e2 = -normal, so cap loops are counter-clockwise.
    let n = -plane.normal;
    let arbitrary = if n.x.abs() < 0.9 { Vec3::x() } else { Vec3::y() };
    let e1 = arbitrary.cross(&n).normalize();
    let e2 = n.cross(&e1);

    loop {
        let Some(start) = next.keys().min().copied() else {
            break;
        };
        let mut ring = vec![start];
        let mut cur = start;
        loop {
            let Some(nxt) = next.remove(&cur) else {
                return Err(KernelError::OpenRim(cur));
            };
            if nxt == start {
                break;
            }
            ring.push(nxt);
            cur = nxt;
        }
        let pts: Vec<Point2> = ring
            .iter()
            .map(|&i| {
                let d = out.positions[i as usize] - plane.origin;
                Point2::new(d.dot(&e1), d.dot(&e2))
            })
            .collect();
        for [i, j, k] in triangulate_loop(&pts) {
            out.add_triangle(ring[i], ring[j], ring[k]);
        }
    }
    Ok(())
}

/// Triangulate a counter-clockwise loop by clipping ears.
///
/// Degenerate (zero-area) ears are clipped only when no proper ear is
/// left; failing both, the remainder is fanned so the cap stays closed.
fn triangulate_loop(pts: &[Point2]) -> Vec<[usize; 3]> {
    let mut tris = Vec::with_capacity(pts.len().saturating_sub(2));
    let mut poly: Vec<usize> = (0..pts.len()).collect();

    while poly.len() > 3 {
        let n = poly.len();
        let corner = |i: usize| (poly[(i + n - 1) % n], poly[i], poly[(i + 1) % n]);
        let is_ear = |i: usize| {
            let (a, b, c) = corner(i);
            !poly.iter().any(|&q| {
                q != a && q != b && q != c && strictly_inside(&pts[q], &pts[a], &pts[b], &pts[c])
            })
        };
        let turn = |i: usize| {
            let (a, b, c) = corner(i);
            cross2(&(pts[b] - pts[a]), &(pts[c] - pts[a]))
        };

        let pick = (0..n)
            .find(|&i| turn(i) > 0.0 && is_ear(i))
            .or_else(|| (0..n).find(|&i| turn(i) == 0.0 && is_ear(i)));
        let Some(i) = pick else {
            tracing::warn!(vertices = n, "no ear found while capping; fanning remainder");
            break;
        };
        let (a, b, c) = corner(i);
        tris.push([a, b, c]);
        poly.remove(i);
    }

    if poly.len() >= 3 {
        tris.extend(poly.windows(2).skip(1).map(|w| [poly[0], w[0], w[1]]));
    }
    tris
}

/// True when `p` lies strictly inside the counter-clockwise triangle `abc`.
fn strictly_inside(p: &Point2, a: &Point2, b: &Point2, c: &Point2) -> bool {
    cross2(&(b - a), &(p - a)) > 0.0
        && cross2(&(c - b), &(p - b)) > 0.0
        && cross2(&(a - c), &(p - c)) > 0.0
}
