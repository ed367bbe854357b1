//! Ordered chains of 3D edges.

use springcad_math::{is_finite3, Point3, Tolerance, Vec3};

use crate::{Curve3d, GeomError, Result};

/// A sample on a wire: position and unit tangent.
#[derive(Debug, Clone, Copy)]
pub struct WireSample {
    /// Position on the wire.
    pub position: Point3,
    /// Unit tangent in the direction of travel.
    pub tangent: Vec3,
    /// Index of the edge the sample came from.
    pub edge: usize,
}

/// An ordered sequence of edges traversed start to end.
#[derive(Debug, Clone, Default)]
pub struct Wire {
    edges: Vec<Box<dyn Curve3d>>,
}

impl Wire {
    /// Create an empty wire.
    pub fn new() -> Self {
        Self { edges: Vec::new() }
    }

    /// Append an edge.
    pub fn push(&mut self, edge: Box<dyn Curve3d>) {
        self.edges.push(edge);
    }

    /// The edges in traversal order.
    pub fn edges(&self) -> &[Box<dyn Curve3d>] {
        &self.edges
    }

    /// Number of edges.
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    /// True when the wire has no edges.
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// First point of the wire.
    pub fn start_point(&self) -> Option<Point3> {
        self.edges.first().map(|e| e.start_point())
    }

    /// Last point of the wire.
    pub fn end_point(&self) -> Option<Point3> {
        self.edges.last().map(|e| e.end_point())
    }

    /// Unit tangent at the first point.
    pub fn start_tangent(&self) -> Option<Vec3> {
        self.edges
            .first()
            .map(|e| e.tangent(e.domain().0).normalize())
    }

    /// Unit tangent at the last point.
    pub fn end_tangent(&self) -> Option<Vec3> {
        self.edges.last().map(|e| e.tangent(e.domain().1).normalize())
    }

    /// Total arc length of all edges.
    pub fn length(&self) -> f64 {
        self.edges.iter().map(|e| e.length()).sum()
    }

    /// Verify that consecutive edges share an endpoint within `tol.linear`
    /// and that every endpoint is finite.
    pub fn check_continuity(&self, tol: &Tolerance) -> Result<()> {
        if self.edges.is_empty() {
            return Err(GeomError::EmptyWire);
        }
        for (i, edge) in self.edges.iter().enumerate() {
            if !is_finite3(&edge.start_point()) || !is_finite3(&edge.end_point()) {
                return Err(GeomError::NonFinite("wire edge endpoint"));
            }
            if i > 0 {
                let gap = (edge.start_point() - self.edges[i - 1].end_point()).norm();
                if gap > tol.linear {
                    return Err(GeomError::Gap { index: i, gap });
                }
            }
        }
        Ok(())
    }

    /// Angles (radians) between the outgoing tangent of each edge and the
    /// incoming tangent of the next, one per joint.
    pub fn joint_angles(&self) -> Vec<f64> {
        self.edges
            .windows(2)
            .map(|pair| {
                let a = pair[0].tangent(pair[0].domain().1).normalize();
                let b = pair[1].tangent(pair[1].domain().0).normalize();
                a.dot(&b).clamp(-1.0, 1.0).acos()
            })
            .collect()
    }

    /// Sample every edge at its suggested resolution times `density`.
    ///
    /// Joint points are emitted once per edge side, so a tangent break
    /// shows up as two samples at the same position with different
    /// tangents.
    pub fn sample(&self, density: f64) -> Vec<WireSample> {
        let mut out = Vec::new();
        for (index, edge) in self.edges.iter().enumerate() {
            let n = ((edge.suggested_segments() as f64 * density).ceil() as usize).max(1);
            let (t0, t1) = edge.domain();
            for i in 0..=n {
                let t = t0 + (t1 - t0) * i as f64 / n as f64;
                let tangent = edge.tangent(t);
                let norm = tangent.norm();
                if norm <= f64::EPSILON {
                    continue;
                }
                out.push(WireSample {
                    position: edge.evaluate(t),
                    tangent: tangent / norm,
                    edge: index,
                });
            }
        }
        out
    }
}
