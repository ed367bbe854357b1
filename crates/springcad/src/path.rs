//! Helical path builder: turns a [`Partition`] into a continuous wire on
//! the helix surface.
//!
//! A cursor walks the `(u, v)` chart from the bottom of the spring. Closed
//! and body rows become straight chart lines, transitions become tangent
//! arcs or fitted cubic blends, and every chart curve is mapped onto the
//! cylinder (or cone) to give one 3D edge.

use std::f64::consts::PI;

use springcad_geom::primitives::tangent_arc;
use springcad_geom::{
    Curve2d, CurveOnSurface, CubicBlend2d, GeomError, HelixSurface, Line2d, TangentArc, Wire,
};
use springcad_math::{is_finite2, Point2, Point3, Vec2, Vec3};

use crate::config::PipelineConfig;
use crate::params::{AlgorithmVersion, Handedness};
use crate::partition::{Partition, PartitionSegment, SegmentKind, SegmentRole};
use crate::{pipeline_event, Result, SpringError};

/// Largest tangent deflection allowed at a joint, in radians.
const MAX_JOINT_ANGLE: f64 = 1e-6;

/// Shape of a segment's chart curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartCurve {
    /// Straight chart line (a helix on the surface).
    Line,
    /// Circular chart arc.
    Arc,
    /// Fitted cubic pitch blend.
    Blend,
}

/// One piece of the assembled path, in chart coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct HelixSegment {
    /// Closed coil, transition or body.
    pub kind: SegmentKind,
    /// Position in the path.
    pub role: SegmentRole,
    /// Chart point where the segment starts.
    pub start: Point2,
    /// Chart point where the segment ends.
    pub end: Point2,
    /// Pitch at the start.
    pub pitch: f64,
    /// Pitch at the end.
    pub end_pitch: f64,
    /// The chart curve used.
    pub curve: ChartCurve,
}

/// A continuous spring path: the wire plus its chart description.
#[derive(Debug, Clone)]
pub struct SpringPath {
    wire: Wire,
    segments: Vec<HelixSegment>,
    surface: HelixSurface,
    start: Point3,
    end: Point3,
    start_tangent: Vec3,
    end_tangent: Vec3,
}

impl SpringPath {
    /// Build the path for `partition`.
    ///
    /// Any non-finite coordinate, arc radius mismatch, gap or tangent
    /// break is a `GeometryConstruction` error: the partition formulas
    /// should make these impossible.
    pub fn build(
        partition: &Partition,
        handedness: Handedness,
        config: &PipelineConfig,
    ) -> Result<Self> {
        let tol = config.tolerance();
        let surface = HelixSurface::cone(
            partition.helix_radius,
            partition.cone_half_angle,
            handedness.into(),
        );

        let mut wire = Wire::new();
        let mut segments = Vec::with_capacity(partition.segments.len());
        let mut cursor = Point2::new(0.0, partition.z_offset);

        for row in &partition.segments {
            let (chart, curve) = chart_curve(row, cursor, partition.algorithm, config)?;
            let end = chart.end_point();
            if !is_finite2(&cursor) || !is_finite2(&end) {
                return Err(GeomError::NonFinite("chart segment endpoint").into());
            }
            pipeline_event!(
                config.trace,
                DEBUG,
                role = ?row.role,
                curve = ?curve,
                u0 = cursor.x,
                v0 = cursor.y,
                u1 = end.x,
                v1 = end.y,
                "path segment"
            );
            segments.push(HelixSegment {
                kind: row.kind(),
                role: row.role,
                start: cursor,
                end,
                pitch: row.start_pitch,
                end_pitch: row.end_pitch,
                curve,
            });
            wire.push(Box::new(CurveOnSurface::new(chart, Box::new(surface.clone()))));
            cursor = end;
        }

        wire.check_continuity(&tol)?;
        if let Some((i, angle)) = wire
            .joint_angles()
            .into_iter()
            .enumerate()
            .find(|(_, a)| *a > MAX_JOINT_ANGLE)
        {
            return Err(SpringError::geometry(format!(
                "tangent break of {:.3e} rad between segments {} and {}",
                angle,
                i,
                i + 1
            )));
        }

        let missing = || SpringError::from(GeomError::EmptyWire);
        let start = wire.start_point().ok_or_else(missing)?;
        let end = wire.end_point().ok_or_else(missing)?;
        let start_tangent = wire.start_tangent().ok_or_else(missing)?;
        let end_tangent = wire.end_tangent().ok_or_else(missing)?;

        Ok(Self {
            wire,
            segments,
            surface,
            start,
            end,
            start_tangent,
            end_tangent,
        })
    }

    /// The 3D wire.
    pub fn wire(&self) -> &Wire {
        &self.wire
    }

    /// The chart segments, bottom to top.
    pub fn segments(&self) -> &[HelixSegment] {
        &self.segments
    }

    /// The surface the path lies on.
    pub fn surface(&self) -> &HelixSurface {
        &self.surface
    }

    /// First point of the path.
    pub fn start_point(&self) -> Point3 {
        self.start
    }

    /// Last point of the path.
    pub fn end_point(&self) -> Point3 {
        self.end
    }

    /// Unit tangent at the start, in the direction of travel.
    pub fn start_tangent(&self) -> Vec3 {
        self.start_tangent
    }

    /// Unit tangent at the end, in the direction of travel.
    pub fn end_tangent(&self) -> Vec3 {
        self.end_tangent
    }

    /// Height spanned in the chart.
    pub fn chart_height(&self) -> f64 {
        match (self.segments.first(), self.segments.last()) {
            (Some(a), Some(b)) => b.end.y - a.start.y,
            _ => 0.0,
        }
    }

    /// Turns traversed.
    pub fn turns(&self) -> f64 {
        match (self.segments.first(), self.segments.last()) {
            (Some(a), Some(b)) => (b.end.x - a.start.x) / (2.0 * PI),
            _ => 0.0,
        }
    }

    /// Arc length of the wire.
    pub fn length(&self) -> f64 {
        self.wire.length()
    }
}

/// Chart curve for one partition row starting at `cursor`.
fn chart_curve(
    row: &PartitionSegment,
    cursor: Point2,
    algorithm: AlgorithmVersion,
    config: &PipelineConfig,
) -> Result<(Box<dyn Curve2d>, ChartCurve)> {
    if row.kind() != SegmentKind::Transition {
        let end = cursor + Vec2::new(row.angle(), row.height());
        return Ok((Box::new(Line2d::from_points(cursor, end)), ChartCurve::Line));
    }

    match algorithm {
        AlgorithmVersion::TangentArc => {
            let dir1 = Vec2::new(2.0 * PI, row.start_pitch);
            let dir2 = Vec2::new(2.0 * PI, row.end_pitch);
            let corner = cursor + row.incoming_coils * dir1;
            let end = corner + (row.coils - row.incoming_coils) * dir2;
            match tangent_arc(cursor, dir1, end, dir2, &config.tolerance()) {
                TangentArc::Arc(arc) => Ok((Box::new(arc), ChartCurve::Arc)),
                TangentArc::Line(line) => Ok((Box::new(line), ChartCurve::Line)),
                TangentArc::Degenerate { radius_gap, .. } => Err(SpringError::geometry(format!(
                    "transition arc radii disagree by {radius_gap:.3e}"
                ))),
            }
        }
        AlgorithmVersion::CubicBlend => {
            let blend = CubicBlend2d {
                start: cursor,
                turns: row.coils,
                start_pitch: row.start_pitch,
                end_pitch: row.end_pitch,
            };
            Ok((
                Box::new(blend.fit(config.transition_samples)),
                ChartCurve::Blend,
            ))
        }
    }
}
