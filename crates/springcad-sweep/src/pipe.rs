//! Pipe sweep: move a circular profile along a wire to build a solid.

use std::f64::consts::PI;

use springcad_geom::Wire;
use springcad_kernel::{Solid, TriangleMesh};
use springcad_math::{Point2, Tolerance};

use crate::frenet::{rotation_minimizing_frames, FrenetFrame};
use crate::SweepError;

/// How the profile is joined across a tangent break in the path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransitionMode {
    /// Fan the profile around the corner in small rotation steps.
    #[default]
    RoundCorner,
    /// Rotate the profile onto the new tangent in a single step.
    Transformed,
}

/// How the profile is oriented as it travels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProfileOrientation {
    /// Keep the profile perpendicular to the path (rotation-minimizing).
    #[default]
    FollowPath,
    /// Translate the starting profile without rotating it.
    Translate,
}

/// Options for [`pipe`].
#[derive(Debug, Clone)]
pub struct PipeOptions {
    /// Sides of the polygon approximating the circular profile. Default: 24.
    pub profile_segments: usize,
    /// Multiplier on each edge's suggested sample count. Default: 1.0.
    pub density: f64,
    /// Corner handling. Default: round corner.
    pub transition: TransitionMode,
    /// Profile orientation. Default: follow path.
    pub orientation: ProfileOrientation,
    /// Confusion tolerance for path continuity and duplicate samples.
    pub tolerance: Tolerance,
    /// Emit debug events while sweeping. Default: off.
    pub trace: bool,
}

impl Default for PipeOptions {
    fn default() -> Self {
        Self {
            profile_segments: 24,
            density: 1.0,
            transition: TransitionMode::RoundCorner,
            orientation: ProfileOrientation::FollowPath,
            tolerance: Tolerance::DEFAULT,
            trace: false,
        }
    }
}

/// Sweep a circle of `radius` along `wire` into a closed solid.
///
/// The profile starts perpendicular to the wire's first tangent. Rings are
/// joined by quads wound outward and the two ends get planar fan caps.
///
/// # Errors
///
/// Returns an error if the wire is empty, discontinuous or of zero length,
/// or if the profile radius is not positive.
pub fn pipe(wire: &Wire, radius: f64, options: &PipeOptions) -> Result<Solid, SweepError> {
    if !radius.is_finite() || radius <= 0.0 {
        return Err(SweepError::InvalidProfile(format!(
            "profile radius must be positive, got {radius}"
        )));
    }
    if options.profile_segments < 3 {
        return Err(SweepError::InvalidProfile(format!(
            "profile needs at least 3 sides, got {}",
            options.profile_segments
        )));
    }
    wire.check_continuity(&options.tolerance)?;
    if wire.length() < options.tolerance.linear {
        return Err(SweepError::ZeroLengthPath);
    }

    let frames = build_frames(wire, options);
    if frames.len() < 2 {
        return Err(SweepError::TooFewSamples(frames.len()));
    }
    if options.trace {
        tracing::debug!(
            rings = frames.len(),
            sides = options.profile_segments,
            "sweeping pipe"
        );
    }

    let n = options.profile_segments;
    let profile: Vec<Point2> = (0..n)
        .map(|j| {
            let (s, c) = (2.0 * PI * j as f64 / n as f64).sin_cos();
            Point2::new(radius * c, radius * s)
        })
        .collect();

    let mut mesh = TriangleMesh::new();
    let grid: Vec<Vec<u32>> = frames
        .iter()
        .map(|frame| {
            profile
                .iter()
                .map(|p| mesh.add_vertex(frame.transform_point(*p)))
                .collect()
        })
        .collect();

    // Lateral quads: v0 (this ring, this side) -> v1 (this ring, next side)
    // -> v2 (next ring, next side) -> v3 (next ring, this side).
    for pair in grid.windows(2) {
        for j in 0..n {
            let k = (j + 1) % n;
            let (v0, v1, v2, v3) = (pair[0][j], pair[0][k], pair[1][k], pair[1][j]);
            mesh.add_triangle(v0, v1, v2);
            mesh.add_triangle(v0, v2, v3);
        }
    }

    let (first, last) = (&frames[0], &frames[frames.len() - 1]);
    let c0 = mesh.add_vertex(first.position);
    let c1 = mesh.add_vertex(last.position);
    let (start_ring, end_ring) = (&grid[0], &grid[grid.len() - 1]);
    for j in 0..n {
        let k = (j + 1) % n;
        mesh.add_triangle(c0, start_ring[k], start_ring[j]);
        mesh.add_triangle(c1, end_ring[j], end_ring[k]);
    }

    Ok(Solid::from_mesh(mesh)?)
}

/// Frames for every ring: duplicates dropped, corners fanned or jumped,
/// and orientation frozen when translating.
fn build_frames(wire: &Wire, options: &PipeOptions) -> Vec<FrenetFrame> {
    let density = if options.density.is_finite() && options.density > 0.0 {
        options.density
    } else {
        1.0
    };
    let raw = rotation_minimizing_frames(&wire.sample(density));
    let fan_step = 2.0 * PI / options.profile_segments as f64;

    let mut frames: Vec<FrenetFrame> = Vec::with_capacity(raw.len());
    for frame in raw {
        let Some(prev) = frames.last() else {
            frames.push(frame);
            continue;
        };
        let same_place = options
            .tolerance
            .points_equal(&prev.position, &frame.position);
        if !same_place {
            frames.push(frame);
            continue;
        }
        let cos = prev.tangent.as_ref().dot(frame.tangent.as_ref()).clamp(-1.0, 1.0);
        let angle = cos.acos();
        if angle < options.tolerance.angular.max(1e-9) {
            continue;
        }
        if options.trace {
            tracing::debug!(angle_deg = angle.to_degrees(), "tangent break in pipe path");
        }
        if options.transition == TransitionMode::RoundCorner {
            let steps = (angle / fan_step).ceil().max(1.0) as usize;
            let start = prev.clone();
            for s in 1..steps {
                frames.push(start.turned_toward(&frame.tangent, s as f64 / steps as f64));
            }
        }
        frames.push(frame);
    }

    if options.orientation == ProfileOrientation::Translate {
        if let Some(first) = frames.first().cloned() {
            for f in &mut frames {
                *f = first.moved_to(f.position);
            }
        }
    }
    frames
}
