//! Pitch and coil partition: how the turns of a spring are split between
//! closed end coils, pitch transitions and the main body.
//!
//! Everything here is closed-form. The chart height of the path is
//! `H = 2·cc·d + Nb·p` with `cc` closed coils per end at pitch `d` and
//! `Nb` body turns at pitch `p`; transitions replace a piece of each
//! neighbour and never change `H` or the total turns.

use std::f64::consts::PI;
use std::fmt;

use serde::Serialize;

use crate::config::PipelineConfig;
use crate::params::{AlgorithmVersion, Dimensioning, EndType, SpringParameters};
use crate::{pipeline_event, Result, SpringError};

/// Broad class of a partition segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SegmentKind {
    /// Coils wound at wire-diameter pitch.
    ClosedCoil,
    /// Pitch transition between two neighbours.
    Transition,
    /// Active body at the main pitch.
    MainBody,
}

/// Position of a segment in the path, bottom to top.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SegmentRole {
    /// Closed coils at the bottom end.
    BottomClosed,
    /// Transition from the bottom closed coils to the body.
    BottomTransition,
    /// The main body.
    MainBody,
    /// Transition from the body to the top closed coils.
    TopTransition,
    /// Closed coils at the top end.
    TopClosed,
}

impl SegmentRole {
    /// The segment's kind.
    pub fn kind(self) -> SegmentKind {
        match self {
            SegmentRole::BottomClosed | SegmentRole::TopClosed => SegmentKind::ClosedCoil,
            SegmentRole::BottomTransition | SegmentRole::TopTransition => SegmentKind::Transition,
            SegmentRole::MainBody => SegmentKind::MainBody,
        }
    }

    fn label(self) -> &'static str {
        match self {
            SegmentRole::BottomClosed => "bottom closed",
            SegmentRole::BottomTransition => "bottom transition",
            SegmentRole::MainBody => "main body",
            SegmentRole::TopTransition => "top transition",
            SegmentRole::TopClosed => "top closed",
        }
    }
}

/// One row of the partition table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PartitionSegment {
    /// Where the segment sits.
    pub role: SegmentRole,
    /// Turns covered (`Δu / 2π`).
    pub coils: f64,
    /// Turns taken from the incoming neighbour. Equal to `coils` for
    /// closed and body segments.
    pub incoming_coils: f64,
    /// Pitch at the start of the segment.
    pub start_pitch: f64,
    /// Pitch at the end of the segment.
    pub end_pitch: f64,
}

impl PartitionSegment {
    fn uniform(role: SegmentRole, coils: f64, pitch: f64) -> Self {
        Self {
            role,
            coils,
            incoming_coils: coils,
            start_pitch: pitch,
            end_pitch: pitch,
        }
    }

    /// The segment's kind.
    pub fn kind(&self) -> SegmentKind {
        self.role.kind()
    }

    /// Height gained (`Δv`).
    pub fn height(&self) -> f64 {
        self.incoming_coils * self.start_pitch
            + (self.coils - self.incoming_coils) * self.end_pitch
    }

    /// Angle traversed (`Δu`).
    pub fn angle(&self) -> f64 {
        self.coils * 2.0 * PI
    }
}

/// Length of one turn of a helix in the chart, `sqrt((2π)² + p²)`.
pub fn slant_length(pitch: f64) -> f64 {
    (2.0 * PI).hypot(pitch)
}

/// The computed partition of a spring.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Partition {
    /// End type the partition was built for.
    pub end_type: EndType,
    /// Transition construction.
    pub algorithm: AlgorithmVersion,
    /// Segments bottom to top; empty segments are omitted.
    pub segments: Vec<PartitionSegment>,
    /// Main-body pitch.
    pub body_pitch: f64,
    /// Closed-coil pitch (the wire diameter).
    pub closed_pitch: f64,
    /// Closed coils at each end before transitions take their share.
    pub closed_coils: f64,
    /// Body turns before transitions take their share.
    pub body_turns: f64,
    /// Chart height of the whole path.
    pub height: f64,
    /// Height of the path start above z = 0.
    pub z_offset: f64,
    /// Helix radius at z = 0.
    pub helix_radius: f64,
    /// Wire radius.
    pub profile_radius: f64,
    /// Cone half-angle in radians (zero for a cylinder).
    pub cone_half_angle: f64,
}

impl Partition {
    /// Partition a validated parameter set.
    ///
    /// Fails with `InvalidParameters` when the end-type formula gives a
    /// pitch below tolerance or a cone pinches the wire.
    pub fn compute(params: &SpringParameters, config: &PipelineConfig) -> Result<Self> {
        let d = params.wire_diameter;
        let end_type = params.effective_end_type();
        let nt = params.total_coils();
        let na = params.active_coils();
        let inactive = params.inactive_coils();
        let cc = if end_type.has_closed_ends(inactive) {
            0.5 * inactive
        } else {
            0.0
        };

        let (body_turns, body_pitch) = match params.dimensioning {
            Dimensioning::PitchAndCount { pitch, coil_count } => (coil_count, pitch),
            Dimensioning::FreeLength { free_length, .. } => {
                let l = free_length;
                let pitch = match end_type {
                    EndType::Open => (l - d) / na,
                    EndType::OpenGround => l / nt,
                    EndType::Closed | EndType::ClosedGround => (l - 2.0 * cc * d) / na,
                    EndType::TaperedClosedGround => (l - 1.5 * d) / na,
                    EndType::PigTail => (l - 2.0 * d) / na,
                    EndType::UserSpecified => (l - (nt - na + 1.0) * d) / na,
                };
                let turns = if end_type == EndType::OpenGround { nt } else { na };
                (turns, pitch)
            }
        };
        if !body_pitch.is_finite() || body_pitch < config.tolerance {
            return Err(SpringError::invalid("Pitch too small"));
        }
        if body_pitch < d {
            tracing::warn!(
                pitch = body_pitch,
                wire_diameter = d,
                "body pitch is below the wire diameter; adjacent coils overlap"
            );
        }

        let height = 2.0 * cc * d + body_turns * body_pitch;
        let z_offset = if end_type.is_ground() {
            0.5 * (params.free_length_value() - height)
        } else {
            0.0
        };

        let cone_half_angle = params.cone_angle.unwrap_or(0.0).to_radians();
        let helix_radius = params.helix_radius();
        let profile_radius = params.profile_radius();
        let taper = cone_half_angle.tan();
        let r_min = (helix_radius + z_offset * taper).min(helix_radius + (z_offset + height) * taper);
        if r_min <= profile_radius {
            return Err(SpringError::invalid(format!(
                "Cone radius {r_min:.4} falls below the wire radius {profile_radius:.4}"
            )));
        }

        let segments = split_segments(cc, d, body_turns, body_pitch, params.algorithm, config);

        let partition = Self {
            end_type,
            algorithm: params.algorithm,
            segments,
            body_pitch,
            closed_pitch: d,
            closed_coils: cc,
            body_turns,
            height,
            z_offset,
            helix_radius,
            profile_radius,
            cone_half_angle,
        };
        pipeline_event!(
            config.trace,
            DEBUG,
            end_type = %end_type,
            body_pitch,
            closed_coils = cc,
            height,
            segments = partition.segments.len(),
            "partition computed"
        );
        Ok(partition)
    }

    /// Sum of all segment turns.
    pub fn total_turns(&self) -> f64 {
        self.segments.iter().map(|s| s.coils).sum()
    }

    /// Sum of all segment heights; equals [`Partition::height`].
    pub fn accumulated_height(&self) -> f64 {
        self.segments.iter().map(PartitionSegment::height).sum()
    }

    /// The main-body row, if the transitions left one.
    pub fn main_body(&self) -> Option<&PartitionSegment> {
        self.segments
            .iter()
            .find(|s| s.role == SegmentRole::MainBody)
    }
}

/// Lay out the rows for `cc` closed coils per end and `nb` body turns.
fn split_segments(
    cc: f64,
    d: f64,
    nb: f64,
    p: f64,
    algorithm: AlgorithmVersion,
    config: &PipelineConfig,
) -> Vec<PartitionSegment> {
    if cc <= 0.0 {
        return vec![PartitionSegment::uniform(SegmentRole::MainBody, nb, p)];
    }

    let (h1, h2) = (slant_length(d), slant_length(p));
    // Turns each transition takes from the closed side and the body side.
    let (tc, tb) = match algorithm {
        AlgorithmVersion::TangentArc => {
            let a = (PI / (2.0 * PI / h1 + 2.0 * PI / h2))
                .min(cc * h1)
                .min(0.5 * nb * h2);
            (a / h1, a / h2)
        }
        AlgorithmVersion::CubicBlend => {
            let t = 0.25_f64.min(cc).min(0.5 * nb);
            (t, t)
        }
    };

    let keep = |coils: f64, pitch: f64| coils * slant_length(pitch) > config.tolerance;
    let mut rows = Vec::with_capacity(5);
    if keep(cc - tc, d) {
        rows.push(PartitionSegment::uniform(SegmentRole::BottomClosed, cc - tc, d));
    }
    rows.push(PartitionSegment {
        role: SegmentRole::BottomTransition,
        coils: tc + tb,
        incoming_coils: tc,
        start_pitch: d,
        end_pitch: p,
    });
    if keep(nb - 2.0 * tb, p) {
        rows.push(PartitionSegment::uniform(SegmentRole::MainBody, nb - 2.0 * tb, p));
    }
    rows.push(PartitionSegment {
        role: SegmentRole::TopTransition,
        coils: tb + tc,
        incoming_coils: tb,
        start_pitch: p,
        end_pitch: d,
    });
    if keep(cc - tc, d) {
        rows.push(PartitionSegment::uniform(SegmentRole::TopClosed, cc - tc, d));
    }
    rows
}

impl fmt::Display for Partition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{:<18} {:>10} {:>10} {:>10} {:>10}",
            "segment", "coils", "pitch in", "pitch out", "height"
        )?;
        for s in &self.segments {
            writeln!(
                f,
                "{:<18} {:>10.4} {:>10.4} {:>10.4} {:>10.4}",
                s.role.label(),
                s.coils,
                s.start_pitch,
                s.end_pitch,
                s.height()
            )?;
        }
        write!(
            f,
            "{:<18} {:>10.4} {:>10} {:>10} {:>10.4}",
            "total",
            self.total_turns(),
            "",
            "",
            self.height
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn partition(params: &SpringParameters) -> Partition {
        Partition::compute(params, &PipelineConfig::default()).unwrap()
    }

    fn spring(end_type: EndType) -> SpringParameters {
        SpringParameters::free_length(10.0, 1.0, 50.0, 10.0, end_type)
    }

    #[test]
    fn test_open_scenario() {
        let p = partition(&spring(EndType::Open));
        assert_eq!(p.segments.len(), 1);
        assert_abs_diff_eq!(p.body_pitch, 4.9, epsilon = 1e-12);
        assert_abs_diff_eq!(p.height, 49.0, epsilon = 1e-12);
        assert_abs_diff_eq!(p.height, p.body_pitch * 10.0, epsilon = 1e-12);
        assert_abs_diff_eq!(p.helix_radius, 4.5, epsilon = 1e-12);
        assert_eq!(p.z_offset, 0.0);
    }

    #[test]
    fn test_closed_types_reconstruct_free_length() {
        for end in [EndType::Closed, EndType::ClosedGround] {
            let p = partition(&spring(end));
            assert_abs_diff_eq!(p.height, 50.0, epsilon = 1e-9);
            assert_abs_diff_eq!(p.accumulated_height(), 50.0, epsilon = 1e-9);
            assert_abs_diff_eq!(p.total_turns(), 10.0, epsilon = 1e-12);
            assert_eq!(p.segments.len(), 5);
        }
    }

    #[test]
    fn test_every_end_type_accumulates_its_height() {
        for end in EndType::ALL {
            let params = spring(end).with_inactive_coils(2.0);
            let p = partition(&params);
            assert_abs_diff_eq!(p.accumulated_height(), p.height, epsilon = 1e-9);
            assert!(p.body_pitch > 0.0);
        }
    }

    #[test]
    fn test_toggle_open_to_closed_ground_changes_pitch_only() {
        let open = partition(&spring(EndType::Open));
        let ground = partition(&spring(EndType::ClosedGround));
        assert!((open.body_pitch - ground.body_pitch).abs() > 1e-3);
        assert_abs_diff_eq!(ground.body_pitch, 48.0 / 8.0, epsilon = 1e-12);
        assert_abs_diff_eq!(open.total_turns(), 10.0, epsilon = 1e-12);
        assert_abs_diff_eq!(ground.total_turns(), 10.0, epsilon = 1e-12);
    }

    #[test]
    fn test_tangent_arc_transition_spans_half_turn_split_by_slant() {
        let p = partition(&spring(EndType::Closed));
        let t = p.segments[1];
        assert_eq!(t.role, SegmentRole::BottomTransition);
        assert_abs_diff_eq!(t.coils, 0.5, epsilon = 1e-12);
        let (h1, h2) = (slant_length(1.0), slant_length(6.0));
        assert_abs_diff_eq!(t.incoming_coils, h2 / (2.0 * (h1 + h2)), epsilon = 1e-12);
        // Equal chart distance on both sides of the corner.
        let a_closed = t.incoming_coils * h1;
        let a_body = (t.coils - t.incoming_coils) * h2;
        assert_abs_diff_eq!(a_closed, a_body, epsilon = 1e-12);
    }

    #[test]
    fn test_cubic_blend_takes_quarter_turn_each_side() {
        let params = spring(EndType::ClosedGround).with_algorithm(AlgorithmVersion::CubicBlend);
        let p = partition(&params);
        let t = p.segments[1];
        assert_abs_diff_eq!(t.coils, 0.5, epsilon = 1e-12);
        assert_abs_diff_eq!(t.incoming_coils, 0.25, epsilon = 1e-12);
        assert_abs_diff_eq!(t.height(), 0.25 * (1.0 + 6.0), epsilon = 1e-12);
        assert_abs_diff_eq!(p.accumulated_height(), 50.0, epsilon = 1e-9);
    }

    #[test]
    fn test_short_closed_ends_clamp_transition() {
        let params = spring(EndType::Closed).with_inactive_coils(0.2);
        let p = partition(&params);
        // Closed rows are fully consumed by the transitions.
        assert!(p
            .segments
            .iter()
            .all(|s| s.kind() != SegmentKind::ClosedCoil));
        assert_abs_diff_eq!(p.total_turns(), 10.0, epsilon = 1e-12);
        assert_abs_diff_eq!(p.accumulated_height(), p.height, epsilon = 1e-9);
    }

    #[test]
    fn test_ground_types_centre_path_between_grind_planes() {
        let p = partition(&spring(EndType::TaperedClosedGround));
        assert_abs_diff_eq!(p.height, 50.5, epsilon = 1e-9);
        assert_abs_diff_eq!(p.z_offset, -0.25, epsilon = 1e-12);
        let og = partition(&spring(EndType::OpenGround));
        assert_abs_diff_eq!(og.body_pitch, 5.0, epsilon = 1e-12);
        assert_abs_diff_eq!(og.body_turns, 10.0, epsilon = 1e-12);
        assert_abs_diff_eq!(og.z_offset, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_non_positive_pitch_is_rejected() {
        let params = SpringParameters::free_length(10.0, 1.0, 1.0, 10.0, EndType::Open);
        assert_eq!(
            Partition::compute(&params, &PipelineConfig::default()),
            Err(SpringError::InvalidParameters("Pitch too small".into()))
        );
    }

    #[test]
    fn test_cone_pinching_wire_is_rejected() {
        let params = spring(EndType::Open).with_cone_angle(-10.0);
        assert!(matches!(
            Partition::compute(&params, &PipelineConfig::default()),
            Err(SpringError::InvalidParameters(_))
        ));
        let params = spring(EndType::Open).with_cone_angle(3.0);
        assert!(Partition::compute(&params, &PipelineConfig::default()).is_ok());
    }

    #[test]
    fn test_pitch_and_count_builds_open_body() {
        let params = SpringParameters::pitch_and_count(10.0, 1.0, 3.0, 7.0);
        let p = partition(&params);
        assert_eq!(p.segments.len(), 1);
        assert_abs_diff_eq!(p.height, 21.0, epsilon = 1e-12);
    }

    #[test]
    fn test_display_lists_every_row() {
        let text = partition(&spring(EndType::ClosedGround)).to_string();
        assert!(text.contains("bottom closed"));
        assert!(text.contains("top transition"));
        assert!(text.lines().count() == 7);
    }
}
