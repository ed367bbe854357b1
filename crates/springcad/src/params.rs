//! User-facing spring parameters and the end-type table.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::config::PipelineConfig;
use crate::variant::SpringVariant;
use crate::{Result, SpringError};

/// How the two ends of the spring are finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EndType {
    /// Plain open ends.
    #[default]
    Open,
    /// Open ends ground flat.
    OpenGround,
    /// Closed (squared) ends.
    Closed,
    /// Closed ends ground flat.
    ClosedGround,
    /// Closed ends, tapered and ground.
    TaperedClosedGround,
    /// Closed ends bent in toward the axis.
    PigTail,
    /// Closed ends with a user-chosen inactive coil count.
    UserSpecified,
}

impl EndType {
    /// Every end type, in display order.
    pub const ALL: [EndType; 7] = [
        EndType::Open,
        EndType::OpenGround,
        EndType::Closed,
        EndType::ClosedGround,
        EndType::TaperedClosedGround,
        EndType::PigTail,
        EndType::UserSpecified,
    ];

    /// Inactive coils used when the parameters leave the count unset.
    pub fn default_inactive_coils(self) -> f64 {
        match self {
            EndType::Open | EndType::UserSpecified => 0.0,
            EndType::OpenGround => 1.0,
            EndType::Closed
            | EndType::ClosedGround
            | EndType::TaperedClosedGround
            | EndType::PigTail => 2.0,
        }
    }

    /// Coils added to the total when computing solid length.
    pub fn added_coils_at_solid(self) -> f64 {
        match self {
            EndType::Open | EndType::Closed => 1.0,
            EndType::TaperedClosedGround => -0.5,
            _ => 0.0,
        }
    }

    /// True when the ends are ground flat after forming.
    pub fn is_ground(self) -> bool {
        matches!(
            self,
            EndType::OpenGround | EndType::ClosedGround | EndType::TaperedClosedGround
        )
    }

    /// True when the inactive coils are wound closed at each end.
    pub fn has_closed_ends(self, inactive_coils: f64) -> bool {
        match self {
            EndType::Open | EndType::OpenGround => false,
            EndType::UserSpecified => inactive_coils > 0.0,
            _ => true,
        }
    }

    /// The `snake_case` name used in spring files.
    pub fn as_str(self) -> &'static str {
        match self {
            EndType::Open => "open",
            EndType::OpenGround => "open_ground",
            EndType::Closed => "closed",
            EndType::ClosedGround => "closed_ground",
            EndType::TaperedClosedGround => "tapered_closed_ground",
            EndType::PigTail => "pig_tail",
            EndType::UserSpecified => "user_specified",
        }
    }
}

impl fmt::Display for EndType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EndType {
    type Err = SpringError;

    fn from_str(s: &str) -> Result<Self> {
        let key = s.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        EndType::ALL
            .into_iter()
            .find(|e| e.as_str() == key)
            .ok_or_else(|| SpringError::invalid(format!("unknown end type '{s}'")))
    }
}

/// Winding direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Handedness {
    /// Right-handed helix.
    #[default]
    RightHanded,
    /// Left-handed helix.
    LeftHanded,
}

impl From<Handedness> for springcad_geom::Handedness {
    fn from(h: Handedness) -> Self {
        match h {
            Handedness::RightHanded => springcad_geom::Handedness::Right,
            Handedness::LeftHanded => springcad_geom::Handedness::Left,
        }
    }
}

/// Which construction is used for pitch transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlgorithmVersion {
    /// Circular arcs in the chart, tangent to both pitches.
    #[default]
    TangentArc,
    /// Cubic pitch blend over half a turn, fitted from samples.
    CubicBlend,
}

/// How the spring's length is specified.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum Dimensioning {
    /// Free length and total coils; pitch follows from the end type.
    FreeLength {
        /// Unloaded overall length.
        free_length: f64,
        /// Total coils, possibly fractional.
        total_coils: f64,
    },
    /// Pitch and coil count; builds an open body of height `pitch * coil_count`.
    PitchAndCount {
        /// Pitch of every coil.
        pitch: f64,
        /// Number of coils.
        coil_count: f64,
    },
}

/// Parameters of one spring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpringParameters {
    /// Outer coil diameter.
    pub outer_diameter: f64,
    /// Wire diameter.
    pub wire_diameter: f64,
    /// End finish.
    #[serde(default)]
    pub end_type: EndType,
    /// Inactive coil override; `None` uses the end type's default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inactive_coils: Option<f64>,
    /// Winding direction.
    #[serde(default)]
    pub handedness: Handedness,
    /// Cone half-angle in degrees; `None` for a cylindrical spring.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cone_angle: Option<f64>,
    /// Transition construction.
    #[serde(default)]
    pub algorithm: AlgorithmVersion,
    /// Length specification.
    pub dimensioning: Dimensioning,
    /// Compression, extension or torsion.
    #[serde(default)]
    pub variant: SpringVariant,
}

impl Default for SpringParameters {
    fn default() -> Self {
        Self::free_length(10.0, 1.0, 50.0, 10.0, EndType::Open)
    }
}

impl SpringParameters {
    /// Spring dimensioned by free length and total coils.
    pub fn free_length(
        outer_diameter: f64,
        wire_diameter: f64,
        free_length: f64,
        total_coils: f64,
        end_type: EndType,
    ) -> Self {
        Self {
            outer_diameter,
            wire_diameter,
            end_type,
            inactive_coils: None,
            handedness: Handedness::default(),
            cone_angle: None,
            algorithm: AlgorithmVersion::default(),
            dimensioning: Dimensioning::FreeLength {
                free_length,
                total_coils,
            },
            variant: SpringVariant::default(),
        }
    }

    /// Open spring dimensioned by pitch and coil count.
    pub fn pitch_and_count(
        outer_diameter: f64,
        wire_diameter: f64,
        pitch: f64,
        coil_count: f64,
    ) -> Self {
        Self {
            dimensioning: Dimensioning::PitchAndCount { pitch, coil_count },
            ..Self::free_length(outer_diameter, wire_diameter, 0.0, 0.0, EndType::Open)
        }
    }

    /// Set the inactive coil override.
    pub fn with_inactive_coils(mut self, n: f64) -> Self {
        self.inactive_coils = Some(n);
        self
    }

    /// Set the variant.
    pub fn with_variant(mut self, variant: SpringVariant) -> Self {
        self.variant = variant;
        self
    }

    /// Set the handedness.
    pub fn with_handedness(mut self, handedness: Handedness) -> Self {
        self.handedness = handedness;
        self
    }

    /// Set the cone half-angle in degrees.
    pub fn with_cone_angle(mut self, degrees: f64) -> Self {
        self.cone_angle = Some(degrees);
        self
    }

    /// Set the transition algorithm.
    pub fn with_algorithm(mut self, algorithm: AlgorithmVersion) -> Self {
        self.algorithm = algorithm;
        self
    }

    /// End type actually built; pitch-and-count springs are always open.
    pub fn effective_end_type(&self) -> EndType {
        match self.dimensioning {
            Dimensioning::FreeLength { .. } => self.end_type,
            Dimensioning::PitchAndCount { .. } => EndType::Open,
        }
    }

    /// Mean coil diameter, `OD - d`.
    pub fn mean_diameter(&self) -> f64 {
        self.outer_diameter - self.wire_diameter
    }

    /// Radius of the helix the wire centre follows.
    pub fn helix_radius(&self) -> f64 {
        0.5 * self.mean_diameter()
    }

    /// Radius of the wire cross-section.
    pub fn profile_radius(&self) -> f64 {
        0.5 * self.wire_diameter
    }

    /// Total coils.
    pub fn total_coils(&self) -> f64 {
        match self.dimensioning {
            Dimensioning::FreeLength { total_coils, .. } => total_coils,
            Dimensioning::PitchAndCount { coil_count, .. } => coil_count,
        }
    }

    /// Inactive coils after applying the end-type default.
    pub fn inactive_coils(&self) -> f64 {
        match self.dimensioning {
            Dimensioning::FreeLength { .. } => self
                .inactive_coils
                .unwrap_or_else(|| self.end_type.default_inactive_coils()),
            Dimensioning::PitchAndCount { .. } => 0.0,
        }
    }

    /// Active coils, `total - inactive`.
    pub fn active_coils(&self) -> f64 {
        self.total_coils() - self.inactive_coils()
    }

    /// Free length; for pitch-and-count springs, `pitch * coil_count`.
    pub fn free_length_value(&self) -> f64 {
        match self.dimensioning {
            Dimensioning::FreeLength { free_length, .. } => free_length,
            Dimensioning::PitchAndCount { pitch, coil_count } => pitch * coil_count,
        }
    }

    /// Names of the tracked parameter fields.
    pub const FIELDS: [&'static str; 9] = [
        "outer_diameter",
        "wire_diameter",
        "end_type",
        "inactive_coils",
        "handedness",
        "cone_angle",
        "algorithm",
        "dimensioning",
        "variant",
    ];

    /// Names of the parameters that differ between `self` and `other`.
    pub fn changed_fields(&self, other: &SpringParameters) -> Vec<&'static str> {
        let mut out = Vec::new();
        if self.outer_diameter != other.outer_diameter {
            out.push("outer_diameter");
        }
        if self.wire_diameter != other.wire_diameter {
            out.push("wire_diameter");
        }
        if self.end_type != other.end_type {
            out.push("end_type");
        }
        if self.inactive_coils != other.inactive_coils {
            out.push("inactive_coils");
        }
        if self.handedness != other.handedness {
            out.push("handedness");
        }
        if self.cone_angle != other.cone_angle {
            out.push("cone_angle");
        }
        if self.algorithm != other.algorithm {
            out.push("algorithm");
        }
        if self.dimensioning != other.dimensioning {
            out.push("dimensioning");
        }
        if self.variant != other.variant {
            out.push("variant");
        }
        out
    }

    /// Check every parameter against its bounds.
    ///
    /// Pitch positivity for free-length springs depends on the end-type
    /// formula and is checked by the partition step.
    pub fn validate(&self, config: &PipelineConfig) -> Result<()> {
        let d = self.wire_diameter;
        if !d.is_finite() || d <= config.tolerance {
            return Err(SpringError::invalid("Wire diameter too small"));
        }
        if d > 1000.0 {
            return Err(SpringError::invalid("Wire diameter too large (> 1000)"));
        }
        let od = self.outer_diameter;
        if !od.is_finite() || !(0.1..=10000.0).contains(&od) {
            return Err(SpringError::invalid(
                "Outer diameter must be between 0.1 and 10000",
            ));
        }
        if d >= od {
            return Err(SpringError::invalid(
                "Wire diameter must be smaller than outer diameter",
            ));
        }

        match self.dimensioning {
            Dimensioning::FreeLength {
                free_length,
                total_coils,
            } => {
                if !free_length.is_finite() || free_length <= 0.0 {
                    return Err(SpringError::invalid("Free length must be positive"));
                }
                check_turns(total_coils, config)?;
            }
            Dimensioning::PitchAndCount { pitch, coil_count } => {
                if !pitch.is_finite() || pitch < config.tolerance {
                    return Err(SpringError::invalid("Pitch too small"));
                }
                check_turns(coil_count, config)?;
            }
        }

        let inactive = self.inactive_coils();
        if !inactive.is_finite() || inactive < 0.0 {
            return Err(SpringError::invalid("Inactive coils must not be negative"));
        }
        if self.active_coils() <= 0.0 {
            return Err(SpringError::invalid(
                "Number of active coils must be positive",
            ));
        }

        if let Some(angle) = self.cone_angle {
            if !angle.is_finite() || angle <= -89.9 || angle >= 89.9 {
                return Err(SpringError::invalid(
                    "Cone angle must be between -89.9 and 89.9 degrees",
                ));
            }
        }

        self.variant.validate()
    }
}

fn check_turns(turns: f64, config: &PipelineConfig) -> Result<()> {
    if !turns.is_finite() || turns > config.max_turns {
        return Err(SpringError::invalid(format!(
            "Number of turns too high (> {:e})",
            config.max_turns
        )));
    }
    if turns < 0.25 {
        return Err(SpringError::invalid("Number of turns too low (< 0.25)"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> PipelineConfig {
        PipelineConfig::default()
    }

    #[test]
    fn test_end_type_table() {
        assert_eq!(EndType::Open.default_inactive_coils(), 0.0);
        assert_eq!(EndType::OpenGround.default_inactive_coils(), 1.0);
        assert_eq!(EndType::ClosedGround.default_inactive_coils(), 2.0);
        assert_eq!(EndType::TaperedClosedGround.added_coils_at_solid(), -0.5);
        assert!(EndType::OpenGround.is_ground());
        assert!(!EndType::PigTail.is_ground());
        assert!(!EndType::UserSpecified.has_closed_ends(0.0));
        assert!(EndType::UserSpecified.has_closed_ends(1.5));
        assert!(!EndType::OpenGround.has_closed_ends(1.0));
    }

    #[test]
    fn test_end_type_parses_loosely() {
        assert_eq!("closed-ground".parse::<EndType>().unwrap(), EndType::ClosedGround);
        assert_eq!("Pig Tail".parse::<EndType>().unwrap(), EndType::PigTail);
        assert!("square".parse::<EndType>().is_err());
        for e in EndType::ALL {
            assert_eq!(e.to_string().parse::<EndType>().unwrap(), e);
        }
    }

    #[test]
    fn test_inactive_override_applies_to_every_end_type() {
        let p = SpringParameters::free_length(10.0, 1.0, 50.0, 10.0, EndType::Closed);
        assert_eq!(p.active_coils(), 8.0);
        let p = p.with_inactive_coils(3.0);
        assert_eq!(p.active_coils(), 7.0);
    }

    #[test]
    fn test_zero_wire_diameter_is_rejected() {
        let p = SpringParameters::free_length(10.0, 0.0, 50.0, 10.0, EndType::Open);
        assert!(matches!(
            p.validate(&config()),
            Err(SpringError::InvalidParameters(_))
        ));
    }

    #[test]
    fn test_turns_cap() {
        let p = SpringParameters::free_length(10.0, 1.0, 50.0, 2e4, EndType::Open);
        assert_eq!(
            p.validate(&config()),
            Err(SpringError::InvalidParameters(
                "Number of turns too high (> 1e4)".into()
            ))
        );
    }

    #[test]
    fn test_non_positive_active_coils_rejected() {
        let p = SpringParameters::free_length(10.0, 1.0, 50.0, 2.0, EndType::ClosedGround);
        assert!(matches!(
            p.validate(&config()),
            Err(SpringError::InvalidParameters(_))
        ));
    }

    #[test]
    fn test_cone_angle_bounds() {
        let base = SpringParameters::default();
        assert!(base.clone().with_cone_angle(45.0).validate(&config()).is_ok());
        assert!(base.clone().with_cone_angle(89.9).validate(&config()).is_err());
        assert!(base.with_cone_angle(-90.0).validate(&config()).is_err());
    }

    #[test]
    fn test_wire_must_be_thinner_than_coil() {
        let p = SpringParameters::free_length(2.0, 2.0, 50.0, 10.0, EndType::Open);
        assert!(p.validate(&config()).is_err());
    }

    #[test]
    fn test_pitch_and_count_mode() {
        let p = SpringParameters::pitch_and_count(10.0, 1.0, 3.0, 5.0);
        assert_eq!(p.effective_end_type(), EndType::Open);
        assert_eq!(p.active_coils(), 5.0);
        assert_eq!(p.free_length_value(), 15.0);
        assert!(p.validate(&config()).is_ok());
        let tiny = SpringParameters::pitch_and_count(10.0, 1.0, 0.0, 5.0);
        assert_eq!(
            tiny.validate(&config()),
            Err(SpringError::InvalidParameters("Pitch too small".into()))
        );
    }

    #[test]
    fn test_changed_fields() {
        let a = SpringParameters::default();
        let mut b = a.clone();
        assert!(a.changed_fields(&b).is_empty());
        b.end_type = EndType::ClosedGround;
        b.wire_diameter = 1.2;
        assert_eq!(a.changed_fields(&b), vec!["wire_diameter", "end_type"]);
    }
}
