//! Spring variants and the post-processing step each one selects.
//!
//! Compression springs are the bare coil body. Extension springs get a
//! straight hook continuing each end tangent; torsion springs get a
//! straight arm at each end, perpendicular to the axis. Extras are kept
//! beside the body in a compound, never fused.

use serde::{Deserialize, Serialize};
use springcad_kernel::{Shape, Solid};
use springcad_math::{Point3, Vec3};

use crate::path::SpringPath;
use crate::{Result, SpringError};

fn default_arm_length() -> f64 {
    10.0
}

fn default_arm_angle() -> f64 {
    90.0
}

/// The kind of spring and its variant-specific dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SpringVariant {
    /// Plain compression spring.
    #[default]
    Compression,
    /// Extension spring with straight hooks.
    Extension {
        /// Hook length at the start of the path.
        #[serde(default)]
        start_length: f64,
        /// Hook length at the end of the path.
        #[serde(default)]
        end_length: f64,
    },
    /// Torsion spring with straight arms.
    Torsion {
        /// Length of each arm.
        #[serde(default = "default_arm_length")]
        arm_length: f64,
        /// Arm angle in degrees; 0 is tangential, 90 is radial.
        #[serde(default = "default_arm_angle")]
        arm_angle: f64,
    },
}

/// Post-processing applied to the swept coil body.
pub type PostProcess = Box<dyn Fn(&SpringPath, Solid) -> Result<Shape>>;

/// A straight wire piece added to the body.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StraightLeg {
    /// Where the leg leaves the path.
    pub base: Point3,
    /// Unit direction of the leg.
    pub direction: Vec3,
    /// Leg length.
    pub length: f64,
}

impl SpringVariant {
    /// Default torsion variant (10 mm arms at 90 degrees).
    pub fn torsion() -> Self {
        SpringVariant::Torsion {
            arm_length: default_arm_length(),
            arm_angle: default_arm_angle(),
        }
    }

    /// Check the variant's dimensions against their bounds.
    pub fn validate(&self) -> Result<()> {
        let in_range = |v: f64, lo: f64, hi: f64| v.is_finite() && (lo..=hi).contains(&v);
        match *self {
            SpringVariant::Compression => Ok(()),
            SpringVariant::Extension {
                start_length,
                end_length,
            } => {
                if !in_range(start_length, 0.0, 1000.0) || !in_range(end_length, 0.0, 1000.0) {
                    return Err(SpringError::invalid(
                        "Hook lengths must be between 0 and 1000",
                    ));
                }
                Ok(())
            }
            SpringVariant::Torsion {
                arm_length,
                arm_angle,
            } => {
                if !in_range(arm_length, 0.0, 1000.0) {
                    return Err(SpringError::invalid("Arm length must be between 0 and 1000"));
                }
                if !in_range(arm_angle, -360.0, 360.0) {
                    return Err(SpringError::invalid(
                        "Arm angle must be between -360 and 360 degrees",
                    ));
                }
                Ok(())
            }
        }
    }

    /// The straight legs this variant adds to `path`.
    pub fn legs(&self, path: &SpringPath) -> Vec<StraightLeg> {
        let ends = [
            (path.start_point(), -path.start_tangent()),
            (path.end_point(), path.end_tangent()),
        ];
        match *self {
            SpringVariant::Compression => vec![],
            SpringVariant::Extension {
                start_length,
                end_length,
            } => ends
                .iter()
                .zip([start_length, end_length])
                .filter(|(_, len)| *len > 0.0)
                .map(|(&(point, outward), length)| StraightLeg {
                    base: point,
                    direction: outward,
                    length,
                })
                .collect(),
            SpringVariant::Torsion {
                arm_length,
                arm_angle,
            } => {
                if arm_length <= 0.0 {
                    return vec![];
                }
                let (sin_a, cos_a) = arm_angle.to_radians().sin_cos();
                ends.iter()
                    .map(|&(point, outward)| {
                        let horizontal = Vec3::new(outward.x, outward.y, 0.0);
                        let radial = Vec3::new(point.x, point.y, 0.0);
                        let t_h = horizontal.try_normalize(1e-12).unwrap_or_else(Vec3::x);
                        let r_hat = radial.try_normalize(1e-12).unwrap_or_else(Vec3::y);
                        StraightLeg {
                            base: point,
                            direction: (cos_a * t_h + sin_a * r_hat).normalize(),
                            length: arm_length,
                        }
                    })
                    .collect()
            }
        }
    }

    /// Wire length added by the legs.
    pub fn extra_length(&self, path: &SpringPath) -> f64 {
        self.legs(path).iter().map(|l| l.length).sum()
    }

    /// Resolve the variant into the post-processing step handed to the
    /// solid former.
    pub fn post_process(self, wire_radius: f64, segments: usize) -> PostProcess {
        match self {
            SpringVariant::Compression => Box::new(|_: &SpringPath, body: Solid| Ok(Shape::Solid(body))),
            variant => Box::new(move |path: &SpringPath, body: Solid| {
                let mut solids = vec![body];
                for leg in variant.legs(path) {
                    solids.push(Solid::cylinder(
                        leg.base,
                        leg.direction,
                        leg.length,
                        wire_radius,
                        segments,
                    )?);
                }
                Ok(Shape::compound(solids))
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PipelineConfig;
    use crate::params::{EndType, SpringParameters};
    use crate::partition::Partition;
    use approx::assert_abs_diff_eq;

    fn path() -> SpringPath {
        let params = SpringParameters::free_length(10.0, 1.0, 50.0, 10.0, EndType::Open);
        let config = PipelineConfig::default();
        let partition = Partition::compute(&params, &config).unwrap();
        SpringPath::build(&partition, params.handedness, &config).unwrap()
    }

    fn body() -> Solid {
        Solid::cuboid(Point3::origin(), Vec3::new(1.0, 1.0, 1.0)).unwrap()
    }

    #[test]
    fn test_extension_hooks_continue_end_tangents() {
        let path = path();
        let variant = SpringVariant::Extension {
            start_length: 5.0,
            end_length: 8.0,
        };
        let legs = variant.legs(&path);
        assert_eq!(legs.len(), 2);
        // Both hooks leave the path at its ends and point away from the coil.
        assert!((legs[0].base - path.start_point()).norm() < 1e-12);
        assert!(legs[0].direction.dot(&-path.start_tangent()) > 1.0 - 1e-12);
        assert!((legs[1].base - path.end_point()).norm() < 1e-12);
        assert!(legs[1].direction.dot(&path.end_tangent()) > 1.0 - 1e-12);
        assert_abs_diff_eq!(variant.extra_length(&path), 13.0, epsilon = 1e-12);
    }

    #[test]
    fn test_zero_hook_is_skipped() {
        let variant = SpringVariant::Extension {
            start_length: 0.0,
            end_length: 3.0,
        };
        assert_eq!(variant.legs(&path()).len(), 1);
    }

    #[test]
    fn test_radial_torsion_arm_points_away_from_axis() {
        let path = path();
        let legs = SpringVariant::torsion().legs(&path);
        assert_eq!(legs.len(), 2);
        for leg in &legs {
            assert!(leg.direction.z.abs() < 1e-12);
            let radial = Vec3::new(leg.base.x, leg.base.y, 0.0).normalize();
            assert_abs_diff_eq!(leg.direction.dot(&radial), 1.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_tangential_torsion_arm_follows_end_tangent() {
        let path = path();
        let variant = SpringVariant::Torsion {
            arm_length: 10.0,
            arm_angle: 0.0,
        };
        let leg = variant.legs(&path)[1];
        let t = path.end_tangent();
        let t_h = Vec3::new(t.x, t.y, 0.0).normalize();
        assert_abs_diff_eq!(leg.direction.dot(&t_h), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_post_process_builds_compound() {
        let path = path();
        let compression = SpringVariant::Compression.post_process(0.5, 12);
        assert!(matches!(compression(&path, body()).unwrap(), Shape::Solid(_)));
        let torsion = SpringVariant::torsion().post_process(0.5, 12);
        let shape = torsion(&path, body()).unwrap();
        assert_eq!(shape.solids().len(), 3);
    }

    #[test]
    fn test_bounds() {
        assert!(SpringVariant::Extension {
            start_length: -1.0,
            end_length: 0.0
        }
        .validate()
        .is_err());
        assert!(SpringVariant::Torsion {
            arm_length: 10.0,
            arm_angle: 400.0
        }
        .validate()
        .is_err());
        assert!(SpringVariant::torsion().validate().is_ok());
    }

    #[test]
    fn test_torsion_defaults_from_toml() {
        let v: SpringVariant = toml::from_str("kind = \"torsion\"").unwrap();
        assert_eq!(v, SpringVariant::torsion());
    }
}
