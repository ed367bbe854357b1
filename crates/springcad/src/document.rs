//! Spring definition files.
//!
//! ```toml
//! [spring]
//! outer_diameter = 10.0
//! wire_diameter = 1.0
//! end_type = "closed_ground"
//!
//! [spring.dimensioning]
//! mode = "free_length"
//! free_length = 50.0
//! total_coils = 10.0
//!
//! [spring.variant]
//! kind = "compression"
//!
//! [pipeline]
//! samples_per_turn = 64
//! ```

use serde::{Deserialize, Serialize};

use crate::config::PipelineConfig;
use crate::design::Material;
use crate::error::ConfigError;
use crate::params::{EndType, SpringParameters};

/// A spring, its pipeline settings and its wire material.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpringDocument {
    /// Spring parameters.
    pub spring: SpringParameters,
    /// Pipeline settings.
    #[serde(default)]
    pub pipeline: PipelineConfig,
    /// Wire material for design calculations.
    #[serde(default)]
    pub material: Material,
}

impl SpringDocument {
    /// Wrap parameters with default settings.
    pub fn new(spring: SpringParameters) -> Self {
        Self {
            spring,
            pipeline: PipelineConfig::default(),
            material: Material::default(),
        }
    }

    /// A starter document for `end_type`.
    pub fn template(end_type: EndType) -> Self {
        Self::new(SpringParameters::free_length(10.0, 1.0, 50.0, 10.0, end_type))
    }

    /// Parse and validate a document.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let doc: Self = toml::from_str(text)?;
        doc.spring.validate(&doc.pipeline)?;
        Ok(doc)
    }

    /// Serialize to TOML.
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::Dimensioning;
    use crate::variant::SpringVariant;

    const CLOSED_GROUND: &str = r#"
[spring]
outer_diameter = 10.0
wire_diameter = 1.0
end_type = "closed_ground"

[spring.dimensioning]
mode = "free_length"
free_length = 50.0
total_coils = 10.0

[pipeline]
samples_per_turn = 64
"#;

    #[test]
    fn test_parse_fills_defaults() {
        let doc = SpringDocument::from_toml_str(CLOSED_GROUND).unwrap();
        assert_eq!(doc.spring.end_type, EndType::ClosedGround);
        assert_eq!(doc.spring.variant, SpringVariant::Compression);
        assert_eq!(doc.spring.inactive_coils, None);
        assert_eq!(
            doc.spring.dimensioning,
            Dimensioning::FreeLength {
                free_length: 50.0,
                total_coils: 10.0
            }
        );
        assert_eq!(doc.pipeline.samples_per_turn, 64);
        assert_eq!(doc.pipeline.profile_segments, 24);
        assert_eq!(doc.material, Material::music_wire());
    }

    #[test]
    fn test_torsion_and_pitch_mode() {
        let text = r#"
[spring]
outer_diameter = 12.0
wire_diameter = 1.2
handedness = "left_handed"

[spring.dimensioning]
mode = "pitch_and_count"
pitch = 3.0
coil_count = 6.0

[spring.variant]
kind = "torsion"
arm_angle = 45.0
"#;
        let doc = SpringDocument::from_toml_str(text).unwrap();
        assert_eq!(
            doc.spring.variant,
            SpringVariant::Torsion {
                arm_length: 10.0,
                arm_angle: 45.0
            }
        );
        assert_eq!(doc.spring.free_length_value(), 18.0);
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let text = CLOSED_GROUND.replace("total_coils = 10.0", "total_coils = 2e4");
        let err = SpringDocument::from_toml_str(&text).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
        assert!(err.to_string().contains("Number of turns too high"));
    }

    #[test]
    fn test_malformed_toml_is_a_parse_error() {
        let err = SpringDocument::from_toml_str("[spring\nouter_diameter = ").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_template_round_trips() {
        for end_type in EndType::ALL {
            let doc = SpringDocument::template(end_type);
            let text = doc.to_toml_string().unwrap();
            assert_eq!(SpringDocument::from_toml_str(&text).unwrap(), doc);
        }
    }
}
