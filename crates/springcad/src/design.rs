//! Spring design calculations: index, stress factors, rate, solid length
//! and wire weight.

use std::f64::consts::PI;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::params::{EndType, SpringParameters};
use crate::variant::SpringVariant;

/// Wire material properties.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Material {
    /// Density in g/mm³.
    pub density: f64,
    /// Shear modulus G in Pa.
    pub shear_modulus: f64,
    /// Young's modulus E in Pa.
    pub youngs_modulus: f64,
    /// Rate correction factor Kh.
    pub rate_factor: f64,
}

impl Material {
    /// ASTM A228 music wire.
    pub fn music_wire() -> Self {
        Self {
            density: 0.00786,
            shear_modulus: 79.293e9,
            youngs_modulus: 206.8e9,
            rate_factor: 1.0,
        }
    }
}

impl Default for Material {
    fn default() -> Self {
        Self::music_wire()
    }
}

/// Derived design quantities for one parameter set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DesignReport {
    /// Mean coil diameter `D`.
    pub mean_diameter: f64,
    /// Inner diameter.
    pub inner_diameter: f64,
    /// Spring index `C = D/d`.
    pub spring_index: f64,
    /// Wahl curvature factor.
    pub curvature_factor: f64,
    /// Curvature factor plus direct shear correction.
    pub stress_correction: f64,
    /// Spring rate, in `rate_unit`.
    pub rate: f64,
    /// Unit of `rate`.
    pub rate_unit: &'static str,
    /// Length when compressed solid.
    pub solid_length: f64,
    /// Free length over mean diameter.
    pub slenderness: f64,
    /// Developed wire length of the coils.
    pub wire_length: f64,
    /// Wire weight in grams.
    pub weight: f64,
    /// Shear stress per unit load, in MPa/N.
    pub stress_factor: f64,
}

impl DesignReport {
    /// Compute the report. Assumes `params` has been validated.
    pub fn compute(params: &SpringParameters, material: &Material) -> Self {
        let d = params.wire_diameter;
        let big_d = params.mean_diameter();
        let c = big_d / d;
        let na = params.active_coils();
        let nt = params.total_coils();
        let l = params.free_length_value();
        let end_type = params.effective_end_type();

        let kc = (4.0 * c - 1.0) / (4.0 * c - 4.0);
        let ks = kc + 0.615 / c;
        // Moduli in MPa give rates in N/mm.
        let g = material.shear_modulus / 1e6;
        let e = material.youngs_modulus / 1e6;
        let (rate, rate_unit) = match params.variant {
            SpringVariant::Compression => {
                (material.rate_factor * g * big_d / (8.0 * na * c.powi(4)), "N/mm")
            }
            SpringVariant::Extension { .. } => (g * d.powi(4) / (8.0 * na * big_d.powi(3)), "N/mm"),
            SpringVariant::Torsion { .. } => (e * d.powi(4) / (64.0 * na * big_d), "N·mm/rad"),
        };

        let mut wire_length = (l * l + (nt * PI * big_d).powi(2)).sqrt();
        if end_type == EndType::TaperedClosedGround {
            wire_length -= 3.926 * d;
        }

        Self {
            mean_diameter: big_d,
            inner_diameter: big_d - d,
            spring_index: c,
            curvature_factor: kc,
            stress_correction: ks,
            rate,
            rate_unit,
            solid_length: d * (nt + end_type.added_coils_at_solid()),
            slenderness: l / big_d,
            wire_length,
            weight: material.density * (PI * d * d / 4.0) * wire_length,
            stress_factor: ks * 8.0 * big_d / (PI * d.powi(3)),
        }
    }
}

impl fmt::Display for DesignReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rows: [(&str, f64, &str); 11] = [
            ("mean diameter", self.mean_diameter, "mm"),
            ("inner diameter", self.inner_diameter, "mm"),
            ("spring index", self.spring_index, ""),
            ("curvature factor", self.curvature_factor, ""),
            ("stress correction", self.stress_correction, ""),
            ("rate", self.rate, self.rate_unit),
            ("solid length", self.solid_length, "mm"),
            ("slenderness", self.slenderness, ""),
            ("wire length", self.wire_length, "mm"),
            ("weight", self.weight, "g"),
            ("stress factor", self.stress_factor, "MPa/N"),
        ];
        for (name, value, unit) in rows {
            writeln!(f, "{name:<18} {value:>12.4} {unit}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn open() -> SpringParameters {
        SpringParameters::free_length(10.0, 1.0, 50.0, 10.0, EndType::Open)
    }

    #[test]
    fn test_index_and_wahl_factors() {
        let r = DesignReport::compute(&open(), &Material::default());
        assert_relative_eq!(r.mean_diameter, 9.0);
        assert_relative_eq!(r.inner_diameter, 8.0);
        assert_relative_eq!(r.spring_index, 9.0);
        assert_relative_eq!(r.curvature_factor, 35.0 / 32.0);
        assert_relative_eq!(r.stress_correction, 35.0 / 32.0 + 0.615 / 9.0);
    }

    #[test]
    fn test_compression_rate() {
        let r = DesignReport::compute(&open(), &Material::music_wire());
        // G d^4 / (8 Na D^3) with G in MPa.
        assert_relative_eq!(r.rate, 79_293.0 / (8.0 * 10.0 * 729.0), max_relative = 1e-12);
        assert_eq!(r.rate_unit, "N/mm");
    }

    #[test]
    fn test_torsion_rate_uses_youngs_modulus() {
        let params = open().with_variant(SpringVariant::torsion());
        let r = DesignReport::compute(&params, &Material::music_wire());
        assert_relative_eq!(r.rate, 206_800.0 / (64.0 * 10.0 * 9.0), max_relative = 1e-12);
        assert_eq!(r.rate_unit, "N·mm/rad");
    }

    #[test]
    fn test_solid_length_and_weight() {
        let r = DesignReport::compute(&open(), &Material::music_wire());
        assert_relative_eq!(r.solid_length, 11.0);
        let wire = (50.0f64.powi(2) + (10.0 * PI * 9.0).powi(2)).sqrt();
        assert_relative_eq!(r.wire_length, wire);
        assert_relative_eq!(r.weight, 0.00786 * PI / 4.0 * wire);
        assert_relative_eq!(r.slenderness, 50.0 / 9.0);
    }

    #[test]
    fn test_tapered_wire_length_is_shortened() {
        let params = SpringParameters::free_length(10.0, 1.0, 50.0, 10.0, EndType::TaperedClosedGround);
        let r = DesignReport::compute(&params, &Material::music_wire());
        let wire = (50.0f64.powi(2) + (10.0 * PI * 9.0).powi(2)).sqrt();
        assert_relative_eq!(r.wire_length, wire - 3.926);
        assert_relative_eq!(r.solid_length, 9.5);
    }

    #[test]
    fn test_display_lists_every_quantity() {
        let text = DesignReport::compute(&open(), &Material::default()).to_string();
        assert_eq!(text.lines().count(), 11);
        assert!(text.contains("spring index"));
    }
}
