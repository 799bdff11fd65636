//! # Construction Profiles and the Coefficient Table
//!
//! A construction profile lists how much of each material one hundred
//! square feet of a given construction type consumes. The coefficients are
//! the standard PWD/CPWD planning figures the original DSR tables publish:
//! bags of cement, MT of steel, brick count, cum of sand/aggregate.
//!
//! Profiles are ordered: the sequence of (material, coefficient) pairs is
//! the line-item order of the resulting estimate, so reports come out in
//! the conventional cement-first ordering.
//!
//! ## Data Shape
//!
//! Coefficient files serialize profiles as ordered pair lists:
//!
//! ```json
//! {
//!     "plaster_12mm": [["cement", 1.5], ["sand", 0.15]]
//! }
//! ```

use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::errors::{EstimateError, EstimateResult};
use crate::materials::Material;

/// Supported construction types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConstructionType {
    /// Reinforced cement concrete slab, 4 inch thick
    #[serde(rename = "rcc_slab_4in")]
    RccSlab4In,
    /// Brick masonry wall, 9 inch thick
    #[serde(rename = "brick_wall_9in")]
    BrickWall9In,
    /// Cement plaster, 12 mm thick
    #[serde(rename = "plaster_12mm")]
    Plaster12Mm,
    /// Indian patent stone flooring
    #[serde(rename = "flooring_ips")]
    FlooringIps,
}

impl ConstructionType {
    /// All construction types, in menu order
    pub const ALL: [ConstructionType; 4] = [
        ConstructionType::RccSlab4In,
        ConstructionType::BrickWall9In,
        ConstructionType::Plaster12Mm,
        ConstructionType::FlooringIps,
    ];

    /// Stable snake_case key used in data files
    pub fn key(&self) -> &'static str {
        match self {
            ConstructionType::RccSlab4In => "rcc_slab_4in",
            ConstructionType::BrickWall9In => "brick_wall_9in",
            ConstructionType::Plaster12Mm => "plaster_12mm",
            ConstructionType::FlooringIps => "flooring_ips",
        }
    }

    /// Human-readable label, as shown in menus and reports
    pub fn display_name(&self) -> &'static str {
        match self {
            ConstructionType::RccSlab4In => "RCC Slab (4 inch)",
            ConstructionType::BrickWall9In => "Brick Wall (9 inch)",
            ConstructionType::Plaster12Mm => "Plaster (12mm)",
            ConstructionType::FlooringIps => "Flooring (IPS)",
        }
    }
}

impl fmt::Display for ConstructionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for ConstructionType {
    type Err = EstimateError;

    /// Accepts either the data-file key or the display label
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ConstructionType::ALL
            .into_iter()
            .find(|t| t.key() == s || t.display_name() == s)
            .ok_or_else(|| EstimateError::unknown_construction_type(s))
    }
}

/// Material coefficients for one construction type.
///
/// Each entry is (material, quantity per 100 sqft). Order is preserved and
/// drives line-item order in estimates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConstructionProfile {
    entries: Vec<(Material, f64)>,
}

impl ConstructionProfile {
    /// Build a profile from ordered (material, coefficient) pairs.
    ///
    /// Fails with `InvalidInput` if any coefficient is not strictly positive.
    pub fn new(entries: impl IntoIterator<Item = (Material, f64)>) -> EstimateResult<Self> {
        let entries: Vec<(Material, f64)> = entries.into_iter().collect();
        for (material, coefficient) in &entries {
            if !coefficient.is_finite() || *coefficient <= 0.0 {
                return Err(EstimateError::invalid_input(
                    material.key(),
                    coefficient.to_string(),
                    "Coefficient must be positive",
                ));
            }
        }
        Ok(ConstructionProfile { entries })
    }

    /// Iterate (material, coefficient) pairs in profile order
    pub fn iter(&self) -> impl Iterator<Item = (Material, f64)> + '_ {
        self.entries.iter().copied()
    }

    /// Coefficient for a material, if the profile uses it
    pub fn coefficient(&self, material: Material) -> Option<f64> {
        self.entries
            .iter()
            .find(|(m, _)| *m == material)
            .map(|(_, c)| *c)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Immutable construction-type -> profile mapping
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CoefficientTable {
    profiles: HashMap<ConstructionType, ConstructionProfile>,
}

static DSR_COEFFICIENTS: Lazy<CoefficientTable> = Lazy::new(|| {
    let profile = |entries: &[(Material, f64)]| {
        ConstructionProfile::new(entries.iter().copied())
            .expect("built-in coefficients are valid")
    };
    CoefficientTable {
        profiles: HashMap::from([
            (
                ConstructionType::RccSlab4In,
                profile(&[
                    (Material::Cement, 4.5),
                    (Material::Steel, 0.08),
                    (Material::Sand, 0.25),
                    (Material::Aggregate20mm, 0.5),
                ]),
            ),
            (
                ConstructionType::BrickWall9In,
                profile(&[
                    (Material::Cement, 3.0),
                    (Material::Bricks, 1350.0),
                    (Material::Sand, 0.35),
                ]),
            ),
            (
                ConstructionType::Plaster12Mm,
                profile(&[(Material::Cement, 1.5), (Material::Sand, 0.15)]),
            ),
            (
                ConstructionType::FlooringIps,
                profile(&[
                    (Material::Cement, 2.0),
                    (Material::Sand, 0.18),
                    (Material::Aggregate10mm, 0.15),
                ]),
            ),
        ]),
    }
});

impl CoefficientTable {
    /// Build a coefficient table from explicit profiles
    pub fn new(profiles: impl IntoIterator<Item = (ConstructionType, ConstructionProfile)>) -> Self {
        CoefficientTable {
            profiles: profiles.into_iter().collect(),
        }
    }

    /// Built-in PWD/CPWD planning coefficients for the four supported types
    pub fn dsr_defaults() -> Self {
        DSR_COEFFICIENTS.clone()
    }

    /// Parse a coefficient table from a JSON string
    pub fn from_json_str(json: &str) -> EstimateResult<Self> {
        let table: CoefficientTable = serde_json::from_str(json)?;
        // Re-validate through the constructor path
        for profile in table.profiles.values() {
            ConstructionProfile::new(profile.iter())?;
        }
        Ok(table)
    }

    /// Load a coefficient table from a JSON data file
    pub fn load_from_file(path: &Path) -> EstimateResult<Self> {
        let json = std::fs::read_to_string(path).map_err(|e| {
            EstimateError::file_error("read", path.display().to_string(), e.to_string())
        })?;
        CoefficientTable::from_json_str(&json)
    }

    /// Profile for a construction type, if one exists
    pub fn lookup(&self, construction_type: ConstructionType) -> Option<&ConstructionProfile> {
        self.profiles.get(&construction_type)
    }

    /// Profile for a construction type, failing with `UnknownConstructionType`
    pub fn get(&self, construction_type: ConstructionType) -> EstimateResult<&ConstructionProfile> {
        self.lookup(construction_type)
            .ok_or_else(|| EstimateError::unknown_construction_type(construction_type.key()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_cover_all_types() {
        let table = CoefficientTable::dsr_defaults();
        for construction_type in ConstructionType::ALL {
            assert!(table.lookup(construction_type).is_some());
        }
    }

    #[test]
    fn test_plaster_coefficients() {
        let table = CoefficientTable::dsr_defaults();
        let plaster = table.get(ConstructionType::Plaster12Mm).unwrap();
        assert_eq!(plaster.coefficient(Material::Cement), Some(1.5));
        assert_eq!(plaster.coefficient(Material::Sand), Some(0.15));
        assert_eq!(plaster.coefficient(Material::Steel), None);
        assert_eq!(plaster.len(), 2);
    }

    #[test]
    fn test_profile_order_is_preserved() {
        let table = CoefficientTable::dsr_defaults();
        let slab = table.get(ConstructionType::RccSlab4In).unwrap();
        let order: Vec<Material> = slab.iter().map(|(m, _)| m).collect();
        assert_eq!(
            order,
            vec![
                Material::Cement,
                Material::Steel,
                Material::Sand,
                Material::Aggregate20mm
            ]
        );
    }

    #[test]
    fn test_parse_display_label_and_key() {
        assert_eq!(
            "Plaster (12mm)".parse::<ConstructionType>().unwrap(),
            ConstructionType::Plaster12Mm
        );
        assert_eq!(
            "brick_wall_9in".parse::<ConstructionType>().unwrap(),
            ConstructionType::BrickWall9In
        );
        let err = "Unknown".parse::<ConstructionType>().unwrap_err();
        assert_eq!(err.error_code(), "UNKNOWN_CONSTRUCTION_TYPE");
    }

    #[test]
    fn test_rejects_non_positive_coefficient() {
        let err = ConstructionProfile::new([(Material::Cement, -1.0)]).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");
    }

    #[test]
    fn test_from_json_str_preserves_order() {
        let json = r#"{ "plaster_12mm": [["sand", 0.2], ["cement", 1.0]] }"#;
        let table = CoefficientTable::from_json_str(json).unwrap();
        let profile = table.get(ConstructionType::Plaster12Mm).unwrap();
        let order: Vec<Material> = profile.iter().map(|(m, _)| m).collect();
        assert_eq!(order, vec![Material::Sand, Material::Cement]);
    }
}
