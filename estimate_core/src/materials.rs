//! # Materials and the Rate Table
//!
//! Material identity is a closed enum rather than free-form strings, so the
//! compiler enforces exhaustive handling wherever a material is priced or
//! displayed. Rates are indicative DSR (Delhi Schedule of Rates) values;
//! production deployments load current rates from a JSON data file instead
//! of editing code.
//!
//! ## Data Shape
//!
//! Rate files use the same shape as the built-in defaults:
//!
//! ```json
//! {
//!     "cement": { "rate": 400.0, "unit": "per bag" },
//!     "steel": { "rate": 65000.0, "unit": "per MT" }
//! }
//! ```
//!
//! ## Example
//!
//! ```rust
//! use estimate_core::materials::{Material, RateTable};
//!
//! let rates = RateTable::dsr_defaults();
//! let cement = rates.lookup(Material::Cement).unwrap();
//! assert_eq!(cement.unit_price, 400.0);
//! assert_eq!(cement.unit_label, "per bag");
//! ```

use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::errors::{EstimateError, EstimateResult};

/// Construction material identity.
///
/// The set is closed: adding a material means adding a variant, a default
/// rate, and (where applicable) profile coefficients, all checked at
/// compile time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Material {
    #[serde(rename = "cement")]
    Cement,
    #[serde(rename = "steel")]
    Steel,
    #[serde(rename = "bricks")]
    Bricks,
    #[serde(rename = "sand")]
    Sand,
    #[serde(rename = "aggregate_20mm")]
    Aggregate20mm,
    #[serde(rename = "aggregate_10mm")]
    Aggregate10mm,
}

impl Material {
    /// All materials for iteration
    pub const ALL: [Material; 6] = [
        Material::Cement,
        Material::Steel,
        Material::Bricks,
        Material::Sand,
        Material::Aggregate20mm,
        Material::Aggregate10mm,
    ];

    /// Stable snake_case key used in data files and JSON payloads
    pub fn key(&self) -> &'static str {
        match self {
            Material::Cement => "cement",
            Material::Steel => "steel",
            Material::Bricks => "bricks",
            Material::Sand => "sand",
            Material::Aggregate20mm => "aggregate_20mm",
            Material::Aggregate10mm => "aggregate_10mm",
        }
    }

    /// Human-readable name for tables and reports
    pub fn display_name(&self) -> &'static str {
        match self {
            Material::Cement => "Cement",
            Material::Steel => "Steel",
            Material::Bricks => "Bricks",
            Material::Sand => "Sand",
            Material::Aggregate20mm => "Aggregate 20mm",
            Material::Aggregate10mm => "Aggregate 10mm",
        }
    }
}

impl fmt::Display for Material {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for Material {
    type Err = EstimateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Material::ALL
            .into_iter()
            .find(|m| m.key() == s)
            .ok_or_else(|| EstimateError::invalid_input("material", s, "Unknown material"))
    }
}

/// Unit rate for a single material.
///
/// Field names match the rate-file shape (`rate`, `unit`) so the built-in
/// defaults and externally supplied data files deserialize identically.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialRate {
    /// Price per unit in rupees
    #[serde(rename = "rate")]
    pub unit_price: f64,
    /// Display label for the unit, e.g. "per bag", "per cum"
    #[serde(rename = "unit")]
    pub unit_label: String,
}

impl MaterialRate {
    pub fn new(unit_price: f64, unit_label: impl Into<String>) -> Self {
        MaterialRate {
            unit_price,
            unit_label: unit_label.into(),
        }
    }
}

/// Immutable material -> unit-rate mapping.
///
/// Built once at startup (defaults or data file) and read-only afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RateTable {
    rates: HashMap<Material, MaterialRate>,
}

static DSR_RATES: Lazy<RateTable> = Lazy::new(|| {
    RateTable::new([
        (Material::Cement, MaterialRate::new(400.0, "per bag")),
        (Material::Steel, MaterialRate::new(65000.0, "per MT")),
        (Material::Bricks, MaterialRate::new(7000.0, "per 1000 nos")),
        (Material::Sand, MaterialRate::new(1500.0, "per cum")),
        (Material::Aggregate20mm, MaterialRate::new(1200.0, "per cum")),
        (Material::Aggregate10mm, MaterialRate::new(1300.0, "per cum")),
    ])
    .expect("built-in DSR rates are valid")
});

impl RateTable {
    /// Build a rate table from explicit entries.
    ///
    /// Fails with `InvalidInput` if any unit price is not strictly positive.
    pub fn new(
        entries: impl IntoIterator<Item = (Material, MaterialRate)>,
    ) -> EstimateResult<Self> {
        let rates: HashMap<Material, MaterialRate> = entries.into_iter().collect();
        for (material, rate) in &rates {
            if !rate.unit_price.is_finite() || rate.unit_price <= 0.0 {
                return Err(EstimateError::invalid_input(
                    material.key(),
                    rate.unit_price.to_string(),
                    "Unit price must be positive",
                ));
            }
        }
        Ok(RateTable { rates })
    }

    /// Built-in indicative DSR rates. Verify against current DSR
    /// publications before using for a real tender.
    pub fn dsr_defaults() -> Self {
        DSR_RATES.clone()
    }

    /// Parse a rate table from a JSON string
    pub fn from_json_str(json: &str) -> EstimateResult<Self> {
        let rates: HashMap<Material, MaterialRate> = serde_json::from_str(json)?;
        RateTable::new(rates)
    }

    /// Load a rate table from a JSON data file
    pub fn load_from_file(path: &Path) -> EstimateResult<Self> {
        let json = std::fs::read_to_string(path).map_err(|e| {
            EstimateError::file_error("read", path.display().to_string(), e.to_string())
        })?;
        RateTable::from_json_str(&json)
    }

    /// Look up the rate for a material, if one exists
    pub fn lookup(&self, material: Material) -> Option<&MaterialRate> {
        self.rates.get(&material)
    }

    /// Look up the rate for a material, failing with `RateNotFound`
    pub fn get(&self, material: Material) -> EstimateResult<&MaterialRate> {
        self.lookup(material)
            .ok_or_else(|| EstimateError::rate_not_found(material.key()))
    }

    /// Number of priced materials
    pub fn len(&self) -> usize {
        self.rates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_cover_all_materials() {
        let rates = RateTable::dsr_defaults();
        for material in Material::ALL {
            assert!(
                rates.lookup(material).is_some(),
                "missing default rate for {}",
                material.key()
            );
        }
    }

    #[test]
    fn test_default_values() {
        let rates = RateTable::dsr_defaults();
        assert_eq!(rates.get(Material::Cement).unwrap().unit_price, 400.0);
        assert_eq!(rates.get(Material::Steel).unwrap().unit_price, 65000.0);
        assert_eq!(rates.get(Material::Bricks).unwrap().unit_label, "per 1000 nos");
        assert_eq!(rates.get(Material::Sand).unwrap().unit_price, 1500.0);
    }

    #[test]
    fn test_material_key_roundtrip() {
        for material in Material::ALL {
            assert_eq!(material.key().parse::<Material>().unwrap(), material);
        }
        assert!("granite".parse::<Material>().is_err());
    }

    #[test]
    fn test_from_json_str() {
        let json = r#"{
            "cement": { "rate": 425.0, "unit": "per bag" },
            "sand": { "rate": 1600.0, "unit": "per cum" }
        }"#;
        let rates = RateTable::from_json_str(json).unwrap();
        assert_eq!(rates.len(), 2);
        assert_eq!(rates.get(Material::Cement).unwrap().unit_price, 425.0);
        assert!(rates.lookup(Material::Steel).is_none());
    }

    #[test]
    fn test_rejects_non_positive_price() {
        let json = r#"{ "cement": { "rate": 0.0, "unit": "per bag" } }"#;
        let err = RateTable::from_json_str(json).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");
    }

    #[test]
    fn test_get_missing_material() {
        let rates = RateTable::new([]).unwrap();
        let err = rates.get(Material::Bricks).unwrap_err();
        assert_eq!(err.error_code(), "RATE_NOT_FOUND");
    }
}
