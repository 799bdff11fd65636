//! # The Estimator
//!
//! Pure quantity/cost pipeline: area, coefficient-driven material
//! quantities, wastage markup, DSR pricing, labor allowance, totals.
//!
//! All arithmetic stays at full f64 precision; rounding to two decimals
//! happens only when a report or frontend formats the numbers, so summing
//! line costs never drifts from the material subtotal.
//!
//! ## Example
//!
//! ```rust
//! use estimate_core::estimate::{Estimator, EstimateRequest};
//! use estimate_core::profiles::ConstructionType;
//!
//! let estimator = Estimator::with_dsr_defaults();
//! let request = EstimateRequest {
//!     length_ft: 17.0,
//!     width_ft: 70.0,
//!     construction_type: ConstructionType::Plaster12Mm,
//!     wastage_percent: 5,
//!     include_labor: true,
//! };
//! let estimate = estimator.estimate(&request).unwrap();
//! assert_eq!(estimate.area_sqft, 1190.0);
//! ```

use serde::{Deserialize, Serialize};

use crate::errors::{EstimateError, EstimateResult};
use crate::materials::{Material, RateTable};
use crate::profiles::{CoefficientTable, ConstructionType};

/// Labor allowance as a fraction of material cost (PWD planning convention)
pub const LABOR_COST_FRACTION: f64 = 0.30;

/// Upper bound for the wastage markup, in percent
pub const MAX_WASTAGE_PERCENT: u8 = 20;

/// Coefficients are quoted per this many square feet of constructed area
const COEFFICIENT_BASIS_SQFT: f64 = 100.0;

/// One material estimation request.
///
/// Dimensions are in feet. Wastage is an integer percentage markup on raw
/// quantities, 0 to 20 inclusive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EstimateRequest {
    pub length_ft: f64,
    pub width_ft: f64,
    pub construction_type: ConstructionType,
    pub wastage_percent: u8,
    pub include_labor: bool,
}

impl EstimateRequest {
    /// Validate dimensions and wastage range.
    ///
    /// Out-of-range values are rejected, never clamped.
    pub fn validate(&self) -> EstimateResult<()> {
        if !self.length_ft.is_finite() || self.length_ft <= 0.0 {
            return Err(EstimateError::invalid_input(
                "length_ft",
                self.length_ft.to_string(),
                "Length must be positive",
            ));
        }
        if !self.width_ft.is_finite() || self.width_ft <= 0.0 {
            return Err(EstimateError::invalid_input(
                "width_ft",
                self.width_ft.to_string(),
                "Width must be positive",
            ));
        }
        if self.wastage_percent > MAX_WASTAGE_PERCENT {
            return Err(EstimateError::invalid_input(
                "wastage_percent",
                self.wastage_percent.to_string(),
                format!("Wastage must be 0-{} percent", MAX_WASTAGE_PERCENT),
            ));
        }
        Ok(())
    }
}

/// One material's row in the cost breakdown.
///
/// `quantity` is post-wastage; `line_cost = quantity * unit_price`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialLineItem {
    pub material: Material,
    pub quantity: f64,
    pub unit_price: f64,
    pub unit_label: String,
    pub line_cost: f64,
}

/// Full estimation result: quantities, costs, and derived totals
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostEstimate {
    /// Plan area in square feet (length x width)
    pub area_sqft: f64,
    /// Per-material breakdown, in profile order
    pub line_items: Vec<MaterialLineItem>,
    /// Sum of line costs over priced materials
    pub material_cost: f64,
    /// 30% of material cost when labor is included, exactly 0 otherwise
    pub labor_cost: f64,
    pub total_cost: f64,
    pub cost_per_sqft: f64,
}

/// Stateless estimation engine over immutable rate/coefficient tables.
///
/// The tables are injected at construction time so tests can use fixture
/// data and deployments can load current DSR figures from files.
#[derive(Debug, Clone)]
pub struct Estimator {
    rates: RateTable,
    coefficients: CoefficientTable,
}

impl Estimator {
    pub fn new(rates: RateTable, coefficients: CoefficientTable) -> Self {
        Estimator {
            rates,
            coefficients,
        }
    }

    /// Estimator backed by the built-in DSR defaults
    pub fn with_dsr_defaults() -> Self {
        Estimator::new(RateTable::dsr_defaults(), CoefficientTable::dsr_defaults())
    }

    pub fn rates(&self) -> &RateTable {
        &self.rates
    }

    pub fn coefficients(&self) -> &CoefficientTable {
        &self.coefficients
    }

    /// Compute the material and cost estimate for a request.
    ///
    /// Pure function: identical inputs produce identical results, and
    /// nothing in the estimator mutates.
    ///
    /// Profile materials without a rate entry are excluded from the
    /// breakdown rather than raising. The built-in tables price every
    /// profile material, so this only fires with partial custom rate
    /// data; the policy matches the historical behavior of the DSR
    /// estimate sheets this engine replaces.
    pub fn estimate(&self, request: &EstimateRequest) -> EstimateResult<CostEstimate> {
        request.validate()?;

        let profile = self.coefficients.get(request.construction_type)?;

        let area_sqft = request.length_ft * request.width_ft;
        let area_units = area_sqft / COEFFICIENT_BASIS_SQFT;
        let wastage_multiplier = 1.0 + f64::from(request.wastage_percent) / 100.0;

        let mut line_items = Vec::with_capacity(profile.len());
        let mut material_cost = 0.0;

        for (material, coefficient) in profile.iter() {
            let quantity = coefficient * area_units * wastage_multiplier;
            let Some(rate) = self.rates.lookup(material) else {
                continue;
            };
            let line_cost = quantity * rate.unit_price;
            material_cost += line_cost;
            line_items.push(MaterialLineItem {
                material,
                quantity,
                unit_price: rate.unit_price,
                unit_label: rate.unit_label.clone(),
                line_cost,
            });
        }

        let labor_cost = if request.include_labor {
            material_cost * LABOR_COST_FRACTION
        } else {
            0.0
        };
        let total_cost = material_cost + labor_cost;

        Ok(CostEstimate {
            area_sqft,
            line_items,
            material_cost,
            labor_cost,
            total_cost,
            cost_per_sqft: total_cost / area_sqft,
        })
    }
}
