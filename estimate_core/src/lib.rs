//! # estimate_core - Construction Material & Cost Estimation Engine
//!
//! `estimate_core` computes material quantities and costs for common Indian
//! building-construction tasks (RCC slab, brick wall, plaster, IPS flooring)
//! from plan dimensions, using DSR-style unit rates and per-100-sqft
//! material coefficients.
//!
//! ## Design Philosophy
//!
//! - **Stateless**: the estimator is a pure function over immutable tables
//! - **Explicit configuration**: rate and coefficient tables are injected
//!   at construction time, never read from ambient globals
//! - **Closed domains**: materials and construction types are enums, so
//!   pricing and display are exhaustively checked at compile time
//! - **Rich errors**: structured, serializable error types
//!
//! ## Quick Start
//!
//! ```rust
//! use estimate_core::estimate::{Estimator, EstimateRequest};
//! use estimate_core::profiles::ConstructionType;
//!
//! let estimator = Estimator::with_dsr_defaults();
//! let estimate = estimator.estimate(&EstimateRequest {
//!     length_ft: 17.0,
//!     width_ft: 70.0,
//!     construction_type: ConstructionType::Plaster12Mm,
//!     wastage_percent: 5,
//!     include_labor: true,
//! }).unwrap();
//!
//! println!("total: {:.2} for {} sqft", estimate.total_cost, estimate.area_sqft);
//! ```
//!
//! ## Modules
//!
//! - [`materials`] - Material identities and the DSR rate table
//! - [`profiles`] - Construction types and coefficient profiles
//! - [`estimate`] - The quantity/cost estimation pipeline
//! - [`advisory`] - Optional AI suggestion providers (never block a result)
//! - [`report`] - JSON/CSV report building and export
//! - [`errors`] - Structured error types

pub mod advisory;
pub mod errors;
pub mod estimate;
pub mod materials;
pub mod profiles;
pub mod report;

// Re-export commonly used types at crate root for convenience
pub use errors::{EstimateError, EstimateResult};
pub use estimate::{CostEstimate, EstimateRequest, Estimator, MaterialLineItem};
pub use materials::{Material, MaterialRate, RateTable};
pub use profiles::{CoefficientTable, ConstructionProfile, ConstructionType};
