//! # Report Building and Export
//!
//! Converts a `CostEstimate` into the shapes the reporting frontends
//! consume: a JSON project document and a row-per-material CSV table.
//! This is the only layer that rounds; the estimator keeps full
//! precision and the report formats to two decimals at the edge.
//!
//! ## JSON Shape
//!
//! ```json
//! {
//!     "project_details": { "date": "...", "dimensions": "...", "area": 1190.0, "construction_type": "..." },
//!     "materials": [{ "Material": "...", "Quantity": "...", "Unit": "...", "Rate": "...", "Cost": "..." }],
//!     "costs": { "material_cost": 0.0, "labor_cost": 0.0, "total_cost": 0.0, "cost_per_sqft": 0.0 }
//! }
//! ```

use std::path::Path;

use chrono::{Local, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::errors::{EstimateError, EstimateResult};
use crate::estimate::{CostEstimate, EstimateRequest};

/// Format rupees with comma thousands grouping and two decimals,
/// e.g. `₹13,400.89`
pub fn format_inr(amount: f64) -> String {
    let rounded = (amount * 100.0).round() / 100.0;
    let negative = rounded < 0.0;
    let cents = (rounded.abs() * 100.0).round() as u64;
    let whole = cents / 100;
    let fraction = cents % 100;
    let grouped = group_thousands(whole);
    if negative {
        format!("-₹{}.{:02}", grouped, fraction)
    } else {
        format!("₹{}.{:02}", grouped, fraction)
    }
}

/// Format a whole-rupee rate, e.g. `₹65,000`
pub fn format_inr_rate(rate: f64) -> String {
    format!("₹{}", group_thousands(rate.round() as u64))
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

/// Project header block of the report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectDetails {
    /// Estimate date, `YYYY-MM-DD`
    pub date: String,
    /// e.g. "17 x 70 ft"
    pub dimensions: String,
    pub area: f64,
    pub construction_type: String,
}

/// One formatted material row. Column names are the exact export
/// headers, shared by the JSON `materials[]` array and the CSV table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialRow {
    #[serde(rename = "Material")]
    pub material: String,
    #[serde(rename = "Quantity")]
    pub quantity: String,
    #[serde(rename = "Unit")]
    pub unit: String,
    #[serde(rename = "Rate")]
    pub rate: String,
    #[serde(rename = "Cost")]
    pub cost: String,
}

/// Cost summary block, raw numbers for downstream consumers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostSummary {
    pub material_cost: f64,
    pub labor_cost: f64,
    pub total_cost: f64,
    pub cost_per_sqft: f64,
}

/// Complete estimate report, ready for JSON or CSV export
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EstimateReport {
    pub project_details: ProjectDetails,
    pub materials: Vec<MaterialRow>,
    pub costs: CostSummary,
}

impl EstimateReport {
    /// Build a report dated today
    pub fn new(request: &EstimateRequest, estimate: &CostEstimate) -> Self {
        EstimateReport::with_date(request, estimate, Local::now().date_naive())
    }

    /// Build a report with an explicit date (tests use a fixed one)
    pub fn with_date(
        request: &EstimateRequest,
        estimate: &CostEstimate,
        date: NaiveDate,
    ) -> Self {
        let materials = estimate
            .line_items
            .iter()
            .map(|item| MaterialRow {
                material: item.material.display_name().to_string(),
                quantity: format!("{:.2}", item.quantity),
                unit: item.unit_label.clone(),
                rate: format_inr_rate(item.unit_price),
                cost: format_inr(item.line_cost),
            })
            .collect();

        EstimateReport {
            project_details: ProjectDetails {
                date: date.format("%Y-%m-%d").to_string(),
                dimensions: format!("{} x {} ft", request.length_ft, request.width_ft),
                area: estimate.area_sqft,
                construction_type: request.construction_type.display_name().to_string(),
            },
            materials,
            costs: CostSummary {
                material_cost: estimate.material_cost,
                labor_cost: estimate.labor_cost,
                total_cost: estimate.total_cost,
                cost_per_sqft: estimate.cost_per_sqft,
            },
        }
    }

    /// Pretty-printed JSON document
    pub fn to_json(&self) -> EstimateResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// CSV table of the material rows, headers included
    pub fn to_csv(&self) -> EstimateResult<String> {
        let mut writer = csv::WriterBuilder::new().from_writer(Vec::new());
        for row in &self.materials {
            writer
                .serialize(row)
                .map_err(|e| EstimateError::SerializationError {
                    reason: e.to_string(),
                })?;
        }
        let bytes = writer
            .into_inner()
            .map_err(|e| EstimateError::SerializationError {
                reason: e.to_string(),
            })?;
        String::from_utf8(bytes).map_err(|e| EstimateError::SerializationError {
            reason: e.to_string(),
        })
    }

    /// Write the JSON document to a file
    pub fn write_json_file(&self, path: &Path) -> EstimateResult<()> {
        let json = self.to_json()?;
        std::fs::write(path, json).map_err(|e| {
            EstimateError::file_error("write", path.display().to_string(), e.to_string())
        })
    }

    /// Write the CSV table to a file
    pub fn write_csv_file(&self, path: &Path) -> EstimateResult<()> {
        let csv = self.to_csv()?;
        std::fs::write(path, csv).map_err(|e| {
            EstimateError::file_error("write", path.display().to_string(), e.to_string())
        })
    }
}

/// Default JSON export file name, e.g. `construction_estimate_20240131_143005.json`
pub fn json_export_name(timestamp: NaiveDateTime) -> String {
    format!(
        "construction_estimate_{}.json",
        timestamp.format("%Y%m%d_%H%M%S")
    )
}

/// Default CSV export file name, e.g. `material_breakdown_20240131_143005.csv`
pub fn csv_export_name(timestamp: NaiveDateTime) -> String {
    format!(
        "material_breakdown_{}.csv",
        timestamp.format("%Y%m%d_%H%M%S")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::estimate::Estimator;
    use crate::profiles::ConstructionType;

    fn fixture() -> (EstimateRequest, CostEstimate) {
        let request = EstimateRequest {
            length_ft: 17.0,
            width_ft: 70.0,
            construction_type: ConstructionType::Plaster12Mm,
            wastage_percent: 5,
            include_labor: true,
        };
        let estimate = Estimator::with_dsr_defaults().estimate(&request).unwrap();
        (request, estimate)
    }

    #[test]
    fn test_format_inr() {
        assert_eq!(format_inr(0.0), "₹0.00");
        assert_eq!(format_inr(7497.0), "₹7,497.00");
        assert_eq!(format_inr(13400.8875), "₹13,400.89");
        assert_eq!(format_inr(1234567.5), "₹1,234,567.50");
    }

    #[test]
    fn test_format_inr_rate() {
        assert_eq!(format_inr_rate(400.0), "₹400");
        assert_eq!(format_inr_rate(65000.0), "₹65,000");
    }

    #[test]
    fn test_report_shape() {
        let (request, estimate) = fixture();
        let date = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
        let report = EstimateReport::with_date(&request, &estimate, date);

        assert_eq!(report.project_details.date, "2024-01-31");
        assert_eq!(report.project_details.dimensions, "17 x 70 ft");
        assert_eq!(report.project_details.area, 1190.0);
        assert_eq!(report.project_details.construction_type, "Plaster (12mm)");

        assert_eq!(report.materials.len(), 2);
        let cement = &report.materials[0];
        assert_eq!(cement.material, "Cement");
        assert_eq!(cement.quantity, "18.74");
        assert_eq!(cement.unit, "per bag");
        assert_eq!(cement.rate, "₹400");
        assert_eq!(cement.cost, "₹7,497.00");

        assert!((report.costs.total_cost - 13400.8875).abs() < 1e-9);
    }

    #[test]
    fn test_json_field_names() {
        let (request, estimate) = fixture();
        let report = EstimateReport::new(&request, &estimate);
        let json = report.to_json().unwrap();
        assert!(json.contains("\"project_details\""));
        assert!(json.contains("\"Material\""));
        assert!(json.contains("\"Quantity\""));
        assert!(json.contains("\"cost_per_sqft\""));
    }

    #[test]
    fn test_csv_columns() {
        let (request, estimate) = fixture();
        let report = EstimateReport::new(&request, &estimate);
        let csv = report.to_csv().unwrap();
        let mut lines = csv.lines();
        assert_eq!(lines.next().unwrap(), "Material,Quantity,Unit,Rate,Cost");
        // One row per material plus the header
        assert_eq!(csv.lines().count(), 1 + report.materials.len());
    }

    #[test]
    fn test_export_names() {
        let ts = NaiveDate::from_ymd_opt(2024, 1, 31)
            .unwrap()
            .and_hms_opt(14, 30, 5)
            .unwrap();
        assert_eq!(
            json_export_name(ts),
            "construction_estimate_20240131_143005.json"
        );
        assert_eq!(csv_export_name(ts), "material_breakdown_20240131_143005.csv");
    }
}
