//! # Estimator CLI Application
//!
//! Interactive console frontend for the estimation engine: prompts for
//! project dimensions and options, prints the material breakdown and cost
//! summary, optionally fetches AI suggestions, and writes JSON/CSV
//! report files.

use std::io::{self, BufRead, Write};
use std::path::Path;
use std::process::ExitCode;

use chrono::Local;
use estimate_core::advisory::{suggestions_or_fallback, AdvisoryContext, GeminiProvider};
use estimate_core::estimate::{EstimateRequest, Estimator};
use estimate_core::profiles::ConstructionType;
use estimate_core::report::{csv_export_name, format_inr, json_export_name, EstimateReport};

fn prompt_f64(prompt: &str, default: f64) -> f64 {
    print!("{}", prompt);
    if io::stdout().flush().is_err() {
        return default;
    }

    let mut input = String::new();
    if io::stdin().lock().read_line(&mut input).is_err() {
        return default;
    }

    input.trim().parse().unwrap_or(default)
}

fn prompt_u8(prompt: &str, default: u8) -> u8 {
    print!("{}", prompt);
    if io::stdout().flush().is_err() {
        return default;
    }

    let mut input = String::new();
    if io::stdin().lock().read_line(&mut input).is_err() {
        return default;
    }

    input.trim().parse().unwrap_or(default)
}

fn prompt_yes_no(prompt: &str, default: bool) -> bool {
    print!("{}", prompt);
    if io::stdout().flush().is_err() {
        return default;
    }

    let mut input = String::new();
    if io::stdin().lock().read_line(&mut input).is_err() {
        return default;
    }

    match input.trim().to_lowercase().as_str() {
        "y" | "yes" => true,
        "n" | "no" => false,
        _ => default,
    }
}

fn prompt_construction_type() -> ConstructionType {
    println!("Construction types:");
    for (i, construction_type) in ConstructionType::ALL.iter().enumerate() {
        println!("  {}. {}", i + 1, construction_type.display_name());
    }
    let choice = prompt_u8("Select construction type [3]: ", 3);
    ConstructionType::ALL
        .get(choice.saturating_sub(1) as usize)
        .copied()
        .unwrap_or(ConstructionType::Plaster12Mm)
}

fn main() -> ExitCode {
    println!("Construction Material Calculator");
    println!("Based on PWD/CPWD DSR Standards for Indian Construction");
    println!("========================================================");
    println!();

    let length_ft = prompt_f64("Enter length (ft) [17.0]: ", 17.0);
    let width_ft = prompt_f64("Enter width (ft) [70.0]: ", 70.0);
    let construction_type = prompt_construction_type();
    let wastage_percent = prompt_u8("Wastage factor %, 0-20 [5]: ", 5);
    let include_labor = prompt_yes_no("Include labor costs? [Y/n]: ", true);

    let request = EstimateRequest {
        length_ft,
        width_ft,
        construction_type,
        wastage_percent,
        include_labor,
    };

    let estimator = Estimator::with_dsr_defaults();
    let estimate = match estimator.estimate(&request) {
        Ok(estimate) => estimate,
        Err(e) => {
            eprintln!("Error: {}", e);
            if let Ok(json) = serde_json::to_string_pretty(&e) {
                eprintln!();
                eprintln!("Error JSON:");
                eprintln!("{}", json);
            }
            return ExitCode::FAILURE;
        }
    };

    println!();
    println!("═══════════════════════════════════════════════════════");
    println!("  MATERIAL BREAKDOWN - {}", construction_type.display_name());
    println!("═══════════════════════════════════════════════════════");
    println!();
    println!(
        "{:<16} {:>10} {:<14} {:>10} {:>14}",
        "Material", "Quantity", "Unit", "Rate", "Cost"
    );
    for item in &estimate.line_items {
        println!(
            "{:<16} {:>10.2} {:<14} {:>10} {:>14}",
            item.material.display_name(),
            item.quantity,
            item.unit_label,
            format_inr(item.unit_price),
            format_inr(item.line_cost),
        );
    }
    println!();
    println!("Summary:");
    println!("  Total Area:     {:.0} sqft", estimate.area_sqft);
    println!("  Material Cost:  {}", format_inr(estimate.material_cost));
    if include_labor {
        println!("  Labor Cost:     {}", format_inr(estimate.labor_cost));
    }
    println!("  Total Cost:     {}", format_inr(estimate.total_cost));
    println!("  Cost per sqft:  {}", format_inr(estimate.cost_per_sqft));

    // Advisory runs only after the estimate is printed; failures degrade
    // to a fallback line and never affect the figures above.
    println!();
    match std::env::var("GEMINI_API_KEY") {
        Ok(api_key) if !api_key.trim().is_empty() => {
            println!("Fetching AI suggestions...");
            let provider = GeminiProvider::new(api_key);
            let context = AdvisoryContext::new(
                estimate.area_sqft,
                construction_type,
                estimate.total_cost,
            );
            println!();
            println!("AI Suggestions:");
            println!("{}", suggestions_or_fallback(&provider, &context));
        }
        _ => {
            println!("AI suggestions skipped (set GEMINI_API_KEY to enable).");
        }
    }

    println!();
    if prompt_yes_no("Save JSON and CSV reports? [y/N]: ", false) {
        let report = EstimateReport::new(&request, &estimate);
        let now = Local::now().naive_local();

        let json_name = json_export_name(now);
        match report.write_json_file(Path::new(&json_name)) {
            Ok(()) => println!("Wrote {}", json_name),
            Err(e) => eprintln!("Error: {}", e),
        }

        let csv_name = csv_export_name(now);
        match report.write_csv_file(Path::new(&csv_name)) {
            Ok(()) => println!("Wrote {}", csv_name),
            Err(e) => eprintln!("Error: {}", e),
        }
    }

    ExitCode::SUCCESS
}
