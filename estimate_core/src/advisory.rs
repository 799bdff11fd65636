//! # Advisory Provider
//!
//! Optional AI suggestions layered on top of a finished estimate. The
//! provider is strictly additive: it runs after the `CostEstimate` exists
//! and its failure can never touch or delay that result.
//!
//! The never-raises contract lives at the call site, in the types: the
//! trait returns `Result<String, AdvisoryError>`, and
//! [`suggestions_or_fallback`] is the single place that converts failure
//! into the user-facing fallback string.
//!
//! ## Example
//!
//! ```rust
//! use estimate_core::advisory::{suggestions_or_fallback, AdvisoryContext, AdvisoryError, AdvisoryProvider};
//! use estimate_core::profiles::ConstructionType;
//!
//! struct Offline;
//!
//! impl AdvisoryProvider for Offline {
//!     fn suggestions(&self, _context: &AdvisoryContext) -> Result<String, AdvisoryError> {
//!         Err(AdvisoryError::Transport { reason: "no network".to_string() })
//!     }
//! }
//!
//! let context = AdvisoryContext::new(1190.0, ConstructionType::Plaster12Mm, 13400.89);
//! let text = suggestions_or_fallback(&Offline, &context);
//! assert!(text.starts_with("AI suggestions unavailable"));
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::json;
use thiserror::Error;

use crate::profiles::ConstructionType;

/// Provider request timeout. Expiry is recovered like any other provider
/// failure; the estimate itself is already computed by then.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

const GEMINI_ENDPOINT: &str =
    "https://generativelanguage.googleapis.com/v1beta/models/gemini-pro:generateContent";

/// Advisory call failure. All variants are recoverable and map to the
/// same fallback text at the call site.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AdvisoryError {
    /// HTTP client could not be constructed
    #[error("failed to create HTTP client: {reason}")]
    ClientBuild { reason: String },

    /// Network-level failure, including timeouts
    #[error("network error: {reason}")]
    Transport { reason: String },

    /// Provider answered with a non-success status
    #[error("provider returned HTTP {status}")]
    Provider { status: u16 },

    /// Provider answered but the payload carried no usable text
    #[error("provider returned an empty response")]
    EmptyResponse,
}

/// Summary of a finished estimate, handed to the provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdvisoryContext {
    pub area_sqft: f64,
    pub construction_type: ConstructionType,
    /// Total project cost in rupees
    pub budget: f64,
}

impl AdvisoryContext {
    pub fn new(area_sqft: f64, construction_type: ConstructionType, budget: f64) -> Self {
        AdvisoryContext {
            area_sqft,
            construction_type,
            budget,
        }
    }

    /// Prompt sent to text-generation providers
    pub fn prompt(&self) -> String {
        format!(
            "For a construction project with following details:\n\
             - Area: {:.0} sqft\n\
             - Construction Type: {}\n\
             - Budget: Rs {:.2}\n\n\
             Provide brief suggestions for:\n\
             1. Cost optimization tips\n\
             2. Material quality recommendations\n\
             3. Common mistakes to avoid\n\n\
             Keep the response concise and practical.",
            self.area_sqft,
            self.construction_type.display_name(),
            self.budget,
        )
    }
}

/// Source of advisory text for a finished estimate
pub trait AdvisoryProvider {
    fn suggestions(&self, context: &AdvisoryContext) -> Result<String, AdvisoryError>;
}

/// Map an advisory outcome to display text.
///
/// Failures become a descriptive fallback embedding the reason; this is
/// the only conversion point, so providers stay honest `Result` types.
pub fn suggestions_or_fallback(
    provider: &dyn AdvisoryProvider,
    context: &AdvisoryContext,
) -> String {
    match provider.suggestions(context) {
        Ok(text) => text,
        Err(e) => format!("AI suggestions unavailable: {}", e),
    }
}

#[derive(Deserialize)]
struct GeminiResponse {
    candidates: Option<Vec<GeminiCandidate>>,
}

#[derive(Deserialize)]
struct GeminiCandidate {
    content: Option<GeminiContent>,
}

#[derive(Deserialize)]
struct GeminiContent {
    parts: Option<Vec<GeminiPart>>,
}

#[derive(Deserialize)]
struct GeminiPart {
    text: Option<String>,
}

/// Gemini-backed advisory provider.
///
/// Blocking call with a bounded timeout; callers invoke it only after the
/// estimate is computed, so a slow provider delays nothing but itself.
pub struct GeminiProvider {
    api_key: String,
    endpoint: String,
}

impl GeminiProvider {
    pub fn new(api_key: impl Into<String>) -> Self {
        GeminiProvider {
            api_key: api_key.into(),
            endpoint: GEMINI_ENDPOINT.to_string(),
        }
    }

    /// Override the endpoint (tests point this at a local server)
    pub fn with_endpoint(api_key: impl Into<String>, endpoint: impl Into<String>) -> Self {
        GeminiProvider {
            api_key: api_key.into(),
            endpoint: endpoint.into(),
        }
    }
}

impl AdvisoryProvider for GeminiProvider {
    fn suggestions(&self, context: &AdvisoryContext) -> Result<String, AdvisoryError> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(concat!("estimate_core/", env!("CARGO_PKG_VERSION")))
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| AdvisoryError::ClientBuild {
                reason: e.to_string(),
            })?;

        let body = json!({
            "contents": [{ "parts": [{ "text": context.prompt() }] }]
        });

        let response = client
            .post(&self.endpoint)
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .map_err(|e| AdvisoryError::Transport {
                reason: e.to_string(),
            })?;

        if !response.status().is_success() {
            return Err(AdvisoryError::Provider {
                status: response.status().as_u16(),
            });
        }

        let payload: GeminiResponse =
            response.json().map_err(|e| AdvisoryError::Transport {
                reason: e.to_string(),
            })?;

        let text = payload
            .candidates
            .into_iter()
            .flatten()
            .filter_map(|c| c.content)
            .filter_map(|c| c.parts)
            .flatten()
            .filter_map(|p| p.text)
            .collect::<Vec<_>>()
            .join("");

        if text.trim().is_empty() {
            return Err(AdvisoryError::EmptyResponse);
        }
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct CannedProvider(Result<String, AdvisoryError>);

    impl AdvisoryProvider for CannedProvider {
        fn suggestions(&self, _context: &AdvisoryContext) -> Result<String, AdvisoryError> {
            self.0.clone()
        }
    }

    fn context() -> AdvisoryContext {
        AdvisoryContext::new(1190.0, ConstructionType::Plaster12Mm, 13400.89)
    }

    #[test]
    fn test_success_passes_through() {
        let provider = CannedProvider(Ok("Use OPC 43 grade cement.".to_string()));
        assert_eq!(
            suggestions_or_fallback(&provider, &context()),
            "Use OPC 43 grade cement."
        );
    }

    #[test]
    fn test_failure_becomes_fallback_with_reason() {
        let provider = CannedProvider(Err(AdvisoryError::Provider { status: 503 }));
        let text = suggestions_or_fallback(&provider, &context());
        assert!(text.starts_with("AI suggestions unavailable:"));
        assert!(text.contains("503"));
        assert!(!text.is_empty());
    }

    #[test]
    fn test_timeout_class_failure_becomes_fallback() {
        let provider = CannedProvider(Err(AdvisoryError::Transport {
            reason: "operation timed out".to_string(),
        }));
        let text = suggestions_or_fallback(&provider, &context());
        assert!(text.contains("timed out"));
    }

    #[test]
    fn test_failure_leaves_estimate_untouched() {
        use crate::estimate::{EstimateRequest, Estimator};

        let estimator = Estimator::with_dsr_defaults();
        let request = EstimateRequest {
            length_ft: 17.0,
            width_ft: 70.0,
            construction_type: ConstructionType::Plaster12Mm,
            wastage_percent: 5,
            include_labor: true,
        };
        let before = estimator.estimate(&request).unwrap();

        let provider = CannedProvider(Err(AdvisoryError::EmptyResponse));
        let ctx = AdvisoryContext::new(before.area_sqft, request.construction_type, before.total_cost);
        let text = suggestions_or_fallback(&provider, &ctx);
        assert!(!text.is_empty());

        let after = estimator.estimate(&request).unwrap();
        assert_eq!(before, after);
        assert_eq!(after.line_items.len(), 2);
    }

    #[test]
    fn test_prompt_mentions_project_details() {
        let prompt = context().prompt();
        assert!(prompt.contains("1190 sqft"));
        assert!(prompt.contains("Plaster (12mm)"));
        assert!(prompt.contains("13400.89"));
    }

    #[test]
    fn test_gemini_response_text_extraction() {
        let json = r#"{
            "candidates": [{
                "content": { "parts": [{ "text": "Tip one." }, { "text": " Tip two." }] }
            }]
        }"#;
        let payload: GeminiResponse = serde_json::from_str(json).unwrap();
        let text: String = payload
            .candidates
            .into_iter()
            .flatten()
            .filter_map(|c| c.content)
            .filter_map(|c| c.parts)
            .flatten()
            .filter_map(|p| p.text)
            .collect();
        assert_eq!(text, "Tip one. Tip two.");
    }
}
