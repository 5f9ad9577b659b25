//! WebAssembly module for the Plant Health Scanner Platform
//!
//! Provides client-side computation for:
//! - Full leaf analysis over canvas `ImageData` pixels
//! - Health score calculation
//! - Condition and urgency classification
//! - Disease selection from the static catalog
//!
//! Camera handling stays on the JavaScript side; a capture must release
//! its media stream on success, cancel, error, and component teardown
//! before or after handing pixels to these functions.

use wasm_bindgen::prelude::*;

// Re-export shared types for use in JavaScript
pub use shared::models::*;
pub use shared::types::*;
pub use shared::validation::*;

use shared::analyzer::{PlantImageAnalyzer, RgbaFrame};

/// Initialize the WASM module
#[wasm_bindgen(start)]
pub fn init() {
    // Set up panic hook for better error messages in browser console
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Analyze a leaf image from raw RGBA pixels (e.g. canvas ImageData.data)
///
/// Returns the full analysis result as a JSON string.
#[wasm_bindgen]
pub fn analyze_leaf_image(pixels: &[u8], width: u32, height: u32) -> Result<String, JsValue> {
    let frame = RgbaFrame::new(pixels, width, height).map_err(JsValue::from_str)?;

    let started = js_sys::Date::now();
    let mut analysis = PlantImageAnalyzer::new().analyze(&frame);
    analysis.analysis_time_secs = (js_sys::Date::now() - started) / 1000.0;

    serde_json::to_string(&analysis).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Compute the 0-100 health score from coverage percentages
#[wasm_bindgen]
pub fn calculate_health_score(
    black_spot_percentage: f64,
    has_black_spots: bool,
    damage_percentage: f64,
    has_damage: bool,
) -> i32 {
    compute_health_score(
        black_spot_percentage,
        has_black_spots,
        damage_percentage,
        has_damage,
    )
}

/// Classify the overall condition label for a score and flags
#[wasm_bindgen]
pub fn classify_condition_label(
    health_score: i32,
    has_black_spots: bool,
    has_damage: bool,
) -> String {
    format!(
        "{}",
        classify_condition(health_score, has_black_spots, has_damage)
    )
}

/// Classify the recommendation urgency label
#[wasm_bindgen]
pub fn classify_urgency_label(
    health_score: i32,
    has_black_spots: bool,
    black_spot_percentage: f64,
    damage_percentage: f64,
) -> String {
    format!(
        "{}",
        classify_urgency(
            health_score,
            has_black_spots,
            black_spot_percentage,
            damage_percentage,
        )
    )
}

/// Derive the care assessment for an analysis result (JSON in, JSON out)
#[wasm_bindgen]
pub fn assess_health(analysis_json: &str) -> Result<String, JsValue> {
    let analysis: AnalysisResult = serde_json::from_str(analysis_json)
        .map_err(|e| JsValue::from_str(&format!("Invalid analysis JSON: {}", e)))?;

    let assessment = HealthAssessment::from_analysis(&analysis);
    serde_json::to_string(&assessment).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Select a disease entry for an analysis result (JSON in, JSON out)
#[wasm_bindgen]
pub fn select_disease_match(analysis_json: &str) -> Result<String, JsValue> {
    let analysis: AnalysisResult = serde_json::from_str(analysis_json)
        .map_err(|e| JsValue::from_str(&format!("Invalid analysis JSON: {}", e)))?;

    let selected = select_disease(&analysis);
    serde_json::to_string(&selected).map_err(|e| JsValue::from_str(&e.to_string()))
}
