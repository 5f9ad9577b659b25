//! Disease catalog and the rule-based disease selector
//!
//! The catalog is configuration data: five fixed disease entries plus a
//! synthesized healthy entry, built by constructor functions and never
//! mutated. The selector is a static ordered rule table, not a classifier
//! in any statistical sense; swapping in a real model later should only
//! need to replace [`select_disease`].

use serde::{Deserialize, Serialize};

use crate::models::analysis::{AnalysisResult, Urgency};

/// Severity label attached to a catalog entry
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DiseaseSeverity {
    None,
    Moderate,
    High,
    Severe,
}

impl std::fmt::Display for DiseaseSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DiseaseSeverity::None => write!(f, "None"),
            DiseaseSeverity::Moderate => write!(f, "Moderate"),
            DiseaseSeverity::High => write!(f, "High"),
            DiseaseSeverity::Severe => write!(f, "Severe"),
        }
    }
}

/// One catalog entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiseaseRecord {
    /// Stable identifier used in URLs and lookups
    pub slug: String,
    pub name: String,
    pub severity: DiseaseSeverity,
    pub treatments: Vec<String>,
    pub prevention: Vec<String>,
    pub cause: String,
    pub spread: String,
    pub favorable_conditions: String,
    pub urgency: Urgency,
    pub economic_impact: String,
    pub treatment_cost: String,
    pub recovery_time: String,
}

/// A selected disease with the pipeline-derived confidence in [0, 1]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiseaseMatch {
    pub record: DiseaseRecord,
    pub confidence: f32,
}

/// Fixed placeholder alternative diagnosis shown alongside the primary match
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlternativeDiagnosis {
    pub name: String,
    pub confidence: f32,
}

/// Select a disease entry for an analysis result; rules evaluated in order
pub fn select_disease(analysis: &AnalysisResult) -> DiseaseMatch {
    let conf = analysis.confidence / 100.0;

    if analysis.has_black_spots && analysis.black_spot_percentage > 2.0 {
        return DiseaseMatch {
            record: black_spot_disease(),
            confidence: conf.min(0.95),
        };
    }
    if analysis.has_damage && analysis.damage_percentage > 10.0 {
        return DiseaseMatch {
            record: powdery_mildew(),
            confidence: conf.min(0.88),
        };
    }
    if analysis.health_score < 60 {
        return DiseaseMatch {
            record: bacterial_leaf_spot(),
            confidence: conf.min(0.82),
        };
    }
    if analysis.health_score >= 85 {
        return DiseaseMatch {
            record: healthy_plant_record(),
            confidence: 0.95,
        };
    }
    // The 60-85 gap not covered above falls through to powdery mildew at a
    // reduced cap
    DiseaseMatch {
        record: powdery_mildew(),
        confidence: conf.min(0.75),
    }
}

/// The two fixed placeholder alternatives shown on every scan report
pub fn alternative_diagnoses() -> Vec<AlternativeDiagnosis> {
    vec![
        AlternativeDiagnosis {
            name: "Nutrient Deficiency".to_string(),
            confidence: 0.42,
        },
        AlternativeDiagnosis {
            name: "Environmental Stress".to_string(),
            confidence: 0.31,
        },
    ]
}

/// The five catalog entries, in display order
pub fn disease_catalog() -> Vec<DiseaseRecord> {
    vec![
        black_spot_disease(),
        powdery_mildew(),
        bacterial_leaf_spot(),
        leaf_rust(),
        anthracnose(),
    ]
}

/// Look up a catalog entry (including the healthy entry) by slug
pub fn find_disease(slug: &str) -> Option<DiseaseRecord> {
    if slug == "healthy_plant" {
        return Some(healthy_plant_record());
    }
    disease_catalog().into_iter().find(|d| d.slug == slug)
}

fn black_spot_disease() -> DiseaseRecord {
    DiseaseRecord {
        slug: "black_spot".to_string(),
        name: "Black Spot Disease".to_string(),
        severity: DiseaseSeverity::High,
        treatments: vec![
            "Remove and destroy all infected leaves, including fallen ones".to_string(),
            "Apply a copper-based or chlorothalonil fungicide every 7-10 days".to_string(),
            "Prune surrounding growth to improve air circulation".to_string(),
        ],
        prevention: vec![
            "Water at the base of the plant, never over the foliage".to_string(),
            "Space plants to allow leaves to dry quickly after rain".to_string(),
            "Clear fallen leaves before the rainy season".to_string(),
        ],
        cause: "Fungal infection (Diplocarpon rosae and related species)".to_string(),
        spread: "Spores splash from leaf to leaf with rain and irrigation water".to_string(),
        favorable_conditions: "Warm, humid weather with prolonged leaf wetness".to_string(),
        urgency: Urgency::High,
        economic_impact: "Defoliation weakens the plant and can halve seasonal yield"
            .to_string(),
        treatment_cost: "200-600 THB per rai for a fungicide program".to_string(),
        recovery_time: "3-6 weeks with consistent treatment".to_string(),
    }
}

fn powdery_mildew() -> DiseaseRecord {
    DiseaseRecord {
        slug: "powdery_mildew".to_string(),
        name: "Powdery Mildew".to_string(),
        severity: DiseaseSeverity::Moderate,
        treatments: vec![
            "Spray affected foliage with a sulfur or potassium-bicarbonate solution"
                .to_string(),
            "Remove heavily coated leaves".to_string(),
            "Reduce nitrogen fertilization while symptoms persist".to_string(),
        ],
        prevention: vec![
            "Plant in full sun where the variety allows".to_string(),
            "Avoid crowding; thin canopies regularly".to_string(),
            "Choose resistant varieties for new plantings".to_string(),
        ],
        cause: "Fungal infection by powdery mildew species (Erysiphales)".to_string(),
        spread: "Airborne spores carried between plants by wind".to_string(),
        favorable_conditions: "Warm days, cool nights, and shaded, still air".to_string(),
        urgency: Urgency::Medium,
        economic_impact: "Reduces photosynthesis and fruit quality when untreated"
            .to_string(),
        treatment_cost: "150-400 THB per rai per season".to_string(),
        recovery_time: "2-4 weeks with treatment".to_string(),
    }
}

fn bacterial_leaf_spot() -> DiseaseRecord {
    DiseaseRecord {
        slug: "bacterial_leaf_spot".to_string(),
        name: "Bacterial Leaf Spot".to_string(),
        severity: DiseaseSeverity::High,
        treatments: vec![
            "Remove infected leaves with sterilized tools".to_string(),
            "Apply a copper bactericide at the first sign of spotting".to_string(),
            "Stop overhead irrigation immediately".to_string(),
        ],
        prevention: vec![
            "Use certified disease-free seed and seedlings".to_string(),
            "Rotate crops away from the affected bed for at least one season".to_string(),
            "Disinfect tools between plants".to_string(),
        ],
        cause: "Bacterial infection (Xanthomonas and Pseudomonas species)".to_string(),
        spread: "Water splash, contaminated tools, and handling wet plants".to_string(),
        favorable_conditions: "Warm, wet weather in the 25-30 degree range".to_string(),
        urgency: Urgency::High,
        economic_impact: "Can make leafy produce unmarketable within weeks".to_string(),
        treatment_cost: "250-700 THB per rai; reinfection is common".to_string(),
        recovery_time: "4-8 weeks; severely infected plants rarely recover fully"
            .to_string(),
    }
}

fn leaf_rust() -> DiseaseRecord {
    DiseaseRecord {
        slug: "leaf_rust".to_string(),
        name: "Leaf Rust".to_string(),
        severity: DiseaseSeverity::Moderate,
        treatments: vec![
            "Remove pustule-bearing leaves at first appearance".to_string(),
            "Apply a protectant fungicide before the rains arrive".to_string(),
        ],
        prevention: vec![
            "Grow rust-resistant cultivars where available".to_string(),
            "Keep foliage dry and canopies open".to_string(),
        ],
        cause: "Rust fungi (Pucciniales), host-specific by crop".to_string(),
        spread: "Windborne urediniospores over long distances".to_string(),
        favorable_conditions: "Mild temperatures with extended dew periods".to_string(),
        urgency: Urgency::Medium,
        economic_impact: "Chronic infections sap vigor season after season".to_string(),
        treatment_cost: "150-500 THB per rai per season".to_string(),
        recovery_time: "3-5 weeks with treatment".to_string(),
    }
}

fn anthracnose() -> DiseaseRecord {
    DiseaseRecord {
        slug: "anthracnose".to_string(),
        name: "Anthracnose".to_string(),
        severity: DiseaseSeverity::High,
        treatments: vec![
            "Prune out infected twigs and leaves below visible symptoms".to_string(),
            "Apply a systemic fungicide during active spread".to_string(),
            "Destroy infected fruit and debris away from the field".to_string(),
        ],
        prevention: vec![
            "Harvest fruit before full ripeness in wet weather".to_string(),
            "Maintain wide spacing and prune for airflow".to_string(),
            "Remove crop residue after harvest".to_string(),
        ],
        cause: "Fungal infection (Colletotrichum species)".to_string(),
        spread: "Rain splash and movement of infected plant material".to_string(),
        favorable_conditions: "Heavy rain and temperatures near 27 degrees".to_string(),
        urgency: Urgency::High,
        economic_impact: "Post-harvest fruit rot can claim most of a shipment".to_string(),
        treatment_cost: "300-800 THB per rai for a full program".to_string(),
        recovery_time: "4-6 weeks; fruit lesions do not heal".to_string(),
    }
}

/// Synthesized entry returned when the analysis finds a healthy plant
pub fn healthy_plant_record() -> DiseaseRecord {
    DiseaseRecord {
        slug: "healthy_plant".to_string(),
        name: "Healthy Plant".to_string(),
        severity: DiseaseSeverity::None,
        treatments: vec!["No treatment needed".to_string()],
        prevention: vec![
            "Continue the current watering and feeding schedule".to_string(),
            "Inspect leaves weekly for early symptoms".to_string(),
        ],
        cause: "No disease detected".to_string(),
        spread: "Not applicable".to_string(),
        favorable_conditions: "Not applicable".to_string(),
        urgency: Urgency::None,
        economic_impact: "None".to_string(),
        treatment_cost: "None".to_string(),
        recovery_time: "Not applicable".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_has_five_entries_with_unique_slugs() {
        let catalog = disease_catalog();
        assert_eq!(catalog.len(), 5);
        let mut slugs: Vec<_> = catalog.iter().map(|d| d.slug.clone()).collect();
        slugs.sort();
        slugs.dedup();
        assert_eq!(slugs.len(), 5);
    }

    #[test]
    fn find_disease_resolves_healthy_entry() {
        assert_eq!(find_disease("healthy_plant").unwrap().name, "Healthy Plant");
        assert_eq!(find_disease("leaf_rust").unwrap().name, "Leaf Rust");
        assert!(find_disease("unknown").is_none());
    }

    #[test]
    fn every_entry_carries_treatments_and_prevention() {
        for record in disease_catalog() {
            assert!(!record.treatments.is_empty(), "{} has no treatments", record.name);
            assert!(!record.prevention.is_empty(), "{} has no prevention", record.name);
        }
    }
}
