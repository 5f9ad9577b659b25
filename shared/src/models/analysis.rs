//! Analysis results, health scoring, and condition/urgency classification

use serde::{Deserialize, Serialize};

use crate::analyzer::PixelScan;

/// Overall leaf condition, derived solely from the health score and the
/// presence flags
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum OverallCondition {
    Healthy,
    MildDamage,
    ModerateDamage,
    SevereDamage,
    Critical,
}

impl std::fmt::Display for OverallCondition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OverallCondition::Healthy => write!(f, "Healthy"),
            OverallCondition::MildDamage => write!(f, "Mild Damage"),
            OverallCondition::ModerateDamage => write!(f, "Moderate Damage"),
            OverallCondition::SevereDamage => write!(f, "Severe Damage"),
            OverallCondition::Critical => write!(f, "Critical"),
        }
    }
}

/// Recommendation urgency, computed independently from the overall
/// condition (the two ladders intentionally disagree near boundaries)
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Urgency {
    None,
    Low,
    Medium,
    High,
    Critical,
}

impl std::fmt::Display for Urgency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Urgency::None => write!(f, "None"),
            Urgency::Low => write!(f, "Low"),
            Urgency::Medium => write!(f, "Medium"),
            Urgency::High => write!(f, "High"),
            Urgency::Critical => write!(f, "Critical"),
        }
    }
}

/// Output of the analysis pipeline for one image
///
/// Created fresh per scan and immutable once produced. Only a subset of
/// fields is persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub has_black_spots: bool,
    /// Density-proxy spot count, not a connected-component count
    pub black_spot_count: i32,
    pub black_spot_percentage: f64,
    pub has_damage: bool,
    pub damage_percentage: f64,
    pub health_score: i32,
    pub overall_condition: OverallCondition,
    pub detected_issues: Vec<String>,
    /// Display value in [90, 98]; not a statistical confidence
    pub confidence: f32,
    pub image_quality: f64,
    pub analysis_time_secs: f64,
    /// Raw tallies backing the derived figures
    pub pixel_scan: PixelScan,
}

/// Compute the 0-100 health score from the coverage percentages.
///
/// Weighted deductions: spots at 3x capped at 40, damage at 2x capped at
/// 50, plus a flat 15 when both coverages are substantial.
pub fn compute_health_score(
    black_spot_percentage: f64,
    has_black_spots: bool,
    damage_percentage: f64,
    has_damage: bool,
) -> i32 {
    let mut score = 100.0;
    if has_black_spots {
        score -= (black_spot_percentage * 3.0).min(40.0);
    }
    if has_damage {
        score -= (damage_percentage * 2.0).min(50.0);
    }
    if black_spot_percentage > 5.0 && damage_percentage > 10.0 {
        score -= 15.0;
    }
    score.clamp(0.0, 100.0).round() as i32
}

/// Classify the overall condition; first match wins
pub fn classify_condition(
    health_score: i32,
    has_black_spots: bool,
    has_damage: bool,
) -> OverallCondition {
    if health_score >= 85 && !has_black_spots && !has_damage {
        OverallCondition::Healthy
    } else if health_score >= 70 {
        OverallCondition::MildDamage
    } else if health_score >= 50 {
        OverallCondition::ModerateDamage
    } else if health_score >= 30 {
        OverallCondition::SevereDamage
    } else {
        OverallCondition::Critical
    }
}

/// Classify recommendation urgency; first match wins.
///
/// Kept separate from [`classify_condition`] on purpose: the tiers overlap
/// but do not agree (score 72 with spots is mild damage yet medium
/// urgency). Do not merge the two without also unifying their thresholds.
pub fn classify_urgency(
    health_score: i32,
    has_black_spots: bool,
    black_spot_percentage: f64,
    damage_percentage: f64,
) -> Urgency {
    if health_score >= 85 && !has_black_spots {
        Urgency::None
    } else if health_score >= 75 && black_spot_percentage < 3.0 {
        Urgency::Low
    } else if health_score >= 55 {
        Urgency::Medium
    } else if health_score >= 30 || damage_percentage < 25.0 {
        Urgency::High
    } else {
        Urgency::Critical
    }
}

/// Care assessment derived from an analysis result; a pure function of it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthAssessment {
    pub is_healthy: bool,
    pub condition: String,
    pub health_percentage: i32,
    pub recommendations: Vec<String>,
    pub urgency: Urgency,
}

impl HealthAssessment {
    pub fn from_analysis(analysis: &AnalysisResult) -> Self {
        let urgency = classify_urgency(
            analysis.health_score,
            analysis.has_black_spots,
            analysis.black_spot_percentage,
            analysis.damage_percentage,
        );
        let is_healthy = analysis.overall_condition == OverallCondition::Healthy;

        let mut recommendations = Vec::new();
        if is_healthy {
            recommendations.push("Maintain the current care routine".to_string());
            recommendations.push("Keep monitoring new growth for early symptoms".to_string());
        }
        if analysis.has_black_spots {
            recommendations.push("Remove and destroy affected leaves".to_string());
            recommendations.push("Apply a copper-based fungicide spray".to_string());
            recommendations.push("Avoid overhead watering to keep foliage dry".to_string());
        }
        if analysis.has_damage {
            recommendations.push("Check soil moisture and drainage".to_string());
            recommendations.push("Shield the plant from harsh afternoon sun".to_string());
        }
        if matches!(urgency, Urgency::High | Urgency::Critical) {
            recommendations.push("Isolate the plant from nearby healthy plants".to_string());
            recommendations
                .push("Consult a local agricultural extension officer".to_string());
        }

        Self {
            is_healthy,
            condition: analysis.overall_condition.to_string(),
            health_percentage: analysis.health_score,
            recommendations,
            urgency,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn score_deductions_are_capped() {
        // Spots alone cap at 40
        assert_eq!(compute_health_score(100.0, true, 0.0, false), 60);
        // Damage alone caps at 50
        assert_eq!(compute_health_score(0.0, false, 100.0, true), 50);
    }

    #[test]
    fn compounding_penalty_applies_once() {
        // 6% spots (-18), 11% damage (-22), both substantial (-15)
        assert_eq!(compute_health_score(6.0, true, 11.0, true), 45);
    }

    #[test]
    fn score_clamps_at_zero() {
        assert_eq!(compute_health_score(100.0, true, 100.0, true), 0);
    }

    #[test]
    fn condition_ladder_first_match_wins() {
        assert_eq!(
            classify_condition(85, false, false),
            OverallCondition::Healthy
        );
        // High score with flags is still mild damage, never healthy
        assert_eq!(
            classify_condition(90, true, false),
            OverallCondition::MildDamage
        );
        assert_eq!(
            classify_condition(69, false, false),
            OverallCondition::ModerateDamage
        );
        assert_eq!(
            classify_condition(49, false, false),
            OverallCondition::SevereDamage
        );
        assert_eq!(classify_condition(29, false, false), OverallCondition::Critical);
    }

    #[test]
    fn urgency_disagrees_with_condition_near_boundary() {
        // Score 72 with spots: mild damage by condition, medium urgency
        assert_eq!(
            classify_condition(72, true, false),
            OverallCondition::MildDamage
        );
        assert_eq!(classify_urgency(72, true, 9.3, 0.0), Urgency::Medium);
    }

    #[test]
    fn urgency_critical_needs_low_score_and_heavy_damage() {
        assert_eq!(classify_urgency(0, true, 100.0, 100.0), Urgency::Critical);
        // Low score but light damage stays high
        assert_eq!(classify_urgency(10, true, 20.0, 10.0), Urgency::High);
    }
}
