//! Tests for health scoring and the condition/urgency classifiers
//! Verifies the deduction weights, clamping, ladder boundaries, and the
//! intentional disagreement between the two classifiers

use proptest::prelude::*;
use shared::models::{
    classify_condition, classify_urgency, compute_health_score, HealthAssessment,
    OverallCondition, Urgency,
};

// =============================================================================
// Health Scorer Tests
// =============================================================================

mod health_scorer {
    use super::*;

    #[test]
    fn perfect_leaf_scores_one_hundred() {
        assert_eq!(compute_health_score(0.0, false, 0.0, false), 100);
    }

    #[test]
    fn spot_deduction_is_three_per_percent() {
        assert_eq!(compute_health_score(5.0, true, 0.0, false), 85);
        assert_eq!(compute_health_score(10.0, true, 0.0, false), 70);
    }

    #[test]
    fn spot_deduction_caps_at_forty() {
        assert_eq!(compute_health_score(50.0, true, 0.0, false), 60);
        assert_eq!(compute_health_score(100.0, true, 0.0, false), 60);
    }

    #[test]
    fn damage_deduction_is_two_per_percent() {
        assert_eq!(compute_health_score(0.0, false, 10.0, true), 80);
    }

    #[test]
    fn damage_deduction_caps_at_fifty() {
        assert_eq!(compute_health_score(0.0, false, 40.0, true), 50);
        assert_eq!(compute_health_score(0.0, false, 100.0, true), 50);
    }

    #[test]
    fn compounding_penalty_needs_both_coverages() {
        // 6% spots and 11% damage: 100 - 18 - 22 - 15
        assert_eq!(compute_health_score(6.0, true, 11.0, true), 45);
        // 6% spots but only 10% damage: no compounding penalty
        assert_eq!(compute_health_score(6.0, true, 10.0, true), 62);
        // 5% spots and 11% damage: no compounding penalty
        assert_eq!(compute_health_score(5.0, true, 11.0, true), 63);
    }

    #[test]
    fn score_clamps_at_zero() {
        assert_eq!(compute_health_score(100.0, true, 100.0, true), 0);
    }

    #[test]
    fn flags_gate_the_deductions() {
        // Coverage with the flag off deducts nothing
        assert_eq!(compute_health_score(50.0, false, 0.0, false), 100);
        assert_eq!(compute_health_score(0.0, false, 50.0, false), 100);
    }
}

// =============================================================================
// Condition Classifier Boundary Tests
// =============================================================================

mod condition_boundaries {
    use super::*;

    #[test]
    fn healthy_requires_both_flags_clear() {
        assert_eq!(
            classify_condition(85, false, false),
            OverallCondition::Healthy
        );
        assert_eq!(
            classify_condition(100, true, false),
            OverallCondition::MildDamage
        );
        assert_eq!(
            classify_condition(100, false, true),
            OverallCondition::MildDamage
        );
    }

    #[test]
    fn boundary_healthy_to_mild() {
        // 84 without flags is not healthy
        assert_eq!(
            classify_condition(84, false, false),
            OverallCondition::MildDamage
        );
    }

    #[test]
    fn boundary_mild_to_moderate() {
        assert_eq!(
            classify_condition(70, true, false),
            OverallCondition::MildDamage
        );
        assert_eq!(
            classify_condition(69, true, false),
            OverallCondition::ModerateDamage
        );
    }

    #[test]
    fn boundary_moderate_to_severe() {
        assert_eq!(
            classify_condition(50, true, true),
            OverallCondition::ModerateDamage
        );
        assert_eq!(
            classify_condition(49, true, true),
            OverallCondition::SevereDamage
        );
    }

    #[test]
    fn boundary_severe_to_critical() {
        assert_eq!(
            classify_condition(30, true, true),
            OverallCondition::SevereDamage
        );
        assert_eq!(classify_condition(29, true, true), OverallCondition::Critical);
    }
}

// =============================================================================
// Urgency Classifier Tests
// The urgency ladder is intentionally distinct from the condition ladder
// =============================================================================

mod urgency_tiers {
    use super::*;

    #[test]
    fn none_requires_high_score_without_spots() {
        assert_eq!(classify_urgency(85, false, 0.0, 0.0), Urgency::None);
        assert_eq!(classify_urgency(100, false, 0.0, 3.0), Urgency::None);
    }

    #[test]
    fn low_tolerates_faint_spotting() {
        assert_eq!(classify_urgency(85, true, 1.0, 0.0), Urgency::Low);
        assert_eq!(classify_urgency(78, false, 0.0, 2.0), Urgency::Low);
    }

    #[test]
    fn heavier_spotting_skips_low() {
        assert_eq!(classify_urgency(80, true, 3.0, 0.0), Urgency::Medium);
    }

    #[test]
    fn high_covers_low_scores_with_light_damage() {
        assert_eq!(classify_urgency(40, true, 10.0, 20.0), Urgency::High);
        assert_eq!(classify_urgency(10, true, 20.0, 10.0), Urgency::High);
    }

    #[test]
    fn critical_needs_collapse_on_both_axes() {
        assert_eq!(classify_urgency(0, true, 100.0, 100.0), Urgency::Critical);
        assert_eq!(classify_urgency(29, true, 50.0, 25.0), Urgency::Critical);
    }

    #[test]
    fn classifiers_disagree_near_the_mild_boundary() {
        // Score 72 with spots: mild damage by condition, medium urgency.
        // The two ladders are separate on purpose; this pins the behavior.
        assert_eq!(
            classify_condition(72, true, false),
            OverallCondition::MildDamage
        );
        assert_eq!(classify_urgency(72, true, 9.3, 0.0), Urgency::Medium);
    }
}

// =============================================================================
// Health Assessment Tests
// =============================================================================

mod health_assessment {
    use super::*;
    use shared::analyzer::PixelScan;
    use shared::models::AnalysisResult;

    fn analysis(
        health_score: i32,
        has_black_spots: bool,
        black_spot_percentage: f64,
        has_damage: bool,
        damage_percentage: f64,
    ) -> AnalysisResult {
        AnalysisResult {
            has_black_spots,
            black_spot_count: if has_black_spots { 3 } else { 0 },
            black_spot_percentage,
            has_damage,
            damage_percentage,
            health_score,
            overall_condition: classify_condition(health_score, has_black_spots, has_damage),
            detected_issues: vec![],
            confidence: 94.0,
            image_quality: 80.0,
            analysis_time_secs: 0.1,
            pixel_scan: PixelScan::default(),
        }
    }

    #[test]
    fn healthy_assessment_keeps_routine_recommendations() {
        let assessment = HealthAssessment::from_analysis(&analysis(100, false, 0.0, false, 0.0));
        assert!(assessment.is_healthy);
        assert_eq!(assessment.health_percentage, 100);
        assert_eq!(assessment.urgency, Urgency::None);
        assert!(!assessment.recommendations.is_empty());
    }

    #[test]
    fn spotted_leaf_gets_fungicide_recommendations() {
        let assessment = HealthAssessment::from_analysis(&analysis(70, true, 8.0, false, 0.0));
        assert!(!assessment.is_healthy);
        assert!(assessment
            .recommendations
            .iter()
            .any(|r| r.contains("fungicide")));
    }

    #[test]
    fn urgent_cases_recommend_isolation() {
        let assessment = HealthAssessment::from_analysis(&analysis(20, true, 30.0, true, 20.0));
        assert!(matches!(
            assessment.urgency,
            Urgency::High | Urgency::Critical
        ));
        assert!(assessment
            .recommendations
            .iter()
            .any(|r| r.contains("Isolate")));
    }

    #[test]
    fn assessment_mirrors_the_condition_label() {
        let assessment = HealthAssessment::from_analysis(&analysis(55, true, 5.0, true, 8.0));
        assert_eq!(assessment.condition, "Moderate Damage");
    }
}

// =============================================================================
// Property Tests
// =============================================================================

proptest! {
    /// The score is always clamped into [0, 100]
    #[test]
    fn score_always_in_range(
        bsp in 0.0f64..=100.0,
        spots in any::<bool>(),
        dmg in 0.0f64..=100.0,
        damage in any::<bool>(),
    ) {
        let score = compute_health_score(bsp, spots, dmg, damage);
        prop_assert!((0..=100).contains(&score));
    }

    /// Increasing black-spot coverage never increases the score
    #[test]
    fn score_monotone_in_spot_coverage(
        low in 0.0f64..=100.0,
        delta in 0.0f64..=50.0,
        dmg in 0.0f64..=100.0,
        damage in any::<bool>(),
    ) {
        let high = (low + delta).min(100.0);
        let score_low = compute_health_score(low, true, dmg, damage);
        let score_high = compute_health_score(high, true, dmg, damage);
        prop_assert!(score_high <= score_low);
    }

    /// Scorer and classifiers are pure: same input, same output
    #[test]
    fn pipeline_is_idempotent(
        bsp in 0.0f64..=100.0,
        spots in any::<bool>(),
        dmg in 0.0f64..=100.0,
        damage in any::<bool>(),
    ) {
        let a = compute_health_score(bsp, spots, dmg, damage);
        let b = compute_health_score(bsp, spots, dmg, damage);
        prop_assert_eq!(a, b);
        prop_assert_eq!(
            classify_condition(a, spots, damage),
            classify_condition(b, spots, damage)
        );
        prop_assert_eq!(
            classify_urgency(a, spots, bsp, dmg),
            classify_urgency(b, spots, bsp, dmg)
        );
    }
}
