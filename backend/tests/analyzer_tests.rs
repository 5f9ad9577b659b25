//! Tests for the leaf-image analyzer
//! Verifies the pixel predicates, derived statistics, and the end-to-end
//! scenarios from the analysis contract

use shared::analyzer::{PlantImageAnalyzer, RgbaFrame};
use shared::models::{select_disease, OverallCondition};

/// Build a frame filled with one RGB color
fn uniform_pixels(r: u8, g: u8, b: u8, width: u32, height: u32) -> Vec<u8> {
    let mut pixels = Vec::with_capacity((width * height * 4) as usize);
    for _ in 0..width * height {
        pixels.extend_from_slice(&[r, g, b, 255]);
    }
    pixels
}

/// Build a frame whose first `count` pixels are one color and the rest
/// another
fn split_pixels(
    first: (u8, u8, u8),
    rest: (u8, u8, u8),
    count: usize,
    width: u32,
    height: u32,
) -> Vec<u8> {
    let total = (width * height) as usize;
    let mut pixels = Vec::with_capacity(total * 4);
    for i in 0..total {
        let (r, g, b) = if i < count { first } else { rest };
        pixels.extend_from_slice(&[r, g, b, 255]);
    }
    pixels
}

// =============================================================================
// Scenario A: all-black frame
// Every pixel matches the black-spot predicate; none match a damage predicate
// =============================================================================

mod all_black_frame {
    use super::*;

    #[test]
    fn every_pixel_is_a_black_spot() {
        let pixels = uniform_pixels(0, 0, 0, 100, 100);
        let frame = RgbaFrame::new(&pixels, 100, 100).unwrap();
        let analysis = PlantImageAnalyzer::new().analyze(&frame);

        assert_eq!(analysis.black_spot_percentage, 100.0);
        assert!(analysis.has_black_spots);
        assert!(analysis.black_spot_count >= 1);
        assert!(!analysis.has_damage);
        assert_eq!(analysis.damage_percentage, 0.0);
    }

    #[test]
    fn spot_deduction_caps_the_score_at_sixty() {
        let pixels = uniform_pixels(0, 0, 0, 100, 100);
        let frame = RgbaFrame::new(&pixels, 100, 100).unwrap();
        let analysis = PlantImageAnalyzer::new().analyze(&frame);

        // 100 - min(100 * 3, 40) with no damage deduction
        assert_eq!(analysis.health_score, 60);
        assert_eq!(analysis.overall_condition, OverallCondition::ModerateDamage);
    }

    #[test]
    fn selector_picks_black_spot_disease() {
        let pixels = uniform_pixels(0, 0, 0, 100, 100);
        let frame = RgbaFrame::new(&pixels, 100, 100).unwrap();
        let analysis = PlantImageAnalyzer::new().analyze(&frame);

        let matched = select_disease(&analysis);
        assert_eq!(matched.record.name, "Black Spot Disease");
        assert!(matched.confidence <= 0.95);
    }
}

// =============================================================================
// Scenario B: uniform mid-gray frame
// No predicate matches anywhere; the plant reads as fully healthy
// =============================================================================

mod mid_gray_frame {
    use super::*;

    #[test]
    fn nothing_matches_and_plant_is_healthy() {
        let pixels = uniform_pixels(128, 128, 128, 100, 100);
        let frame = RgbaFrame::new(&pixels, 100, 100).unwrap();
        let analysis = PlantImageAnalyzer::new().analyze(&frame);

        assert!(!analysis.has_black_spots);
        assert_eq!(analysis.black_spot_count, 0);
        assert!(!analysis.has_damage);
        assert_eq!(analysis.health_score, 100);
        assert_eq!(analysis.overall_condition, OverallCondition::Healthy);
        assert!(analysis.detected_issues.is_empty());
    }

    #[test]
    fn selector_returns_synthesized_healthy_entry() {
        let pixels = uniform_pixels(128, 128, 128, 100, 100);
        let frame = RgbaFrame::new(&pixels, 100, 100).unwrap();
        let analysis = PlantImageAnalyzer::new().analyze(&frame);

        let matched = select_disease(&analysis);
        assert_eq!(matched.record.name, "Healthy Plant");
        assert_eq!(matched.confidence, 0.95);
    }

    #[test]
    fn flat_frame_scores_base_quality() {
        let pixels = uniform_pixels(128, 128, 128, 100, 100);
        let frame = RgbaFrame::new(&pixels, 100, 100).unwrap();
        let analysis = PlantImageAnalyzer::new().analyze(&frame);

        // No edges, no contrast: only the base term remains
        assert_eq!(analysis.image_quality, 50.0);
    }
}

// =============================================================================
// Scenario C: exactly 3% black-spot pixels
// =============================================================================

mod three_percent_spots {
    use super::*;

    #[test]
    fn selector_branch_one_fires_above_two_percent() {
        let pixels = split_pixels((0, 0, 0), (128, 128, 128), 300, 100, 100);
        let frame = RgbaFrame::new(&pixels, 100, 100).unwrap();
        let analysis = PlantImageAnalyzer::new().analyze(&frame);

        assert_eq!(analysis.black_spot_percentage, 3.0);
        assert!(analysis.has_black_spots);
        assert!(!analysis.has_damage);
        // 100 - min(3 * 3, 40)
        assert_eq!(analysis.health_score, 91);

        let matched = select_disease(&analysis);
        assert_eq!(matched.record.name, "Black Spot Disease");
        assert!(matched.confidence >= 0.90 && matched.confidence <= 0.95);
    }
}

// =============================================================================
// Scenario D: 12% damage, no black spots
// =============================================================================

mod twelve_percent_damage {
    use super::*;

    #[test]
    fn selector_branch_two_fires_above_ten_percent() {
        // (220, 180, 60) matches exactly the yellowing predicate
        let pixels = split_pixels((220, 180, 60), (128, 128, 128), 1200, 100, 100);
        let frame = RgbaFrame::new(&pixels, 100, 100).unwrap();
        let analysis = PlantImageAnalyzer::new().analyze(&frame);

        assert!(!analysis.has_black_spots);
        assert_eq!(analysis.damage_percentage, 12.0);
        assert!(analysis.has_damage);
        // 100 - min(12 * 2, 50)
        assert_eq!(analysis.health_score, 76);

        let matched = select_disease(&analysis);
        assert_eq!(matched.record.name, "Powdery Mildew");
        assert_eq!(matched.confidence, 0.88);
    }

    #[test]
    fn yellowing_is_reported_as_an_issue() {
        let pixels = split_pixels((220, 180, 60), (128, 128, 128), 1200, 100, 100);
        let frame = RgbaFrame::new(&pixels, 100, 100).unwrap();
        let analysis = PlantImageAnalyzer::new().analyze(&frame);

        assert!(analysis
            .detected_issues
            .iter()
            .any(|i| i.contains("Yellowing")));
    }
}

// =============================================================================
// Damage tally double-counting
// A pixel matching two predicates is counted once per match; the reported
// percentage clamps at 100
// =============================================================================

mod damage_double_counting {
    use super::*;

    #[test]
    fn one_pixel_can_match_two_predicates() {
        // (140, 55, 75) matches both the browning and wilting predicates
        let pixels = uniform_pixels(140, 55, 75, 10, 10);
        let frame = RgbaFrame::new(&pixels, 10, 10).unwrap();
        let scan = PlantImageAnalyzer::new().scan(&frame);

        assert_eq!(scan.browning_pixels, 100);
        assert_eq!(scan.wilting_pixels, 100);
        assert_eq!(scan.damage_tally, 200);
        // Reported coverage still clamps into [0, 100]
        assert_eq!(scan.damage_percentage(), 100.0);
    }
}

// =============================================================================
// Potential-spot tally
// Computed and reported, but never scored
// =============================================================================

mod potential_spots {
    use super::*;

    #[test]
    fn potential_spots_do_not_affect_score_or_flags() {
        // (90, 30, 20): dark reddish, strong variation - potential spot only
        let pixels = uniform_pixels(90, 30, 20, 100, 100);
        let frame = RgbaFrame::new(&pixels, 100, 100).unwrap();
        let analysis = PlantImageAnalyzer::new().analyze(&frame);

        assert_eq!(analysis.pixel_scan.potential_spot_pixels, 10_000);
        assert_eq!(analysis.pixel_scan.black_spot_pixels, 0);
        assert!(!analysis.has_black_spots);
        assert_eq!(analysis.health_score, 100);
    }
}

// =============================================================================
// Derived-statistic bounds and purity
// =============================================================================

mod bounds_and_purity {
    use super::*;

    #[test]
    fn percentages_and_score_stay_in_range() {
        let frames = [
            uniform_pixels(0, 0, 0, 50, 40),
            uniform_pixels(255, 255, 255, 50, 40),
            uniform_pixels(140, 55, 75, 50, 40),
            split_pixels((0, 0, 0), (220, 180, 60), 900, 50, 40),
        ];

        for pixels in &frames {
            let frame = RgbaFrame::new(pixels, 50, 40).unwrap();
            let analysis = PlantImageAnalyzer::new().analyze(&frame);

            assert!((0.0..=100.0).contains(&analysis.black_spot_percentage));
            assert!((0.0..=100.0).contains(&analysis.damage_percentage));
            assert!((0..=100).contains(&analysis.health_score));
            assert!((0.0..=95.0).contains(&analysis.image_quality));
            assert!((90.0..=98.0).contains(&analysis.confidence));
        }
    }

    #[test]
    fn analysis_is_deterministic_for_the_same_frame() {
        let pixels = split_pixels((0, 0, 0), (220, 180, 60), 700, 50, 40);
        let frame = RgbaFrame::new(&pixels, 50, 40).unwrap();
        let analyzer = PlantImageAnalyzer::new();

        let first = analyzer.analyze(&frame);
        let second = analyzer.analyze(&frame);

        assert_eq!(first.black_spot_percentage, second.black_spot_percentage);
        assert_eq!(first.damage_percentage, second.damage_percentage);
        assert_eq!(first.health_score, second.health_score);
        assert_eq!(first.confidence, second.confidence);
        assert_eq!(first.detected_issues, second.detected_issues);
    }

    #[test]
    fn busy_frame_quality_respects_the_cap() {
        // Checkerboard maximizes the gradient estimate
        let (width, height) = (50u32, 40u32);
        let mut pixels = Vec::with_capacity((width * height * 4) as usize);
        for y in 0..height {
            for x in 0..width {
                let v = if (x + y) % 2 == 0 { 255 } else { 0 };
                pixels.extend_from_slice(&[v, v, v, 255]);
            }
        }
        let frame = RgbaFrame::new(&pixels, width, height).unwrap();
        let analysis = PlantImageAnalyzer::new().analyze(&frame);

        assert!(analysis.image_quality <= 95.0);
    }
}
