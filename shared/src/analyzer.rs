//! Heuristic leaf-image analysis
//!
//! Scans a decoded RGBA frame with per-pixel brightness/color-channel
//! threshold tests to estimate black-spot coverage, generic damage coverage,
//! and image quality. This is a rule-based screening pass, not a trained
//! model; the thresholds below are the tunables.

use serde::{Deserialize, Serialize};

use crate::models::{classify_condition, compute_health_score, AnalysisResult};

// ------------------------- tunables -------------------------

/// Black spot predicate: dark, near-neutral pixels
const BLACK_SPOT_MAX_BRIGHTNESS: f32 = 60.0;
const BLACK_SPOT_MAX_VARIATION: f32 = 30.0;

/// Looser "potential spot" predicate: dark reddish pixels with strong
/// channel variation. Tallied and reported but never scored.
const POTENTIAL_SPOT_MAX_BRIGHTNESS: f32 = 100.0;
const POTENTIAL_SPOT_MIN_VARIATION: f32 = 40.0;

/// Coverage (percent of total pixels) above which the flags trip
const BLACK_SPOT_FLAG_PERCENT: f64 = 0.1;
const DAMAGE_FLAG_PERCENT: f64 = 0.5;

/// Per-category coverage (percent) above which an issue line is reported
const ISSUE_REPORT_PERCENT: f64 = 0.5;

/// Gradient sum above which an interior pixel counts as an edge pixel
const EDGE_GRADIENT_THRESHOLD: f32 = 30.0;

/// Spot-count density proxy: one "spot" per 2% of the frame width
const SPOT_CLUSTER_WIDTH_FACTOR: f64 = 0.02;

/// Quality score assembly
const QUALITY_BASE: f64 = 50.0;
const QUALITY_SHARPNESS_CAP: f64 = 30.0;
const QUALITY_CONTRAST_CAP: f64 = 20.0;
const QUALITY_CAP: f64 = 95.0;

/// A borrowed RGBA frame: tightly packed 8-bit samples, row-major
#[derive(Debug, Clone, Copy)]
pub struct RgbaFrame<'a> {
    pixels: &'a [u8],
    width: u32,
    height: u32,
}

impl<'a> RgbaFrame<'a> {
    /// Wrap a raw RGBA buffer, checking that its length matches the
    /// declared dimensions
    pub fn new(pixels: &'a [u8], width: u32, height: u32) -> Result<Self, &'static str> {
        if width == 0 || height == 0 {
            return Err("Frame dimensions must be non-zero");
        }
        let expected = width as usize * height as usize * 4;
        if pixels.len() != expected {
            return Err("Pixel buffer length does not match frame dimensions");
        }
        Ok(Self {
            pixels,
            width,
            height,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn total_pixels(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    /// RGB channels of the pixel at (x, y) as floats
    fn rgb_at(&self, x: u32, y: u32) -> (f32, f32, f32) {
        let idx = (y as usize * self.width as usize + x as usize) * 4;
        (
            self.pixels[idx] as f32,
            self.pixels[idx + 1] as f32,
            self.pixels[idx + 2] as f32,
        )
    }
}

/// Raw tallies from one scan of a frame
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PixelScan {
    pub total_pixels: u64,
    /// Pixels matching the black-spot predicate
    pub black_spot_pixels: u64,
    /// Pixels matching the looser "potential spot" predicate. Reported for
    /// observability; not used by the scorer.
    pub potential_spot_pixels: u64,
    pub yellowing_pixels: u64,
    pub browning_pixels: u64,
    pub wilting_pixels: u64,
    pub pale_patch_pixels: u64,
    /// Sum of all four damage predicate matches. A pixel matching several
    /// predicates is counted once per match, so this can exceed the true
    /// damaged-pixel count.
    pub damage_tally: u64,
    /// Interior pixels whose right+below grayscale gradient exceeds the
    /// edge threshold
    pub edge_pixels: u64,
    /// Mean absolute deviation of pixel brightness from the frame mean
    pub average_contrast: f64,
}

impl PixelScan {
    pub fn black_spot_percentage(&self) -> f64 {
        round2(100.0 * self.black_spot_pixels as f64 / self.total_pixels as f64)
    }

    /// Damage coverage, clamped to 100: the additive tally can exceed the
    /// pixel count when one pixel matches several predicates
    pub fn damage_percentage(&self) -> f64 {
        round2((100.0 * self.damage_tally as f64 / self.total_pixels as f64).min(100.0))
    }

    pub fn sharpness(&self) -> f64 {
        100.0 * self.edge_pixels as f64 / self.total_pixels as f64
    }
}

/// Stateless analyzer over RGBA frames
///
/// Construct one explicitly and pass it to call sites; it holds no state
/// between calls.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlantImageAnalyzer;

impl PlantImageAnalyzer {
    pub fn new() -> Self {
        Self
    }

    /// Tally the per-pixel predicates over the whole frame
    pub fn scan(&self, frame: &RgbaFrame) -> PixelScan {
        let mut scan = PixelScan {
            total_pixels: frame.total_pixels(),
            ..Default::default()
        };

        let mut brightness_sum = 0.0f64;

        for chunk in frame.pixels.chunks_exact(4) {
            let r = chunk[0] as f32;
            let g = chunk[1] as f32;
            let b = chunk[2] as f32;
            let brightness = (r + g + b) / 3.0;
            let variation = (r - g).abs() + (g - b).abs() + (b - r).abs();
            brightness_sum += brightness as f64;

            if brightness < BLACK_SPOT_MAX_BRIGHTNESS && variation < BLACK_SPOT_MAX_VARIATION {
                scan.black_spot_pixels += 1;
            }
            if brightness < POTENTIAL_SPOT_MAX_BRIGHTNESS
                && r > g
                && r > b
                && variation > POTENTIAL_SPOT_MIN_VARIATION
            {
                scan.potential_spot_pixels += 1;
            }

            // Four independent damage predicates; each match counts
            if r > 180.0 && g > 150.0 && b < 100.0 && brightness > 150.0 {
                scan.yellowing_pixels += 1;
                scan.damage_tally += 1;
            }
            if r > 100.0 && r < 180.0 && g > 50.0 && g < 130.0 && b < 80.0 && brightness < 150.0 {
                scan.browning_pixels += 1;
                scan.damage_tally += 1;
            }
            if g < r * 0.7 && g < b * 0.8 && brightness < 120.0 {
                scan.wilting_pixels += 1;
                scan.damage_tally += 1;
            }
            if brightness > 200.0 && (r - g).abs() < 20.0 && (g - b).abs() < 20.0 {
                scan.pale_patch_pixels += 1;
                scan.damage_tally += 1;
            }
        }

        let mean_brightness = brightness_sum / scan.total_pixels as f64;
        let mut deviation_sum = 0.0f64;
        for chunk in frame.pixels.chunks_exact(4) {
            let brightness =
                (chunk[0] as f32 + chunk[1] as f32 + chunk[2] as f32) as f64 / 3.0;
            deviation_sum += (brightness - mean_brightness).abs();
        }
        scan.average_contrast = deviation_sum / scan.total_pixels as f64;

        // Gradient pass over pixels that have a right and a below neighbor
        for y in 0..frame.height.saturating_sub(1) {
            for x in 0..frame.width.saturating_sub(1) {
                let here = gray(frame.rgb_at(x, y));
                let right = gray(frame.rgb_at(x + 1, y));
                let below = gray(frame.rgb_at(x, y + 1));
                if (here - right).abs() + (here - below).abs() > EDGE_GRADIENT_THRESHOLD {
                    scan.edge_pixels += 1;
                }
            }
        }

        scan
    }

    /// Run the full analysis pipeline on a frame
    ///
    /// `analysis_time_secs` is left at zero; the caller that owns the clock
    /// fills it in.
    pub fn analyze(&self, frame: &RgbaFrame) -> AnalysisResult {
        let scan = self.scan(frame);

        let black_spot_percentage = scan.black_spot_percentage();
        let has_black_spots = black_spot_percentage > BLACK_SPOT_FLAG_PERCENT;
        let black_spot_count = estimate_spot_count(scan.black_spot_pixels, frame.width);

        let damage_percentage = scan.damage_percentage();
        let has_damage = damage_percentage > DAMAGE_FLAG_PERCENT;

        let health_score = compute_health_score(
            black_spot_percentage,
            has_black_spots,
            damage_percentage,
            has_damage,
        );
        let overall_condition = classify_condition(health_score, has_black_spots, has_damage);

        AnalysisResult {
            has_black_spots,
            black_spot_count,
            black_spot_percentage,
            has_damage,
            damage_percentage,
            health_score,
            overall_condition,
            detected_issues: describe_issues(&scan, has_black_spots, black_spot_percentage),
            confidence: display_confidence(&scan),
            image_quality: quality_score(&scan),
            analysis_time_secs: 0.0,
            pixel_scan: scan,
        }
    }
}

fn gray((r, g, b): (f32, f32, f32)) -> f32 {
    (r + g + b) / 3.0
}

/// Round to two decimals for the reported percentages
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Estimate the number of distinct spots from the matched-pixel count.
///
/// This is a density proxy (one spot per 2% of frame width worth of
/// pixels), not a connected-component count; treat it as an order of
/// magnitude only.
fn estimate_spot_count(black_spot_pixels: u64, width: u32) -> i32 {
    if black_spot_pixels == 0 {
        return 0;
    }
    let cluster = width as f64 * SPOT_CLUSTER_WIDTH_FACTOR;
    ((black_spot_pixels as f64 / cluster).ceil() as i32).max(1)
}

/// Image quality from sharpness and contrast, capped at 95
fn quality_score(scan: &PixelScan) -> f64 {
    let sharpness_term = (scan.sharpness() * 2.0).min(QUALITY_SHARPNESS_CAP);
    let contrast_term = (scan.average_contrast / 5.0).min(QUALITY_CONTRAST_CAP);
    (QUALITY_BASE + sharpness_term + contrast_term).min(QUALITY_CAP)
}

/// Display confidence in [90, 98].
///
/// A cosmetic figure for the result card, not a statistical confidence.
/// Derived from the tallies instead of a random source so the analysis
/// stays a pure function of its input.
fn display_confidence(scan: &PixelScan) -> f32 {
    let seed = scan
        .total_pixels
        .wrapping_add(scan.black_spot_pixels.wrapping_mul(31))
        .wrapping_add(scan.damage_tally.wrapping_mul(17))
        .wrapping_add(scan.edge_pixels.wrapping_mul(7));
    90.0 + (seed % 81) as f32 / 10.0
}

/// Ordered human-readable issue descriptions
fn describe_issues(
    scan: &PixelScan,
    has_black_spots: bool,
    black_spot_percentage: f64,
) -> Vec<String> {
    let mut issues = Vec::new();
    let total = scan.total_pixels as f64;
    let pct = |count: u64| round2(100.0 * count as f64 / total);

    if has_black_spots {
        issues.push(format!(
            "Dark lesion spots cover {:.2}% of the leaf surface",
            black_spot_percentage
        ));
    }
    let yellowing = pct(scan.yellowing_pixels);
    if yellowing > ISSUE_REPORT_PERCENT {
        issues.push(format!("Yellowing (chlorosis) on {:.2}% of the leaf", yellowing));
    }
    let browning = pct(scan.browning_pixels);
    if browning > ISSUE_REPORT_PERCENT {
        issues.push(format!(
            "Browning or necrotic tissue on {:.2}% of the leaf",
            browning
        ));
    }
    let wilting = pct(scan.wilting_pixels);
    if wilting > ISSUE_REPORT_PERCENT {
        issues.push(format!(
            "Color pattern consistent with wilting on {:.2}% of the leaf",
            wilting
        ));
    }
    let pale = pct(scan.pale_patch_pixels);
    if pale > ISSUE_REPORT_PERCENT {
        issues.push(format!(
            "Pale or silvery patches on {:.2}% of the leaf",
            pale
        ));
    }
    issues
}
