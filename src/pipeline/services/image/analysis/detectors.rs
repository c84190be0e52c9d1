/// Per-pixel condition detectors
use super::config::{ErythemaThresholds, PigmentationThresholds, TextureThresholds};
use super::core::{AnalysisContext, ConditionMask, DetectionResult, MaskDetector};
use crate::pipeline::types::{Condition, Mask};
use image::GrayImage;
use std::time::Instant;

/// Flags darker, moderately saturated pixels as hyperpigmentation candidates.
pub struct PigmentationDetector {
    thresholds: PigmentationThresholds,
}

impl PigmentationDetector {
    pub fn new() -> Self {
        Self::with_thresholds(PigmentationThresholds::default())
    }

    pub fn with_thresholds(thresholds: PigmentationThresholds) -> Self {
        Self { thresholds }
    }
}

impl Default for PigmentationDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl MaskDetector for PigmentationDetector {
    fn detect(&self, context: &AnalysisContext) -> DetectionResult<ConditionMask> {
        let start_time = Instant::now();
        let (width, height) = context.dimensions;
        let mask = Mask::from_fn(width, height, |x, y| {
            let hsv = context.hsv_at(x, y);
            hsv.value <= self.thresholds.max_value && hsv.saturation >= self.thresholds.min_saturation
        });

        let count = mask.count();
        DetectionResult::new(
            ConditionMask {
                condition: self.condition(),
                mask,
                threshold: None,
            },
            format!("{} raw pigmentation pixels", count),
        )
        .with_timing(start_time)
    }

    fn condition(&self) -> Condition {
        Condition::Pigmentation
    }

    fn name(&self) -> &'static str {
        "PigmentationDetector"
    }
}

/// Flags strongly red-dominant pixels. The dominance ratio keeps ordinary warm
/// skin tones out of the mask.
pub struct ErythemaDetector {
    thresholds: ErythemaThresholds,
}

impl ErythemaDetector {
    pub fn new() -> Self {
        Self::with_thresholds(ErythemaThresholds::default())
    }

    pub fn with_thresholds(thresholds: ErythemaThresholds) -> Self {
        Self { thresholds }
    }

    pub fn is_erythema(&self, r: u8, g: u8, b: u8, saturation: f32, value: f32) -> bool {
        let t = &self.thresholds;
        let red_green = r as i16 - g as i16;
        let red_blue = r as i16 - b as i16;
        if red_green < t.min_red_green_diff || red_blue < t.min_red_blue_diff || r < t.min_red {
            return false;
        }
        if value > t.max_value || saturation < t.min_saturation {
            return false;
        }

        let max = r.max(g).max(b);
        if max == 0 {
            return false;
        }
        (red_green.unsigned_abs() as f32 / max as f32) > t.min_red_dominance
    }
}

impl Default for ErythemaDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl MaskDetector for ErythemaDetector {
    fn detect(&self, context: &AnalysisContext) -> DetectionResult<ConditionMask> {
        let start_time = Instant::now();
        let (width, height) = context.dimensions;
        let mask = Mask::from_fn(width, height, |x, y| {
            let [r, g, b, _] = context.image.get_pixel(x, y).0;
            let hsv = context.hsv_at(x, y);
            self.is_erythema(r, g, b, hsv.saturation, hsv.value)
        });

        let count = mask.count();
        DetectionResult::new(
            ConditionMask {
                condition: self.condition(),
                mask,
                threshold: None,
            },
            format!("{} raw erythema pixels", count),
        )
        .with_timing(start_time)
    }

    fn condition(&self) -> Condition {
        Condition::Erythema
    }

    fn name(&self) -> &'static str {
        "ErythemaDetector"
    }
}

/// Flags rough texture and scarring via Laplacian magnitude against an
/// image-adaptive percentile threshold.
pub struct TextureDetector {
    thresholds: TextureThresholds,
}

impl TextureDetector {
    pub fn new() -> Self {
        Self::with_thresholds(TextureThresholds::default())
    }

    pub fn with_thresholds(thresholds: TextureThresholds) -> Self {
        Self { thresholds }
    }

    /// Percentile of every `sample_stride`-th magnitude, or the fallback when
    /// the sample is too small.
    pub fn adaptive_threshold(&self, magnitudes: &[f32]) -> f32 {
        let mut sample: Vec<f32> = magnitudes
            .iter()
            .step_by(self.thresholds.sample_stride.max(1))
            .copied()
            .collect();
        if sample.is_empty() || sample.len() < self.thresholds.min_samples {
            return self.thresholds.fallback_threshold;
        }

        sample.sort_by(|a, b| a.total_cmp(b));
        let idx = (self.thresholds.percentile * (sample.len() - 1) as f32).floor() as usize;
        sample[idx.min(sample.len() - 1)]
    }
}

impl Default for TextureDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl MaskDetector for TextureDetector {
    fn detect(&self, context: &AnalysisContext) -> DetectionResult<ConditionMask> {
        let start_time = Instant::now();
        let (width, height) = context.dimensions;
        let magnitudes = laplacian_magnitudes(&context.gray);
        let threshold = self.adaptive_threshold(&magnitudes);

        let mask = Mask::from_fn(width, height, |x, y| {
            magnitudes[y as usize * width as usize + x as usize] > threshold
        });

        let count = mask.count();
        DetectionResult::new(
            ConditionMask {
                condition: self.condition(),
                mask,
                threshold: Some(threshold),
            },
            format!("{} raw texture pixels above {:.1}", count, threshold),
        )
        .with_timing(start_time)
    }

    fn condition(&self) -> Condition {
        Condition::Texture
    }

    fn name(&self) -> &'static str {
        "TextureDetector"
    }
}

/// Absolute 3x3 Laplacian (centre -4, orthogonal +1) of every pixel, row-major.
/// Out-of-range neighbours replicate the nearest edge pixel.
pub fn laplacian_magnitudes(gray: &GrayImage) -> Vec<f32> {
    let (width, height) = gray.dimensions();
    let mut magnitudes = Vec::with_capacity(width as usize * height as usize);
    if width == 0 || height == 0 {
        return magnitudes;
    }

    let at = |x: i64, y: i64| -> f32 {
        let cx = x.clamp(0, width as i64 - 1) as u32;
        let cy = y.clamp(0, height as i64 - 1) as u32;
        gray.get_pixel(cx, cy)[0] as f32
    };

    for y in 0..height as i64 {
        for x in 0..width as i64 {
            let center = at(x, y);
            let laplacian =
                at(x, y - 1) + at(x, y + 1) + at(x - 1, y) + at(x + 1, y) - 4.0 * center;
            magnitudes.push(laplacian.abs());
        }
    }
    magnitudes
}
