use crate::pipeline::types::{FaceRegion, SeverityThresholds};
use serde::{Deserialize, Serialize};

pub const DEFAULT_OVERLAY_OPACITY: f32 = 0.45;
pub const MIN_OVERLAY_OPACITY: f32 = 0.05;
pub const MAX_OVERLAY_OPACITY: f32 = 0.95;
pub const MAX_ANALYSIS_WIDTH: u32 = 900;

/// Configuration for skin segmentation with tunable parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SegmentationConfig {
    /// Images wider than this are downscaled before analysis. At most 900.
    pub max_width: u32,
    pub pigmentation: PigmentationThresholds,
    pub erythema: ErythemaThresholds,
    pub texture: TextureThresholds,
    pub severity: SeverityConfig,
    pub recommendations: RecommendationCutoffs,
    pub regions: Vec<FaceRegion>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PigmentationThresholds {
    pub max_value: f32,
    pub min_saturation: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ErythemaThresholds {
    pub min_red_green_diff: i16,
    pub min_red_blue_diff: i16,
    pub min_red: u8,
    pub max_value: f32,
    pub min_saturation: f32,
    /// |R - G| / max(R, G, B) must exceed this; suppresses warm skin tones.
    pub min_red_dominance: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextureThresholds {
    pub percentile: f32,
    pub sample_stride: usize,
    pub min_samples: usize,
    pub fallback_threshold: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeverityConfig {
    pub pigmentation: SeverityThresholds,
    pub erythema: SeverityThresholds,
    pub texture: SeverityThresholds,
}

/// Average-coverage cutoffs that trigger canned recommendations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecommendationCutoffs {
    pub erythema_defer_pct: f64,
    pub erythema_referral_pct: f64,
    pub pigmentation_spf_pct: f64,
    pub pigmentation_patch_test_pct: f64,
    pub texture_microchanneling_pct: f64,
}

impl Default for SegmentationConfig {
    fn default() -> Self {
        Self {
            max_width: MAX_ANALYSIS_WIDTH,
            pigmentation: PigmentationThresholds::default(),
            erythema: ErythemaThresholds::default(),
            texture: TextureThresholds::default(),
            severity: SeverityConfig::default(),
            recommendations: RecommendationCutoffs::default(),
            regions: FaceRegion::default_face_regions(),
        }
    }
}

impl Default for PigmentationThresholds {
    fn default() -> Self {
        Self {
            max_value: 0.5,
            min_saturation: 0.18,
        }
    }
}

impl Default for ErythemaThresholds {
    fn default() -> Self {
        Self {
            min_red_green_diff: 25,
            min_red_blue_diff: 25,
            min_red: 120,
            max_value: 0.85,
            min_saturation: 0.30,
            min_red_dominance: 0.15,
        }
    }
}

impl Default for TextureThresholds {
    fn default() -> Self {
        Self {
            percentile: 0.90,
            sample_stride: 30,
            min_samples: 10,
            fallback_threshold: 28.0,
        }
    }
}

impl Default for SeverityConfig {
    fn default() -> Self {
        Self {
            pigmentation: SeverityThresholds::new(5.0, 15.0, 30.0),
            // Erythema uses a more conservative scale to limit false positives
            erythema: SeverityThresholds::new(8.0, 20.0, 35.0),
            texture: SeverityThresholds::new(5.0, 15.0, 30.0),
        }
    }
}

impl Default for RecommendationCutoffs {
    fn default() -> Self {
        Self {
            erythema_defer_pct: 10.0,
            erythema_referral_pct: 25.0,
            pigmentation_spf_pct: 15.0,
            pigmentation_patch_test_pct: 30.0,
            texture_microchanneling_pct: 20.0,
        }
    }
}

impl SegmentationConfig {
    /// Stricter erythema gate for clients with warm or olive undertones.
    pub fn warm_skin_optimized() -> Self {
        Self {
            erythema: ErythemaThresholds {
                min_red_green_diff: 35,
                min_red_blue_diff: 35,
                min_red_dominance: 0.22,
                ..ErythemaThresholds::default()
            },
            ..Self::default()
        }
    }

    /// Validate configuration parameters
    pub fn validate(&self) -> Result<(), String> {
        if self.max_width == 0 || self.max_width > MAX_ANALYSIS_WIDTH {
            return Err(format!(
                "Max width must be between 1 and {}",
                MAX_ANALYSIS_WIDTH
            ));
        }

        let unit = |v: f32| (0.0..=1.0).contains(&v);
        if !unit(self.pigmentation.max_value) || !unit(self.pigmentation.min_saturation) {
            return Err("Pigmentation thresholds must be between 0.0 and 1.0".to_string());
        }
        if !unit(self.erythema.max_value)
            || !unit(self.erythema.min_saturation)
            || !unit(self.erythema.min_red_dominance)
        {
            return Err("Erythema value, saturation and dominance must be between 0.0 and 1.0".to_string());
        }

        if !unit(self.texture.percentile) {
            return Err("Texture percentile must be between 0.0 and 1.0".to_string());
        }
        if self.texture.sample_stride == 0 {
            return Err("Texture sample stride must be greater than 0".to_string());
        }
        if self.texture.fallback_threshold < 0.0 {
            return Err("Texture fallback threshold must not be negative".to_string());
        }

        self.severity.pigmentation.validate()?;
        self.severity.erythema.validate()?;
        self.severity.texture.validate()?;

        if self.regions.is_empty() {
            return Err("At least one region must be configured".to_string());
        }
        for region in &self.regions {
            region.validate()?;
        }

        Ok(())
    }

    pub fn with_regions(mut self, regions: Vec<FaceRegion>) -> Self {
        self.regions = regions;
        self
    }
}

/// Clamp a caller-supplied overlay opacity into the supported range.
pub fn clamp_opacity(opacity: f32) -> f32 {
    if opacity.is_nan() {
        return DEFAULT_OVERLAY_OPACITY;
    }
    opacity.clamp(MIN_OVERLAY_OPACITY, MAX_OVERLAY_OPACITY)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(SegmentationConfig::default().validate().is_ok());
        assert!(SegmentationConfig::warm_skin_optimized().validate().is_ok());
    }

    #[test]
    fn zero_stride_is_rejected() {
        let mut config = SegmentationConfig::default();
        config.texture.sample_stride = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn max_width_is_capped() {
        let mut config = SegmentationConfig::default();
        config.max_width = 1200;
        assert!(config.validate().is_err());
        config.max_width = 0;
        assert!(config.validate().is_err());
        config.max_width = 640;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn empty_region_table_is_rejected() {
        let config = SegmentationConfig::default().with_regions(Vec::new());
        assert!(config.validate().is_err());
    }

    #[test]
    fn opacity_is_clamped() {
        assert_eq!(clamp_opacity(0.0), MIN_OVERLAY_OPACITY);
        assert_eq!(clamp_opacity(1.0), MAX_OVERLAY_OPACITY);
        assert_eq!(clamp_opacity(0.3), 0.3);
        assert_eq!(clamp_opacity(f32::NAN), DEFAULT_OVERLAY_OPACITY);
    }
}
